//! Plain-text load and save.
//!
//! Documents are held LF-only; the dominant line ending of the source file is
//! kept so a save writes it back in the same style. Paths and lengths are
//! logged, never content.

use anyhow::{Context, Result};
use core_state::{LineEnding, normalize_line_endings, restore_line_endings};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    /// LF-only text.
    pub text: String,
    pub line_ending: LineEnding,
    /// More than one line ending style was present.
    pub mixed: bool,
    /// False when the path did not exist and an empty document was created.
    pub existed: bool,
}

/// Read `path`. A missing file yields an empty document that saves to `path`.
pub fn open_file(path: &Path) -> Result<OpenedFile> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(target: "io", path = %path.display(), "file_new");
            return Ok(OpenedFile {
                text: String::new(),
                line_ending: LineEnding::default(),
                mixed: false,
                existed: false,
            });
        }
        Err(e) => {
            tracing::error!(target: "io", path = %path.display(), ?e, "file_open_error");
            return Err(e).with_context(|| format!("reading {}", path.display()));
        }
    };
    let norm = normalize_line_endings(&content);
    if norm.mixed {
        tracing::warn!(target: "io", path = %path.display(), "mixed_line_endings");
    }
    tracing::info!(
        target: "io",
        path = %path.display(),
        bytes = content.len(),
        line_ending = ?norm.original,
        "file_opened"
    );
    Ok(OpenedFile {
        text: norm.normalized,
        line_ending: norm.original,
        mixed: norm.mixed,
        existed: true,
    })
}

/// Write LF-only `text` to `path` using `ending`. Returns bytes written.
pub fn write_file(path: &Path, text: &str, ending: LineEnding) -> Result<usize> {
    let out = restore_line_endings(text, ending);
    std::fs::write(path, out.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(target: "io", path = %path.display(), bytes = out.len(), "file_written");
    Ok(out.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dos.txt");
        std::fs::write(&path, "one\r\ntwo\r\n").unwrap();
        let opened = open_file(&path).unwrap();
        assert_eq!(opened.text, "one\ntwo\n");
        assert_eq!(opened.line_ending, LineEnding::Crlf);
        assert!(opened.existed && !opened.mixed);

        let text = format!("{}three\n", opened.text);
        let written = write_file(&path, &text, opened.line_ending).unwrap();
        assert_eq!(written, "one\r\ntwo\r\nthree\r\n".len());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\r\ntwo\r\nthree\r\n");
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let opened = open_file(&path).unwrap();
        assert_eq!(opened.text, "");
        assert_eq!(opened.line_ending, LineEnding::Lf);
        assert!(!opened.existed);
        assert!(!path.exists());
    }

    #[test]
    fn mixed_endings_are_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        std::fs::write(&path, "a\r\nb\nc\r\n").unwrap();
        let opened = open_file(&path).unwrap();
        assert!(opened.mixed);
        assert_eq!(opened.line_ending, LineEnding::Crlf);
        assert_eq!(opened.text, "a\nb\nc\n");
    }

    #[test]
    fn directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_file(dir.path()).is_err());
    }
}
