//! Cell width of a single grapheme cluster.
//!
//! All advance-width decisions in the monospace layout go through
//! [`egc_width`]. The classifier leans toward over-estimating: an extra blank
//! cell is harmless, an under-estimate makes every later caret land wrong.

use unicode_width::UnicodeWidthChar;

const ZWJ: char = '\u{200D}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

// Rough Extended_Pictographic: main emoji blocks plus misc symbols/dingbats.
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

fn char_cells(c: char) -> u16 {
    c.width().unwrap_or(1) as u16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Control,
    Narrow,
    Wide,
    Emoji,
    /// Base plus combining marks; `true` when the base itself is wide.
    Combining(bool),
}

fn classify(egc: &str) -> EgcKind {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return EgcKind::Control;
    };
    if chars.next().is_none() {
        if first.is_control() {
            return EgcKind::Control;
        }
        if first.is_ascii() {
            return EgcKind::Narrow;
        }
        if is_extended_pictographic(first) || is_regional_indicator(first) {
            return EgcKind::Emoji;
        }
        return if char_cells(first) == 2 {
            EgcKind::Wide
        } else {
            EgcKind::Narrow
        };
    }

    let mut pictographic = 0usize;
    let mut regional = 0usize;
    let mut zwj = false;
    let mut skin = false;
    let mut combining = false;
    let mut keycap = false;
    let mut any_wide = false;
    for c in egc.chars() {
        pictographic += usize::from(is_extended_pictographic(c));
        regional += usize::from(is_regional_indicator(c));
        zwj |= c == ZWJ;
        skin |= is_skin_tone_modifier(c);
        combining |= is_combining_mark(c);
        keycap |= c == KEYCAP_COMBINING;
        any_wide |= char_cells(c) == 2;
    }

    if keycap || regional > 0 || skin || (zwj && pictographic >= 2) || pictographic > 0 {
        return EgcKind::Emoji;
    }
    if combining {
        let base_wide = char_cells(first) == 2;
        return EgcKind::Combining(base_wide);
    }
    if any_wide {
        EgcKind::Wide
    } else {
        EgcKind::Narrow
    }
}

/// Display cells occupied by one grapheme cluster.
///
/// Control clusters (including `\n` and `\t`) report 0; the layout engine
/// gives tabs and newlines their own advance rules.
pub fn egc_width(egc: &str) -> u16 {
    match classify(egc) {
        EgcKind::Control => 0,
        EgcKind::Narrow => 1,
        EgcKind::Wide | EgcKind::Emoji => 2,
        EgcKind::Combining(wide) => {
            if wide {
                2
            } else {
                1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_controls() {
        assert_eq!(egc_width("a"), 1);
        assert_eq!(egc_width(" "), 1);
        assert_eq!(egc_width("\n"), 0);
        assert_eq!(egc_width("\t"), 0);
        assert_eq!(egc_width(""), 0);
    }

    #[test]
    fn wide_cjk() {
        assert_eq!(egc_width("界"), 2);
        assert_eq!(egc_width("界\u{0301}"), 2);
    }

    #[test]
    fn emoji_sequences() {
        assert_eq!(egc_width("😀"), 2);
        assert_eq!(egc_width("🇺🇸"), 2);
        assert_eq!(egc_width("1️⃣"), 2);
        assert_eq!(egc_width("👍🏻"), 2);
        assert_eq!(egc_width("👨‍👩‍👧‍👦"), 2);
        assert_eq!(egc_width("✈️"), 2);
    }

    #[test]
    fn combining_on_narrow_base() {
        assert_eq!(egc_width("e\u{0301}"), 1);
    }
}
