//! Property tests: overlay edits read and merge exactly like direct edits.

use core_state::DocumentState;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, String),
    Remove(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..64, "[a-z\n ]{1,4}").prop_map(|(at, s)| Op::Insert(at, s)),
        (0usize..64, 1usize..4).prop_map(|(at, n)| Op::Remove(at, n)),
    ]
}

fn char_byte(s: &str, idx: usize) -> usize {
    s.char_indices().nth(idx).map(|(b, _)| b).unwrap_or(s.len())
}

proptest! {
    #[test]
    fn overlay_merge_matches_direct_edits(
        doc in "[a-zé\n ]{0,80}",
        win in (0usize..80, 0usize..80),
        ops in prop::collection::vec(op_strategy(), 0..12),
    ) {
        let len = doc.chars().count();
        let s = win.0.min(len);
        let e = (s + win.1).min(len);
        let mut st = DocumentState::from_text(&doc);
        st.make_active(s, e).unwrap();
        let mut expected = doc.clone();

        for op in ops {
            let o = st.overlay().unwrap();
            let (lo, hi) = (o.source().start, o.logical_end());
            match op {
                Op::Insert(at, text) => {
                    let at = lo + at % (hi - lo + 1);
                    st.overlay_insert(at, &text).unwrap();
                    let b = char_byte(&expected, at);
                    expected.insert_str(b, &text);
                }
                Op::Remove(at, n) => {
                    if hi == lo {
                        continue;
                    }
                    let a = lo + at % (hi - lo);
                    let b = (a + n).min(hi);
                    st.overlay_remove(a..b).unwrap();
                    let (ba, bb) = (char_byte(&expected, a), char_byte(&expected, b));
                    expected.replace_range(ba..bb, "");
                }
            }
            // Logical reads agree before any merge.
            prop_assert_eq!(st.len(), expected.chars().count());
            prop_assert_eq!(st.slice(0..st.len()).unwrap(), expected.clone());
        }

        prop_assert_eq!(st.full_text().unwrap(), expected);
        prop_assert!(!st.has_overlay());
    }
}
