//! Property tests: random editing sessions through a small, tightly windowed
//! view agree with a plain string model, and the view's bookkeeping stays in
//! bounds after every call.

mod common;

use common::{insert_chars, remove_chars, tight_options, view_with};
use core_layout::MonospaceEngine;
use core_model::TextView;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Type(String),
    Paste(String),
    BackErase,
    ForwardErase,
    Left,
    Right,
    Up,
    Down,
    ExtendLeft,
    ExtendRight,
    Home,
    End,
    Page(bool),
    Scroll(isize),
    Jump(u8),
    Select(u8, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => "[ab \n]{1,3}".prop_map(Op::Type),
        1 => "[xy\n]{8,24}".prop_map(Op::Paste),
        1 => "[ \t]{30,90}".prop_map(Op::Paste),
        2 => Just(Op::BackErase),
        1 => Just(Op::ForwardErase),
        1 => Just(Op::Left),
        1 => Just(Op::Right),
        1 => Just(Op::Up),
        1 => Just(Op::Down),
        1 => Just(Op::ExtendLeft),
        1 => Just(Op::ExtendRight),
        1 => Just(Op::Home),
        1 => Just(Op::End),
        1 => any::<bool>().prop_map(Op::Page),
        1 => (-3isize..4).prop_map(Op::Scroll),
        1 => (0u8..=100).prop_map(Op::Jump),
        1 => (0u8..=100, 0u8..=100).prop_map(|(a, b)| Op::Select(a, b)),
    ]
}

fn at_percent(len: usize, p: u8) -> usize {
    len * p as usize / 100
}

/// Erase the selection from the model if there is one; returns where typing
/// would land afterwards.
fn model_take_selection(v: &TextView<MonospaceEngine>, model: &mut String) -> Option<usize> {
    let sel = v.selection();
    if sel.is_empty() {
        return None;
    }
    remove_chars(model, sel.begin, sel.end);
    Some(sel.begin)
}

/// Short lines mixed with whitespace runs long enough to hang past the box
/// edge and outgrow a window.
fn doc_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[ab\n ]{0,120}",
        1 => "([ab\n]{0,12}[ \t]{0,90}){0,3}",
    ]
}

fn check_bounds(
    v: &mut TextView<MonospaceEngine>,
    model: &str,
    caret_shown: bool,
) -> Result<(), TestCaseError> {
    let len = v.len();
    prop_assert_eq!(len, model.chars().count());
    prop_assert!(v.cursor() <= len);
    let sel = v.selection();
    prop_assert!(sel.begin <= sel.end && sel.end <= len);
    let cursor = v.cursor();
    let visible = v.is_visible(cursor).unwrap();
    if caret_shown {
        prop_assert!(visible, "caret {} outside {:?}", cursor, v.window());
    }
    let w = *v.window();
    prop_assert!(w.start <= w.end_view && w.end_view <= w.end && w.end <= len);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn edits_through_the_view_match_a_string_model(
        doc in doc_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let mut v = view_with(&doc, 60.0, 60.0, tight_options());
        let mut model = doc.clone();

        for op in ops {
            // Scrolling moves the window away from the caret on purpose.
            let caret_shown = !matches!(op, Op::Scroll(_));
            match op {
                Op::Type(s) | Op::Paste(s) => {
                    let at = model_take_selection(&v, &mut model).unwrap_or(v.cursor());
                    insert_chars(&mut model, at, &s);
                    prop_assert!(v.insert_text(&s).unwrap());
                    prop_assert_eq!(v.cursor(), at + s.chars().count());
                }
                Op::BackErase => {
                    if model_take_selection(&v, &mut model).is_none() && v.cursor() > 0 {
                        remove_chars(&mut model, v.cursor() - 1, v.cursor());
                    }
                    v.back_erase().unwrap();
                }
                Op::ForwardErase => {
                    let len = v.len();
                    if model_take_selection(&v, &mut model).is_none() && v.cursor() < len {
                        remove_chars(&mut model, v.cursor(), v.cursor() + 1);
                    }
                    v.forward_erase().unwrap();
                }
                Op::Left => { v.move_left().unwrap(); }
                Op::Right => { v.move_right().unwrap(); }
                Op::Up => { v.move_up().unwrap(); }
                Op::Down => { v.move_down().unwrap(); }
                Op::ExtendLeft => { v.extend_left().unwrap(); }
                Op::ExtendRight => { v.extend_right().unwrap(); }
                Op::Home => { v.move_line_start().unwrap(); }
                Op::End => { v.move_line_end().unwrap(); }
                Op::Page(down) => { v.page(down).unwrap(); }
                Op::Scroll(n) => { v.v_scroll(n).unwrap(); }
                Op::Jump(p) => {
                    let target = at_percent(v.len(), p);
                    v.set_cursor(target).unwrap();
                }
                Op::Select(a, b) => {
                    let len = v.len();
                    v.select_range(at_percent(len, a), at_percent(len, b)).unwrap();
                }
            }
            check_bounds(&mut v, &model, caret_shown)?;
        }

        prop_assert_eq!(v.get_full_text().unwrap(), model.clone());
        prop_assert!(!v.has_overlay());
        prop_assert_eq!(v.buffer_text(), model);
    }

    #[test]
    fn scrolling_never_changes_the_text(
        doc in "[ab\n ]{0,200}",
        steps in prop::collection::vec(-4isize..5, 0..20),
    ) {
        let mut v = view_with(&doc, 60.0, 60.0, tight_options());
        v.insert_text("z").unwrap();
        let expected = format!("z{doc}");
        for n in steps {
            v.v_scroll(n).unwrap();
            let w = *v.window();
            prop_assert!(w.start <= w.end && w.end <= v.len());
        }
        prop_assert_eq!(v.get_full_text().unwrap(), expected);
    }

    #[test]
    fn pointer_gestures_keep_selection_ordered(
        doc in doc_strategy(),
        gestures in prop::collection::vec((any::<bool>(), -20.0f32..80.0, -20.0f32..59.0), 1..30),
    ) {
        let mut v = view_with(&doc, 60.0, 60.0, tight_options());
        for (press, x, y) in gestures {
            if press {
                v.move_cursor_to(x, y).unwrap();
                prop_assert!(v.selection().is_empty());
            } else {
                v.change_selection(x, y).unwrap();
            }
            let sel = v.selection();
            let cursor = v.cursor();
            prop_assert!(sel.begin <= sel.end && sel.end <= v.len());
            prop_assert!(
                sel.is_empty() || cursor == sel.begin || cursor == sel.end,
                "cursor {} off selection {:?}", cursor, sel
            );
            prop_assert!(v.is_visible(cursor).unwrap());
        }
        prop_assert_eq!(v.get_full_text().unwrap(), doc);
    }
}
