// Test the equation editor lifecycle: insert, edit, commit, discard, reopen

use answer_editor_wasm::editor::{Effect, Focus};
use answer_editor_wasm::models::{EditorConfig, Inline};
use answer_editor_wasm::session::{CloseOutcome, SessionPhase};
use answer_editor_wasm::{Editor, EditorError};

fn focused_editor() -> Editor {
    let mut editor = Editor::new(EditorConfig::default()).expect("default config is valid");
    editor.focus_host();
    editor
}

#[test]
fn test_commit_by_focus_loss_via_math_field() {
    for latex in ["x", "\\sqrt{1}", "\\frac{a}{b}", "e^{i\\pi}+1=0"] {
        let mut editor = focused_editor();
        let id = editor.insert_equation().expect("insert equation");

        // Structured input reports each intermediate state
        let mut typed = String::new();
        for ch in latex.chars() {
            typed.push(ch);
            editor.math_field_edited(&typed).expect("session is open");
        }
        editor.blur();

        let equations: Vec<_> = editor.document().equations().collect();
        assert_eq!(equations.len(), 1, "Exactly one equation for {:?}", latex);
        assert_eq!(equations[0].id, id);
        assert_eq!(equations[0].latex, latex);
        assert_eq!(editor.phase(), SessionPhase::Closed);
    }
}

#[test]
fn test_commit_via_latex_field() {
    let mut editor = focused_editor();
    editor.insert_equation().expect("insert equation");
    editor.latex_field_edited("a^2+b^2").expect("session is open");
    editor.focus_host();

    let node = editor.document().equations().next().expect("equation committed");
    assert_eq!(node.latex, "a^2+b^2");
    assert_eq!(
        node.rendered_image_ref.as_ref().map(|r| r.as_str()),
        Some("/math.svg?latex=a%5E2%2Bb%5E2")
    );
}

#[test]
fn test_empty_session_is_discarded() {
    let mut editor = focused_editor();
    editor.type_text("a");
    editor.insert_equation().expect("insert equation");
    let closed = editor.close_equation().expect("a session was open");
    assert_eq!(closed.1, CloseOutcome::Discarded);

    // Only the padding survives
    assert_eq!(editor.document().equations().count(), 0);
    assert!(!editor
        .document()
        .items()
        .iter()
        .any(|item| matches!(item, Inline::Equation(_))));
    assert_eq!(editor.content_html(), "a&nbsp;&nbsp;");
}

#[test]
fn test_whitespace_only_latex_is_discarded() {
    let mut editor = focused_editor();
    editor.insert_equation().expect("insert equation");
    editor.latex_field_edited("   ").expect("session is open");
    editor.blur();
    assert_eq!(editor.document().equations().count(), 0);
}

#[test]
fn test_erasing_all_latex_discards_committed_equation() {
    let mut editor = focused_editor();
    let id = editor.insert_equation().expect("insert equation");
    editor.math_field_edited("x").expect("session is open");
    editor.blur();

    editor.open_equation(&id).expect("equation exists");
    editor.math_field_edited("").expect("session is open");
    editor.blur();
    assert!(editor.document().equation(&id).is_none());
}

#[test]
fn test_typing_after_commit_lands_after_equation() {
    let mut editor = Editor::new(EditorConfig {
        pad_equations: false,
        ..Default::default()
    })
    .expect("config is valid");
    editor.focus_host();
    editor.type_text("a");
    editor.insert_equation().expect("insert equation");
    editor.math_field_edited("x").expect("session is open");
    editor.type_text("b");

    let items = editor.document().items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0], Inline::Char('a'));
    assert!(matches!(items[1], Inline::Equation(_)));
    assert_eq!(items[2], Inline::Char('b'));
}

#[test]
fn test_caret_skips_trailing_line_break() {
    let mut editor = Editor::new(EditorConfig {
        pad_equations: false,
        ..Default::default()
    })
    .expect("config is valid");
    editor.focus_host();
    editor.load_html("<img src=\"/math.svg?latex=x\" data-latex=\"x\"><br>");
    let id = editor.document().equations().next().expect("loaded equation").id.clone();
    editor.set_cursor(0).expect("start of document");

    editor.open_equation(&id).expect("equation exists");
    editor.math_field_edited("y").expect("session is open");
    editor.close_equation();
    assert_eq!(editor.state().cursor(), 2, "Caret lands after the line break");
}

#[test]
fn test_reopen_seeds_committed_latex_and_fresh_history() {
    let mut editor = focused_editor();
    let id = editor.insert_equation().expect("insert equation");
    editor.math_field_edited("\\sqrt{ }").expect("session is open");
    editor.math_field_edited("\\sqrt{1}").expect("session is open");
    editor.blur();

    // Clicking the artifact opens a new session on the committed LaTeX
    let session = editor.open_equation(&id).expect("equation exists");
    assert_eq!(editor.current_latex(), Some("\\sqrt{1}"));
    assert_eq!(editor.session().map(|s| s.id()), Some(session));
    assert_eq!(editor.focus(), Focus::Equation);

    // Nothing from the first session can be undone
    let history = editor.history_state();
    assert!(!history.can_undo);
    assert!(!history.can_redo);
    assert_eq!(editor.undo(), Ok(None));
}

#[test]
fn test_opening_another_equation_closes_the_first() {
    let mut editor = focused_editor();
    let first = editor.insert_equation().expect("insert equation");
    editor.math_field_edited("1").expect("session is open");
    editor.blur();
    let second = editor.insert_equation().expect("insert equation");
    editor.math_field_edited("2").expect("session is open");

    editor.open_equation(&first).expect("equation exists");
    assert_eq!(editor.document().equation(&second).map(|n| n.latex.as_str()), Some("2"));
    assert_eq!(editor.session().map(|s| s.target().clone()), Some(first));
}

#[test]
fn test_equation_ids_are_unique() {
    let mut editor = focused_editor();
    let a = editor.insert_equation().expect("insert equation");
    editor.math_field_edited("a").expect("session is open");
    let b = editor.insert_equation().expect("insert equation");
    assert_ne!(a, b);
    assert_eq!(a.as_str(), "math-editor-1");
    assert_eq!(b.as_str(), "math-editor-2");
}

#[test]
fn test_open_unknown_equation_fails() {
    let mut editor = focused_editor();
    let err = editor
        .open_equation(&"math-editor-9".into())
        .expect_err("no such equation");
    assert_eq!(err, EditorError::EquationNotFound("math-editor-9".to_string()));
}

#[test]
fn test_lifecycle_effects() {
    let mut editor = focused_editor();
    let id = editor.insert_equation().expect("insert equation");
    let opened = editor.drain_effects();
    assert!(matches!(opened[0], Effect::SessionOpened { ref equation, .. } if *equation == id));

    editor.math_field_edited("x").expect("session is open");
    let edited = editor.drain_effects();
    assert!(edited.iter().any(|e| matches!(e, Effect::RequestRender { latex, .. } if latex == "x")));

    editor.blur();
    let closed = editor.drain_effects();
    assert!(closed.iter().any(|e| matches!(
        e,
        Effect::SessionClosed { outcome: CloseOutcome::Committed, .. }
    )));
    assert_eq!(
        closed.last(),
        Some(&Effect::HistoryChanged {
            can_undo: false,
            can_redo: false
        })
    );
}

#[test]
fn test_invalid_latex_is_committed_verbatim() {
    let mut editor = focused_editor();
    let id = editor.insert_equation().expect("insert equation");
    editor.latex_field_edited("\\frac{1").expect("session is open");
    let ticket = editor.session().expect("session is open").ticket();
    assert!(editor.render_finished(ticket, Err("Missing close brace".to_string())));
    assert!(editor
        .drain_effects()
        .contains(&Effect::RenderError {
            message: "Missing close brace".to_string()
        }));

    // Still editable, and closing keeps the source
    assert_eq!(editor.phase(), SessionPhase::Editing);
    editor.blur();
    assert_eq!(editor.document().equation(&id).map(|n| n.latex.as_str()), Some("\\frac{1"));
}

#[test]
fn test_stale_render_results_are_dropped() {
    let mut editor = focused_editor();
    editor.insert_equation().expect("insert equation");
    editor.latex_field_edited("\\frac{1").expect("session is open");
    let stale = editor.session().expect("session is open").ticket();
    editor.latex_field_edited("\\frac{1}{2}").expect("session is open");
    editor.drain_effects();

    assert!(!editor.render_finished(stale, Err("Missing close brace".to_string())));
    assert!(editor.drain_effects().is_empty());
    assert!(editor.session().expect("session is open").is_valid());

    // Results arriving after close are dropped too
    let current = editor.session().expect("session is open").ticket();
    editor.blur();
    assert!(!editor.render_finished(current, Ok(())));
}
