// Test undo/redo inside an equation editor session

use answer_editor_wasm::editor::Effect;
use answer_editor_wasm::models::EditorConfig;
use answer_editor_wasm::Editor;

fn editor_with_open_equation() -> Editor {
    let mut editor = Editor::new(EditorConfig::default()).expect("default config is valid");
    editor.focus_host();
    editor.insert_equation().expect("insert equation");
    editor
}

#[test]
fn test_square_root_undo_redo() {
    let mut editor = editor_with_open_equation();

    // Square-root command, then "1"
    editor.math_field_edited("\\sqrt{ }").expect("session is open");
    editor.math_field_edited("\\sqrt{1}").expect("session is open");
    assert_eq!(editor.current_latex(), Some("\\sqrt{1}"));

    assert_eq!(editor.undo().expect("session is open").as_deref(), Some("\\sqrt{ }"));
    assert_eq!(editor.current_latex(), Some("\\sqrt{ }"));

    assert_eq!(editor.redo().expect("session is open").as_deref(), Some("\\sqrt{1}"));
    assert_eq!(editor.current_latex(), Some("\\sqrt{1}"));
}

#[test]
fn test_undo_steps_back_one_snapshot_at_a_time() {
    let mut editor = editor_with_open_equation();
    for latex in ["a", "ab", "abc", "abcd"] {
        editor.latex_field_edited(latex).expect("session is open");
    }

    assert_eq!(editor.undo().expect("session is open").as_deref(), Some("abc"));
    assert_eq!(editor.undo().expect("session is open").as_deref(), Some("ab"));
    assert_eq!(editor.undo().expect("session is open").as_deref(), Some("a"));
    assert_eq!(editor.undo().expect("session is open").as_deref(), Some(""));
    assert_eq!(editor.undo().expect("session is open"), None, "History exhausted");
}

#[test]
fn test_new_edit_after_undo_clears_redo() {
    let mut editor = editor_with_open_equation();
    editor.latex_field_edited("x").expect("session is open");
    editor.latex_field_edited("x+1").expect("session is open");
    editor.undo().expect("session is open");
    assert!(editor.history_state().can_redo);

    editor.latex_field_edited("x-1").expect("session is open");
    assert!(!editor.history_state().can_redo);
    assert_eq!(editor.redo().expect("session is open"), None);
    assert_eq!(editor.current_latex(), Some("x-1"));
}

#[test]
fn test_repeated_snapshot_is_not_recorded() {
    let mut editor = editor_with_open_equation();
    editor.latex_field_edited("y").expect("session is open");
    editor.math_field_edited("y").expect("session is open");
    assert_eq!(editor.session().map(|s| s.history().undo_count()), Some(1));
}

#[test]
fn test_undo_syncs_both_views() {
    let mut editor = editor_with_open_equation();
    editor.math_field_edited("z").expect("session is open");
    editor.drain_effects();

    editor.undo().expect("session is open");
    let effects = editor.drain_effects();
    assert!(effects.contains(&Effect::SyncMathField { latex: String::new() }));
    assert!(effects.contains(&Effect::SyncLatexField { latex: String::new() }));
    assert!(effects.contains(&Effect::HistoryChanged {
        can_undo: false,
        can_redo: true
    }));
}

#[test]
fn test_history_limit_drops_oldest() {
    let mut editor = Editor::new(EditorConfig {
        history_limit: 2,
        ..Default::default()
    })
    .expect("config is valid");
    editor.focus_host();
    editor.insert_equation().expect("insert equation");
    for latex in ["1", "12", "123"] {
        editor.latex_field_edited(latex).expect("session is open");
    }

    assert_eq!(editor.undo().expect("session is open").as_deref(), Some("12"));
    assert_eq!(editor.undo().expect("session is open").as_deref(), Some("1"));
    assert_eq!(editor.undo().expect("session is open"), None);
}

#[test]
fn test_history_is_dropped_on_close() {
    let mut editor = editor_with_open_equation();
    let id = editor.session().expect("session is open").target().clone();
    editor.latex_field_edited("q").expect("session is open");
    editor.blur();
    assert!(!editor.history_state().can_undo);

    editor.open_equation(&id).expect("equation exists");
    assert!(!editor.history_state().can_undo);
}
