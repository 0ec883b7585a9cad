//! Input mapping: events → messages.
//!
//! Keys are routed by the current focus. The mapping itself is pure so it
//! can be tested without a terminal.

use opentui::{Event, KeyCode, KeyModifiers};

use crate::message::Message;
use crate::model::{Focus, Model};
use crate::textarea::TextEdit;

pub fn map_event_to_message(model: &Model, event: &Event) -> Message {
    match event {
        Event::Key(key) => map_key(model.focus, key.code, key.modifiers),
        Event::Resize(resize) => Message::Resize {
            width: resize.width,
            height: resize.height,
        },
        Event::Mouse(_) | Event::Paste(_) | Event::FocusGained | Event::FocusLost => {
            Message::Noop
        }
    }
}

#[must_use]
pub fn map_key(focus: Focus, key: KeyCode, modifiers: KeyModifiers) -> Message {
    if modifiers.contains(KeyModifiers::CTRL) && key == KeyCode::Char('c') {
        return Message::Quit;
    }

    match focus {
        Focus::Thread => map_thread_key(key),
        Focus::Composer => match map_editor_key(key, modifiers) {
            EditorKey::Edit(edit) => Message::ComposerEdit(edit),
            EditorKey::Submit => Message::SubmitComposer,
            EditorKey::Cancel => Message::CancelComposer,
            EditorKey::Leave => Message::LeaveEditor,
            EditorKey::Ignored => Message::Noop,
        },
        Focus::ItemEditor(_) => match map_editor_key(key, modifiers) {
            EditorKey::Edit(edit) => Message::ItemEdit(edit),
            EditorKey::Submit => Message::SubmitEdit,
            EditorKey::Cancel => Message::CancelEdit,
            EditorKey::Leave => Message::LeaveEditor,
            EditorKey::Ignored => Message::Noop,
        },
        Focus::ConfirmDelete(_) => match key {
            KeyCode::Char('y' | 'Y') => Message::ConfirmDelete,
            _ => Message::CancelDelete,
        },
    }
}

fn map_thread_key(key: KeyCode) -> Message {
    match key {
        KeyCode::Char('q') => Message::Quit,
        KeyCode::Char('j') | KeyCode::Down => Message::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => Message::SelectPrev,
        KeyCode::Char('g') | KeyCode::Home => Message::SelectFirst,
        KeyCode::Char('G') | KeyCode::End => Message::SelectLast,
        KeyCode::Char('r') | KeyCode::Enter | KeyCode::Tab => Message::FocusComposer,
        KeyCode::Char('e') => Message::StartEdit,
        KeyCode::Char('>') => Message::Quote,
        KeyCode::Char('d') => Message::RequestDelete,
        KeyCode::Char('R') => Message::ToggleResolved,
        KeyCode::Char('t') => Message::CycleTheme,
        _ => Message::Noop,
    }
}

/// What a key means inside a text editor, before knowing which editor.
enum EditorKey {
    Edit(TextEdit),
    Submit,
    Cancel,
    /// Back to the thread with the draft kept
    Leave,
    Ignored,
}

fn map_editor_key(key: KeyCode, modifiers: KeyModifiers) -> EditorKey {
    if modifiers.contains(KeyModifiers::CTRL) {
        return match key {
            KeyCode::Char('s') => EditorKey::Submit,
            KeyCode::Char('w') => EditorKey::Edit(TextEdit::DeleteWord),
            KeyCode::Char('u') => EditorKey::Edit(TextEdit::ClearLine),
            KeyCode::Char('a') => EditorKey::Edit(TextEdit::Home),
            KeyCode::Char('e') => EditorKey::Edit(TextEdit::End),
            KeyCode::Char('b') => EditorKey::Edit(TextEdit::CursorLeft),
            KeyCode::Char('f') => EditorKey::Edit(TextEdit::CursorRight),
            _ => EditorKey::Ignored,
        };
    }
    if modifiers.contains(KeyModifiers::ALT) {
        return match key {
            KeyCode::Char('b') => EditorKey::Edit(TextEdit::WordLeft),
            KeyCode::Char('f') => EditorKey::Edit(TextEdit::WordRight),
            KeyCode::Enter => EditorKey::Submit,
            _ => EditorKey::Ignored,
        };
    }
    let edit = match key {
        KeyCode::Esc => return EditorKey::Cancel,
        KeyCode::Tab => return EditorKey::Leave,
        KeyCode::Enter => TextEdit::Newline,
        KeyCode::Up => TextEdit::CursorUp,
        KeyCode::Down => TextEdit::CursorDown,
        KeyCode::Left => TextEdit::CursorLeft,
        KeyCode::Right => TextEdit::CursorRight,
        KeyCode::Home => TextEdit::Home,
        KeyCode::End => TextEdit::End,
        KeyCode::Backspace => TextEdit::Backspace,
        KeyCode::Char(c) => TextEdit::Insert(c),
        _ => return EditorKey::Ignored,
    };
    EditorKey::Edit(edit)
}
