//! Message types for the Elm Architecture

use crate::textarea::TextEdit;

/// All possible user actions and system events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // === Thread Navigation ===
    /// Select the next comment
    SelectNext,
    /// Select the previous comment
    SelectPrev,
    /// Select the first comment
    SelectFirst,
    /// Select the last comment
    SelectLast,

    // === Composer ===
    /// Expand the composer and move focus into it
    FocusComposer,
    ComposerEdit(TextEdit),
    SubmitComposer,
    CancelComposer,

    // === Comment Actions (selected comment) ===
    StartEdit,
    ItemEdit(TextEdit),
    SubmitEdit,
    CancelEdit,
    /// Return to the thread, leaving the focused editor's draft open
    LeaveEditor,
    /// Quote the selected comment into the composer
    Quote,
    /// Ask for confirmation before deleting
    RequestDelete,
    ConfirmDelete,
    CancelDelete,

    // === Thread Actions ===
    /// Resolve an open thread, reopen a resolved one
    ToggleResolved,

    // === Theme Selection ===
    /// Switch between the built-in themes
    CycleTheme,
    ApplyTheme(String),

    // === System ===
    /// Terminal resize event
    Resize {
        width: u16,
        height: u16,
    },
    /// Periodic tick for debounced work
    Tick,
    /// Request to quit
    Quit,
    /// No-op (ignore event)
    Noop,
}
