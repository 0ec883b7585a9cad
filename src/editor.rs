//! Per-item view/edit state.

use crate::item::{ItemId, ThreadItem};
use crate::textarea::{TextArea, TextEdit};

/// Editors that carry a dirty flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditorKey {
    Composer,
    Item(ItemId),
}

/// Display state of one item.
///
/// `Deleted` is never stored; it is derived from the item's `deleted_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Viewing,
    Editing,
    Deleted,
}

impl ItemState {
    #[must_use]
    pub const fn of<T>(item: &ThreadItem<T>, editing: bool) -> Self {
        if item.is_deleted() {
            Self::Deleted
        } else if editing {
            Self::Editing
        } else {
            Self::Viewing
        }
    }

    #[must_use]
    pub const fn can_edit(self) -> bool {
        matches!(self, Self::Viewing)
    }

    #[must_use]
    pub const fn can_quote(self) -> bool {
        matches!(self, Self::Viewing)
    }
}

/// Draft for an item in edit mode.
#[derive(Debug, Clone)]
pub struct ThreadItemEditor {
    draft: TextArea,
    baseline: String,
}

impl ThreadItemEditor {
    /// Open an editor on the item's saved content.
    #[must_use]
    pub fn open(content: &str) -> Self {
        Self {
            draft: TextArea::from_text(content),
            baseline: content.to_string(),
        }
    }

    pub fn apply(&mut self, edit: TextEdit) {
        self.draft.apply(edit);
    }

    #[must_use]
    pub const fn draft(&self) -> &TextArea {
        &self.draft
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.draft.text()
    }

    /// Draft diverges from the content the editor was opened on.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft.text() != self.baseline
    }
}
