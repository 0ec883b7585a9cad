//! Pure layout pass over a `CommentThread`.
//!
//! Produces plain data describing what to draw, in which order, and where
//! host-provided outlets go. Painting is left to the view.

use crate::action::RequestKey;
use crate::controller::{CommentThread, ThreadStatus};
use crate::editor::ItemState;
use crate::item::ItemId;
use crate::text::time_ago;

/// Fixed positions where a host may inject extra content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutletPosition {
    Top,
    Bottom,
    TopOfFirstComment,
    BottomOfCommentEditor,
    LeftOfOptionsMenu,
    LeftOfReplyPlaceholder,
}

impl OutletPosition {
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::TopOfFirstComment,
        Self::BottomOfCommentEditor,
        Self::LeftOfOptionsMenu,
        Self::LeftOfReplyPlaceholder,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Edited,
    Deleted,
}

impl Badge {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Edited => "edited",
            Self::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionBody {
    Viewer,
    Deleted,
    Editor,
}

/// One comment as it should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSection {
    pub id: ItemId,
    pub is_first: bool,
    /// Last section: no trailing gutter.
    pub is_last: bool,
    pub author: String,
    /// Relative age of the last update.
    pub age: String,
    pub badge: Option<Badge>,
    pub body: SectionBody,
    pub menu_enabled: bool,
    pub pending: bool,
    pub outlets: Vec<OutletPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerSlot {
    /// Collapsed "Reply here" line.
    Placeholder,
    Editor { pending: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadLayout {
    pub status: ThreadStatus,
    pub sections: Vec<ItemSection>,
    pub composer: ComposerSlot,
    /// Outlets outside the item sections, in draw order.
    pub top_outlets: Vec<OutletPosition>,
    pub composer_outlets: Vec<OutletPosition>,
    pub bottom_outlets: Vec<OutletPosition>,
}

impl ThreadLayout {
    /// Section for `id`, if the item is laid out.
    #[must_use]
    pub fn section(&self, id: ItemId) -> Option<&ItemSection> {
        self.sections.iter().find(|section| section.id == id)
    }
}

/// Lay out `thread`. Only outlets listed in `registered` are placed.
#[must_use]
pub fn layout<T>(
    thread: &CommentThread<T>,
    registered: &[OutletPosition],
    now_ms: i64,
) -> ThreadLayout {
    let has = |position: OutletPosition| registered.contains(&position);
    let count = thread.items().len();

    let sections = thread
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let is_first = index == 0;
            let state = ItemState::of(item, thread.is_editing(item.id));
            let pending = thread.is_pending(RequestKey::Item(item.id));
            let badge = if item.is_deleted() {
                Some(Badge::Deleted)
            } else if item.is_edited() {
                Some(Badge::Edited)
            } else {
                None
            };
            let body = match state {
                ItemState::Viewing => SectionBody::Viewer,
                ItemState::Editing => SectionBody::Editor,
                ItemState::Deleted => SectionBody::Deleted,
            };

            let mut outlets = Vec::new();
            if is_first && has(OutletPosition::LeftOfOptionsMenu) {
                outlets.push(OutletPosition::LeftOfOptionsMenu);
            }
            if is_first && has(OutletPosition::TopOfFirstComment) {
                outlets.push(OutletPosition::TopOfFirstComment);
            }

            ItemSection {
                id: item.id,
                is_first,
                is_last: index + 1 == count,
                author: item.author.clone(),
                age: item
                    .updated_at
                    .as_millis()
                    .map_or_else(String::new, |ms| time_ago(ms, now_ms)),
                badge,
                body,
                menu_enabled: state != ItemState::Deleted && !pending,
                pending,
                outlets,
            }
        })
        .collect();

    let composer = if thread.composer().is_placeholder() {
        ComposerSlot::Placeholder
    } else {
        ComposerSlot::Editor {
            pending: thread.is_pending(RequestKey::Composer),
        }
    };
    let composer_outlet = match composer {
        ComposerSlot::Placeholder => OutletPosition::LeftOfReplyPlaceholder,
        ComposerSlot::Editor { .. } => OutletPosition::BottomOfCommentEditor,
    };

    ThreadLayout {
        status: thread.status(),
        sections,
        composer,
        top_outlets: [OutletPosition::Top].into_iter().filter(|p| has(*p)).collect(),
        composer_outlets: [composer_outlet].into_iter().filter(|p| has(*p)).collect(),
        bottom_outlets: [OutletPosition::Bottom].into_iter().filter(|p| has(*p)).collect(),
    }
}
