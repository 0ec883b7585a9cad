//! The new-comment / reply editor at the bottom of a thread.

use crate::textarea::{TextArea, TextEdit};

#[derive(Debug, Clone)]
pub struct Composer {
    area: TextArea,
    /// Collapsed to a single-line "Reply here" prompt
    placeholder: bool,
}

impl Composer {
    #[must_use]
    pub fn new(initial_content: &str, placeholder: bool) -> Self {
        Self {
            area: TextArea::from_text(initial_content),
            placeholder,
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Leave placeholder mode. Returns `true` if the composer was collapsed.
    pub const fn expand(&mut self) -> bool {
        let was_collapsed = self.placeholder;
        self.placeholder = false;
        was_collapsed
    }

    pub const fn collapse(&mut self) {
        self.placeholder = true;
    }

    #[must_use]
    pub const fn area(&self) -> &TextArea {
        &self.area
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.area.text()
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.area.is_blank()
    }

    pub fn apply(&mut self, edit: TextEdit) {
        self.area.apply(edit);
    }

    pub fn replace(&mut self, text: &str) {
        self.area.set_text(text);
    }

    pub fn clear(&mut self) {
        self.area.clear();
    }

    /// Anything typed counts as unsaved; the composer's saved value is empty.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.area.is_empty()
    }
}
