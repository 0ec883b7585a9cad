//! Host-provided content injected at fixed positions of the thread.

use std::collections::BTreeMap;
use std::fmt;

use opentui::OptimizedBuffer;

use super::components::{Rect, draw_text_truncated};
use crate::renderer::OutletPosition;
use crate::text::wrap_text;
use crate::theme::Theme;

/// Something a host can draw into an outlet slot.
///
/// Inline positions (`LeftOfOptionsMenu`, `LeftOfReplyPlaceholder`) always
/// get a single row; `height` is only consulted for block positions.
pub trait Outlet {
    fn height(&self, width: u32) -> u32;
    fn render(&self, buffer: &mut OptimizedBuffer, area: Rect, theme: &Theme);
}

/// Registered outlets by position. At most one per position.
#[derive(Default)]
pub struct Outlets {
    slots: BTreeMap<OutletPosition, Box<dyn Outlet>>,
}

impl Outlets {
    /// Register `outlet` at `position`, replacing any earlier one.
    pub fn register(&mut self, position: OutletPosition, outlet: impl Outlet + 'static) {
        self.slots.insert(position, Box::new(outlet));
    }

    #[must_use]
    pub fn registered(&self) -> Vec<OutletPosition> {
        self.slots.keys().copied().collect()
    }

    #[must_use]
    pub fn get(&self, position: OutletPosition) -> Option<&dyn Outlet> {
        self.slots.get(&position).map(AsRef::as_ref)
    }
}

impl fmt::Debug for Outlets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outlets")
            .field("registered", &self.registered())
            .finish()
    }
}

/// Muted, wrapped text.
#[derive(Debug, Clone)]
pub struct TextOutlet {
    text: String,
}

impl TextOutlet {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Outlet for TextOutlet {
    fn height(&self, width: u32) -> u32 {
        wrap_text(&self.text, width as usize).len() as u32
    }

    fn render(&self, buffer: &mut OptimizedBuffer, area: Rect, theme: &Theme) {
        let style = theme.style_muted();
        for (row, line) in wrap_text(&self.text, area.width as usize)
            .iter()
            .take(area.height as usize)
            .enumerate()
        {
            draw_text_truncated(buffer, area.x, area.y + row as u32, line, area.width, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_positions_in_order() {
        let mut outlets = Outlets::default();
        outlets.register(OutletPosition::Bottom, TextOutlet::new("b"));
        outlets.register(OutletPosition::Top, TextOutlet::new("t"));
        outlets.register(OutletPosition::Top, TextOutlet::new("t2"));

        assert_eq!(
            outlets.registered(),
            [OutletPosition::Top, OutletPosition::Bottom]
        );
        assert!(outlets.get(OutletPosition::LeftOfOptionsMenu).is_none());
    }

    #[test]
    fn text_outlet_height_follows_wrapping() {
        let outlet = TextOutlet::new("one two three");
        assert_eq!(outlet.height(40), 1);
        assert_eq!(outlet.height(7), 2);
    }
}
