//! Centralized layout constants and derived width functions.
//!
//! Shared by the thread pane (`view/thread`) and the editor drawing
//! (`view/editor`) so row counts stay in sync with the scroll anchor.

// --- Screen chrome ---

/// Title row plus the rule under it.
pub const HEADER_HEIGHT: u32 = 2;
/// Help bar plus the bottom margin row.
pub const FOOTER_HEIGHT: u32 = 2;

// --- Thread pane ---

pub const THREAD_H_MARGIN: u32 = 2;
/// Indent of comment bodies relative to their header.
pub const BODY_INDENT: u32 = 2;
/// Width of the accent bar drawn left of an open editor.
pub const EDITOR_BAR_WIDTH: u32 = 2;

// --- Editors ---

pub const EDITOR_MIN_ROWS: usize = 3;
pub const EDITOR_MAX_ROWS: usize = 8;

/// Cells reserved for an inline outlet on a header or placeholder row.
pub const INLINE_OUTLET_WIDTH: u32 = 16;

/// Top row and row count of the thread pane for a terminal of `height` rows.
#[must_use]
pub const fn thread_pane(height: u16) -> (u32, u32) {
    let rows = (height as u32).saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT);
    (HEADER_HEIGHT, rows)
}

/// Width available to the pane content after side margins.
#[must_use]
pub const fn pane_inner_width(width: u16) -> u32 {
    (width as u32).saturating_sub(THREAD_H_MARGIN * 2)
}

/// Width of wrapped comment text.
#[must_use]
pub const fn body_width(pane_width: u32) -> u32 {
    pane_width.saturating_sub(BODY_INDENT)
}

/// Visible rows of an editor holding `line_count` lines.
#[must_use]
pub fn editor_rows(line_count: usize) -> usize {
    line_count.clamp(EDITOR_MIN_ROWS, EDITOR_MAX_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pane_excludes_chrome() {
        assert_eq!(thread_pane(24), (2, 20));
        assert_eq!(thread_pane(3), (2, 0));
    }

    #[test]
    fn editor_rows_are_clamped() {
        assert_eq!(editor_rows(1), EDITOR_MIN_ROWS);
        assert_eq!(editor_rows(5), 5);
        assert_eq!(editor_rows(40), EDITOR_MAX_ROWS);
    }
}
