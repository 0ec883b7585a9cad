//! Drawing for `TextArea`-backed editors (composer and item editors).

use opentui::{OptimizedBuffer, Style};

use super::components::draw_text_truncated;
use crate::layout::EDITOR_BAR_WIDTH;
use crate::textarea::TextArea;
use crate::theme::Theme;

/// Draw row `line` of `area` as one editor row `width` cells wide.
///
/// The row starts with an accent bar; `hint` is shown dimmed on an empty
/// buffer.
#[allow(clippy::too_many_arguments)]
pub fn draw_editor_line(
    buffer: &mut OptimizedBuffer,
    x: u32,
    y: u32,
    width: u32,
    area: &TextArea,
    line: usize,
    focused: bool,
    hint: &str,
    theme: &Theme,
) {
    let bg = theme.thread.editor_bg;
    buffer.fill_rect(x, y, width, 1, bg);

    let bar = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    buffer.draw_text(x, y, "\u{2503}", Style::fg(bar).with_bg(bg));

    let text_x = x + EDITOR_BAR_WIDTH;
    let text_width = width.saturating_sub(EDITOR_BAR_WIDTH);
    let text_style = theme.style_foreground_on(bg);
    let cursor_style = Style::fg(bg).with_bg(theme.cursor);
    let (cursor_row, cursor_col) = area.cursor();

    if area.is_empty() && line == 0 {
        if focused {
            buffer.draw_text(text_x, y, " ", cursor_style);
            draw_text_truncated(
                buffer,
                text_x + 1,
                y,
                hint,
                text_width.saturating_sub(1),
                theme.style_muted_on(bg),
            );
        } else {
            draw_text_truncated(buffer, text_x, y, hint, text_width, theme.style_muted_on(bg));
        }
        return;
    }

    let Some(text) = area.lines().get(line) else {
        return;
    };
    if focused && line == cursor_row {
        render_line_with_cursor(
            buffer,
            text_x,
            y,
            text,
            cursor_col,
            text_width,
            text_style,
            cursor_style,
        );
    } else {
        draw_text_truncated(buffer, text_x, y, text, text_width, text_style);
    }
}

/// Render a line of text with the cursor shown as an inverted-color block.
///
/// Long lines scroll horizontally so the cursor stays on screen.
#[allow(clippy::too_many_arguments)]
fn render_line_with_cursor(
    buffer: &mut OptimizedBuffer,
    x: u32,
    y: u32,
    line: &str,
    cursor_col: usize,
    max_width: u32,
    text_style: Style,
    cursor_style: Style,
) {
    if max_width == 0 {
        return;
    }
    let chars: Vec<char> = line.chars().collect();
    let skip = (cursor_col + 1).saturating_sub(max_width as usize);
    let mut col = 0u32;

    for (i, &ch) in chars.iter().enumerate().skip(skip) {
        if col >= max_width {
            break;
        }
        let style = if i == cursor_col { cursor_style } else { text_style };
        buffer.draw_text(x + col, y, &ch.to_string(), style);
        col += 1;
    }

    // If cursor is at end of line, draw cursor block on the space after
    if cursor_col >= chars.len() && col < max_width {
        buffer.draw_text(x + col, y, " ", cursor_style);
    }
}
