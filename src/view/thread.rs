//! Thread pane rendering
//!
//! The laid-out thread is flattened into one row per terminal line, then
//! the visible window is painted. Scrolling keeps the focused part (the
//! selected comment or the editor cursor) on screen.

use opentui::{OptimizedBuffer, Style};

use super::components::{Rect, draw_hline, draw_text_truncated};
use super::editor::draw_editor_line;
use crate::item::now_millis;
use crate::layout::{BODY_INDENT, INLINE_OUTLET_WIDTH, body_width, editor_rows};
use crate::model::{Focus, Model};
use crate::renderer::{self, ComposerSlot, ItemSection, OutletPosition, SectionBody, ThreadLayout};
use crate::text::wrap_text;
use crate::textarea::TextArea;

#[derive(Debug)]
enum Row<'a> {
    Blank,
    Rule,
    /// First row of a block outlet; the rest are `OutletRest`.
    Outlet { position: OutletPosition, height: u32 },
    OutletRest,
    Header { section: &'a ItemSection, selected: bool },
    Body { text: String, quote: bool },
    Deleted,
    ComposerTitle(&'static str),
    Editor {
        area: &'a TextArea,
        line: usize,
        focused: bool,
        hint: &'static str,
    },
    EditorStatus { text: &'static str, pending: bool },
    Placeholder { with_outlet: bool },
}

/// Rows plus the range that must stay visible.
struct Rows<'a> {
    rows: Vec<Row<'a>>,
    anchor: Option<(usize, usize)>,
}

impl<'a> Rows<'a> {
    fn push(&mut self, row: Row<'a>) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    fn push_outlet(&mut self, model: &Model, position: OutletPosition, width: u32) {
        let Some(outlet) = model.outlets.get(position) else {
            return;
        };
        let height = outlet.height(width);
        if height == 0 {
            return;
        }
        self.push(Row::Outlet { position, height });
        for _ in 1..height {
            self.push(Row::OutletRest);
        }
    }

    /// Editor rows for `area`; returns the row index of the cursor line.
    fn push_editor(&mut self, area: &'a TextArea, focused: bool, hint: &'static str) -> usize {
        let visible = editor_rows(area.lines().len());
        let start = area.window_start(visible);
        let first = self.rows.len();
        for line in start..start + visible {
            self.push(Row::Editor {
                area,
                line,
                focused,
                hint,
            });
        }
        first + area.cursor().0.saturating_sub(start)
    }
}

pub fn view(model: &Model, buffer: &mut OptimizedBuffer, area: Rect) {
    let registered = model.outlets.registered();
    let layout = renderer::layout(model.thread(), &registered, now_millis());
    let Rows { rows, anchor } = build_rows(model, &layout, area.width);

    model.content_height.set(rows.len() as u32);
    let visible = area.height as usize;
    let scroll = clamp_scroll(model.scroll.get(), anchor, visible, rows.len());
    model.scroll.set(scroll);

    let bottom = area.y + area.height;
    for (offset, row) in rows.iter().enumerate().skip(scroll).take(visible) {
        let y = area.y + (offset - scroll) as u32;
        draw_row(model, buffer, Rect::new(area.x, y, area.width, bottom - y), row);
    }
}

fn build_rows<'a>(model: &'a Model, layout: &'a ThreadLayout, width: u32) -> Rows<'a> {
    let thread = model.thread();
    let selected = model.selected_id();
    let mut out = Rows {
        rows: Vec::new(),
        anchor: None,
    };

    for position in &layout.top_outlets {
        out.push_outlet(model, *position, width);
    }

    for section in &layout.sections {
        if section.outlets.contains(&OutletPosition::TopOfFirstComment) {
            out.push_outlet(model, OutletPosition::TopOfFirstComment, width);
        }

        let is_selected = selected == Some(section.id);
        let header = out.push(Row::Header {
            section,
            selected: is_selected && matches!(model.focus, Focus::Thread | Focus::ConfirmDelete(_)),
        });

        match section.body {
            SectionBody::Viewer => {
                let content = thread.item(section.id).map_or("", |item| item.content.as_str());
                for line in wrap_text(content, body_width(width) as usize) {
                    let quote = line.starts_with('>');
                    out.push(Row::Body { text: line, quote });
                }
            }
            SectionBody::Deleted => {
                out.push(Row::Deleted);
            }
            SectionBody::Editor => {
                if let Some(editor) = thread.editor(section.id) {
                    let focused = model.focus == Focus::ItemEditor(section.id);
                    let cursor = out.push_editor(editor.draft(), focused, "Comment text");
                    let status = out.push(if section.pending {
                        Row::EditorStatus {
                            text: "saving…",
                            pending: true,
                        }
                    } else {
                        Row::EditorStatus {
                            text: "ctrl+s save  esc cancel",
                            pending: false,
                        }
                    });
                    if focused {
                        out.anchor = Some((cursor, status));
                    }
                }
            }
        }

        if is_selected && out.anchor.is_none() && model.focus != Focus::Composer {
            out.anchor = Some((header, out.rows.len() - 1));
        }
        if !section.is_last {
            out.push(Row::Blank);
        }
    }

    out.push(Row::Rule);
    match layout.composer {
        ComposerSlot::Placeholder => {
            let with_outlet = layout
                .composer_outlets
                .contains(&OutletPosition::LeftOfReplyPlaceholder);
            out.push(Row::Placeholder { with_outlet });
        }
        ComposerSlot::Editor { pending } => {
            let title = if thread.items().is_empty() {
                "New comment"
            } else {
                "Reply"
            };
            out.push(Row::ComposerTitle(title));
            let focused = model.focus == Focus::Composer;
            let cursor = out.push_editor(thread.composer().area(), focused, "Leave a comment");
            let text = match (pending, thread.options().hide_cancel) {
                (true, _) => "posting…",
                (false, true) => "ctrl+s post",
                (false, false) => "ctrl+s post  esc cancel",
            };
            let status = out.push(Row::EditorStatus { text, pending });
            for position in &layout.composer_outlets {
                out.push_outlet(model, *position, width);
            }
            if focused {
                out.anchor = Some((cursor, status));
            }
        }
    }

    for position in &layout.bottom_outlets {
        out.push_outlet(model, *position, width);
    }

    out
}

/// Smallest change to `scroll` that keeps `anchor` inside a `visible`-row
/// window over `total` rows.
fn clamp_scroll(
    scroll: usize,
    anchor: Option<(usize, usize)>,
    visible: usize,
    total: usize,
) -> usize {
    let mut scroll = scroll.min(total.saturating_sub(visible));
    if let Some((start, end)) = anchor {
        if visible > 0 && end >= scroll + visible {
            scroll = end + 1 - visible;
        }
        if start < scroll {
            scroll = start;
        }
    }
    scroll
}

fn draw_row(model: &Model, buffer: &mut OptimizedBuffer, area: Rect, row: &Row<'_>) {
    let theme = &model.theme;
    let (x, y, width) = (area.x, area.y, area.width);
    let body_x = x + BODY_INDENT;

    match row {
        Row::Blank | Row::OutletRest => {}
        Row::Rule => draw_hline(buffer, x, y, width, theme.border),
        Row::Outlet { position, height } => {
            if let Some(outlet) = model.outlets.get(*position) {
                let rect = Rect::new(x, y, width, (*height).min(area.height));
                outlet.render(buffer, rect, theme);
            }
        }
        Row::Header { section, selected } => draw_header(model, buffer, area, section, *selected),
        Row::Body { text, quote } => {
            let style = if *quote {
                Style::fg(theme.thread.quote)
            } else {
                theme.style_foreground()
            };
            draw_text_truncated(buffer, body_x, y, text, body_width(width), style);
        }
        Row::Deleted => {
            buffer.draw_text(body_x, y, "This comment was deleted.", Style::fg(theme.thread.deleted));
        }
        Row::ComposerTitle(title) => {
            buffer.draw_text(x, y, title, theme.style_foreground().with_bold());
        }
        Row::Editor {
            area: text,
            line,
            focused,
            hint,
        } => {
            draw_editor_line(
                buffer,
                body_x,
                y,
                body_width(width),
                text,
                *line,
                *focused,
                hint,
                theme,
            );
        }
        Row::EditorStatus { text, pending } => {
            let style = if *pending {
                Style::fg(theme.thread.pending)
            } else {
                theme.style_muted()
            };
            let len = text.chars().count() as u32;
            buffer.draw_text(x + width.saturating_sub(len), y, text, style);
        }
        Row::Placeholder { with_outlet } => {
            let mut text_x = x;
            if *with_outlet {
                if let Some(outlet) = model.outlets.get(OutletPosition::LeftOfReplyPlaceholder) {
                    let slot = INLINE_OUTLET_WIDTH.min(width);
                    outlet.render(buffer, Rect::new(x, y, slot, 1), theme);
                    text_x += slot + 1;
                }
            }
            let focused = model.focus == Focus::Thread && model.thread().items().is_empty();
            let style = if focused {
                theme.style_primary()
            } else {
                theme.style_muted()
            };
            draw_text_truncated(
                buffer,
                text_x,
                y,
                "Reply…  (r)",
                width.saturating_sub(text_x - x),
                style,
            );
        }
    }
}

fn draw_header(
    model: &Model,
    buffer: &mut OptimizedBuffer,
    area: Rect,
    section: &ItemSection,
    selected: bool,
) {
    let theme = &model.theme;
    let (x, y, width) = (area.x, area.y, area.width);
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    buffer.fill_rect(x, y, width, 1, bg);

    let mut col = x;
    let author = &section.author;
    buffer.draw_text(col, y, author, Style::fg(theme.thread.author).with_bg(bg).with_bold());
    col += author.chars().count() as u32;

    if !section.age.is_empty() {
        let age = format!(" · {}", section.age);
        buffer.draw_text(col, y, &age, Style::fg(theme.thread.timestamp).with_bg(bg));
        col += age.chars().count() as u32;
    }

    if let Some(badge) = section.badge {
        let color = match badge {
            renderer::Badge::Edited => theme.thread.edited,
            renderer::Badge::Deleted => theme.thread.deleted,
        };
        let label = format!(" ({})", badge.label());
        buffer.draw_text(col, y, &label, Style::fg(color).with_bg(bg));
        col += label.chars().count() as u32;
    }

    if section.pending {
        buffer.draw_text(col, y, " …", Style::fg(theme.thread.pending).with_bg(bg));
    }

    // Options menu at the right edge, with its outlet just left of it.
    let menu_x = x + width.saturating_sub(1);
    let menu_style = if section.menu_enabled {
        theme.style_foreground_on(bg)
    } else {
        theme.style_muted_on(bg)
    };
    buffer.draw_text(menu_x, y, "⋯", menu_style);

    if section.outlets.contains(&OutletPosition::LeftOfOptionsMenu) {
        if let Some(outlet) = model.outlets.get(OutletPosition::LeftOfOptionsMenu) {
            let slot_x = menu_x.saturating_sub(INLINE_OUTLET_WIDTH + 1).max(col + 1);
            let slot_width = menu_x.saturating_sub(slot_x + 1);
            if slot_width > 0 {
                outlet.render(buffer, Rect::new(slot_x, y, slot_width, 1), theme);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::controller::ThreadStatus;
    use crate::item::{ThreadItem, Timestamp};
    use crate::message::Message;
    use crate::textarea::TextEdit;
    use crate::update::update;
    use crate::view::TextOutlet;

    fn model(contents: &[&str]) -> Model {
        let items = contents
            .iter()
            .map(|c| ThreadItem::new("alice", *c, Timestamp::Millis(0)))
            .collect();
        Model::new(80, 24, UiConfig::default(), items, ThreadStatus::Open, None, |_| {})
    }

    fn rows_of(model: &Model) -> (usize, Option<(usize, usize)>) {
        let registered = model.outlets.registered();
        let layout = renderer::layout(model.thread(), &registered, 0);
        let rows = build_rows(model, &layout, 60);
        (rows.rows.len(), rows.anchor)
    }

    #[test]
    fn rows_cover_sections_gaps_and_placeholder() {
        let m = model(&["one", "two"]);
        // header+body, gap, header+body, rule, placeholder
        assert_eq!(rows_of(&m), (7, Some((0, 1))));
    }

    #[test]
    fn selection_moves_anchor() {
        let mut m = model(&["one", "two"]);
        update(&mut m, Message::SelectNext);
        assert_eq!(rows_of(&m).1, Some((3, 4)));
    }

    #[test]
    fn composer_anchor_follows_cursor() {
        let mut m = model(&["one"]);
        update(&mut m, Message::FocusComposer);
        update(&mut m, Message::ComposerEdit(TextEdit::InsertStr("a\nb".into())));
        // header, body, rule, title, 3 editor rows, status
        let (total, anchor) = rows_of(&m);
        assert_eq!(total, 8);
        assert_eq!(anchor, Some((5, 7)));
    }

    #[test]
    fn block_outlets_take_their_height() {
        let mut m = model(&["one"]);
        m.outlets.register(OutletPosition::Top, TextOutlet::new("banner"));
        m.outlets.register(OutletPosition::TopOfFirstComment, TextOutlet::new("pinned"));
        m.outlets.register(OutletPosition::Bottom, TextOutlet::new("footer"));
        assert_eq!(rows_of(&m).0, 7);
        assert_eq!(rows_of(&m).1, Some((2, 3)));
    }

    #[test]
    fn scroll_keeps_anchor_visible() {
        assert_eq!(clamp_scroll(0, Some((30, 32)), 10, 50), 23);
        assert_eq!(clamp_scroll(23, Some((5, 6)), 10, 50), 5);
        assert_eq!(clamp_scroll(40, None, 10, 20), 10);
        assert_eq!(clamp_scroll(0, Some((3, 4)), 10, 50), 0);
    }
}
