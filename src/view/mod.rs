//! View rendering

mod components;
mod editor;
mod outlet;
mod thread;

use opentui::{OptimizedBuffer, Style};

use crate::controller::ThreadStatus;
use crate::layout::{FOOTER_HEIGHT, THREAD_H_MARGIN, pane_inner_width, thread_pane};
use crate::model::{Focus, Model};
use crate::text::truncate_chars;

pub use components::Rect;
pub use outlet::{Outlet, Outlets, TextOutlet};

use components::{
    HotkeyHint, dim_rect, draw_badge, draw_box, draw_help_bar, draw_hline, draw_text_truncated,
};

/// Render the current model state to the buffer
pub fn view(model: &Model, buffer: &mut OptimizedBuffer) {
    let theme = &model.theme;
    let screen = Rect::from_size(model.width, model.height);
    buffer.fill_rect(screen.x, screen.y, screen.width, screen.height, theme.background);

    draw_header(model, buffer, screen);

    let (pane_y, pane_rows) = thread_pane(model.height);
    let pane = Rect::new(
        THREAD_H_MARGIN,
        pane_y,
        pane_inner_width(model.width),
        pane_rows,
    );
    thread::view(model, buffer, pane);

    draw_footer(model, buffer, screen);

    if let Focus::ConfirmDelete(_) = model.focus {
        draw_delete_confirm(model, buffer, screen);
    }
}

fn draw_header(model: &Model, buffer: &mut OptimizedBuffer, screen: Rect) {
    let theme = &model.theme;
    let x = THREAD_H_MARGIN;
    let y = screen.y;

    let thread_id = model
        .session
        .gateway()
        .map_or("read-only", |store| store.thread_id());
    let title = format!("Thread {thread_id}");
    buffer.draw_text(x, y, &title, theme.style_foreground().with_bold());
    let mut col = x + title.chars().count() as u32 + 1;

    let status = model.thread().status();
    let status_color = match status {
        ThreadStatus::Open => theme.thread.open,
        ThreadStatus::Resolved => theme.thread.resolved,
    };
    col += draw_badge(buffer, col, y, status.as_str(), status_color, theme.background) + 1;

    let count = model.thread().items().len();
    let noun = if count == 1 { "comment" } else { "comments" };
    buffer.draw_text(col, y, &format!("{count} {noun}"), theme.style_muted());

    if model.unsaved.get() {
        let marker = "● unsaved";
        let marker_x = screen.width.saturating_sub(THREAD_H_MARGIN + marker.chars().count() as u32);
        buffer.draw_text(marker_x, y, marker, Style::fg(theme.warning));
    }

    draw_hline(buffer, screen.x, y + 1, screen.width, theme.border);
}

fn draw_footer(model: &Model, buffer: &mut OptimizedBuffer, screen: Rect) {
    let theme = &model.theme;
    let footer = Rect::new(
        screen.x,
        screen.height.saturating_sub(FOOTER_HEIGHT),
        screen.width,
        FOOTER_HEIGHT.min(screen.height),
    );

    let hints: &[HotkeyHint] = match model.focus {
        Focus::Thread => &[
            HotkeyHint::new("reply", "r"),
            HotkeyHint::new("edit", "e"),
            HotkeyHint::new("quote", ">"),
            HotkeyHint::new("delete", "d"),
            HotkeyHint::new("resolve", "R"),
            HotkeyHint::new("theme", "t"),
            HotkeyHint::new("quit", "q"),
        ],
        Focus::Composer | Focus::ItemEditor(_) => &[
            HotkeyHint::new("save", "ctrl+s"),
            HotkeyHint::new("cancel", "esc"),
            HotkeyHint::new("thread", "tab"),
        ],
        Focus::ConfirmDelete(_) => &[
            HotkeyHint::new("delete", "y"),
            HotkeyHint::new("keep", "any"),
        ],
    };
    draw_help_bar(buffer, footer, theme, hints);

    if let Some(flash) = &model.flash_message {
        let hints_width: usize = hints.iter().map(HotkeyHint::width).sum::<usize>()
            + hints.len().saturating_sub(1) * 2
            + 4;
        let room = (footer.width as usize).saturating_sub(hints_width + THREAD_H_MARGIN as usize);
        let text = truncate_chars(flash, room);
        buffer.draw_text(THREAD_H_MARGIN, footer.y, &text, Style::fg(theme.warning));
    }
}

fn draw_delete_confirm(model: &Model, buffer: &mut OptimizedBuffer, screen: Rect) {
    let theme = &model.theme;
    dim_rect(buffer, screen, 0.35);

    let panel = screen.centered(44, 5);
    buffer.fill_rect(panel.x, panel.y, panel.width, panel.height, theme.panel_bg);
    draw_box(buffer, panel, theme.error, Some("Delete comment"), theme.foreground);

    let inner = panel.inner();
    draw_text_truncated(
        buffer,
        inner.x + 1,
        inner.y + 1,
        "Delete this comment? (y/N)",
        inner.width.saturating_sub(2),
        theme.style_foreground_on(theme.panel_bg),
    );
}
