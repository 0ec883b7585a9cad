//! Application state model

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::UiConfig;
use crate::controller::{CommentThread, ThreadOptions, ThreadStatus};
use crate::db::{CommentPayload, CommentStore};
use crate::height::{DEFAULT_DEBOUNCE, HeightMonitor};
use crate::item::{ItemId, ThreadItem};
use crate::session::ThreadSession;
use crate::theme::Theme;
use crate::view::Outlets;

pub type Session = ThreadSession<CommentPayload, CommentStore>;

/// Where keystrokes go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Moving between comments
    #[default]
    Thread,
    Composer,
    ItemEditor(ItemId),
    /// Waiting for y/n before deleting
    ConfirmDelete(ItemId),
}

/// Application state
pub struct Model {
    // === Thread ===
    pub session: Session,
    pub outlets: Outlets,
    /// Aggregate unsaved-changes flag, as last reported by the thread
    pub unsaved: Rc<Cell<bool>>,
    /// Set by the thread when the composer is cancelled on an empty thread
    pub composer_dismissed: Rc<Cell<bool>>,

    // === UI state ===
    /// Selected comment (index into the thread's items)
    pub selected: usize,
    pub focus: Focus,
    /// Quit was requested once while there were unsaved changes
    pub quit_armed: bool,

    // === Layout ===
    pub width: u16,
    pub height: u16,

    // === Theme ===
    pub theme: Theme,
    pub config: UiConfig,

    // === Render-computed data ===
    /// First visible row of the thread pane
    pub scroll: Cell<usize>,
    /// Total rows of the laid-out thread from the last render
    pub content_height: Cell<u32>,
    /// Debounced reporter for `content_height`, polled on `Message::Tick`
    pub height_monitor: HeightMonitor,

    // === Flash message (transient error/status) ===
    /// Shown in the help bar area until the next keypress.
    pub flash_message: Option<String>,

    // === Control ===
    pub should_quit: bool,
    pub needs_redraw: bool,
}

impl Model {
    /// Build the model around a freshly seeded thread.
    ///
    /// Without a gateway the thread is read-only: every submit reports an
    /// error instead of persisting. `on_height_change` receives the thread's
    /// rendered row count once it has settled.
    #[must_use]
    pub fn new(
        width: u16,
        height: u16,
        config: UiConfig,
        items: Vec<ThreadItem<CommentPayload>>,
        status: ThreadStatus,
        gateway: Option<CommentStore>,
        on_height_change: impl FnMut(u32) + 'static,
    ) -> Self {
        let unsaved = Rc::new(Cell::new(false));
        let composer_dismissed = Rc::new(Cell::new(false));
        let thread = build_thread(&config, items, status, &unsaved, &composer_dismissed);

        let debounce = config
            .height_debounce_ms
            .map_or(DEFAULT_DEBOUNCE, Duration::from_millis);
        let height_monitor = HeightMonitor::new(debounce, on_height_change);

        let focus = if thread.items().is_empty() {
            Focus::Composer
        } else {
            Focus::Thread
        };

        Self {
            session: ThreadSession::new(thread, gateway),
            outlets: Outlets::default(),
            unsaved,
            composer_dismissed,
            selected: 0,
            focus,
            quit_armed: false,
            width,
            height,
            theme: Theme::default(),
            config,
            scroll: Cell::new(0),
            content_height: Cell::new(0),
            height_monitor,
            flash_message: None,
            should_quit: false,
            needs_redraw: true,
        }
    }

    #[must_use]
    pub const fn thread(&self) -> &CommentThread<CommentPayload> {
        self.session.thread()
    }

    pub const fn thread_mut(&mut self) -> &mut CommentThread<CommentPayload> {
        self.session.thread_mut()
    }

    /// Id of the selected comment, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<ItemId> {
        self.thread().items().get(self.selected).map(|item| item.id)
    }

    /// Re-read the thread from the store, replacing all local state.
    ///
    /// Used after a save when the composer is configured to reset rather
    /// than append.
    pub fn reload_thread(&mut self) -> anyhow::Result<()> {
        let Some(store) = self.session.gateway() else {
            return Ok(());
        };
        let items = store.list_comments()?;
        let status = store.thread_status()?;
        let thread = build_thread(
            &self.config,
            items,
            status,
            &self.unsaved,
            &self.composer_dismissed,
        );
        info!(items = thread.items().len(), "thread reloaded");
        self.session.replace_thread(thread);
        self.selected = self.selected.min(self.thread().items().len().saturating_sub(1));
        Ok(())
    }

    pub const fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}

/// Options for the thread, taken from config with environment fallbacks.
#[must_use]
pub fn thread_options(config: &UiConfig) -> ThreadOptions {
    let current_user = config
        .user
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "me".to_string());
    ThreadOptions {
        current_user,
        reset_on_save: config.reset_on_save,
        hide_cancel: config.hide_cancel,
        initial_content: String::new(),
    }
}

fn build_thread(
    config: &UiConfig,
    items: Vec<ThreadItem<CommentPayload>>,
    status: ThreadStatus,
    unsaved: &Rc<Cell<bool>>,
    composer_dismissed: &Rc<Cell<bool>>,
) -> CommentThread<CommentPayload> {
    let unsaved = Rc::clone(unsaved);
    let dismissed = Rc::clone(composer_dismissed);
    CommentThread::new(items, thread_options(config), move |dirty| {
        if unsaved.replace(dirty) != dirty {
            debug!(dirty, "unsaved changes");
        }
    })
    .with_status(status)
    .with_cancel_handler(move || dismissed.set(true))
}
