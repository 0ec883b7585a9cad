//! review-thread - threaded code-review comments for the terminal
//!
//! The library half is a UI-agnostic comment-thread engine
//! (`controller`, `session`, `renderer`) plus an Elm Architecture host
//! (Model/Message/Update/View) rendered with `opentui_rust`.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]

pub mod action;
pub mod composer;
pub mod config;
pub mod controller;
pub mod db;
pub mod dirty;
pub mod editor;
pub mod height;
pub mod input;
pub mod item;
pub mod layout;
pub mod message;
pub mod model;
pub mod renderer;
pub mod session;
pub mod text;
pub mod textarea;
pub mod theme;
pub mod update;
pub mod view;

pub use action::{ActionGateway, ActionOutcome, ActionRequest, CommentAction};
pub use controller::{CommentThread, ThreadError, ThreadOptions, ThreadStatus};
pub use db::{CommentPayload, CommentStore};
pub use item::{ItemId, ThreadItem, Timestamp};
pub use message::Message;
pub use model::{Focus, Model};
pub use session::ThreadSession;
pub use theme::Theme;
pub use update::update;
pub use view::view;
