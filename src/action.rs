//! Actions on comments and the gateway that performs them.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::item::ThreadItem;

/// A named action performed on a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentAction {
    New,
    Update,
    Reply,
    Delete,
    Resolve,
    Unresolve,
}

impl CommentAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Update => "update",
            Self::Reply => "reply",
            Self::Delete => "delete",
            Self::Resolve => "resolve",
            Self::Unresolve => "unresolve",
        }
    }
}

impl fmt::Display for CommentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a gateway call.
///
/// `item` must be the persisted value when `success` is true for
/// `New`, `Reply` and `Update`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome<T> {
    pub success: bool,
    pub item: Option<ThreadItem<T>>,
}

impl<T> ActionOutcome<T> {
    #[must_use]
    pub const fn succeeded(item: ThreadItem<T>) -> Self {
        Self {
            success: true,
            item: Some(item),
        }
    }

    /// Success for actions that have no resulting item (delete, resolve).
    #[must_use]
    pub const fn acknowledged() -> Self {
        Self {
            success: true,
            item: None,
        }
    }

    #[must_use]
    pub const fn failed() -> Self {
        Self {
            success: false,
            item: None,
        }
    }
}

/// Performs comment actions against whatever storage backs the thread.
///
/// Ordinary failures are reported as `success = false`; implementations
/// must not panic for them.
pub trait ActionGateway<T> {
    fn perform_action(
        &self,
        action: CommentAction,
        content: &str,
        target: Option<&ThreadItem<T>>,
    ) -> impl Future<Output = ActionOutcome<T>>;
}

impl<T, G: ActionGateway<T>> ActionGateway<T> for &G {
    fn perform_action(
        &self,
        action: CommentAction,
        content: &str,
        target: Option<&ThreadItem<T>>,
    ) -> impl Future<Output = ActionOutcome<T>> {
        (**self).perform_action(action, content, target)
    }
}

/// Identifier of an in-flight gateway request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// What a request is guarding: at most one request per key is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Composer,
    Item(crate::item::ItemId),
    /// Thread-level actions (resolve / unresolve).
    Status,
}

/// A gateway call the controller wants performed.
///
/// `target` is a snapshot taken when the request was built; the outcome is
/// applied by id, so later list changes cannot redirect it.
#[derive(Debug, Clone)]
pub struct ActionRequest<T> {
    pub id: RequestId,
    pub key: RequestKey,
    pub action: CommentAction,
    pub content: String,
    pub target: Option<ThreadItem<T>>,
}
