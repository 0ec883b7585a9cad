//! `CommentThread`: owns the items, editors, composer and dirty state of one
//! discussion thread, and reconciles them with gateway outcomes.
//!
//! Every mutation that needs the gateway is split in two: a `submit_*` call
//! builds an [`ActionRequest`] (or returns `None` if there is nothing to do),
//! and [`CommentThread::complete`] applies the outcome once it is known.
//! Nothing is applied optimistically.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, warn};

use crate::action::{ActionOutcome, ActionRequest, CommentAction, RequestId, RequestKey};
use crate::composer::Composer;
use crate::dirty::DirtyTracker;
use crate::editor::{EditorKey, ItemState, ThreadItemEditor};
use crate::item::{ItemId, ThreadItem, Timestamp};
use crate::text::quote_markdown;
use crate::textarea::TextEdit;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThreadError {
    #[error("no action gateway configured")]
    MissingGateway,
    #[error("request {0} is not pending")]
    UnknownRequest(RequestId),
}

/// Caller options fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct ThreadOptions {
    pub current_user: String,
    /// Keep `items` as-is after a successful composer submit; only clear the
    /// composer. The host is expected to reload.
    pub reset_on_save: bool,
    /// Hide the composer's cancel control; cancel becomes a no-op.
    pub hide_cancel: bool,
    /// Starting text of the composer.
    pub initial_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadStatus {
    #[default]
    Open,
    Resolved,
}

impl ThreadStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Debug)]
struct PendingAction {
    key: RequestKey,
    action: CommentAction,
    content: String,
}

pub struct CommentThread<T> {
    items: Vec<ThreadItem<T>>,
    next_item_id: u64,
    composer: Composer,
    editors: BTreeMap<ItemId, ThreadItemEditor>,
    dirty: DirtyTracker<EditorKey>,
    pending: HashMap<RequestId, PendingAction>,
    next_request_id: u64,
    status: ThreadStatus,
    options: ThreadOptions,
    on_cancel: Option<Box<dyn FnMut()>>,
}

impl<T> CommentThread<T> {
    /// Seed a thread. `report_dirty` receives the aggregate unsaved-changes
    /// flag every time it may have changed, and `false` once on drop.
    pub fn new(
        items: Vec<ThreadItem<T>>,
        options: ThreadOptions,
        report_dirty: impl FnMut(bool) + 'static,
    ) -> Self {
        let placeholder = !items.is_empty();
        let mut thread = Self {
            items: Vec::with_capacity(items.len()),
            next_item_id: 1,
            composer: Composer::new(&options.initial_content, placeholder),
            editors: BTreeMap::new(),
            dirty: DirtyTracker::new(report_dirty),
            pending: HashMap::new(),
            next_request_id: 1,
            status: ThreadStatus::Open,
            options,
            on_cancel: None,
        };
        for item in items {
            thread.push_item(item);
        }
        if !placeholder {
            thread.mount_composer();
        }
        thread
    }

    /// Called when the composer is cancelled on an empty thread.
    #[must_use]
    pub fn with_cancel_handler(mut self, on_cancel: impl FnMut() + 'static) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: ThreadStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn items(&self) -> &[ThreadItem<T>] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ThreadItem<T>> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    #[must_use]
    pub const fn options(&self) -> &ThreadOptions {
        &self.options
    }

    #[must_use]
    pub const fn status(&self) -> ThreadStatus {
        self.status
    }

    #[must_use]
    pub const fn composer(&self) -> &Composer {
        &self.composer
    }

    #[must_use]
    pub fn editor(&self, id: ItemId) -> Option<&ThreadItemEditor> {
        self.editors.get(&id)
    }

    #[must_use]
    pub fn is_editing(&self, id: ItemId) -> bool {
        self.editors.contains_key(&id)
    }

    #[must_use]
    pub fn item_state(&self, id: ItemId) -> Option<ItemState> {
        self.item(id)
            .map(|item| ItemState::of(item, self.is_editing(id)))
    }

    /// Any editor holds unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.any_dirty()
    }

    #[must_use]
    pub fn is_pending(&self, key: RequestKey) -> bool {
        self.pending.values().any(|pending| pending.key == key)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn expand_composer(&mut self) {
        self.composer.expand();
        self.mount_composer();
    }

    /// Apply a keystroke to the composer. Ignored while collapsed or while a
    /// composer request is in flight.
    pub fn edit_composer(&mut self, edit: TextEdit) -> bool {
        if self.composer.is_placeholder() || self.is_pending(RequestKey::Composer) {
            return false;
        }
        self.composer.apply(edit);
        self.dirty
            .set_dirty(EditorKey::Composer, self.composer.is_dirty());
        true
    }

    /// Discard the composer text.
    ///
    /// On an empty thread the cancel handler is notified and the composer
    /// stays open; otherwise it collapses back to the placeholder.
    pub fn cancel_composer(&mut self) -> bool {
        if self.options.hide_cancel || self.is_pending(RequestKey::Composer) {
            return false;
        }
        self.composer.clear();
        if self.items.is_empty() {
            self.dirty.set_dirty(EditorKey::Composer, false);
            if let Some(on_cancel) = self.on_cancel.as_mut() {
                on_cancel();
            }
        } else {
            self.composer.collapse();
            self.dirty.remove(&EditorKey::Composer);
        }
        true
    }

    /// Replace the composer text with `content` as a blockquote.
    pub fn quote_text(&mut self, content: &str) -> bool {
        if self.is_pending(RequestKey::Composer) {
            debug!("quote ignored, composer request in flight");
            return false;
        }
        self.composer.expand();
        self.composer.replace(&quote_markdown(content));
        self.mount_composer();
        true
    }

    /// Quote an item into the composer. Refused for deleted, edited-in-place
    /// or unknown items.
    pub fn quote(&mut self, id: ItemId) -> bool {
        let content = match (self.item(id), self.item_state(id)) {
            (Some(item), Some(state)) if state.can_quote() => item.content.clone(),
            _ => {
                debug!(%id, "quote refused");
                return false;
            }
        };
        self.quote_text(&content)
    }

    pub fn start_edit(&mut self, id: ItemId) -> bool {
        let Some(item) = self.item(id) else {
            debug!(%id, "start_edit on unknown item");
            return false;
        };
        if !ItemState::of(item, self.is_editing(id)).can_edit() {
            return false;
        }
        let editor = ThreadItemEditor::open(&item.content);
        self.editors.insert(id, editor);
        self.dirty.set_dirty(EditorKey::Item(id), false);
        true
    }

    /// Leave edit mode and drop the draft.
    pub fn cancel_edit(&mut self, id: ItemId) -> bool {
        if self.editors.remove(&id).is_none() {
            return false;
        }
        self.dirty.remove(&EditorKey::Item(id));
        true
    }

    pub fn edit_item(&mut self, id: ItemId, edit: TextEdit) -> bool {
        if self.is_pending(RequestKey::Item(id)) {
            return false;
        }
        let Some(editor) = self.editors.get_mut(&id) else {
            return false;
        };
        editor.apply(edit);
        let dirty = editor.is_dirty();
        self.dirty.set_dirty(EditorKey::Item(id), dirty);
        true
    }

    /// Drop a pending request without applying anything.
    pub fn abandon(&mut self, request: RequestId) -> Result<(), ThreadError> {
        self.pending
            .remove(&request)
            .map(|_| ())
            .ok_or(ThreadError::UnknownRequest(request))
    }

    /// Apply a gateway outcome. Returns `true` if the thread changed.
    ///
    /// Unknown request ids (abandoned, or completed twice) are ignored.
    pub fn complete(&mut self, request: RequestId, outcome: ActionOutcome<T>) -> bool {
        let Some(pending) = self.pending.remove(&request) else {
            debug!(%request, "completion for unknown request ignored");
            return false;
        };
        if !outcome.success {
            debug!(%request, action = %pending.action, "gateway reported failure");
            return false;
        }

        match (pending.key, pending.action) {
            (RequestKey::Composer, _) => {
                self.finish_composer(outcome.item);
                true
            }
            (RequestKey::Item(id), CommentAction::Update) => self.finish_edit(id, pending.content),
            (RequestKey::Item(id), CommentAction::Delete) => self.finish_delete(id),
            (RequestKey::Status, CommentAction::Resolve) => {
                self.status = ThreadStatus::Resolved;
                true
            }
            (RequestKey::Status, CommentAction::Unresolve) => {
                self.status = ThreadStatus::Open;
                true
            }
            (key, action) => {
                warn!(?key, %action, "unexpected action for request key");
                false
            }
        }
    }

    fn finish_composer(&mut self, item: Option<ThreadItem<T>>) {
        self.composer.clear();
        if self.options.reset_on_save {
            self.dirty.set_dirty(EditorKey::Composer, false);
            return;
        }
        match item {
            Some(item) => self.push_item(item),
            None => warn!("gateway reported success without an item; nothing appended"),
        }
        self.composer.collapse();
        self.dirty.remove(&EditorKey::Composer);
    }

    fn finish_edit(&mut self, id: ItemId, content: String) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!(%id, "edited item no longer present");
            return false;
        };
        item.content = content;
        self.close_editor(id);
        true
    }

    fn finish_delete(&mut self, id: ItemId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!(%id, "deleted item no longer present");
            return false;
        };
        item.mark_deleted(Timestamp::now());
        self.close_editor(id);
        true
    }

    fn close_editor(&mut self, id: ItemId) {
        if self.editors.remove(&id).is_some() {
            self.dirty.remove(&EditorKey::Item(id));
        }
    }

    fn mount_composer(&mut self) {
        self.dirty
            .set_dirty(EditorKey::Composer, self.composer.is_dirty());
    }

    fn push_item(&mut self, mut item: ThreadItem<T>) {
        item.id = ItemId::new(self.next_item_id);
        self.next_item_id += 1;
        self.items.push(item);
    }
}

impl<T: Clone> CommentThread<T> {
    /// New comment on an empty thread, reply otherwise.
    pub fn submit_composer(&mut self) -> Option<ActionRequest<T>> {
        if self.composer.is_placeholder()
            || self.composer.is_blank()
            || self.is_pending(RequestKey::Composer)
        {
            return None;
        }
        let action = if self.items.is_empty() {
            CommentAction::New
        } else {
            CommentAction::Reply
        };
        let target = self.items.first().cloned();
        let content = self.composer.text();
        Some(self.begin(RequestKey::Composer, action, content, target))
    }

    pub fn submit_edit(&mut self, id: ItemId) -> Option<ActionRequest<T>> {
        let key = RequestKey::Item(id);
        if self.is_pending(key) {
            return None;
        }
        let editor = self.editors.get(&id)?;
        if editor.draft().is_blank() {
            return None;
        }
        let content = editor.text();
        let target = self.item(id).filter(|item| !item.is_deleted())?.clone();
        Some(self.begin(key, CommentAction::Update, content, Some(target)))
    }

    pub fn submit_delete(&mut self, id: ItemId) -> Option<ActionRequest<T>> {
        let key = RequestKey::Item(id);
        if self.is_pending(key) {
            return None;
        }
        let target = self.item(id).filter(|item| !item.is_deleted())?.clone();
        Some(self.begin(key, CommentAction::Delete, String::new(), Some(target)))
    }

    /// Resolve (`true`) or reopen (`false`) the thread.
    pub fn submit_resolution(&mut self, resolved: bool) -> Option<ActionRequest<T>> {
        let wanted = if resolved {
            ThreadStatus::Resolved
        } else {
            ThreadStatus::Open
        };
        if self.status == wanted || self.is_pending(RequestKey::Status) {
            return None;
        }
        let action = if resolved {
            CommentAction::Resolve
        } else {
            CommentAction::Unresolve
        };
        let target = self.items.first().cloned();
        Some(self.begin(RequestKey::Status, action, String::new(), target))
    }

    fn begin(
        &mut self,
        key: RequestKey,
        action: CommentAction,
        content: String,
        target: Option<ThreadItem<T>>,
    ) -> ActionRequest<T> {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        self.pending.insert(
            id,
            PendingAction {
                key,
                action,
                content: content.clone(),
            },
        );
        debug!(request = %id, %action, "request started");
        ActionRequest {
            id,
            key,
            action,
            content,
            target,
        }
    }
}

impl<T> std::fmt::Debug for CommentThread<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentThread")
            .field("items", &self.items.len())
            .field("editors", &self.editors.keys().collect::<Vec<_>>())
            .field("pending", &self.pending.len())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<bool>>>;

    fn comment(author: &str, content: &str, at: i64) -> ThreadItem<()> {
        ThreadItem::new(author, content, Timestamp::Millis(at))
    }

    fn thread_with(items: Vec<ThreadItem<()>>, options: ThreadOptions) -> (CommentThread<()>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let thread = CommentThread::new(items, options, move |dirty| sink.borrow_mut().push(dirty));
        (thread, log)
    }

    fn thread(items: Vec<ThreadItem<()>>) -> (CommentThread<()>, Log) {
        thread_with(items, ThreadOptions::default())
    }

    fn type_into_composer(thread: &mut CommentThread<()>, text: &str) {
        thread.expand_composer();
        thread.edit_composer(TextEdit::InsertStr(text.to_string()));
    }

    fn first_id(thread: &CommentThread<()>) -> ItemId {
        thread.items()[0].id
    }

    #[test]
    fn first_comment_success_appends_and_collapses_composer() {
        let (mut thread, _) = thread(vec![]);
        assert!(!thread.composer().is_placeholder());
        type_into_composer(&mut thread, "hello");

        let request = thread.submit_composer().unwrap();
        assert_eq!(request.action, CommentAction::New);
        assert_eq!(request.content, "hello");
        assert!(request.target.is_none());
        assert!(thread.items().is_empty());

        let saved: ThreadItem<()> = serde_json::from_str(
            r#"{"author":"u1","content":"hello","created":1,"updated":1,"deleted":0}"#,
        )
        .unwrap();
        assert!(thread.complete(request.id, ActionOutcome::succeeded(saved)));

        assert_eq!(thread.items().len(), 1);
        assert_eq!(thread.items()[0].author, "u1");
        assert_eq!(thread.items()[0].content, "hello");
        assert!(!thread.items()[0].is_deleted());
        assert_eq!(thread.composer().text(), "");
        assert!(thread.composer().is_placeholder());
        assert!(!thread.is_dirty());
    }

    #[test]
    fn first_comment_failure_keeps_composer_text() {
        let (mut thread, _) = thread(vec![]);
        type_into_composer(&mut thread, "hello");

        let request = thread.submit_composer().unwrap();
        assert!(!thread.complete(request.id, ActionOutcome::failed()));

        assert!(thread.items().is_empty());
        assert_eq!(thread.composer().text(), "hello");
        assert!(!thread.composer().is_placeholder());
        assert!(thread.is_dirty());
    }

    #[test]
    fn successive_replies_append_in_submission_order() {
        let (mut thread, _) = thread(vec![comment("alice", "root", 1)]);

        for n in 0..3_i64 {
            type_into_composer(&mut thread, &format!("reply {n}"));
            let request = thread.submit_composer().unwrap();
            assert_eq!(request.action, CommentAction::Reply);
            assert_eq!(request.target.as_ref().map(|t| t.content.as_str()), Some("root"));
            let saved = comment("bob", &request.content, 10 + n);
            assert!(thread.complete(request.id, ActionOutcome::succeeded(saved)));
        }

        let contents: Vec<_> = thread.items().iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, ["root", "reply 0", "reply 1", "reply 2"]);

        let ids: Vec<_> = thread.items().iter().map(|i| i.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn reset_on_save_clears_composer_without_touching_items() {
        let options = ThreadOptions {
            reset_on_save: true,
            ..ThreadOptions::default()
        };
        let (mut thread, _) = thread_with(vec![], options);
        type_into_composer(&mut thread, "hello");

        let request = thread.submit_composer().unwrap();
        assert!(thread.complete(request.id, ActionOutcome::succeeded(comment("u1", "hello", 1))));

        assert!(thread.items().is_empty());
        assert_eq!(thread.composer().text(), "");
        assert!(!thread.is_dirty());
    }

    #[test]
    fn success_without_item_clears_composer_and_appends_nothing() {
        let (mut thread, _) = thread(vec![comment("alice", "root", 1)]);
        type_into_composer(&mut thread, "reply");

        let request = thread.submit_composer().unwrap();
        assert!(thread.complete(request.id, ActionOutcome::acknowledged()));

        assert_eq!(thread.items().len(), 1);
        assert_eq!(thread.composer().text(), "");
    }

    #[test]
    fn composer_submit_refused_when_blank_collapsed_or_pending() {
        let (mut thread, _) = thread(vec![comment("alice", "root", 1)]);
        assert!(thread.submit_composer().is_none(), "collapsed");

        thread.expand_composer();
        thread.edit_composer(TextEdit::InsertStr("  \n ".to_string()));
        assert!(thread.submit_composer().is_none(), "blank");

        thread.edit_composer(TextEdit::Insert('x'));
        let first = thread.submit_composer().unwrap();
        assert!(thread.submit_composer().is_none(), "pending");
        assert!(!thread.edit_composer(TextEdit::Insert('y')));

        thread.complete(first.id, ActionOutcome::failed());
        assert!(thread.submit_composer().is_some());
    }

    #[test]
    fn edit_success_replaces_content_only() {
        let (mut thread, _) = thread(vec![comment("alice", "before", 5)]);
        let id = first_id(&thread);

        assert!(thread.start_edit(id));
        assert_eq!(thread.item_state(id), Some(ItemState::Editing));
        thread.edit_item(id, TextEdit::ClearLine);
        thread.edit_item(id, TextEdit::InsertStr("after".to_string()));
        assert!(thread.is_dirty());

        let request = thread.submit_edit(id).unwrap();
        assert_eq!(request.action, CommentAction::Update);
        assert_eq!(request.content, "after");
        assert_eq!(request.target.as_ref().map(|t| t.content.as_str()), Some("before"));

        assert!(thread.complete(request.id, ActionOutcome::succeeded(comment("x", "other", 99))));

        let item = thread.item(id).unwrap();
        assert_eq!(item.content, "after");
        assert_eq!(item.author, "alice");
        assert_eq!(item.created_at, Timestamp::Millis(5));
        assert_eq!(item.updated_at, Timestamp::Millis(5));
        assert_eq!(thread.item_state(id), Some(ItemState::Viewing));
        assert!(!thread.is_dirty());
    }

    #[test]
    fn edit_failure_keeps_editor_and_original_content() {
        let (mut thread, _) = thread(vec![comment("alice", "before", 5)]);
        let id = first_id(&thread);

        thread.start_edit(id);
        thread.edit_item(id, TextEdit::InsertStr(" more".to_string()));
        let request = thread.submit_edit(id).unwrap();
        assert!(!thread.complete(request.id, ActionOutcome::failed()));

        assert_eq!(thread.item(id).unwrap().content, "before");
        assert_eq!(thread.editor(id).unwrap().text(), "before more");
        assert!(thread.is_dirty());
    }

    #[test]
    fn delete_success_leaves_tombstone() {
        let (mut thread, _) = thread(vec![comment("alice", "gone", 5), comment("bob", "stay", 6)]);
        let id = first_id(&thread);
        thread.start_edit(id);

        let request = thread.submit_delete(id).unwrap();
        assert_eq!(request.action, CommentAction::Delete);
        assert_eq!(request.content, "");
        assert!(thread.complete(request.id, ActionOutcome::acknowledged()));

        assert_eq!(thread.items().len(), 2);
        let item = thread.item(id).unwrap();
        assert!(item.is_deleted());
        assert_eq!(item.content, "gone");
        assert_eq!(item.deleted_at.as_ref(), Some(&item.updated_at));
        assert_ne!(item.updated_at, Timestamp::Millis(5));

        assert_eq!(thread.item_state(id), Some(ItemState::Deleted));
        assert!(!thread.is_editing(id));
        assert!(!thread.start_edit(id));
        assert!(!thread.quote(id));
        assert!(thread.submit_delete(id).is_none());
    }

    #[test]
    fn delete_failure_changes_nothing() {
        let (mut thread, _) = thread(vec![comment("alice", "body", 5)]);
        let id = first_id(&thread);

        let request = thread.submit_delete(id).unwrap();
        assert!(thread.submit_delete(id).is_none());
        assert!(!thread.complete(request.id, ActionOutcome::failed()));

        let item = thread.item(id).unwrap();
        assert!(!item.is_deleted());
        assert_eq!(item.updated_at, Timestamp::Millis(5));
    }

    #[test]
    fn quote_fills_composer_without_touching_items() {
        let (mut thread, _) = thread(vec![comment("alice", "a\nb", 1)]);
        let id = first_id(&thread);
        assert!(thread.composer().is_placeholder());

        assert!(thread.quote(id));

        assert_eq!(thread.composer().text(), "> a\n> b\n\n");
        assert!(!thread.composer().is_placeholder());
        assert_eq!(thread.items().len(), 1);
        assert_eq!(thread.items()[0].content, "a\nb");
        assert!(thread.is_dirty());
        assert_eq!(thread.pending_count(), 0);
    }

    #[test]
    fn quote_refused_while_editing() {
        let (mut thread, _) = thread(vec![comment("alice", "a", 1)]);
        let id = first_id(&thread);
        thread.start_edit(id);
        assert!(!thread.quote(id));
        assert!(!thread.quote(ItemId::new(404)));
    }

    #[test]
    fn cancel_composer_collapses_on_populated_thread() {
        let (mut thread, _) = thread(vec![comment("alice", "a", 1)]);
        type_into_composer(&mut thread, "draft");
        assert!(thread.cancel_composer());
        assert!(thread.composer().is_placeholder());
        assert_eq!(thread.composer().text(), "");
        assert!(!thread.is_dirty());
    }

    #[test]
    fn cancel_composer_on_empty_thread_notifies_handler() {
        let cancelled = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&cancelled);
        let (thread, _) = thread(vec![]);
        let mut thread = thread.with_cancel_handler(move || *counter.borrow_mut() += 1);

        type_into_composer(&mut thread, "draft");
        assert!(thread.cancel_composer());

        assert_eq!(*cancelled.borrow(), 1);
        assert!(!thread.composer().is_placeholder());
        assert_eq!(thread.composer().text(), "");
    }

    #[test]
    fn hide_cancel_makes_cancel_a_no_op() {
        let options = ThreadOptions {
            hide_cancel: true,
            ..ThreadOptions::default()
        };
        let (mut thread, _) = thread_with(vec![], options);
        type_into_composer(&mut thread, "draft");
        assert!(!thread.cancel_composer());
        assert_eq!(thread.composer().text(), "draft");
    }

    #[test]
    fn initial_content_reports_dirty_at_mount() {
        let options = ThreadOptions {
            initial_content: "seed".to_string(),
            ..ThreadOptions::default()
        };
        let (thread, log) = thread_with(vec![], options);
        assert!(thread.is_dirty());
        assert_eq!(*log.borrow(), vec![true]);
    }

    #[test]
    fn dirty_aggregates_composer_and_item_editors() {
        let (mut thread, log) = thread(vec![comment("alice", "a", 1), comment("bob", "b", 2)]);
        let (first, second) = (thread.items()[0].id, thread.items()[1].id);

        thread.start_edit(first);
        thread.start_edit(second);
        thread.edit_item(first, TextEdit::Insert('!'));
        thread.edit_item(second, TextEdit::Insert('!'));
        thread.edit_item(first, TextEdit::Backspace);
        assert!(thread.is_dirty());

        thread.cancel_edit(second);
        assert!(!thread.is_dirty());
        assert_eq!(log.borrow().last(), Some(&false));
    }

    #[test]
    fn dropping_dirty_thread_reports_false_once() {
        let (mut thread, log) = thread(vec![]);
        type_into_composer(&mut thread, "unsaved");
        log.borrow_mut().clear();

        drop(thread);

        assert_eq!(*log.borrow(), vec![false]);
    }

    #[test]
    fn dropping_thread_with_dirty_edit_reports_false_once() {
        let (mut thread, log) = thread(vec![comment("alice", "a", 1)]);
        let id = first_id(&thread);
        thread.start_edit(id);
        thread.edit_item(id, TextEdit::Insert('!'));
        assert!(thread.is_dirty());
        log.borrow_mut().clear();

        drop(thread);

        assert_eq!(*log.borrow(), vec![false]);
    }

    #[test]
    fn late_and_duplicate_completions_are_ignored() {
        let (mut thread, _) = thread(vec![comment("alice", "a", 1)]);
        let id = first_id(&thread);

        let request = thread.submit_delete(id).unwrap();
        assert!(thread.abandon(request.id).is_ok());
        assert!(!thread.complete(request.id, ActionOutcome::acknowledged()));
        assert!(!thread.item(id).unwrap().is_deleted());
        assert_eq!(
            thread.abandon(request.id),
            Err(ThreadError::UnknownRequest(request.id))
        );
        assert!(!thread.complete(RequestId::new(999), ActionOutcome::failed()));
    }

    #[test]
    fn resolution_toggles_status_on_success() {
        let (mut thread, _) = thread(vec![comment("alice", "a", 1)]);
        assert!(thread.submit_resolution(false).is_none(), "already open");

        let request = thread.submit_resolution(true).unwrap();
        assert_eq!(request.action, CommentAction::Resolve);
        assert!(thread.submit_resolution(true).is_none(), "pending");
        thread.complete(request.id, ActionOutcome::acknowledged());
        assert_eq!(thread.status(), ThreadStatus::Resolved);

        let request = thread.submit_resolution(false).unwrap();
        thread.complete(request.id, ActionOutcome::failed());
        assert_eq!(thread.status(), ThreadStatus::Resolved);
    }

    #[test]
    fn unknown_item_operations_are_no_ops() {
        let (mut thread, _) = thread(vec![comment("alice", "a", 1)]);
        let ghost = ItemId::new(404);
        assert!(!thread.start_edit(ghost));
        assert!(!thread.cancel_edit(ghost));
        assert!(!thread.edit_item(ghost, TextEdit::Insert('x')));
        assert!(thread.submit_edit(ghost).is_none());
        assert!(thread.submit_delete(ghost).is_none());
        assert_eq!(thread.item_state(ghost), None);
    }
}
