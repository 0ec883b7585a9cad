//! Drives `CommentThread` requests through an `ActionGateway`.

use tracing::{debug, error};

use crate::action::{ActionGateway, ActionRequest};
use crate::controller::{CommentThread, ThreadError};
use crate::item::ItemId;

/// A thread paired with the gateway that persists its actions.
///
/// The gateway is optional so a host can mount a read-only thread; any
/// submit on such a session fails with [`ThreadError::MissingGateway`].
#[derive(Debug)]
pub struct ThreadSession<T, G> {
    thread: CommentThread<T>,
    gateway: Option<G>,
}

impl<T: Clone, G: ActionGateway<T>> ThreadSession<T, G> {
    pub const fn new(thread: CommentThread<T>, gateway: Option<G>) -> Self {
        Self { thread, gateway }
    }

    pub const fn thread(&self) -> &CommentThread<T> {
        &self.thread
    }

    pub const fn thread_mut(&mut self) -> &mut CommentThread<T> {
        &mut self.thread
    }

    pub const fn gateway(&self) -> Option<&G> {
        self.gateway.as_ref()
    }

    /// Swap in a freshly seeded thread. The old one is dropped, which
    /// clears its dirty report.
    pub fn replace_thread(&mut self, thread: CommentThread<T>) {
        self.thread = thread;
    }

    /// Perform `request` and apply its outcome.
    ///
    /// Returns whether the gateway reported success.
    pub async fn dispatch(&mut self, request: ActionRequest<T>) -> Result<bool, ThreadError> {
        let Some(gateway) = self.gateway.as_ref() else {
            error!(
                request = %request.id,
                action = %request.action,
                "no action gateway configured"
            );
            if let Err(err) = self.thread.abandon(request.id) {
                debug!(request = %request.id, %err, "nothing to abandon");
            }
            return Err(ThreadError::MissingGateway);
        };

        let outcome = gateway
            .perform_action(request.action, &request.content, request.target.as_ref())
            .await;
        let success = outcome.success;
        debug!(request = %request.id, action = %request.action, success, "gateway responded");
        self.thread.complete(request.id, outcome);
        Ok(success)
    }

    /// `Ok(false)` also covers submits that were refused before reaching the
    /// gateway (blank composer, request already in flight).
    pub async fn submit_composer(&mut self) -> Result<bool, ThreadError> {
        match self.thread.submit_composer() {
            Some(request) => self.dispatch(request).await,
            None => Ok(false),
        }
    }

    pub async fn submit_edit(&mut self, id: ItemId) -> Result<bool, ThreadError> {
        match self.thread.submit_edit(id) {
            Some(request) => self.dispatch(request).await,
            None => Ok(false),
        }
    }

    pub async fn submit_delete(&mut self, id: ItemId) -> Result<bool, ThreadError> {
        match self.thread.submit_delete(id) {
            Some(request) => self.dispatch(request).await,
            None => Ok(false),
        }
    }

    pub async fn submit_resolution(&mut self, resolved: bool) -> Result<bool, ThreadError> {
        match self.thread.submit_resolution(resolved) {
            Some(request) => self.dispatch(request).await,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::future::{Future, ready};

    use futures::executor::block_on;

    use super::*;
    use crate::action::{ActionOutcome, CommentAction};
    use crate::controller::ThreadOptions;
    use crate::item::{ThreadItem, Timestamp};
    use crate::textarea::TextEdit;

    /// Replies with a fixed success flag and records every call.
    struct ScriptedGateway {
        succeed: bool,
        calls: RefCell<Vec<(CommentAction, String)>>,
    }

    impl ScriptedGateway {
        fn new(succeed: bool) -> Self {
            Self {
                succeed,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ActionGateway<()> for ScriptedGateway {
        fn perform_action(
            &self,
            action: CommentAction,
            content: &str,
            _target: Option<&ThreadItem<()>>,
        ) -> impl Future<Output = ActionOutcome<()>> {
            self.calls.borrow_mut().push((action, content.to_string()));
            let outcome = match (self.succeed, action) {
                (false, _) => ActionOutcome::failed(),
                (true, CommentAction::New | CommentAction::Reply | CommentAction::Update) => {
                    ActionOutcome::succeeded(ThreadItem::new("u1", content, Timestamp::Millis(1)))
                }
                (true, _) => ActionOutcome::acknowledged(),
            };
            ready(outcome)
        }
    }

    fn session<G: ActionGateway<()>>(
        items: Vec<ThreadItem<()>>,
        gateway: Option<G>,
    ) -> ThreadSession<(), G> {
        let thread = CommentThread::new(items, ThreadOptions::default(), |_| {});
        ThreadSession::new(thread, gateway)
    }

    fn type_reply(session: &mut ThreadSession<(), impl ActionGateway<()>>, text: &str) {
        let thread = session.thread_mut();
        thread.expand_composer();
        thread.edit_composer(TextEdit::InsertStr(text.to_string()));
    }

    #[test]
    fn dispatch_applies_successful_outcome() {
        let gateway = ScriptedGateway::new(true);
        let mut session = session(vec![], Some(&gateway));
        type_reply(&mut session, "hello");

        assert_eq!(block_on(session.submit_composer()), Ok(true));

        assert_eq!(session.thread().items().len(), 1);
        assert!(session.thread().composer().is_placeholder());
        assert_eq!(
            *gateway.calls.borrow(),
            vec![(CommentAction::New, "hello".to_string())]
        );
    }

    #[test]
    fn failed_outcome_is_absorbed() {
        let gateway = ScriptedGateway::new(false);
        let mut session = session(vec![], Some(&gateway));
        type_reply(&mut session, "hello");

        assert_eq!(block_on(session.submit_composer()), Ok(false));
        assert!(session.thread().items().is_empty());
        assert_eq!(session.thread().composer().text(), "hello");
        assert_eq!(session.thread().pending_count(), 0);
    }

    #[test]
    fn missing_gateway_is_an_error_not_a_silent_drop() {
        let mut session = session::<ScriptedGateway>(vec![], None);
        type_reply(&mut session, "hello");

        assert_eq!(
            block_on(session.submit_composer()),
            Err(ThreadError::MissingGateway)
        );
        assert_eq!(session.thread().pending_count(), 0);
        assert_eq!(session.thread().composer().text(), "hello");
    }

    #[test]
    fn stale_request_without_gateway_still_reports_missing_gateway() {
        let mut session = session::<ScriptedGateway>(vec![], None);
        type_reply(&mut session, "hello");
        let request = session.thread_mut().submit_composer().unwrap();
        session.thread_mut().abandon(request.id).unwrap();

        assert_eq!(
            block_on(session.dispatch(request)),
            Err(ThreadError::MissingGateway)
        );
    }

    #[test]
    fn refused_submit_never_reaches_gateway() {
        let gateway = ScriptedGateway::new(true);
        let mut session = session(
            vec![ThreadItem::new("alice", "root", Timestamp::Millis(1))],
            Some(&gateway),
        );

        assert_eq!(block_on(session.submit_composer()), Ok(false));
        assert!(gateway.calls.borrow().is_empty());
    }

    #[test]
    fn delete_then_resolve_through_gateway() {
        let gateway = ScriptedGateway::new(true);
        let mut session = session(
            vec![ThreadItem::new("alice", "root", Timestamp::Millis(1))],
            Some(&gateway),
        );
        let id = session.thread().items()[0].id;

        assert_eq!(block_on(session.submit_delete(id)), Ok(true));
        assert_eq!(block_on(session.submit_resolution(true)), Ok(true));

        assert!(session.thread().items()[0].is_deleted());
        assert_eq!(
            session.thread().status(),
            crate::controller::ThreadStatus::Resolved
        );
        let actions: Vec<_> = gateway.calls.borrow().iter().map(|(a, _)| *a).collect();
        assert_eq!(actions, [CommentAction::Delete, CommentAction::Resolve]);
    }
}
