//! SQLite-backed comment store.
//!
//! Holds one or more threads of comments and implements [`ActionGateway`] so a
//! `CommentThread` can persist its actions. Deleted comments keep their
//! content; only the `deleted` stamp marks them.

use std::future::{Future, ready};
use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::{ActionGateway, ActionOutcome, CommentAction};
use crate::controller::ThreadStatus;
use crate::item::{ThreadItem, Timestamp, now_millis};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS threads (
        thread_id TEXT PRIMARY KEY,
        status    TEXT NOT NULL DEFAULT 'open'
    );
    CREATE TABLE IF NOT EXISTS comments (
        comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        thread_id  TEXT NOT NULL REFERENCES threads(thread_id),
        author     TEXT NOT NULL,
        content    TEXT NOT NULL,
        created    INTEGER NOT NULL,
        updated    INTEGER NOT NULL,
        deleted    INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS idx_comments_thread ON comments(thread_id, created);
";

/// Row identity carried on each item so later actions can find it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub comment_id: i64,
    pub thread_id: String,
}

/// Database handle scoped to a single thread and acting user.
pub struct CommentStore {
    conn: Connection,
    thread_id: String,
    author: String,
}

impl CommentStore {
    /// Open (or create) a comment database.
    pub fn open(path: &Path, thread_id: &str, author: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        Self::init(conn, thread_id, author)
    }

    pub fn open_in_memory(thread_id: &str, author: &str) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn, thread_id, author)
    }

    fn init(conn: Connection, thread_id: &str, author: &str) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("Failed to create comment schema")?;
        conn.execute(
            "INSERT OR IGNORE INTO threads (thread_id) VALUES (?)",
            params![thread_id],
        )?;
        Ok(Self {
            conn,
            thread_id: thread_id.to_string(),
            author: author.to_string(),
        })
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// All comments of the thread, oldest first, tombstones included.
    pub fn list_comments(&self) -> Result<Vec<ThreadItem<CommentPayload>>> {
        let sql = "SELECT comment_id, thread_id, author, content, created, updated, deleted
                   FROM comments WHERE thread_id = ? ORDER BY created, comment_id";

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![self.thread_id], Self::map_comment)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list comments")?;

        Ok(rows)
    }

    fn map_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<ThreadItem<CommentPayload>> {
        let deleted: i64 = row.get(6)?;
        let mut item = ThreadItem::new(
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            Timestamp::Millis(row.get(4)?),
        )
        .with_payload(CommentPayload {
            comment_id: row.get(0)?,
            thread_id: row.get(1)?,
        });
        item.updated_at = Timestamp::Millis(row.get(5)?);
        item.deleted_at = (deleted != 0).then_some(Timestamp::Millis(deleted));
        Ok(item)
    }

    fn get_comment(&self, comment_id: i64) -> Result<Option<ThreadItem<CommentPayload>>> {
        let sql = "SELECT comment_id, thread_id, author, content, created, updated, deleted
                   FROM comments WHERE comment_id = ?";
        let item = self
            .conn
            .query_row(sql, params![comment_id], Self::map_comment)
            .optional()?;
        Ok(item)
    }

    pub fn thread_status(&self) -> Result<ThreadStatus> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM threads WHERE thread_id = ?",
                params![self.thread_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(match status.as_deref() {
            Some("resolved") => ThreadStatus::Resolved,
            _ => ThreadStatus::Open,
        })
    }

    /// Insert a few comments if the thread is empty. Returns whether it did.
    pub fn seed_demo(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE thread_id = ?",
            params![self.thread_id],
            |row| row.get(0),
        )?;
        if count > 0 {
            return Ok(false);
        }

        let now = now_millis();
        let demo = [
            ("alice", "Should this retry on timeout?\nThe gateway can be slow.", now - 3 * 3_600_000),
            ("bob", "No retries here; the caller decides.", now - 2 * 3_600_000),
            ("alice", "Fair. Resolving once the doc comment says so.", now - 20 * 60_000),
        ];
        for (author, content, at) in demo {
            self.conn.execute(
                "INSERT INTO comments (thread_id, author, content, created, updated)
                 VALUES (?, ?, ?, ?, ?)",
                params![self.thread_id, author, content, at, at],
            )?;
        }
        debug!(thread = %self.thread_id, "seeded demo comments");
        Ok(true)
    }

    fn insert_comment(&self, content: &str) -> Result<ThreadItem<CommentPayload>> {
        let now = now_millis();
        self.conn.execute(
            "INSERT INTO comments (thread_id, author, content, created, updated)
             VALUES (?, ?, ?, ?, ?)",
            params![self.thread_id, self.author, content, now, now],
        )?;
        let comment_id = self.conn.last_insert_rowid();
        self.get_comment(comment_id)?
            .context("Inserted comment not found")
    }

    fn update_comment(&self, comment_id: i64, content: &str) -> Result<ThreadItem<CommentPayload>> {
        let changed = self.conn.execute(
            "UPDATE comments SET content = ?, updated = ? WHERE comment_id = ? AND deleted = 0",
            params![content, now_millis(), comment_id],
        )?;
        if changed == 0 {
            bail!("comment {comment_id} missing or deleted");
        }
        self.get_comment(comment_id)?
            .context("Updated comment not found")
    }

    fn delete_comment(&self, comment_id: i64) -> Result<()> {
        let now = now_millis();
        let changed = self.conn.execute(
            "UPDATE comments SET deleted = ?, updated = ? WHERE comment_id = ? AND deleted = 0",
            params![now, now, comment_id],
        )?;
        if changed == 0 {
            bail!("comment {comment_id} missing or already deleted");
        }
        Ok(())
    }

    fn set_status(&self, status: ThreadStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE threads SET status = ? WHERE thread_id = ?",
            params![status.as_str(), self.thread_id],
        )?;
        Ok(())
    }

    fn apply(
        &self,
        action: CommentAction,
        content: &str,
        target: Option<&ThreadItem<CommentPayload>>,
    ) -> Result<ActionOutcome<CommentPayload>> {
        let target_id = || {
            target
                .and_then(|item| item.payload.as_ref())
                .map(|payload| payload.comment_id)
                .with_context(|| format!("{action} needs a stored target comment"))
        };

        Ok(match action {
            CommentAction::New | CommentAction::Reply => {
                ActionOutcome::succeeded(self.insert_comment(content)?)
            }
            CommentAction::Update => {
                ActionOutcome::succeeded(self.update_comment(target_id()?, content)?)
            }
            CommentAction::Delete => {
                self.delete_comment(target_id()?)?;
                ActionOutcome::acknowledged()
            }
            CommentAction::Resolve => {
                self.set_status(ThreadStatus::Resolved)?;
                ActionOutcome::acknowledged()
            }
            CommentAction::Unresolve => {
                self.set_status(ThreadStatus::Open)?;
                ActionOutcome::acknowledged()
            }
        })
    }
}

impl ActionGateway<CommentPayload> for CommentStore {
    fn perform_action(
        &self,
        action: CommentAction,
        content: &str,
        target: Option<&ThreadItem<CommentPayload>>,
    ) -> impl Future<Output = ActionOutcome<CommentPayload>> {
        let outcome = self.apply(action, content, target).unwrap_or_else(|err| {
            warn!(%action, thread = %self.thread_id, "comment store action failed: {err:#}");
            ActionOutcome::failed()
        });
        ready(outcome)
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    fn store() -> CommentStore {
        CommentStore::open_in_memory("t1", "carol").unwrap()
    }

    #[test]
    fn new_comment_round_trips() {
        let store = store();
        let outcome = block_on(store.perform_action(CommentAction::New, "first", None));

        assert!(outcome.success);
        let item = outcome.item.unwrap();
        assert_eq!(item.author, "carol");
        assert_eq!(item.content, "first");
        assert!(!item.is_deleted());

        let listed = store.list_comments().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].payload, item.payload);
    }

    #[test]
    fn update_rewrites_content_and_updated() {
        let store = store();
        let created = block_on(store.perform_action(CommentAction::New, "draft", None))
            .item
            .unwrap();

        let outcome = block_on(store.perform_action(CommentAction::Update, "final", Some(&created)));

        assert!(outcome.success);
        let listed = store.list_comments().unwrap();
        assert_eq!(listed[0].content, "final");
        assert_eq!(listed[0].created_at, created.created_at);
    }

    #[test]
    fn delete_keeps_content_and_stamps_row() {
        let store = store();
        let created = block_on(store.perform_action(CommentAction::New, "audit me", None))
            .item
            .unwrap();

        let outcome = block_on(store.perform_action(CommentAction::Delete, "", Some(&created)));
        assert!(outcome.success);
        assert!(outcome.item.is_none());

        let listed = store.list_comments().unwrap();
        assert!(listed[0].is_deleted());
        assert_eq!(listed[0].content, "audit me");
        assert_eq!(listed[0].deleted_at.as_ref(), Some(&listed[0].updated_at));

        let again = block_on(store.perform_action(CommentAction::Delete, "", Some(&created)));
        assert!(!again.success);
    }

    #[test]
    fn update_without_stored_target_fails_softly() {
        let store = store();
        let stray: ThreadItem<CommentPayload> = ThreadItem::new("x", "y", Timestamp::Millis(1));

        assert!(!block_on(store.perform_action(CommentAction::Update, "z", Some(&stray))).success);
        assert!(!block_on(store.perform_action(CommentAction::Delete, "", None)).success);
    }

    #[test]
    fn resolution_sets_thread_status() {
        let store = store();
        assert_eq!(store.thread_status().unwrap(), ThreadStatus::Open);

        assert!(block_on(store.perform_action(CommentAction::Resolve, "", None)).success);
        assert_eq!(store.thread_status().unwrap(), ThreadStatus::Resolved);

        assert!(block_on(store.perform_action(CommentAction::Unresolve, "", None)).success);
        assert_eq!(store.thread_status().unwrap(), ThreadStatus::Open);
    }

    #[test]
    fn seed_demo_only_fills_empty_threads() {
        let store = store();
        assert!(store.seed_demo().unwrap());
        assert!(!store.seed_demo().unwrap());

        let listed = store.list_comments().unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].author, "alice");
    }
}
