use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Who wrote a message. Also identifies the party in read-state operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Client,
    Admin,
}

impl Party {
    pub fn as_str(&self) -> &'static str {
        match self {
            Party::Client => "client",
            Party::Admin => "admin",
        }
    }

    pub fn parse(text: &str) -> Result<Party> {
        match text {
            "client" => Ok(Party::Client),
            "admin" => Ok(Party::Admin),
            other => bail!("Unknown party: '{}'", other),
        }
    }
}

/// How a thread started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadKind {
    ContactForm,
    LiveChat,
}

impl ThreadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadKind::ContactForm => "contact-form",
            ThreadKind::LiveChat => "live-chat",
        }
    }

    pub fn parse(text: &str) -> Result<ThreadKind> {
        match text {
            "contact-form" => Ok(ThreadKind::ContactForm),
            "live-chat" => Ok(ThreadKind::LiveChat),
            other => bail!("Unknown thread kind: '{}'", other),
        }
    }
}

/// One conversation between a client and the admin. Created on the first
/// inbound client message and never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct MessageThread {
    pub id: String,
    pub participant: String,
    pub subject: String,
    pub kind: ThreadKind,
    pub last_message_text: String,
    pub last_message_at: String,
    pub unread_by_admin: bool,
    pub unread_by_client: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreadMessage {
    pub id: i64,
    pub thread_id: String,
    pub sender: Party,
    pub body: String,
    pub created_at: String,
}

/// Which outbound channel a communication attempt used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommChannel {
    Email,
    Sms,
}

impl CommChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommChannel::Email => "email",
            CommChannel::Sms => "sms",
        }
    }

    pub fn parse(text: &str) -> Result<CommChannel> {
        match text {
            "email" => Ok(CommChannel::Email),
            "sms" => Ok(CommChannel::Sms),
            other => bail!("Unknown communication channel: '{}'", other),
        }
    }
}

/// One send or resend attempt, recorded whether or not the provider
/// accepted it. Immutable except for deletion.
#[derive(Debug, Clone, Serialize)]
pub struct CommLogEntry {
    pub id: String,
    pub channel: CommChannel,
    pub recipient: String,
    pub subject_or_body: String,
    pub succeeded: bool,
    pub provider_response: String,
    pub created_at: String,
}

/// An uploaded asset. Content fields reference it by URL value only; there
/// is no foreign key, and deleting a media item does not touch the tree.
#[derive(Debug, Clone, Serialize)]
pub struct MediaItem {
    pub id: String,
    pub url: String,
    pub provider_file_id: Option<String>,
    pub display_name: String,
    pub created_at: String,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Initialize database connection and create tables
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS threads (
                id TEXT PRIMARY KEY,
                participant TEXT NOT NULL,
                subject TEXT NOT NULL,
                kind TEXT NOT NULL,
                last_message_text TEXT NOT NULL,
                last_message_at TEXT NOT NULL,
                unread_by_admin INTEGER NOT NULL DEFAULT 0,
                unread_by_client INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create threads table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                thread_id TEXT NOT NULL,
                sender TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create messages table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS comm_log (
                id TEXT PRIMARY KEY,
                channel TEXT NOT NULL,
                recipient TEXT NOT NULL,
                subject_or_body TEXT NOT NULL,
                succeeded INTEGER NOT NULL,
                provider_response TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create comm_log table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS media_items (
                id TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                provider_file_id TEXT,
                display_name TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create media_items table")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // ==================== Threads ====================

    /// Record an inbound client message. Creates the thread on first
    /// contact (keyed by participant identity and kind), appends the
    /// message, recomputes the last-message summary, and flips exactly the
    /// receiver's unread flag: the admin has something new, the client has
    /// nothing pending.
    pub fn append_client_message(
        &self,
        participant: &str,
        subject: &str,
        kind: ThreadKind,
        body: &str,
    ) -> Result<MessageThread> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute("BEGIN TRANSACTION", [])?;
        let result = (|| -> Result<String> {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT id FROM threads WHERE participant = ?1 AND kind = ?2",
                    params![participant, kind.as_str()],
                    |row| row.get(0),
                )
                .optional()?;

            let thread_id = match existing {
                Some(id) => id,
                None => {
                    let id = Uuid::new_v4().to_string();
                    conn.execute(
                        "INSERT INTO threads (id, participant, subject, kind, last_message_text,
                                              last_message_at, unread_by_admin, unread_by_client, created_at)
                         VALUES (?1, ?2, ?3, ?4, '', ?5, 0, 0, ?5)",
                        params![id, participant, subject, kind.as_str(), now],
                    )
                    .context("Failed to create thread")?;
                    id
                }
            };

            conn.execute(
                "INSERT INTO messages (thread_id, sender, body, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![thread_id, Party::Client.as_str(), body, now],
            )
            .context("Failed to append message")?;

            conn.execute(
                "UPDATE threads
                 SET last_message_text = ?1, last_message_at = ?2,
                     unread_by_admin = 1, unread_by_client = 0
                 WHERE id = ?3",
                params![body, now, thread_id],
            )
            .context("Failed to update thread summary")?;

            Ok(thread_id)
        })();

        match result {
            Ok(thread_id) => {
                conn.execute("COMMIT", [])?;
                drop(conn);
                self.get_thread(&thread_id)?
                    .context("Thread disappeared after append")
            }
            Err(e) => {
                conn.execute("ROLLBACK", [])?;
                Err(e)
            }
        }
    }

    /// Record an admin reply on an existing thread. The client's unread
    /// flag goes up, the admin's comes down.
    pub fn append_admin_reply(&self, thread_id: &str, body: &str) -> Result<MessageThread> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute("BEGIN TRANSACTION", [])?;
        let result = (|| -> Result<()> {
            let exists: bool = conn.query_row(
                "SELECT COUNT(*) FROM threads WHERE id = ?1",
                params![thread_id],
                |row| row.get::<_, i64>(0).map(|count| count > 0),
            )?;
            if !exists {
                bail!("No thread with id {}", thread_id);
            }

            conn.execute(
                "INSERT INTO messages (thread_id, sender, body, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![thread_id, Party::Admin.as_str(), body, now],
            )
            .context("Failed to append reply")?;

            conn.execute(
                "UPDATE threads
                 SET last_message_text = ?1, last_message_at = ?2,
                     unread_by_client = 1, unread_by_admin = 0
                 WHERE id = ?3",
                params![body, now, thread_id],
            )
            .context("Failed to update thread summary")?;

            Ok(())
        })();

        match result {
            Ok(()) => {
                conn.execute("COMMIT", [])?;
                drop(conn);
                self.get_thread(thread_id)?
                    .context("Thread disappeared after reply")
            }
            Err(e) => {
                conn.execute("ROLLBACK", [])?;
                Err(e)
            }
        }
    }

    /// Clear the caller's own unread flag. The other party's flag is never
    /// touched here.
    pub fn mark_read(&self, thread_id: &str, party: Party) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let column = match party {
            Party::Admin => "unread_by_admin",
            Party::Client => "unread_by_client",
        };
        let rows = conn
            .execute(
                &format!("UPDATE threads SET {} = 0 WHERE id = ?1", column),
                params![thread_id],
            )
            .context("Failed to mark thread read")?;
        Ok(rows > 0)
    }

    pub fn get_thread(&self, thread_id: &str) -> Result<Option<MessageThread>> {
        let conn = self.conn.lock().unwrap();
        let thread = conn
            .query_row(
                "SELECT id, participant, subject, kind, last_message_text, last_message_at,
                        unread_by_admin, unread_by_client, created_at
                 FROM threads WHERE id = ?1",
                params![thread_id],
                row_to_thread,
            )
            .optional()?;
        Ok(thread)
    }

    /// All threads, most recently active first. This is the canonical list
    /// the polling watcher replaces its snapshot with.
    pub fn list_threads(&self) -> Result<Vec<MessageThread>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, participant, subject, kind, last_message_text, last_message_at,
                    unread_by_admin, unread_by_client, created_at
             FROM threads
             ORDER BY last_message_at DESC, id ASC",
        )?;
        let threads = stmt
            .query_map([], row_to_thread)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(threads)
    }

    /// Full message log of one thread, oldest first.
    pub fn thread_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, thread_id, sender, body, created_at
             FROM messages WHERE thread_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let messages = stmt
            .query_map(params![thread_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        messages
            .into_iter()
            .map(|(id, thread_id, sender, body, created_at)| {
                Ok(ThreadMessage {
                    id,
                    thread_id,
                    sender: Party::parse(&sender)?,
                    body,
                    created_at,
                })
            })
            .collect()
    }

    // ==================== Communication Log ====================

    /// Record one send attempt, successful or not.
    pub fn record_comm(
        &self,
        channel: CommChannel,
        recipient: &str,
        subject_or_body: &str,
        succeeded: bool,
        provider_response: &str,
    ) -> Result<CommLogEntry> {
        let conn = self.conn.lock().unwrap();
        let entry = CommLogEntry {
            id: Uuid::new_v4().to_string(),
            channel,
            recipient: recipient.to_string(),
            subject_or_body: subject_or_body.to_string(),
            succeeded,
            provider_response: provider_response.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        conn.execute(
            "INSERT INTO comm_log (id, channel, recipient, subject_or_body, succeeded, provider_response, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id,
                entry.channel.as_str(),
                entry.recipient,
                entry.subject_or_body,
                entry.succeeded as i64,
                entry.provider_response,
                entry.created_at
            ],
        )
        .context("Failed to record communication attempt")?;
        Ok(entry)
    }

    pub fn list_comm_log(&self) -> Result<Vec<CommLogEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, channel, recipient, subject_or_body, succeeded, provider_response, created_at
             FROM comm_log ORDER BY created_at DESC, id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)? != 0,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(id, channel, recipient, subject_or_body, succeeded, provider_response, created_at)| {
                    Ok(CommLogEntry {
                        id,
                        channel: CommChannel::parse(&channel)?,
                        recipient,
                        subject_or_body,
                        succeeded,
                        provider_response,
                        created_at,
                    })
                },
            )
            .collect()
    }

    pub fn delete_comm_log(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn
            .execute("DELETE FROM comm_log WHERE id = ?1", params![id])
            .context("Failed to delete log entry")?;
        Ok(rows > 0)
    }

    // ==================== Media ====================

    pub fn add_media(
        &self,
        url: &str,
        provider_file_id: Option<&str>,
        display_name: &str,
    ) -> Result<MediaItem> {
        let conn = self.conn.lock().unwrap();
        let item = MediaItem {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            provider_file_id: provider_file_id.map(str::to_string),
            display_name: display_name.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        conn.execute(
            "INSERT INTO media_items (id, url, provider_file_id, display_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item.id,
                item.url,
                item.provider_file_id,
                item.display_name,
                item.created_at
            ],
        )
        .context("Failed to record media item")?;
        Ok(item)
    }

    pub fn get_media(&self, id: &str) -> Result<Option<MediaItem>> {
        let conn = self.conn.lock().unwrap();
        let item = conn
            .query_row(
                "SELECT id, url, provider_file_id, display_name, created_at
                 FROM media_items WHERE id = ?1",
                params![id],
                row_to_media,
            )
            .optional()?;
        Ok(item)
    }

    pub fn list_media(&self) -> Result<Vec<MediaItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, url, provider_file_id, display_name, created_at
             FROM media_items ORDER BY created_at DESC, id ASC",
        )?;
        let items = stmt
            .query_map([], row_to_media)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Remove the record only. Content-tree references to the URL are left
    /// as they are; a dangling URL is reported by the media diagnostics,
    /// not repaired.
    pub fn delete_media(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn
            .execute("DELETE FROM media_items WHERE id = ?1", params![id])
            .context("Failed to delete media item")?;
        Ok(rows > 0)
    }
}

fn row_to_thread(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageThread> {
    let kind_text: String = row.get(3)?;
    let kind = ThreadKind::parse(&kind_text).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("bad thread kind '{}'", kind_text).into(),
        )
    })?;
    Ok(MessageThread {
        id: row.get(0)?,
        participant: row.get(1)?,
        subject: row.get(2)?,
        kind,
        last_message_text: row.get(4)?,
        last_message_at: row.get(5)?,
        unread_by_admin: row.get::<_, i64>(6)? != 0,
        unread_by_client: row.get::<_, i64>(7)? != 0,
        created_at: row.get(8)?,
    })
}

fn row_to_media(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaItem> {
    Ok(MediaItem {
        id: row.get(0)?,
        url: row.get(1)?,
        provider_file_id: row.get(2)?,
        display_name: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== Helper Functions ====================

    /// Create a temporary database for testing
    fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test_backoffice.db");
        let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
        (db, temp_dir)
    }

    // ==================== Database Initialization Tests ====================

    #[test]
    fn test_database_creation() {
        let (db, _temp_dir) = create_test_db();
        assert!(db.list_threads().expect("list").is_empty());
        assert!(db.list_comm_log().expect("list").is_empty());
        assert!(db.list_media().expect("list").is_empty());
    }

    #[test]
    fn test_database_reopening() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let path_str = db_path.to_str().unwrap();

        {
            let db = Database::new(path_str).expect("Failed to create database");
            db.append_client_message("visitor@example.com", "Hello", ThreadKind::ContactForm, "Hi")
                .expect("Should append");
        }

        {
            let db = Database::new(path_str).expect("Failed to reopen database");
            assert_eq!(db.list_threads().expect("list").len(), 1, "Thread should persist");
        }
    }

    #[test]
    fn test_invalid_database_path() {
        let result = Database::new("/non/existent/path/db.db");
        assert!(result.is_err());
    }

    // ==================== Thread Lifecycle Tests ====================

    #[test]
    fn test_first_client_message_creates_thread() {
        let (db, _temp_dir) = create_test_db();

        let thread = db
            .append_client_message("visitor@example.com", "Project inquiry", ThreadKind::ContactForm, "I need a site")
            .expect("append");

        assert_eq!(thread.participant, "visitor@example.com");
        assert_eq!(thread.subject, "Project inquiry");
        assert_eq!(thread.kind, ThreadKind::ContactForm);
        assert_eq!(thread.last_message_text, "I need a site");
        assert!(thread.unread_by_admin);
        assert!(!thread.unread_by_client);
    }

    #[test]
    fn test_second_message_reuses_thread() {
        let (db, _temp_dir) = create_test_db();

        let first = db
            .append_client_message("visitor@example.com", "Hi", ThreadKind::LiveChat, "one")
            .expect("append");
        let second = db
            .append_client_message("visitor@example.com", "Hi", ThreadKind::LiveChat, "two")
            .expect("append");

        assert_eq!(first.id, second.id);
        assert_eq!(db.list_threads().expect("list").len(), 1);
        assert_eq!(second.last_message_text, "two");
        assert_eq!(db.thread_messages(&first.id).expect("messages").len(), 2);
    }

    #[test]
    fn test_same_participant_different_kinds_are_separate_threads() {
        let (db, _temp_dir) = create_test_db();

        db.append_client_message("visitor@example.com", "Form", ThreadKind::ContactForm, "a")
            .expect("append");
        db.append_client_message("visitor@example.com", "Chat", ThreadKind::LiveChat, "b")
            .expect("append");

        assert_eq!(db.list_threads().expect("list").len(), 2);
    }

    #[test]
    fn test_admin_reply_requires_existing_thread() {
        let (db, _temp_dir) = create_test_db();
        assert!(db.append_admin_reply("missing", "hello?").is_err());
    }

    #[test]
    fn test_messages_ordered_oldest_first() {
        let (db, _temp_dir) = create_test_db();

        let thread = db
            .append_client_message("v", "s", ThreadKind::LiveChat, "first")
            .expect("append");
        std::thread::sleep(std::time::Duration::from_millis(10));
        db.append_admin_reply(&thread.id, "second").expect("reply");
        std::thread::sleep(std::time::Duration::from_millis(10));
        db.append_client_message("v", "s", ThreadKind::LiveChat, "third")
            .expect("append");

        let messages = db.thread_messages(&thread.id).expect("messages");
        let bodies: Vec<_> = messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
        assert_eq!(messages[0].sender, Party::Client);
        assert_eq!(messages[1].sender, Party::Admin);
    }

    #[test]
    fn test_threads_ordered_by_recent_activity() {
        let (db, _temp_dir) = create_test_db();

        let older = db
            .append_client_message("a", "s", ThreadKind::LiveChat, "x")
            .expect("append");
        std::thread::sleep(std::time::Duration::from_millis(10));
        let newer = db
            .append_client_message("b", "s", ThreadKind::LiveChat, "y")
            .expect("append");

        let threads = db.list_threads().expect("list");
        assert_eq!(threads[0].id, newer.id);
        assert_eq!(threads[1].id, older.id);

        // Activity on the older thread moves it back to the top.
        std::thread::sleep(std::time::Duration::from_millis(10));
        db.append_admin_reply(&older.id, "pong").expect("reply");
        let threads = db.list_threads().expect("list");
        assert_eq!(threads[0].id, older.id);
    }

    // ==================== Unread Flag Tests ====================

    #[test]
    fn test_client_message_flips_admin_unread_only() {
        let (db, _temp_dir) = create_test_db();

        let thread = db
            .append_client_message("v", "s", ThreadKind::LiveChat, "hello")
            .expect("append");

        // Exactly one flag is up, and it is the receiver's.
        assert!(thread.unread_by_admin);
        assert!(!thread.unread_by_client);
    }

    #[test]
    fn test_admin_reply_flips_client_unread_only() {
        let (db, _temp_dir) = create_test_db();

        let thread = db
            .append_client_message("v", "s", ThreadKind::LiveChat, "hello")
            .expect("append");
        let after_reply = db.append_admin_reply(&thread.id, "hi there").expect("reply");

        assert!(!after_reply.unread_by_admin);
        assert!(after_reply.unread_by_client);
    }

    #[test]
    fn test_mark_read_touches_own_flag_only() {
        let (db, _temp_dir) = create_test_db();

        let thread = db
            .append_client_message("v", "s", ThreadKind::LiveChat, "hello")
            .expect("append");
        db.append_admin_reply(&thread.id, "hi").expect("reply");
        db.append_client_message("v", "s", ThreadKind::LiveChat, "again")
            .expect("append");

        // Both unread states possible? After last client message:
        // unread_by_admin=1, unread_by_client=0. Mark admin read.
        let marked = db.mark_read(&thread.id, Party::Admin).expect("mark");
        assert!(marked);

        let fetched = db.get_thread(&thread.id).expect("get").expect("exists");
        assert!(!fetched.unread_by_admin);
        assert!(!fetched.unread_by_client);
    }

    #[test]
    fn test_mark_read_client_does_not_clear_admin() {
        let (db, _temp_dir) = create_test_db();

        let thread = db
            .append_client_message("v", "s", ThreadKind::LiveChat, "hello")
            .expect("append");

        db.mark_read(&thread.id, Party::Client).expect("mark");

        let fetched = db.get_thread(&thread.id).expect("get").expect("exists");
        assert!(fetched.unread_by_admin, "other party's flag must survive");
        assert!(!fetched.unread_by_client);
    }

    #[test]
    fn test_mark_read_missing_thread_returns_false() {
        let (db, _temp_dir) = create_test_db();
        assert!(!db.mark_read("missing", Party::Admin).expect("mark"));
    }

    #[test]
    fn test_live_chat_scenario_round_trip() {
        // A live-chat thread receives a client message, the admin reads it.
        let (db, _temp_dir) = create_test_db();

        let thread = db
            .append_client_message("guest-42", "Live chat", ThreadKind::LiveChat, "Are you there?")
            .expect("append");
        assert!(thread.unread_by_admin);
        assert!(!thread.unread_by_client);

        db.mark_read(&thread.id, Party::Admin).expect("mark");
        let fetched = db.get_thread(&thread.id).expect("get").expect("exists");
        assert!(!fetched.unread_by_admin);
        assert!(!fetched.unread_by_client);
    }

    // ==================== Communication Log Tests ====================

    #[test]
    fn test_record_comm_success_and_failure() {
        let (db, _temp_dir) = create_test_db();

        db.record_comm(CommChannel::Email, "a@example.com", "Welcome", true, "250 OK")
            .expect("record");
        db.record_comm(CommChannel::Sms, "+88017", "Your code", false, "insufficient balance")
            .expect("record");

        let log = db.list_comm_log().expect("list");
        assert_eq!(log.len(), 2);
        assert!(log.iter().any(|e| e.channel == CommChannel::Email && e.succeeded));
        assert!(log.iter().any(|e| e.channel == CommChannel::Sms && !e.succeeded));
    }

    #[test]
    fn test_delete_comm_log_entry() {
        let (db, _temp_dir) = create_test_db();

        let entry = db
            .record_comm(CommChannel::Email, "a@example.com", "Hi", true, "ok")
            .expect("record");

        assert!(db.delete_comm_log(&entry.id).expect("delete"));
        assert!(db.list_comm_log().expect("list").is_empty());
        assert!(!db.delete_comm_log(&entry.id).expect("redelete"));
    }

    #[test]
    fn test_comm_log_timestamps_are_rfc3339() {
        let (db, _temp_dir) = create_test_db();
        let entry = db
            .record_comm(CommChannel::Email, "a@example.com", "Hi", true, "ok")
            .expect("record");
        chrono::DateTime::parse_from_rfc3339(&entry.created_at).expect("Should be valid RFC3339");
    }

    // ==================== Media Tests ====================

    #[test]
    fn test_add_and_list_media() {
        let (db, _temp_dir) = create_test_db();

        let item = db
            .add_media("https://cdn.example.com/a.jpg", Some("file-1"), "a.jpg")
            .expect("add");

        let listed = db.list_media().expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, item.id);
        assert_eq!(listed[0].provider_file_id.as_deref(), Some("file-1"));
    }

    #[test]
    fn test_media_without_provider_id() {
        let (db, _temp_dir) = create_test_db();
        let item = db
            .add_media("https://cdn.example.com/b.jpg", None, "b.jpg")
            .expect("add");
        assert!(db.get_media(&item.id).expect("get").expect("exists").provider_file_id.is_none());
    }

    #[test]
    fn test_delete_media_is_record_only() {
        let (db, _temp_dir) = create_test_db();
        let item = db
            .add_media("https://cdn.example.com/a.jpg", None, "a.jpg")
            .expect("add");

        assert!(db.delete_media(&item.id).expect("delete"));
        assert!(db.get_media(&item.id).expect("get").is_none());
        assert!(!db.delete_media(&item.id).expect("redelete"));
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_database_clone_shares_connection() {
        let (db, _temp_dir) = create_test_db();
        let db_clone = db.clone();

        db.append_client_message("v", "s", ThreadKind::LiveChat, "x")
            .expect("append");

        assert_eq!(db_clone.list_threads().expect("list").len(), 1);
    }

    #[test]
    fn test_concurrent_appends_no_deadlock() {
        let (db, _temp_dir) = create_test_db();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let db_clone = db.clone();
                std::thread::spawn(move || {
                    for j in 0..5 {
                        db_clone
                            .append_client_message(
                                &format!("visitor-{}", i),
                                "load",
                                ThreadKind::LiveChat,
                                &format!("message {}", j),
                            )
                            .expect("append should not deadlock");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread should complete without deadlock");
        }

        assert_eq!(db.list_threads().expect("list").len(), 10);
    }

    // ==================== Parse Tests ====================

    #[test]
    fn test_party_parse_round_trip() {
        assert_eq!(Party::parse("client").unwrap(), Party::Client);
        assert_eq!(Party::parse("admin").unwrap(), Party::Admin);
        assert!(Party::parse("robot").is_err());
    }

    #[test]
    fn test_thread_kind_parse_round_trip() {
        assert_eq!(ThreadKind::parse("contact-form").unwrap(), ThreadKind::ContactForm);
        assert_eq!(ThreadKind::parse("live-chat").unwrap(), ThreadKind::LiveChat);
        assert!(ThreadKind::parse("carrier-pigeon").is_err());
    }

    #[test]
    fn test_comm_channel_parse_round_trip() {
        assert_eq!(CommChannel::parse("email").unwrap(), CommChannel::Email);
        assert_eq!(CommChannel::parse("sms").unwrap(), CommChannel::Sms);
        assert!(CommChannel::parse("fax").is_err());
    }
}
