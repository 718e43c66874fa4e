//! Persistence for the single session record
//!
//! The store holds exactly one serialized [`Session`] under [`SESSION_STORAGE_KEY`].
//! Reading never fails: missing, corrupt or incomplete content is reported as
//! "no session".

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::auth::{Session, Welcome};
use crate::error::Result;

/// Well-known key the session record is stored under
pub const SESSION_STORAGE_KEY: &str = "user";

/// A single mutable slot holding the serialized session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The stored session, or `None` when absent, unreadable or incomplete
    async fn load(&self) -> Option<Session>;

    /// Replace the stored record
    async fn save(&self, session: &Session) -> Result<()>;

    /// Remove the stored record
    async fn clear(&self) -> Result<()>;
}

/// Parse a stored record. Anything that is not a complete session is absent.
pub fn parse_stored(raw: &str) -> Option<Session> {
    match serde_json::from_str::<Session>(raw) {
        Ok(session) if session.is_complete() => Some(session),
        Ok(_) => {
            log::debug!("stored session is incomplete; treating as absent");
            None
        }
        Err(e) => {
            log::warn!("stored session is unreadable ({}); treating as absent", e);
            None
        }
    }
}

/// Session store backed by a JSON file that survives restarts
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store the record at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the record as `user.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{SESSION_STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Option<Session> {
        let raw = tokio::fs::read_to_string(&self.path).await.ok()?;
        parse_stored(&raw)
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string(session)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process session store. Keeps the serialized text, like the file store does.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored content, which need not be valid
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Mutex::new(Some(raw.to_string())),
        }
    }

    /// The raw stored text, if any
    pub async fn raw(&self) -> Option<String> {
        self.slot.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Option<Session> {
        let slot = self.slot.lock().await;
        slot.as_deref().and_then(parse_stored)
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        *self.slot.lock().await = Some(json);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

/// One-shot marker set after a successful sign-in; not persisted
#[derive(Debug, Default)]
pub struct WelcomeMarker {
    slot: Mutex<Option<Welcome>>,
}

impl WelcomeMarker {
    pub async fn set(&self, welcome: Welcome) {
        *self.slot.lock().await = Some(welcome);
    }

    /// Return the marker once, clearing it
    pub async fn take(&self) -> Option<Welcome> {
        self.slot.lock().await.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Media;

    fn session() -> Session {
        Session {
            name: "abc_1".to_string(),
            email: "abc_1@stud.noroff.no".to_string(),
            bio: "bio".to_string(),
            credits: 1000,
            avatar: Media::new("https://x.test/a.png", "avatar"),
            banner: Media::new("https://x.test/b.png", ""),
            access_token: "token".to_string(),
            api_key: "key".to_string(),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemorySessionStore::new();
        assert!(store.load().await.is_none());

        store.save(&session()).await.unwrap();
        assert_eq!(store.load().await, Some(session()));

        store.clear().await.unwrap();
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn save_replaces_the_whole_record() {
        let store = MemorySessionStore::new();
        store.save(&session()).await.unwrap();

        let mut other = session();
        other.bio = String::new();
        other.credits = 5;
        store.save(&other).await.unwrap();

        assert_eq!(store.load().await, Some(other));
    }

    #[tokio::test]
    async fn corrupt_content_is_absent() {
        for raw in ["", "not json", "{\"name\":", "[1,2,3]", "null", "42"] {
            let store = MemorySessionStore::with_raw(raw);
            assert!(store.load().await.is_none(), "{raw:?} should load as absent");
        }
    }

    #[tokio::test]
    async fn partial_sessions_are_absent() {
        let store = MemorySessionStore::with_raw(r#"{"name":"abc_1","token":"legacy","apiKey":"k"}"#);
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn file_store_round_trips_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path().join("nested"));
        assert!(store.load().await.is_none());

        store.save(&session()).await.unwrap();
        assert!(store.path().ends_with("user.json"));

        let reopened = FileSessionStore::in_dir(dir.path().join("nested"));
        assert_eq!(reopened.load().await, Some(session()));

        reopened.clear().await.unwrap();
        assert!(store.load().await.is_none());
        // clearing twice is fine
        reopened.clear().await.unwrap();
    }

    #[tokio::test]
    async fn file_store_tolerates_tampering() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path());
        tokio::fs::write(store.path(), b"\xff\xfe garbage").await.unwrap();
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn welcome_marker_is_one_shot() {
        let marker = WelcomeMarker::default();
        marker
            .set(Welcome {
                name: "abc_1".to_string(),
                is_new: true,
            })
            .await;
        assert_eq!(marker.take().await.map(|w| w.name), Some("abc_1".to_string()));
        assert!(marker.take().await.is_none());
    }
}
