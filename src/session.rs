//! Read-only access to the visitor's persisted session.
//!
//! The website stores the logged-in customer as a JSON record. The catalog
//! never writes it; it only asks whether one is present right now.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The authenticated customer's identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    /// Name shown in the status bar.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.document_id)
    }
}

/// Source of the current session. `None` means the visitor is a guest.
pub trait SessionProvider: Send + Sync {
    fn current(&self) -> Option<Session>;

    /// Where the session lives, for messages pointing the user at it.
    fn location(&self) -> String;
}

/// Session stored as a JSON file on disk.
///
/// The file is re-read on every call so that logging in from another
/// terminal takes effect without restarting.
pub struct FileSessionProvider {
    path: PathBuf,
}

impl FileSessionProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionProvider for FileSessionProvider {
    fn current(&self) -> Option<Session> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session file at {:?}", self.path);
                return None;
            }
            Err(e) => {
                warn!("Failed to read session file {:?}: {}", self.path, e);
                return None;
            }
        };

        if data.trim().is_empty() || data.trim() == "null" {
            return None;
        }

        match serde_json::from_str::<Session>(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring malformed session file {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed session, used for tests and for running against a fake login.
#[derive(Default)]
pub struct StaticSessionProvider {
    session: Option<Session>,
}

impl StaticSessionProvider {
    pub const fn guest() -> Self {
        Self { session: None }
    }

    pub fn logged_in(document_id: impl Into<String>) -> Self {
        Self {
            session: Some(Session {
                document_id: document_id.into(),
                username: None,
                email: None,
            }),
        }
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current(&self) -> Option<Session> {
        self.session.clone()
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_guest() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileSessionProvider::new(dir.path().join("session.json"));
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_reads_strapi_user_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"id": 7, "documentId": "cust-7", "username": "siti", "email": "siti@example.com", "confirmed": true}"#,
        )
        .unwrap();

        let session = FileSessionProvider::new(&path).current().unwrap();
        assert_eq!(session.document_id, "cust-7");
        assert_eq!(session.display_name(), "siti");
    }

    #[test]
    fn test_malformed_or_null_file_is_guest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        std::fs::write(&path, "{not json").unwrap();
        assert!(FileSessionProvider::new(&path).current().is_none());

        std::fs::write(&path, "null").unwrap();
        assert!(FileSessionProvider::new(&path).current().is_none());
    }

    #[test]
    fn test_file_is_reread_on_each_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let provider = FileSessionProvider::new(&path);
        assert!(provider.current().is_none());

        std::fs::write(&path, r#"{"documentId": "late"}"#).unwrap();
        assert_eq!(provider.current().unwrap().document_id, "late");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let session = StaticSessionProvider::logged_in("abc").current().unwrap();
        assert_eq!(session.display_name(), "abc");
        assert!(StaticSessionProvider::guest().current().is_none());
    }
}
