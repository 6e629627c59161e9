use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::BotError;

/// Per-user in-memory record: the current document's extracted text and the
/// remaining credit balance. Lost on process restart.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub document: Option<String>,
    pub credits: u32,
}

/// Repository abstraction over per-user state, injected into the handlers so
/// a persistent backing store can replace the in-memory one without touching
/// handler logic.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: i64) -> Option<UserSession>;

    /// Creates a session with default credits and no document, only if the
    /// user has none yet. Returns the session and whether it was created.
    async fn create_if_absent(&self, user_id: i64) -> (UserSession, bool);

    /// Replaces the stored document text wholesale. No-op without a session.
    async fn set_document(&self, user_id: i64, text: String);

    /// Deducts one credit and returns the remaining balance, or
    /// `BotError::NoCredits` when the balance is already zero.
    async fn deduct_credit(&self, user_id: i64) -> Result<u32, BotError>;
}

pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<i64, UserSession>>,
    initial_credits: u32,
}

impl InMemorySessionStore {
    pub fn new(initial_credits: u32) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            initial_credits,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: i64) -> Option<UserSession> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    async fn create_if_absent(&self, user_id: i64) -> (UserSession, bool) {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&user_id) {
            Some(existing) => (existing.clone(), false),
            None => {
                let session = UserSession {
                    document: None,
                    credits: self.initial_credits,
                };
                sessions.insert(user_id, session.clone());
                (session, true)
            }
        }
    }

    async fn set_document(&self, user_id: i64, text: String) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&user_id) {
            session.document = Some(text);
        }
    }

    async fn deduct_credit(&self, user_id: i64) -> Result<u32, BotError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&user_id).ok_or(BotError::NoCredits)?;
        if session.credits == 0 {
            return Err(BotError::NoCredits);
        }
        session.credits -= 1;
        Ok(session.credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_grants_default_credits_once() {
        let store = InMemorySessionStore::new(5);
        let (session, created) = store.create_if_absent(1).await;
        assert!(created);
        assert_eq!(session.credits, 5);
        assert!(session.document.is_none());

        store.deduct_credit(1).await.unwrap();
        // re-issuing creation must not reset an existing user's balance
        let (session, created) = store.create_if_absent(1).await;
        assert!(!created);
        assert_eq!(session.credits, 4);
    }

    #[tokio::test]
    async fn test_deduct_credit_counts_down_to_error() {
        let store = InMemorySessionStore::new(2);
        store.create_if_absent(7).await;
        assert_eq!(store.deduct_credit(7).await.unwrap(), 1);
        assert_eq!(store.deduct_credit(7).await.unwrap(), 0);
        assert!(matches!(
            store.deduct_credit(7).await,
            Err(BotError::NoCredits)
        ));
    }

    #[tokio::test]
    async fn test_set_document_replaces_wholesale() {
        let store = InMemorySessionStore::new(5);
        store.create_if_absent(3).await;
        store.set_document(3, "first document".to_string()).await;
        store.set_document(3, "second document".to_string()).await;
        let session = store.get(3).await.unwrap();
        assert_eq!(session.document.as_deref(), Some("second document"));
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let store = InMemorySessionStore::new(5);
        assert!(store.get(42).await.is_none());
    }
}
