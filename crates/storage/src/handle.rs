//! Exclusive ownership of a driver client

use crate::error::StorageError;
use tokio::sync::RwLock;

#[derive(Debug)]
enum HandleState<T> {
    /// Never connected
    Detached,
    Connected(T),
    Closed,
}

/// Driver client owned by exactly one repository
///
/// Operations borrow a clone of the client; `take` releases it exactly once.
#[derive(Debug)]
pub struct ConnectionHandle<T> {
    backend: &'static str,
    state: RwLock<HandleState<T>>,
}

impl<T: Clone> ConnectionHandle<T> {
    pub fn connected(backend: &'static str, client: T) -> Self {
        Self {
            backend,
            state: RwLock::new(HandleState::Connected(client)),
        }
    }

    pub fn detached(backend: &'static str) -> Self {
        Self {
            backend,
            state: RwLock::new(HandleState::Detached),
        }
    }

    /// Clone of the live client, if any
    pub async fn get(&self) -> Option<T> {
        match &*self.state.read().await {
            HandleState::Connected(client) => Some(client.clone()),
            HandleState::Detached | HandleState::Closed => None,
        }
    }

    pub async fn is_connected(&self) -> bool {
        matches!(&*self.state.read().await, HandleState::Connected(_))
    }

    /// Release the client, leaving the handle closed
    ///
    /// # Errors
    /// * `AlreadyClosed` if a previous `take` succeeded
    /// * `NotConnected` if the handle never held a client
    pub async fn take(&self) -> Result<T, StorageError> {
        let mut state = self.state.write().await;
        match std::mem::replace(&mut *state, HandleState::Closed) {
            HandleState::Connected(client) => Ok(client),
            HandleState::Closed => Err(StorageError::AlreadyClosed(self.backend)),
            HandleState::Detached => {
                *state = HandleState::Detached;
                Err(StorageError::NotConnected(self.backend))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_take_exactly_once() {
        let handle = ConnectionHandle::connected("MongoDB", "client".to_string());
        assert!(handle.is_connected().await);
        assert_eq!(handle.get().await.as_deref(), Some("client"));

        assert_eq!(handle.take().await, Ok("client".to_string()));
        assert!(!handle.is_connected().await);
        assert!(handle.get().await.is_none());

        assert_eq!(
            handle.take().await,
            Err(StorageError::AlreadyClosed("MongoDB"))
        );
    }

    #[tokio::test]
    async fn test_detached_stays_detached() {
        let handle: ConnectionHandle<String> = ConnectionHandle::detached("Neo4j");
        assert!(handle.get().await.is_none());
        assert_eq!(handle.take().await, Err(StorageError::NotConnected("Neo4j")));
        assert_eq!(handle.take().await, Err(StorageError::NotConnected("Neo4j")));
    }
}
