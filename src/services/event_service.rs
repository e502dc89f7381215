//! Real-time event publishing
//!
//! The engine hands every lifecycle change and accepted answer to an
//! [`EventPublisher`]. Socket fan-out is somebody else's job: production
//! deployments publish to Redis, tests and single-process runs use a
//! Tokio broadcast channel.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tokio::sync::broadcast;

use crate::{
    constants::EVENT_BROADCAST_CAPACITY,
    error::{AppError, AppResult},
    models::SessionEvent,
};

/// Sink for session events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &SessionEvent) -> AppResult<()>;
}

/// Publishes events to `livequiz:quiz:{quiz_id}` over Redis pub/sub
#[derive(Clone)]
pub struct RedisPublisher {
    conn: ConnectionManager,
}

impl RedisPublisher {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(&self, event: &SessionEvent) -> AppResult<()> {
        let payload = serde_json::to_string(event)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode event: {e}")))?;

        let mut conn = self.conn.clone();
        let _: i64 = conn.publish(event.channel(), payload).await?;
        Ok(())
    }
}

/// In-process fan-out over a Tokio broadcast channel
#[derive(Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<SessionEvent>,
}

impl BroadcastPublisher {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BROADCAST_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, event: &SessionEvent) -> AppResult<()> {
        // No subscribers is not an error
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}
