//! Recording [`Notifier`] for tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Message, Notifier, NotifyError};

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Message>>,
    reject: bool,
}

impl RecordingNotifier {
    /// A notifier whose every send is rejected by the "platform".
    pub fn rejecting() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub async fn sent(&self) -> Vec<Message> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &Message) -> Result<(), NotifyError> {
        if self.reject {
            return Err(NotifyError::Rejected {
                status: 403,
                body: "Missing Access".into(),
            });
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
