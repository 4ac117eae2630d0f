//! Chat resource client: the scheduling assistant conversation.

use tracing::instrument;

use haru_api::{endpoints, ApiResult};

use crate::backend::Backend;
use crate::types::{ChatReply, ChatRequest};

pub struct ChatClient {
    backend: Backend,
}

impl ChatClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Send one chat turn and get the assistant's reply, including any
    /// event proposals it extracted.
    #[instrument(skip(self, request), level = "info")]
    pub async fn send(&self, chat_id: &str, request: &ChatRequest) -> ApiResult<ChatReply> {
        match &self.backend {
            Backend::Live(gateway) => {
                let endpoint = endpoints::fill(endpoints::CHAT, &[("chat_id", chat_id)]);
                gateway.post(&endpoint, Some(request), true).await
            }
            Backend::Mock(store) => store.send_chat(chat_id, request),
        }
    }

    /// Fetch the current state of a conversation.
    #[instrument(skip(self), level = "info")]
    pub async fn history(&self, chat_id: &str) -> ApiResult<ChatReply> {
        match &self.backend {
            Backend::Live(gateway) => {
                let endpoint = endpoints::fill(endpoints::CHAT, &[("chat_id", chat_id)]);
                gateway.get(&endpoint, true).await
            }
            Backend::Mock(store) => store.chat_history(chat_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mock_send_and_history() {
        let client = ChatClient::new(Backend::Mock(Arc::new(MockStore::new())));

        let reply = client
            .send(
                "c1",
                &ChatRequest {
                    message: "Lunch with Mina 2024-04-02".to_string(),
                    conversation_history: None,
                },
            )
            .await
            .unwrap()
            .data;
        assert_eq!(reply.events.len(), 1);

        let history = client.history("c1").await.unwrap().data;
        assert_eq!(history.message, reply.message);
    }
}
