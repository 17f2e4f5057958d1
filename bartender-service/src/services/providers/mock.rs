//! Mock chat provider for testing.

use super::{ChatMessage, ChatProvider, CompletionParams, ProviderError, ProviderStream, StreamChunk};
use async_trait::async_trait;

/// Returns a canned reply for every request.
pub struct MockChatProvider {
    reply: String,
}

impl MockChatProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> Result<String, ProviderError> {
        Ok(self.reply.clone())
    }

    async fn complete_stream(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> Result<ProviderStream, ProviderError> {
        let chunks: Vec<Result<StreamChunk, ProviderError>> = vec![
            Ok(StreamChunk::Text("Mock".to_string())),
            Ok(StreamChunk::Text(" stream: ".to_string())),
            Ok(StreamChunk::Text(self.reply.clone())),
            Ok(StreamChunk::Done),
        ];
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
