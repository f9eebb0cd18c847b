use std::sync::Arc;

use crate::ChatMessage;

/// Anything that can turn a question into free-text answer. Errors are
/// acquisition faults: the source could not be reached or returned something
/// unusable.
#[async_trait::async_trait]
pub trait AnswerSource: Send + Sync {
    async fn answer(&self, question: &str, history: &[ChatMessage]) -> anyhow::Result<String>;
}

#[async_trait::async_trait]
impl<T: AnswerSource + ?Sized> AnswerSource for Arc<T> {
    async fn answer(&self, question: &str, history: &[ChatMessage]) -> anyhow::Result<String> {
        (**self).answer(question, history).await
    }
}
