//! Bias classifier client.
//!
//! Wraps an `LlmProvider` with the fixed bias-analysis rubric. Each call is a
//! single round trip: the rubric as the system message, the record text as the
//! user message, and the trimmed first answer back.

use crate::brain::LlmProvider;
use crate::error::LlmError;
use crate::types::{CompletionRequest, Message};
use std::sync::Arc;
use tracing::debug;

/// System instruction sent with every classification request.
pub const BIAS_RUBRIC: &str = "\
Task: Please carefully analyze the following content for discriminatory, biased, or unethical language.
When you analyze the following content, be mindful within the context of modern social discourse. \
Consider that this content may be viewed by a diverse group of individuals from various backgrounds. \
Be mindful of the potential for harm or offense.
The content should be assessed based on the following categories:
- Racial bias
- Gender bias
- Religious bias
- Political bias
- General unethical behavior

Additionally, provide:
1. A severity rating from 1 to 10, where 1 represents minimal bias and 10 represents extreme bias.
2. A detailed explanation of the flagged content, including which specific biases or unethical behavior is present.
3. Suggested improvements for making the content more inclusive and respectful.
4. If applicable, categorize the type of bias detected (e.g., racial, gender, political, etc.).";

/// Sends record text to the remote classifier.
pub struct BiasClassifier {
    provider: Arc<dyn LlmProvider>,
}

impl BiasClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Model identifier of the underlying provider.
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Build the two-message request for `text`.
    pub fn build_request(text: &str) -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::system(BIAS_RUBRIC), Message::user(text)],
            ..Default::default()
        }
    }

    /// Analyse one record and return the classifier's explanation.
    pub async fn analyze(&self, text: &str) -> Result<String, LlmError> {
        let response = self.provider.complete(Self::build_request(text)).await?;
        debug!(
            model = %response.model,
            tokens = response.usage.total(),
            "Classification complete"
        );
        Ok(response.message.content.trim().to_string())
    }
}
