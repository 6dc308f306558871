//! High-level client over a provider: prompt assembly for plain and
//! context-grounded generation.

use serde::Serialize;
use tracing::debug;

use gist_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::{create_provider, resolve_model, resolve_provider};

const ANALYST_SYSTEM_PROMPT: &str = "You are an expert content analyst and summarizer.";

/// Provider identity for diagnostics and the `info` command.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub provider: String,
    pub mode: String,
    pub model: String,
}

/// LLM client: one provider plus the sampling parameters every call uses.
/// Immutable after construction and safe to share across requests.
pub struct LlmClient {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
    mode: String,
    model: String,
}

impl LlmClient {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
            mode: String::new(),
            model: String::new(),
        }
    }

    /// Build from config, creating the appropriate provider. Fails with a
    /// configuration error before any processing starts.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let name = resolve_provider(config)?;
        let model = resolve_model(config, name);
        let provider = create_provider(config)?;
        Ok(Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            mode: config.mode.clone(),
            model,
        })
    }

    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            provider: self.provider.name().to_string(),
            mode: self.mode.clone(),
            model: self.model.clone(),
        }
    }

    /// One completion for `prompt`, with an optional system prompt.
    pub async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(prompt));

        debug!(prompt_len = prompt.len(), "dispatching generation");
        self.provider
            .complete(messages, self.temperature, self.max_tokens)
            .await
    }

    /// Generate against a context block with a task instruction. The system
    /// prompt casts the model as a content analyst, optionally directed to a
    /// response style.
    pub async fn generate_with_context(
        &self,
        context: &str,
        instruction: &str,
        style: Option<&str>,
    ) -> Result<String, LlmError> {
        let mut system_prompt = ANALYST_SYSTEM_PROMPT.to_string();
        if let Some(style) = style.filter(|s| !s.is_empty()) {
            system_prompt.push_str(&format!(" Provide your response in a {} style.", style));
        }

        let prompt = format!(
            "Content:\n{}\n\nTask:\n{}\n\nProvide a clear, accurate, and well-structured response.",
            context, instruction
        );

        self.generate(&prompt, Some(&system_prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::provider::Role;

    struct RecordingProvider {
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl RecordingProvider {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn complete(
            &self,
            messages: Vec<Message>,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(messages);
            Ok("ok".into())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn client() -> (LlmClient, std::sync::Arc<RecordingProvider>) {
        // Keep a second handle to inspect recorded calls after the client
        // takes ownership of the boxed trait object.
        struct Shared(std::sync::Arc<RecordingProvider>);

        #[async_trait]
        impl LlmProvider for Shared {
            async fn complete(
                &self,
                messages: Vec<Message>,
                temperature: f32,
                max_tokens: u32,
            ) -> Result<String, LlmError> {
                self.0.complete(messages, temperature, max_tokens).await
            }

            fn name(&self) -> &str {
                self.0.name()
            }
        }

        let inner = std::sync::Arc::new(RecordingProvider::new());
        let client = LlmClient::new(Box::new(Shared(inner.clone())), 0.3, 4000);
        (client, inner)
    }

    #[tokio::test]
    async fn generate_without_system_prompt_sends_one_message() {
        let (client, recorder) = client();
        client.generate("hello", None).await.unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].len(), 1);
        assert!(matches!(calls[0][0].role, Role::User));
        assert_eq!(calls[0][0].content, "hello");
    }

    #[tokio::test]
    async fn context_call_composes_analyst_system_prompt_with_style() {
        let (client, recorder) = client();
        client
            .generate_with_context("the content", "summarize it", Some("Casual Tone"))
            .await
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        let messages = &calls[0];
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0].role, Role::System));
        assert!(messages[0].content.contains("expert content analyst"));
        assert!(messages[0].content.contains("Casual Tone style"));
        assert!(messages[1].content.contains("Content:\nthe content"));
        assert!(messages[1].content.contains("Task:\nsummarize it"));
    }

    #[tokio::test]
    async fn empty_style_adds_no_directive() {
        let (client, recorder) = client();
        client
            .generate_with_context("ctx", "task", Some(""))
            .await
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0][0].content, ANALYST_SYSTEM_PROMPT);
    }
}
