//! OpenRouter chat-completions client.
//!
//! One request per generation; transient failures go through [`with_retry`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::generator::{Generator, Prompt};
use crate::actor::{RetryPolicy, with_retry};
use crate::error::{MailError, MailResult};

const ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter API client for chat completions
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            retry: RetryPolicy::default(),
        }
    }

    /// Send one chat completion request
    async fn complete(&self, prompt: &Prompt) -> MailResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
        };

        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::transient(format!("OpenRouter request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| MailError::transient(format!("Failed to parse OpenRouter response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| MailError::transient("No response content from AI"))
    }
}

/// Rate limits and server errors are transient; anything else is a bad request
fn classify_failure(status: StatusCode, body: &str) -> MailError {
    let msg = format!("OpenRouter API error ({}): {}", status, body.trim());
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        MailError::Transient(msg)
    } else {
        MailError::Invalid(msg)
    }
}

#[async_trait]
impl Generator for OpenRouterClient {
    async fn generate(&self, prompt: Prompt) -> MailResult<String> {
        with_retry(&self.retry, || self.complete(&prompt)).await
    }
}
