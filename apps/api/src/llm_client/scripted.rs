use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{CompletionClient, LlmError};

/// Test `CompletionClient` that replays a fixed reply and records every call.
pub struct ScriptedCompletion {
    reply: Result<String, u16>,
    calls: Mutex<Vec<(String, f32)>>,
}

impl ScriptedCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with an API error carrying `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Prompt and temperature of the most recent call.
    pub fn last_call(&self) -> Option<(String, f32)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Api {
                status: *status,
                message: "upstream unavailable".to_string(),
            }),
        }
    }
}
