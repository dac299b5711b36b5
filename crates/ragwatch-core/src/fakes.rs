//! In-memory fakes for collaborator traits (testing only)
//!
//! Provides `ScriptedLlm`, `FailingLlm`, `StaticAnswerer`, and
//! `FailingAnswerer` that satisfy the trait contracts without any network
//! access.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::collaborators::{Answerer, LlmClient, LlmReply};
use crate::domain::{EvalError, Result};

// ---------------------------------------------------------------------------
// ScriptedLlm
// ---------------------------------------------------------------------------

/// Judge that replays scripted replies in order and records every prompt.
///
/// Once the script is exhausted it returns the repeat reply if one was set,
/// otherwise `EvalError::Llm`.
#[derive(Debug, Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    repeat: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            repeat: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A judge that answers every prompt with the same reply.
    pub fn repeating(reply: impl Into<String>) -> Self {
        Self {
            repeat: Some(reply.into()),
            ..Self::default()
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn invoke(&self, prompt: &str) -> Result<LlmReply> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        match next.or_else(|| self.repeat.clone()) {
            Some(content) => Ok(LlmReply::new(content)),
            None => Err(EvalError::Llm("script exhausted".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FailingLlm
// ---------------------------------------------------------------------------

/// Judge whose every call fails.
#[derive(Debug, Clone)]
pub struct FailingLlm {
    message: String,
}

impl FailingLlm {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LlmClient for FailingLlm {
    async fn invoke(&self, _prompt: &str) -> Result<LlmReply> {
        Err(EvalError::Llm(self.message.clone()))
    }
}

// ---------------------------------------------------------------------------
// StaticAnswerer
// ---------------------------------------------------------------------------

/// Answerer returning a fixed answer, optionally after a simulated delay.
///
/// The delay uses `tokio::time::sleep`, so tests running with paused time
/// observe exact response times.
#[derive(Debug, Default)]
pub struct StaticAnswerer {
    answer: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticAnswerer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times `answer` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Answerer for StaticAnswerer {
    async fn answer(&self, _query: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.answer.clone())
    }
}

// ---------------------------------------------------------------------------
// FailingAnswerer
// ---------------------------------------------------------------------------

/// Answerer whose every call fails.
#[derive(Debug, Clone)]
pub struct FailingAnswerer {
    message: String,
}

impl FailingAnswerer {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Answerer for FailingAnswerer {
    async fn answer(&self, _query: &str) -> Result<String> {
        Err(EvalError::Answering(self.message.clone()))
    }
}
