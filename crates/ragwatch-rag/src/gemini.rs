//! Google Gemini REST client.
//!
//! One client serves both boundaries the session needs:
//! - `LlmClient` via `models/{model}:generateContent`
//! - `Embedder` via `{embedding_model}:batchEmbedContents`
//!
//! Auth is the `?key=API_KEY` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use ragwatch_core::{EvalError, LlmClient, LlmReply, SessionConfig, API_KEY_ENV};

use crate::embedder::Embedder;
use crate::error::{RagError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// `batchEmbedContents` rejects batches with more requests than this.
pub const MAX_EMBED_BATCH: usize = 100;

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    embedding_model: String,
    temperature: f32,
}

impl GeminiClient {
    /// Build a client, reading the key from `GOOGLE_API_KEY`.
    pub fn from_env(config: &SessionConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RagError::MissingApiKey(API_KEY_ENV.to_string()))?;
        Self::with_key(config, api_key)
    }

    pub fn with_key(config: &SessionConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            embedding_model: qualified_model(&config.embedding_model),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint_url(&self, model_path: &str, method: &str) -> String {
        format!(
            "{}/{}:{}?key={}",
            self.base_url, model_path, method, self.api_key
        )
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(RagError::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint_url(&qualified_model(&self.model), "generateContent");
        debug!(model = %self.model, prompt_chars = prompt.len(), "sending generateContent request");

        let body = generate_body(prompt, self.temperature);
        let response = self.post(&url, &body).await?;
        parse_generate_response(&response)
    }

    /// One `batchEmbedContents` call; `texts` must fit in a single batch.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = self.endpoint_url(&self.embedding_model, "batchEmbedContents");
        debug!(model = %self.embedding_model, texts = texts.len(), "sending batchEmbedContents request");

        let body = embed_body(&self.embedding_model, texts);
        let response = self.post(&url, &body).await?;
        let vectors = parse_embed_response(&response)?;
        if vectors.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "requested {} embeddings, received {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn invoke(&self, prompt: &str) -> ragwatch_core::Result<LlmReply> {
        self.generate(prompt)
            .await
            .map(LlmReply::new)
            .map_err(|e| EvalError::Llm(e.to_string()))
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in embed_batches(texts) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        if vectors.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "embedded {} of {} chunks",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| RagError::Embedding("no embedding returned for query".to_string()))
    }
}

/// `gemini-1.5-flash` and `models/gemini-1.5-flash` both resolve to the latter.
fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn generate_body(prompt: &str, temperature: f32) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": { "temperature": temperature }
    })
}

/// Consecutive slices of at most `MAX_EMBED_BATCH` texts, in input order.
fn embed_batches(texts: &[String]) -> std::slice::Chunks<'_, String> {
    texts.chunks(MAX_EMBED_BATCH)
}

fn embed_body(model: &str, texts: &[String]) -> Value {
    let requests: Vec<Value> = texts
        .iter()
        .map(|text| {
            json!({
                "model": model,
                "content": { "parts": [{ "text": text }] }
            })
        })
        .collect();
    json!({ "requests": requests })
}

fn parse_generate_response(body: &Value) -> Result<String> {
    let candidate = body["candidates"]
        .as_array()
        .and_then(|c| c.first())
        .ok_or_else(|| RagError::ResponseParse("missing 'candidates' in response".to_string()))?;

    let parts = candidate["content"]["parts"].as_array().ok_or_else(|| {
        RagError::ResponseParse("missing 'parts' in candidate content".to_string())
    })?;

    Ok(parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(""))
}

fn parse_embed_response(body: &Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = body["embeddings"]
        .as_array()
        .ok_or_else(|| RagError::ResponseParse("missing 'embeddings' in response".to_string()))?;

    embeddings
        .iter()
        .map(|embedding| -> Result<Vec<f32>> {
            embedding["values"]
                .as_array()
                .ok_or_else(|| RagError::ResponseParse("embedding without 'values'".to_string()))?
                .iter()
                .map(|v| {
                    v.as_f64().map(|f| f as f32).ok_or_else(|| {
                        RagError::ResponseParse("non-numeric embedding value".to_string())
                    })
                })
                .collect()
        })
        .collect()
}
