//! OpenAI adapter (chat completions).
//!
//! Implements the language-model port for both uses the bot has: structured
//! intent classification (`json_mode`) and free-text response composition.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use cro_core::{
    config::Config,
    errors::Error,
    ports::{CompletionRequest, LanguageModelPort},
    Result,
};

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    api_key: String,
    api_url: String,
    model: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.openai_api_key.clone(),
            cfg.openai_api_url.clone(),
            cfg.openai_model.clone(),
            cfg.upstream_timeout,
        )
    }

    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::upstream("openai", format!("http client build: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            model: model.into(),
            http,
        })
    }
}

#[async_trait]
impl LanguageModelPort for OpenAiClient {
    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        let body = build_body(&self.model, &req);

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::upstream("openai", format!("request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(
                "openai",
                format!("{status} {}", body.chars().take(200).collect::<String>()),
            ));
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::upstream("openai", format!("json error: {e}")))?;

        extract_content(&v)
            .ok_or_else(|| Error::upstream("openai", "completion returned no content"))
    }
}

fn build_body(model: &str, req: &CompletionRequest) -> serde_json::Value {
    let mut body = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": req.system},
            {"role": "user", "content": req.user},
        ],
        "temperature": req.temperature,
    });
    if req.json_mode {
        body["response_format"] = json!({"type": "json_object"});
    }
    body
}

fn extract_content(v: &serde_json::Value) -> Option<String> {
    let text = v
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;
    if text.trim().is_empty() {
        return None;
    }
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json_mode: bool) -> CompletionRequest {
        CompletionRequest {
            system: "classify".to_string(),
            user: "btc price".to_string(),
            json_mode,
            temperature: 0.1,
        }
    }

    #[test]
    fn json_mode_sets_response_format() {
        let body = build_body("gpt-4-turbo", &request(true));
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "btc price");
    }

    #[test]
    fn free_text_mode_omits_response_format() {
        let body = build_body("gpt-4-turbo", &request(false));
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn content_extraction_handles_shapes() {
        let ok = serde_json::json!({
            "choices": [{"message": {"content": "hello"}}]
        });
        assert_eq!(extract_content(&ok), Some("hello".to_string()));

        let empty = serde_json::json!({
            "choices": [{"message": {"content": "  "}}]
        });
        assert_eq!(extract_content(&empty), None);

        assert_eq!(extract_content(&serde_json::json!({"choices": []})), None);
        assert_eq!(extract_content(&serde_json::json!({})), None);
    }
}
