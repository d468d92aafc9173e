use serde_json::{json, Value as JsonValue};
use thiserror::Error;

/// Failures of the external generative-text service. Distinct from pipeline
/// failures: the report worker degrades on these, while the free-standing
/// insight endpoints surface them to the caller.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("generative service is not configured")]
    Disabled,

    #[error("generative request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generative service returned status {0}")]
    Status(u16),

    #[error("generative response contained no text")]
    EmptyResponse,
}

/// Thin client for a Gemini-style `generateContent` endpoint. No schema is
/// enforced upstream; callers must defensively parse whatever text comes back.
#[derive(Clone)]
pub struct GenerativeClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GenerativeClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: std::time::Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url,
        })
    }

    /// One generation call, bounded by the client timeout. Tries the v1beta
    /// API first and falls back to v1 when the model is not found there.
    pub async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let base = self.base_url.trim_end_matches('/');
        let endpoints = [
            format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                base, self.model, self.api_key
            ),
            format!(
                "{}/v1/models/{}:generateContent?key={}",
                base, self.model, self.api_key
            ),
        ];

        let body = build_request(prompt);
        let mut last_status = 0u16;

        for endpoint in &endpoints {
            let resp = self.client.post(endpoint).json(&body).send().await?;
            let status = resp.status();
            if !status.is_success() {
                last_status = status.as_u16();
                if status.as_u16() == 404 {
                    continue;
                }
                let detail = resp.text().await.unwrap_or_default();
                tracing::warn!("generative http {}: {}", status, detail);
                return Err(InsightError::Status(status.as_u16()));
            }

            let v: JsonValue = resp.json().await.unwrap_or(JsonValue::Null);
            return extract_text(&v).ok_or(InsightError::EmptyResponse);
        }

        Err(InsightError::Status(last_status))
    }
}

fn build_request(prompt: &str) -> JsonValue {
    json!({
        "generationConfig": { "response_mime_type": "application/json" },
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }]
    })
}

fn extract_text(v: &JsonValue) -> Option<String> {
    let candidates = v.get("candidates")?.as_array()?;
    let first = candidates.first()?;
    let parts = first.get("content")?.get("parts")?.as_array()?;
    for p in parts {
        if let Some(t) = p.get("text").and_then(|x| x.as_str()) {
            return Some(t.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_candidates() {
        let v = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"inline_data": {"mime_type": "image/png"}},
                        {"text": "{\"riskAssessment\": \"low\"}"}
                    ]
                }
            }]
        });
        assert_eq!(
            extract_text(&v).as_deref(),
            Some("{\"riskAssessment\": \"low\"}")
        );
    }

    #[test]
    fn test_extract_text_handles_malformed_shapes() {
        assert_eq!(extract_text(&JsonValue::Null), None);
        assert_eq!(extract_text(&json!({"candidates": []})), None);
        assert_eq!(
            extract_text(&json!({"candidates": [{"content": {"parts": []}}]})),
            None
        );
    }

    #[test]
    fn test_request_asks_for_json() {
        let body = build_request("describe the farm");
        assert_eq!(
            body["generationConfig"]["response_mime_type"],
            "application/json"
        );
        assert_eq!(body["contents"][0]["parts"][0]["text"], "describe the farm");
    }
}
