use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::RetryPolicy;
use crate::error::BotError;
use crate::Config;

/// Client for the Gemini generateContent endpoint. Each call is a single
/// synchronous request; the retry policy wraps every network failure the
/// same way without distinguishing failure kinds.
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    url: String,
    retry: RetryPolicy,
}

impl ChatClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            url: config.gemini_url.clone(),
            retry: RetryPolicy::new(
                config.max_retries,
                Duration::from_secs(config.retry_delay_secs),
            ),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, BotError> {
        self.retry
            .run(|| self.request(prompt))
            .await
            .map_err(|err| BotError::Generation {
                attempts: self.retry.max_attempts,
                message: err.to_string(),
            })
    }

    async fn request(&self, prompt: &str) -> anyhow::Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        let endpoint = format!(
            "{}/models/{}:generateContent?key={}",
            self.url, self.model, self.api_key
        );
        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .with_context(|| "Failed to send request to Gemini API")?;

        if response.status() != 200 {
            return Err(anyhow::anyhow!(
                "Gemini request failed:\n\tstatus: {}\n\tbody: {}",
                response.status(),
                response.text().await?
            ));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Gemini API response")?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| anyhow::anyhow!("Gemini response contained no candidates"))?;

        Ok(text)
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    text: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() -> anyhow::Result<()> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
        };
        let json = serde_json::to_value(&request)?;
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        Ok(())
    }

    #[test]
    fn test_response_deserialization() -> anyhow::Result<()> {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"generated"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json)?;
        assert_eq!(response.candidates[0].content.parts[0].text, "generated");
        Ok(())
    }
}
