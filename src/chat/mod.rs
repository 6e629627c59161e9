use std::future::Future;
use std::time::Duration;

pub mod gemini;

const SUMMARIZE_PROMPT: &str =
    "Please provide a concise summary of this text, highlighting the main points:";
const ANSWER_PROMPT: &str =
    "Using the following document as context, please answer this question:";

/// Builds the per-chunk summarization prompt.
pub fn summarize_prompt(text: &str) -> String {
    format!("{}\n\nText:\n{}", SUMMARIZE_PROMPT, text)
}

/// Builds the per-chunk question-answering prompt.
pub fn answer_prompt(question: &str, text: &str) -> String {
    format!(
        "{} {}\n\nDocument context: {}",
        ANSWER_PROMPT, question, text
    )
}

/// Fixed-count retry with a fixed delay between attempts. Every failure is
/// retried the same way; the last error is returned once attempts run out.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let mut last_err = None;
        for attempt in 1..=self.max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    log::warn!("attempt {}/{} failed: {}", attempt, self.max_attempts, err);
                    last_err = Some(err);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("no attempts were made")))
    }
}
