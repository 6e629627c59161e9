use dotenv::dotenv;
use serde::{Deserialize, Serialize};

mod chat;
mod document;
mod error;
mod handler;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();
    let config = read_config()?;
    handler::run_bot(config).await?;
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    // Secrets, required at startup
    telegram_bot_token: String,
    gemini_api_key: String,

    // Generation
    #[serde(default = "default_gemini_url")]
    gemini_url: String,
    #[serde(default = "default_gemini_model")]
    gemini_model: String,
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    #[serde(default = "default_retry_delay_secs")]
    retry_delay_secs: u64,

    // Extraction
    #[serde(default = "default_max_file_size")]
    max_file_size: u32,
    #[serde(default = "default_max_text_length")]
    max_text_length: usize,
    #[serde(default = "default_max_pdf_pages")]
    max_pdf_pages: usize,
    #[serde(default = "default_max_docx_paragraphs")]
    max_docx_paragraphs: usize,

    // Chunking and delivery
    #[serde(default = "default_prompt_chunk_size")]
    prompt_chunk_size: usize,
    #[serde(default = "default_reply_chunk_size")]
    reply_chunk_size: usize,
    #[serde(default = "default_reply_delay_ms")]
    reply_delay_ms: u64,

    // Sessions
    #[serde(default = "default_initial_credits")]
    initial_credits: u32,

    // Filesystem
    #[serde(default = "default_download_dir")]
    download_dir: String,
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-pro".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    1
}

fn default_max_file_size() -> u32 {
    5 * 1024 * 1024
}

fn default_max_text_length() -> usize {
    8000
}

fn default_max_pdf_pages() -> usize {
    20
}

fn default_max_docx_paragraphs() -> usize {
    30
}

fn default_prompt_chunk_size() -> usize {
    3000
}

fn default_reply_chunk_size() -> usize {
    3000
}

fn default_reply_delay_ms() -> u64 {
    300
}

fn default_initial_credits() -> u32 {
    5
}

fn default_download_dir() -> String {
    "downloads".to_string()
}

fn read_config() -> anyhow::Result<Config> {
    Ok(config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::default())
        .build()?
        .try_deserialize::<Config>()?)
}
