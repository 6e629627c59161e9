use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;

use crate::chat::gemini::ChatClient;
use crate::error::BotError;
use crate::session::{InMemorySessionStore, SessionStore};
use crate::Config;

mod document;
mod query;

/// Fixed user-visible replies, one per situation.
pub mod messages {
    pub const WELCOME: &str = "Welcome {name}!\nI'm your document assistant. Send me any PDF or Word document and I'll help you understand it better.";
    pub const ERROR: &str = "Sorry, there was an error processing your document.";
    pub const UNSUPPORTED: &str = "Please send a PDF or Word document.";
    pub const DOWNLOADING: &str = "Downloading document...";
    pub const EXTRACTING: &str = "Extracting text...";
    pub const DOC_READY: &str = "Document is ready! You can:\n1. Type 'summarize' to get a summary\n2. Ask any specific questions about the document\n3. Send another document";
    pub const FILE_TOO_LARGE: &str =
        "File is too large. Please send a document smaller than 5MB.";
    pub const EMPTY_DOCUMENT: &str = "The document appears to be empty or unreadable.";
    pub const HELP: &str = "I can help you understand documents better!\n\nCommands:\n/help - Show this help message\n\nAfter sending a document, you can:\n- Type 'summarize' to get a summary\n- Ask any questions about it\n- Send another document to analyze";
    pub const NO_DOC: &str = "Please send a document first before asking questions.";
    pub const ASK_MORE: &str = "Would you like to know something else about this document? You can:\n1. Ask another question\n2. Type 'summarize' for a summary\n3. Send a new document\n4. Use /help for all commands";
    pub const CREDITS_REMAINING: &str = "Credits remaining: {credits}";
    pub const NO_CREDITS: &str =
        "You've run out of credits! Use /subscribe to get more credits.";
    pub const NEW_USER_CREDITS: &str = "Welcome gift: 5 free credits!";
    pub const CREDIT_DEDUCTED: &str = "1 credit used. {credits} credits remaining.";
    pub const SUBSCRIPTION_INFO: &str = "Premium Access Plans:\n1. Basic Pack - $9.99 (100 credits)\n2. Pro Pack - $24.99 (300 credits)\n3. Unlimited Pack - $99.99 (1500 credits)\n\nContact support to purchase credits.";
}

/// Everything the handlers need, injected through dptree.
pub struct BotState {
    pub config: Config,
    pub chat: ChatClient,
    pub sessions: Arc<dyn SessionStore>,
}

pub async fn run_bot(config: Config) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.download_dir).await?;

    let bot = Bot::new(&config.telegram_bot_token);
    let state = Arc::new(BotState {
        chat: ChatClient::from_config(&config),
        sessions: Arc::new(InMemorySessionStore::new(config.initial_credits)),
        config,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    log::info!("Bot is starting up...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            log::debug!("Unhandled update: {:?}", upd);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in message handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> anyhow::Result<()> {
    let user = match msg.from.as_ref() {
        Some(user) => user,
        None => return Ok(()),
    };
    let user_id = user.id.0 as i64;
    let first_name = user.first_name.clone();

    if let Some(doc) = msg.document() {
        return document::handle_upload(&bot, &msg, &state, doc, user_id).await;
    }

    if let Some(text) = msg.text() {
        match text.trim() {
            "/start" => return handle_start(&bot, &msg, &state, user_id, &first_name).await,
            "/help" => {
                state.sessions.create_if_absent(user_id).await;
                bot.send_message(msg.chat.id, messages::HELP).await?;
                return Ok(());
            }
            "/subscribe" => {
                state.sessions.create_if_absent(user_id).await;
                bot.send_message(msg.chat.id, messages::SUBSCRIPTION_INFO)
                    .await?;
                return Ok(());
            }
            other if other.starts_with('/') => {
                log::debug!("Ignoring unknown command from {}: {}", user_id, other);
                return Ok(());
            }
            other => return query::handle_query(&bot, &msg, &state, user_id, other).await,
        }
    }

    Ok(())
}

async fn handle_start(
    bot: &Bot,
    msg: &Message,
    state: &BotState,
    user_id: i64,
    first_name: &str,
) -> anyhow::Result<()> {
    let (session, created) = state.sessions.create_if_absent(user_id).await;

    bot.send_message(msg.chat.id, messages::WELCOME.replace("{name}", first_name))
        .await?;

    if created {
        bot.send_message(msg.chat.id, messages::NEW_USER_CREDITS)
            .await?;
        bot.send_message(
            msg.chat.id,
            messages::CREDITS_REMAINING.replace("{credits}", &session.credits.to_string()),
        )
        .await?;
    }

    Ok(())
}

/// Maps an error to the single fixed reply its category gets. Anything
/// outside the taxonomy collapses into the generic processing error.
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<BotError>() {
        Some(BotError::FileTooLarge(_)) => messages::FILE_TOO_LARGE.to_string(),
        Some(BotError::UnsupportedFormat(_)) => messages::UNSUPPORTED.to_string(),
        Some(BotError::Extraction(_)) => messages::ERROR.to_string(),
        Some(BotError::EmptyDocument) => messages::EMPTY_DOCUMENT.to_string(),
        Some(BotError::Generation { .. }) => messages::ERROR.to_string(),
        Some(BotError::NoCredits) => messages::NO_CREDITS.to_string(),
        None => messages::ERROR.to_string(),
    }
}
