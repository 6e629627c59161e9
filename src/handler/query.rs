use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::ChatAction;

use super::{messages, user_message, BotState};
use crate::chat::{answer_prompt, summarize_prompt};
use crate::document::chunk::{chunk_text, split_for_delivery};
use crate::document::truncate_chars;

pub async fn handle_query(
    bot: &Bot,
    msg: &Message,
    state: &BotState,
    user_id: i64,
    text: &str,
) -> anyhow::Result<()> {
    let session = match state.sessions.get(user_id).await {
        Some(session) => session,
        None => {
            log::debug!("Ignoring message from {} with no session", user_id);
            return Ok(());
        }
    };

    // Depleted balance blocks the pipeline before any generation happens.
    if session.credits == 0 {
        bot.send_message(msg.chat.id, messages::NO_CREDITS).await?;
        return Ok(());
    }

    let document = match session.document {
        Some(document) => document,
        None => {
            bot.send_message(msg.chat.id, messages::NO_DOC).await?;
            return Ok(());
        }
    };

    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    let document = truncate_chars(&document, state.config.max_text_length);
    let chunks = chunk_text(document, state.config.prompt_chunk_size);
    let summarize = text.eq_ignore_ascii_case("summarize");

    let mut responses = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let prompt = if summarize {
            summarize_prompt(&chunk.content)
        } else {
            answer_prompt(text, &chunk.content)
        };
        match state.chat.generate(&prompt).await {
            Ok(response) => responses.push(response),
            Err(err) => {
                // One error reply, nothing partial sent, no credit taken.
                log::error!("Generation failed for {}: {}", user_id, err);
                bot.send_message(msg.chat.id, user_message(&err.into()))
                    .await?;
                return Ok(());
            }
        }
    }

    let combined = responses.join(" ");
    for piece in split_for_delivery(&combined, state.config.reply_chunk_size) {
        bot.send_message(msg.chat.id, piece).await?;
        tokio::time::sleep(Duration::from_millis(state.config.reply_delay_ms)).await;
    }

    match state.sessions.deduct_credit(user_id).await {
        Ok(remaining) => {
            bot.send_message(
                msg.chat.id,
                messages::CREDIT_DEDUCTED.replace("{credits}", &remaining.to_string()),
            )
            .await?;
            if remaining == 0 {
                bot.send_message(msg.chat.id, messages::NO_CREDITS).await?;
            }
        }
        Err(err) => {
            log::error!("Credit deduction failed for {}: {}", user_id, err);
            bot.send_message(msg.chat.id, messages::NO_CREDITS).await?;
            return Ok(());
        }
    }

    bot.send_message(msg.chat.id, messages::ASK_MORE).await?;

    Ok(())
}
