//! Telegram front end on teloxide long polling.

use std::sync::Arc;

use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use eora_rag::Answerer;

pub const GREETING: &str =
    "👋 <b>Привет</b>Я — виртуальный помощник компании <b>EORA</b>. \n\nГотов ответить на ваши вопросы.";
pub const APOLOGY: &str = "Что-то пошло не так(";
/// Telegram rejects messages longer than this many characters.
pub const TELEGRAM_MAX_CHARS: usize = 4096;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    #[command(description = "приветствие")]
    Start,
}

/// Messages to send back for `question`. Errors and blank answers are
/// logged and replaced by a short apology.
pub async fn reply_text(answerer: &dyn Answerer, question: &str) -> Vec<String> {
    match answerer.ask(question).await {
        Ok(answer) if answer.trim().is_empty() => {
            warn!("model returned an empty answer");
            vec![APOLOGY.to_string()]
        }
        Ok(answer) => split_message(&answer, TELEGRAM_MAX_CHARS),
        Err(err) => {
            error!(error = %err, "failed to answer chat message");
            vec![APOLOGY.to_string()]
        }
    }
}

/// Split long messages at line boundaries. Lines longer than `max_chars` are
/// cut on character boundaries.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();
        if current_len + line_len + 1 > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if line_len > max_chars {
                let chars: Vec<char> = line.chars().collect();
                chunks.extend(chars.chunks(max_chars).map(|piece| piece.iter().collect::<String>()));
                continue;
            }
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

async fn greet(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, GREETING).parse_mode(ParseMode::Html).await?;
    Ok(())
}

async fn answer(bot: Bot, msg: Message, text: String, answerer: Arc<dyn Answerer>) -> ResponseResult<()> {
    if let Err(err) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        warn!(error = %err, "failed to send typing indicator");
    }
    // Plain text: model output is not guaranteed to be valid Markdown.
    for chunk in reply_text(answerer.as_ref(), &text).await {
        if let Err(err) = bot.send_message(msg.chat.id, chunk).await {
            error!(error = %err, "failed to deliver answer");
            bot.send_message(msg.chat.id, APOLOGY).await?;
            break;
        }
    }
    Ok(())
}

/// Runs the bot until interrupted.
pub async fn run_bot(token: String, answerer: Arc<dyn Answerer>) {
    let bot = Bot::new(token);
    let handler = Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(greet))
        .branch(Message::filter_text().endpoint(answer));

    info!("bot started");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![answerer])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
