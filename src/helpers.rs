use super::*;

pub(super) fn parse_command(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    let cmd = first.trim_start_matches('/');
    Some(cmd.split('@').next().unwrap_or(cmd))
}

pub(super) fn help_text() -> &'static str {
    "Commands:\n\
     /getlog - browse the archived daily logs\n\
     /latest - fetch the current live log\n\
     /help - show this message\n\
     While browsing you can also type a value, or back / next / prev."
}

pub(super) async fn send_stage(
    bot: &Bot,
    chat_id: ChatId,
    view: &navigation::StageView,
    page: usize,
) -> Result<()> {
    let kb = keyboard::build_keyboard(&view.items, page, view.item_type);
    bot.send_message(chat_id, view.text.clone())
        .reply_markup(kb)
        .await?;
    Ok(())
}

pub(super) async fn edit_stage(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    view: &navigation::StageView,
    page: usize,
) -> Result<()> {
    let kb = keyboard::build_keyboard(&view.items, page, view.item_type);
    bot.edit_message_text(chat_id, message_id, view.text.clone())
        .reply_markup(kb)
        .await?;
    Ok(())
}

/// Deliver an archived log file. A failed upload is reported to the chat and
/// the operator log; it never propagates.
pub(super) async fn send_archived_log(bot: &Bot, chat_id: ChatId, path: &Path) -> Result<()> {
    bot.send_message(chat_id, "Fetching the log...").await?;
    if let Err(err) = bot
        .send_document(chat_id, InputFile::file(path.to_path_buf()))
        .await
    {
        error!("failed to send log {}: {:#}", path.display(), err);
        bot.send_message(chat_id, "Failed to deliver the log file.")
            .await?;
    } else {
        info!("log {} sent to chat {}", path.display(), chat_id);
    }
    Ok(())
}

/// /latest bypasses navigation entirely and ships the live log as-is.
pub(super) async fn send_latest_log(bot: &Bot, chat_id: ChatId, state: &AppState) -> Result<()> {
    let path = &state.config.latest_log_path;
    if !path.is_file() {
        bot.send_message(chat_id, "No live log available yet.")
            .await?;
        return Ok(());
    }
    let caption = format!(
        "Live log as of {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    );
    if let Err(err) = bot
        .send_document(chat_id, InputFile::file(path.clone()))
        .caption(caption)
        .await
    {
        error!("failed to send live log {}: {:#}", path.display(), err);
        bot.send_message(chat_id, "Failed to deliver the log file.")
            .await?;
    }
    Ok(())
}
