use super::*;

pub(super) async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let user_id = match msg.from() {
        Some(user) => user.id.0,
        None => return Ok(()),
    };
    let text = match msg.text() {
        Some(text) => text.trim().to_string(),
        None => return Ok(()),
    };
    if text.is_empty() {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    if !state.is_authorized(user_id) {
        warn!("unauthorized user {} sent a message", user_id);
        bot.send_message(chat_id, "Unauthorized user.").await?;
        return Ok(());
    }

    if let Some(cmd) = helpers::parse_command(&text) {
        return handle_command(&bot, chat_id, &state, cmd).await;
    }

    let root = state.config.archive_dir.clone();

    // Take the session out of the map for the duration of the call, like a
    // single-threaded actor per chat; no lock is held across sends.
    let mut session = {
        let mut sessions = state.sessions.lock().await;
        sessions.remove(&chat_id.0).unwrap_or_else(Session::new)
    };

    // A stale session is reset and the caller re-prompted; the stale input
    // is discarded rather than evaluated against the old stage.
    if session.expire_or_touch(state.session_ttl()) {
        let view = navigation::render_stage(&root, &session, Some("Session expired, starting over."));
        let page = session.page;
        state.sessions.lock().await.insert(chat_id.0, session);
        return helpers::send_stage(&bot, chat_id, &view, page).await;
    }

    let view = match text.to_lowercase().as_str() {
        "back" => {
            navigation::step_back(&mut session);
            navigation::render_stage(&root, &session, None)
        }
        direction @ ("next" | "prev") => {
            let view = navigation::render_stage(&root, &session, None);
            let pages = keyboard::total_pages(view.items.len());
            session.page = if direction == "next" {
                (session.page + 1).min(pages.saturating_sub(1))
            } else {
                session.page.saturating_sub(1)
            };
            view
        }
        _ => match navigation::step(&root, &mut session, &text) {
            navigation::StepOutcome::Advanced => navigation::render_stage(&root, &session, None),
            navigation::StepOutcome::Invalid => {
                navigation::render_stage(&root, &session, Some(navigation::invalid_note(session.stage)))
            }
            navigation::StepOutcome::LogMissing => navigation::render_stage(
                &root,
                &session,
                Some("Log not found for the specified date."),
            ),
            navigation::StepOutcome::SendLog(path) => {
                // Session is already back at the year stage.
                let view = navigation::render_stage(&root, &session, None);
                let page = session.page;
                state.sessions.lock().await.insert(chat_id.0, session);
                helpers::send_archived_log(&bot, chat_id, &path).await?;
                return helpers::send_stage(&bot, chat_id, &view, page).await;
            }
        },
    };

    let page = session.page;
    state.sessions.lock().await.insert(chat_id.0, session);
    helpers::send_stage(&bot, chat_id, &view, page).await
}

async fn handle_command(
    bot: &Bot,
    chat_id: ChatId,
    state: &Arc<AppState>,
    cmd: &str,
) -> Result<()> {
    match cmd {
        "start" => {
            bot.send_message(chat_id, "Welcome! Use /getlog to request logs.")
                .await?;
        }
        "help" => {
            bot.send_message(chat_id, helpers::help_text()).await?;
        }
        "latest" => {
            helpers::send_latest_log(bot, chat_id, state).await?;
        }
        "getlog" => {
            info!("chat {} started log retrieval", chat_id);
            let session = Session::new();
            let root = state.config.archive_dir.clone();
            let view = navigation::render_stage(&root, &session, None);
            let page = session.page;
            state.sessions.lock().await.insert(chat_id.0, session);
            helpers::send_stage(bot, chat_id, &view, page).await?;
        }
        _ => {
            bot.send_message(chat_id, "Unknown command. Use /help.")
                .await?;
        }
    }
    Ok(())
}
