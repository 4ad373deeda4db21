use super::*;

pub(super) async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> Result<()> {
    let user_id = q.from.id.0;
    if !state.is_authorized(user_id) {
        warn!("unauthorized user {} pressed a button", user_id);
        bot.answer_callback_query(q.id)
            .text("Unauthorized user.")
            .await?;
        return Ok(());
    }

    let Some(message) = q.message.clone() else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };
    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    // The page indicator is a dead button; it still gets acknowledged so
    // the client's loading spinner clears.
    if data == "noop" {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    }

    let chat_id = message.chat.id;
    let root = state.config.archive_dir.clone();

    let mut session = {
        let mut sessions = state.sessions.lock().await;
        sessions.remove(&chat_id.0).unwrap_or_else(Session::new)
    };

    if session.expire_or_touch(state.session_ttl()) {
        let view = navigation::render_stage(&root, &session, Some("Session expired, starting over."));
        let page = session.page;
        state.sessions.lock().await.insert(chat_id.0, session);
        if let Err(err) = helpers::edit_stage(&bot, chat_id, message.id, &view, page).await {
            warn!("failed to refresh expired keyboard: {:#}", err);
        }
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    }

    let view = if data == "back" {
        navigation::step_back(&mut session);
        navigation::render_stage(&root, &session, None)
    } else if let Some(page) = data.strip_prefix("page:").and_then(|p| p.parse::<usize>().ok()) {
        let view = navigation::render_stage(&root, &session, None);
        let pages = keyboard::total_pages(view.items.len());
        session.page = page.min(pages.saturating_sub(1));
        view
    } else {
        match navigation::step(&root, &mut session, &data) {
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
                let view = navigation::render_stage(&root, &session, None);
                let page = session.page;
                state.sessions.lock().await.insert(chat_id.0, session);
                bot.answer_callback_query(q.id).await?;
                helpers::send_archived_log(&bot, chat_id, &path).await?;
                return helpers::send_stage(&bot, chat_id, &view, page).await;
            }
        }
    };

    let page = session.page;
    state.sessions.lock().await.insert(chat_id.0, session);
    // Pagination and stage changes rewrite the keyboard in place. An edit
    // can fail when the content is unchanged (e.g. clamped page); that must
    // not swallow the callback acknowledgement.
    if let Err(err) = helpers::edit_stage(&bot, chat_id, message.id, &view, page).await {
        warn!("failed to edit keyboard message: {:#}", err);
    }
    bot.answer_callback_query(q.id).await?;
    Ok(())
}
