use super::*;

#[derive(Debug)]
pub(super) enum StepOutcome {
    /// Selection matched; the session moved to the next stage.
    Advanced,
    /// Input did not match any listed option; stage unchanged.
    Invalid,
    /// Day selection resolved to a file; the session has been reset to the
    /// year stage.
    SendLog(PathBuf),
    /// Day was listed but the file is gone; stage unchanged.
    LogMissing,
}

pub(super) struct StageView {
    pub text: String,
    pub items: Vec<KeyboardItem>,
    pub item_type: &'static str,
}

/// Accepts raw numeric text ("3", "03") and button payloads ("month:03");
/// both normalize to the same numeric code.
pub(super) fn selection_value(input: &str) -> &str {
    match input.split_once(':') {
        Some((_, value)) => value,
        None => input,
    }
}

pub(super) fn normalize_code(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Evaluate one selection against the session's current stage. Listings are
/// read from disk at the moment of use.
pub(super) fn step(root: &Path, session: &mut Session, input: &str) -> StepOutcome {
    let code = normalize_code(selection_value(input));

    match session.stage {
        Stage::Year => {
            let years = archive::list_years(root);
            let matched = code.and_then(|code| {
                years
                    .iter()
                    .find(|year| year.parse::<u32>().ok() == Some(code))
                    .cloned()
            });
            match matched {
                Some(year) => {
                    session.year = Some(year);
                    session.month = None;
                    session.stage = Stage::Month;
                    session.page = 0;
                    StepOutcome::Advanced
                }
                None => StepOutcome::Invalid,
            }
        }
        Stage::Month => {
            let year = match session.year.clone() {
                Some(year) => year,
                None => {
                    session.reset();
                    return StepOutcome::Invalid;
                }
            };
            let months = archive::list_months(root, &year);
            match code.filter(|code| months.iter().any(|month| month.code == *code)) {
                Some(code) => {
                    session.month = Some(code);
                    session.stage = Stage::Day;
                    session.page = 0;
                    StepOutcome::Advanced
                }
                None => StepOutcome::Invalid,
            }
        }
        Stage::Day => {
            let (year, month) = match (session.year.clone(), session.month) {
                (Some(year), Some(month)) => (year, month),
                _ => {
                    session.reset();
                    return StepOutcome::Invalid;
                }
            };
            let days = archive::list_days(root, &year, month);
            match code.filter(|day| days.iter().any(|entry| entry.code == *day)) {
                Some(day) => match archive::resolve_day_path(root, &year, month, day) {
                    Some(path) => {
                        session.reset();
                        StepOutcome::SendLog(path)
                    }
                    None => StepOutcome::LogMissing,
                },
                None => StepOutcome::Invalid,
            }
        }
    }
}

/// Move one stage back; the year stage has no further back target.
pub(super) fn step_back(session: &mut Session) {
    match session.stage {
        Stage::Year => {}
        Stage::Month => {
            session.stage = Stage::Year;
            session.year = None;
            session.month = None;
        }
        Stage::Day => {
            session.stage = Stage::Month;
            session.month = None;
        }
    }
    session.page = 0;
}

/// Render the prompt text and option list for the session's current stage.
/// `note` is prepended for invalid-selection and expiry messages.
pub(super) fn render_stage(root: &Path, session: &Session, note: Option<&str>) -> StageView {
    let view = match session.stage {
        Stage::Year => {
            let years = archive::list_years(root);
            let text = if years.is_empty() {
                "No logs available.".to_string()
            } else {
                "Select a year:".to_string()
            };
            StageView {
                text,
                items: years
                    .into_iter()
                    .map(|year| KeyboardItem {
                        label: year.clone(),
                        value: year,
                    })
                    .collect(),
                item_type: "year",
            }
        }
        Stage::Month => {
            let year = session.year.clone().unwrap_or_default();
            let months = archive::list_months(root, &year);
            let text = if months.is_empty() {
                format!("No months archived for {}.", year)
            } else {
                format!("Select a month of {}:", year)
            };
            StageView {
                text,
                items: months
                    .into_iter()
                    .map(|month| KeyboardItem {
                        label: format!("{} ({:02})", month.label, month.code),
                        value: format!("{:02}", month.code),
                    })
                    .collect(),
                item_type: "month",
            }
        }
        Stage::Day => {
            let year = session.year.clone().unwrap_or_default();
            let month = session.month.unwrap_or_default();
            let days = archive::list_days(root, &year, month);
            let text = if days.is_empty() {
                format!("No days archived for {:02}/{}.", month, year)
            } else {
                format!("Select a day of {:02}/{}:", month, year)
            };
            StageView {
                text,
                items: days
                    .into_iter()
                    .map(|day| KeyboardItem {
                        label: format!("{}  {:02}", day.label, day.code),
                        value: format!("{:02}", day.code),
                    })
                    .collect(),
                item_type: "day",
            }
        }
    };

    match note {
        Some(note) => StageView {
            text: format!("{}\n{}", note, view.text),
            ..view
        },
        None => view,
    }
}

pub(super) fn invalid_note(stage: Stage) -> &'static str {
    match stage {
        Stage::Year => "Invalid year.",
        Stage::Month => "Invalid month.",
        Stage::Day => "Invalid day.",
    }
}
