use super::*;

pub(super) fn total_pages(count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (count + PAGE_SIZE - 1) / PAGE_SIZE
    }
}

pub(super) fn page_slice(items: &[KeyboardItem], page: usize) -> &[KeyboardItem] {
    let start = page * PAGE_SIZE;
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Paginated button grid: one button per item on the current page, a
/// navigation row (prev / page indicator / next, each only when it applies)
/// and a final Back row. Pure so the same keyboard can be regenerated after
/// a session reset.
pub(super) fn build_keyboard(
    items: &[KeyboardItem],
    page: usize,
    item_type: &str,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    for item in page_slice(items, page) {
        rows.push(vec![InlineKeyboardButton::callback(
            item.label.clone(),
            format!("{}:{}", item_type, item.value),
        )]);
    }

    let pages = total_pages(items.len());
    let mut nav = Vec::new();
    if page > 0 {
        nav.push(InlineKeyboardButton::callback(
            "« Prev",
            format!("page:{}", page - 1),
        ));
    }
    if pages > 1 {
        nav.push(InlineKeyboardButton::callback(
            format!("{}/{}", page + 1, pages),
            "noop".to_string(),
        ));
    }
    if page + 1 < pages {
        nav.push(InlineKeyboardButton::callback(
            "Next »",
            format!("page:{}", page + 1),
        ));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }

    rows.push(vec![InlineKeyboardButton::callback(
        "Back",
        "back".to_string(),
    )]);
    InlineKeyboardMarkup::new(rows)
}
