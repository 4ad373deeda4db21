use super::*;

// Archive layout: <root>/<YYYY>/<MonthName>_<NN>/<DD>_<Weekday>.csv.
// Every listing re-reads the directory tree so files dropped in by the
// archiver at midnight are visible immediately. A missing directory at any
// level is an empty listing, not an error.

pub(super) fn list_years(root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut years: Vec<(u32, String)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let number = parse_numeric(&name)?;
            Some((number, name))
        })
        .collect();
    years.sort_by_key(|(number, _)| *number);
    years.into_iter().map(|(_, name)| name).collect()
}

pub(super) fn list_months(root: &Path, year: &str) -> Vec<ArchiveEntry> {
    let Ok(entries) = fs::read_dir(root.join(year)) else {
        return Vec::new();
    };
    let mut months: Vec<ArchiveEntry> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| parse_month_name(entry.file_name().to_str()?))
        .collect();
    months.sort_by_key(|month| month.code);
    months
}

pub(super) fn list_days(root: &Path, year: &str, month: u32) -> Vec<ArchiveEntry> {
    let Some(month_path) = month_dir(root, year, month) else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(month_path) else {
        return Vec::new();
    };
    let mut days: Vec<ArchiveEntry> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| parse_day_name(entry.file_name().to_str()?))
        .collect();
    days.sort_by_key(|day| day.code);
    days
}

pub(super) fn resolve_day_path(root: &Path, year: &str, month: u32, day: u32) -> Option<PathBuf> {
    let month_path = month_dir(root, year, month)?;
    let entries = fs::read_dir(&month_path).ok()?;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        let Some(parsed) = parse_day_name(&name) else {
            continue;
        };
        if parsed.code == day && entry.path().is_file() {
            return Some(month_path.join(name));
        }
    }
    None
}

fn month_dir(root: &Path, year: &str, month: u32) -> Option<PathBuf> {
    let entries = fs::read_dir(root.join(year)).ok()?;
    for entry in entries.filter_map(|entry| entry.ok()) {
        if !entry.path().is_dir() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if parse_month_name(&name).map(|parsed| parsed.code) == Some(month) {
            return Some(entry.path());
        }
    }
    None
}

/// `March_03` -> label "March", code 3.
pub(super) fn parse_month_name(name: &str) -> Option<ArchiveEntry> {
    let (label, number) = name.rsplit_once('_')?;
    let code = parse_numeric(number)?;
    if label.is_empty() || !(1..=12).contains(&code) {
        return None;
    }
    Some(ArchiveEntry {
        label: label.to_string(),
        code,
    })
}

/// `15_Friday.csv` -> label "Friday", code 15. Deliberately matched on the
/// name alone, like the original listing; only resolve_day_path insists on
/// an actual file.
pub(super) fn parse_day_name(name: &str) -> Option<ArchiveEntry> {
    let stem = name.strip_suffix(".csv")?;
    let (number, label) = stem.split_once('_')?;
    let code = parse_numeric(number)?;
    if label.is_empty() || !(1..=31).contains(&code) {
        return None;
    }
    Some(ArchiveEntry {
        label: label.to_string(),
        code,
    })
}

fn parse_numeric(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
