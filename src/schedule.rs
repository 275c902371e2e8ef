use chrono::{NaiveTime, Weekday};

use crate::models::Provider;

/// The only availability category this tool cares about.
pub const PHONE_CATEGORY: &str = "Telefonische Erreichbarkeit";

/// Canonical weekday abbreviations used in exported sheets, Monday first.
pub const DAY_LABELS: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

/// Maps every known upstream weekday spelling to a weekday. Unknown labels
/// yield `None` and are dropped by the caller.
pub fn weekday_from_label(label: &str) -> Option<Weekday> {
    match label.trim() {
        "Mo." | "Mo" => Some(Weekday::Mon),
        "Di." | "Di" => Some(Weekday::Tue),
        "Mi." | "Mi" => Some(Weekday::Wed),
        "Do." | "Do" => Some(Weekday::Thu),
        "Fr." | "Fr" => Some(Weekday::Fri),
        "Sa." | "Sa" => Some(Weekday::Sat),
        "So." | "So" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_label(day: Weekday) -> &'static str {
    DAY_LABELS[day.num_days_from_monday() as usize]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalInterval {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl CanonicalInterval {
    /// Normalized `HH:MM-HH:MM` text used for display and plan grouping.
    pub fn display(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Parses one raw interval string into zero or more (start, end) pairs.
/// The text may hold several `;`- or `,`-separated sub-ranges with arbitrary
/// whitespace; sub-ranges that are not `HH:MM-HH:MM` are skipped.
pub fn parse_interval_text(text: &str) -> Vec<(NaiveTime, NaiveTime)> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parsed = Vec::new();

    for token in compact.split([';', ',']) {
        if token.is_empty() {
            continue;
        }
        let (start_raw, end_raw) = match token.split_once('-') {
            Some(parts) => parts,
            None => continue,
        };
        let start = match NaiveTime::parse_from_str(start_raw, "%H:%M") {
            Ok(time) => time,
            Err(_) => continue,
        };
        let end = match NaiveTime::parse_from_str(end_raw, "%H:%M") {
            Ok(time) => time,
            Err(_) => continue,
        };
        parsed.push((start, end));
    }

    parsed
}

/// Flattens one provider's nested weekly schedule into canonical telephone
/// reachability intervals. Pure function; unknown weekday labels and
/// non-telephone categories are dropped, malformed times are skipped.
pub fn canonicalize(provider: &Provider) -> Vec<CanonicalInterval> {
    let mut intervals = Vec::new();

    for entry in &provider.tsz {
        let day = match weekday_from_label(&entry.day) {
            Some(day) => day,
            None => continue,
        };
        for block in &entry.blocks {
            if block.category.trim() != PHONE_CATEGORY {
                continue;
            }
            for raw in &block.intervals {
                for (start, end) in parse_interval_text(&raw.text) {
                    intervals.push(CanonicalInterval { day, start, end });
                }
            }
        }
    }

    intervals
}
