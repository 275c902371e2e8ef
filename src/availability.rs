use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Duration, NaiveDateTime};

use crate::models::{Provider, UpcomingWindow};
use crate::schedule::{canonicalize, CanonicalInterval};

/// Digits-only comparison key for free-form phone strings. Never used for
/// display; display always keeps the original text.
pub fn normalize_phone(tel: &str) -> String {
    tel.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// True when any of the provider's intervals on the reference weekday
/// contains the reference time, boundaries included.
pub fn reachable_now(provider: &Provider, at: NaiveDateTime) -> bool {
    let weekday = at.date().weekday();
    let time = at.time();
    canonicalize(provider)
        .iter()
        .any(|iv| iv.day == weekday && iv.start <= time && time <= iv.end)
}

/// Deduplicated, sorted display strings of the provider's intervals on the
/// reference weekday, independent of whether any of them is open right now.
pub fn today_windows(provider: &Provider, at: NaiveDateTime) -> Vec<String> {
    let weekday = at.date().weekday();
    let windows: BTreeSet<String> = canonicalize(provider)
        .iter()
        .filter(|iv| iv.day == weekday)
        .map(CanonicalInterval::display)
        .collect();
    windows.into_iter().collect()
}

/// The next `limit` reachability windows across all providers within seven
/// days of the reference instant. Only windows starting strictly after the
/// instant count; a window already in progress belongs to `reachable_now`.
pub fn next_available_windows(
    providers: &[Provider],
    at: NaiveDateTime,
    limit: usize,
) -> Vec<UpcomingWindow> {
    let mut seen: HashSet<(String, String, String, NaiveDateTime, NaiveDateTime)> =
        HashSet::new();
    let mut windows = Vec::new();

    for provider in providers {
        let intervals = canonicalize(provider);
        for offset in 0..7 {
            let date = at.date() + Duration::days(offset);
            let weekday = date.weekday();
            for interval in intervals.iter().filter(|iv| iv.day == weekday) {
                let start = date.and_time(interval.start);
                if start <= at {
                    continue;
                }
                let end = date.and_time(interval.end);
                let key = (
                    provider.id_key(),
                    provider.name.trim().to_string(),
                    normalize_phone(&provider.tel),
                    start,
                    end,
                );
                if !seen.insert(key) {
                    continue;
                }
                windows.push(UpcomingWindow {
                    start,
                    end,
                    name: provider.name.clone(),
                    tel: provider.tel.clone(),
                    ort: provider.ort.clone(),
                });
            }
        }
    }

    windows.sort_by_key(|w| w.start);
    windows.truncate(limit);
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayEntry, RawInterval, TypeBlock};
    use crate::schedule::PHONE_CATEGORY;
    use chrono::NaiveDate;

    fn provider(name: &str, tel: &str, slots: &[(&str, &str)]) -> Provider {
        Provider {
            name: name.to_string(),
            tel: tel.to_string(),
            tsz: slots
                .iter()
                .map(|(day, zeit)| DayEntry {
                    day: day.to_string(),
                    blocks: vec![TypeBlock {
                        category: PHONE_CATEGORY.to_string(),
                        intervals: vec![RawInterval {
                            text: zeit.to_string(),
                        }],
                    }],
                })
                .collect(),
            ..Default::default()
        }
    }

    // 2026-08-17 is a Monday.
    fn monday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 17)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn normalize_phone_keeps_digits_only() {
        assert_eq!(normalize_phone("030 / 123 45-67"), "0301234567");
        assert_eq!(normalize_phone("keine Angabe"), "");
    }

    #[test]
    fn reachable_during_monday_window() {
        let a = provider("Praxis A", "030 1", &[("Mo.", "09:00-12:00")]);
        assert!(reachable_now(&a, monday(10, 30)));
        assert_eq!(today_windows(&a, monday(10, 30)), vec!["09:00-12:00"]);
    }

    #[test]
    fn boundaries_are_inclusive() {
        let a = provider("Praxis A", "030 1", &[("Mo.", "09:00-12:00")]);
        assert!(reachable_now(&a, monday(9, 0)));
        assert!(reachable_now(&a, monday(12, 0)));
        assert!(!reachable_now(&a, monday(12, 1)));
        assert!(!reachable_now(&a, monday(8, 59)));
    }

    #[test]
    fn other_weekdays_do_not_match() {
        let b = provider("Praxis B", "030 2", &[("Di.", "14:00-15:00")]);
        assert!(!reachable_now(&b, monday(14, 30)));
        assert!(today_windows(&b, monday(14, 30)).is_empty());
    }

    #[test]
    fn today_windows_are_deduplicated_and_sorted() {
        let a = provider(
            "Praxis A",
            "030 1",
            &[("Mo.", "13:00-14:00"), ("Mo.", "09:00-10:00;13:00-14:00")],
        );
        assert_eq!(
            today_windows(&a, monday(8, 0)),
            vec!["09:00-10:00", "13:00-14:00"]
        );
    }

    #[test]
    fn finds_window_on_following_tuesday() {
        let b = provider("Praxis B", "030 2", &[("Di.", "14:00-15:00")]);
        let windows = next_available_windows(&[b], monday(8, 0), 5);
        assert_eq!(windows.len(), 1);
        let expected_start = NaiveDate::from_ymd_opt(2026, 8, 18)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        assert_eq!(windows[0].start, expected_start);
        assert_eq!(windows[0].end.time().format("%H:%M").to_string(), "15:00");
    }

    #[test]
    fn windows_already_started_are_excluded() {
        let a = provider("Praxis A", "030 1", &[("Mo.", "09:00-12:00")]);
        // 10:00 sits inside today's window: reachable now, but the next
        // occurrence of that window falls on the Monday after the horizon.
        let windows = next_available_windows(std::slice::from_ref(&a), monday(10, 0), 5);
        assert!(reachable_now(&a, monday(10, 0)));
        assert!(windows.is_empty());
    }

    #[test]
    fn window_starting_exactly_at_reference_is_excluded() {
        let a = provider("Praxis A", "030 1", &[("Mo.", "09:00-12:00")]);
        // strictly-future starts only, so today's 09:00 does not appear
        let windows = next_available_windows(&[a], monday(9, 0), 5);
        assert!(windows.is_empty());
    }

    #[test]
    fn later_window_on_the_reference_day_is_included() {
        let a = provider("Praxis A", "030 1", &[("Mo.", "09:00-10:00;15:00-16:00")]);
        let windows = next_available_windows(&[a], monday(10, 30), 5);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start, monday(15, 0));
        assert_eq!(windows[0].end, monday(16, 0));
    }

    #[test]
    fn windows_are_sorted_across_providers() {
        let a = provider("Praxis A", "030 1", &[("Mi.", "09:00-10:00")]);
        let b = provider("Praxis B", "030 2", &[("Di.", "14:00-15:00")]);
        let windows = next_available_windows(&[a, b], monday(8, 0), 5);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].name, "Praxis B");
        assert_eq!(windows[1].name, "Praxis A");
        assert!(windows[0].start < windows[1].start);
    }

    #[test]
    fn duplicate_upstream_entries_collapse() {
        let a = provider(
            "Praxis A",
            "030 / 123",
            &[("Di.", "14:00-15:00"), ("Di.", "14:00-15:00")],
        );
        let windows = next_available_windows(&[a], monday(8, 0), 5);
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn truncates_to_limit() {
        let a = provider(
            "Praxis A",
            "030 1",
            &[
                ("Di.", "09:00-10:00"),
                ("Mi.", "09:00-10:00"),
                ("Do.", "09:00-10:00"),
            ],
        );
        let windows = next_available_windows(&[a], monday(8, 0), 2);
        assert_eq!(windows.len(), 2);
        assert_eq!(
            windows[0].start.date(),
            NaiveDate::from_ymd_opt(2026, 8, 18).unwrap()
        );
    }

    #[test]
    fn empty_input_yields_empty_result() {
        assert!(next_available_windows(&[], monday(8, 0), 5).is_empty());
    }
}
