use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDateTime, NaiveTime};

use crate::models::{ContactRow, PlanRow, Provider};
use crate::schedule::{canonicalize, weekday_label, DAY_LABELS};

fn contact_display(provider: &Provider) -> String {
    let name = if provider.name.trim().is_empty() {
        "Unbekannt"
    } else {
        provider.name.trim()
    };
    let tel = if provider.tel.trim().is_empty() {
        "Nicht angegeben"
    } else {
        provider.tel.trim()
    };
    format!("{name} (Tel: {tel})")
}

/// Builds the weekly phone plan: one row per (weekday, time-range text),
/// listing every provider reachable in that exact slot. Providers are
/// canonicalized independently first, then folded into the grouping map;
/// rows come out ordered by weekday, then start time.
pub fn weekly_plan(providers: &[Provider]) -> Vec<PlanRow> {
    let mut grouped: BTreeMap<(u32, NaiveTime, String), BTreeSet<String>> = BTreeMap::new();

    for provider in providers {
        for interval in canonicalize(provider) {
            let key = (
                interval.day.num_days_from_monday(),
                interval.start,
                interval.display(),
            );
            grouped
                .entry(key)
                .or_default()
                .insert(contact_display(provider));
        }
    }

    grouped
        .into_iter()
        .map(|((day_index, _, text), contacts)| PlanRow {
            wochentag: DAY_LABELS[day_index as usize].to_string(),
            uhrzeit: text,
            kontakte: contacts.into_iter().collect::<Vec<_>>().join(", "),
        })
        .collect()
}

/// House numbers like "12 a" or "3-5" get quoted so downstream spreadsheet
/// tools do not reinterpret them.
fn format_hausnummer(raw: &str) -> String {
    if raw.contains(' ') || raw.contains('-') {
        format!("\"{raw}\"")
    } else {
        raw.to_string()
    }
}

/// Builds the contact sheet rows, one per provider, with a deduplicated
/// summary of all phone reachability slots.
pub fn contact_rows(providers: &[Provider]) -> Vec<ContactRow> {
    providers
        .iter()
        .map(|provider| {
            let summary: BTreeSet<String> = canonicalize(provider)
                .iter()
                .map(|iv| format!("{} {} Uhr", weekday_label(iv.day), iv.display()))
                .collect();

            ContactRow {
                id: provider.id_key(),
                name: provider.name.clone(),
                tel: provider.tel.clone(),
                geschlecht: provider.geschlecht.clone(),
                strasse: provider.strasse.clone(),
                hausnummer: format_hausnummer(&provider.hausnummer),
                plz: provider.plz.clone(),
                ort: provider.ort.clone(),
                email: provider.email.clone(),
                distanz: provider.distance,
                web: provider.web.clone(),
                telefonische_sprechzeiten: summary.into_iter().collect::<Vec<_>>().join(", "),
            }
        })
        .collect()
}

/// Filters previously exported plan rows down to the reference instant's
/// weekday. Row order is preserved.
pub fn rows_for_day(rows: &[PlanRow], at: NaiveDateTime) -> Vec<PlanRow> {
    let label = weekday_label(at.date().weekday());
    rows.iter()
        .filter(|row| row.wochentag.trim().eq_ignore_ascii_case(label))
        .cloned()
        .collect()
}
