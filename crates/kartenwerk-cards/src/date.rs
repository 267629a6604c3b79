// SPDX-License-Identifier: MIT
//
// Date text for the year face.

use std::collections::HashMap;

use chrono::Datelike;
use kartenwerk_core::TimelineCard;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Count how many cards fall on each year. Computed once per export and
/// threaded through to the formatter for disambiguation policies.
pub fn year_counts(cards: &[TimelineCard]) -> HashMap<i32, usize> {
    let mut counts = HashMap::new();
    for card in cards {
        *counts.entry(card.year).or_insert(0) += 1;
    }
    counts
}

/// Date line for a card: "Apr 2019" when the full capture date is known,
/// the bare year otherwise. The year always comes from the card, not from
/// the capture timestamp.
pub fn format_date_text(card: &TimelineCard, _year_counts: &HashMap<i32, usize>) -> String {
    match card.full_date {
        Some(date) => format!("{} {}", MONTHS[date.month0() as usize], card.year),
        None => card.year.to_string(),
    }
}
