//! Date-range lookups over special dates.
//!
//! A one-off date occurs once. A recurring (`every_year`) date occurs on its
//! month and day in its own year and every later year; 29 February falls on
//! 28 February in common years.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::models::SpecialDate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub on: NaiveDate,
    pub special_date: SpecialDate,
}

fn on_in_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))
}

/// Days in `[from, to]` on which `date` occurs, ascending.
pub fn occurrences(date: &SpecialDate, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    if from > to {
        return Vec::new();
    }
    if !date.every_year {
        return if (from..=to).contains(&date.date) {
            vec![date.date]
        } else {
            Vec::new()
        };
    }

    let first_year = from.year().max(date.date.year());
    (first_year..=to.year())
        .filter_map(|year| on_in_year(date.date, year))
        .filter(|day| (from..=to).contains(day))
        .collect()
}

/// Every occurrence of `dates` within `[from, to]`, ordered by day.
pub fn between(dates: &[SpecialDate], from: NaiveDate, to: NaiveDate) -> Vec<Occurrence> {
    let mut found: Vec<Occurrence> = dates
        .iter()
        .flat_map(|date| {
            occurrences(date, from, to)
                .into_iter()
                .map(move |on| Occurrence {
                    on,
                    special_date: date.clone(),
                })
        })
        .collect();
    found.sort_by(|a, b| {
        a.on.cmp(&b.on)
            .then_with(|| a.special_date.id.cmp(&b.special_date.id))
    });
    found
}

/// Occurrences from `today` through `today + days`.
pub fn upcoming(dates: &[SpecialDate], today: NaiveDate, days: u32) -> Vec<Occurrence> {
    let until = today
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    between(dates, today, until)
}
