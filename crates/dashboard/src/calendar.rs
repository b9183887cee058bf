//! Upcoming Belgian fiscal deadlines.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    /// Quarterly VAT return, due the 20th of the month after the quarter.
    VatReturn,
    /// Corporate tax advance payment (10/4, 10/7, 10/10, 20/12).
    CorporateTaxAdvance,
}

impl DeadlineKind {
    pub fn label(&self) -> &'static str {
        match self {
            DeadlineKind::VatReturn => "VAT return",
            DeadlineKind::CorporateTaxAdvance => "Corporate tax advance payment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiscalDeadline {
    pub kind: DeadlineKind,
    pub label: &'static str,
    /// Period the deadline belongs to, e.g. `Q4 2024` or `VA2 2025`.
    pub period: String,
    pub due: NaiveDate,
}

const ADVANCE_PAYMENT_DATES: [(u32, u32); 4] = [(4, 10), (7, 10), (10, 10), (12, 20)];

fn deadlines_for_year(year: i32) -> impl Iterator<Item = FiscalDeadline> {
    let vat = (1..=4u32).filter_map(move |quarter| {
        let (due_year, due_month) = if quarter == 4 {
            (year + 1, 1)
        } else {
            (year, quarter * 3 + 1)
        };
        Some(FiscalDeadline {
            kind: DeadlineKind::VatReturn,
            label: DeadlineKind::VatReturn.label(),
            period: format!("Q{quarter} {year}"),
            due: NaiveDate::from_ymd_opt(due_year, due_month, 20)?,
        })
    });

    let advance = ADVANCE_PAYMENT_DATES
        .into_iter()
        .enumerate()
        .filter_map(move |(i, (month, day))| {
            Some(FiscalDeadline {
                kind: DeadlineKind::CorporateTaxAdvance,
                label: DeadlineKind::CorporateTaxAdvance.label(),
                period: format!("VA{} {year}", i + 1),
                due: NaiveDate::from_ymd_opt(year, month, day)?,
            })
        });

    vat.chain(advance)
}

/// The next `count` deadlines due on or after `today`, earliest first.
pub fn upcoming_deadlines(today: NaiveDate, count: usize) -> Vec<FiscalDeadline> {
    let year = today.year();
    let mut all: Vec<FiscalDeadline> = (year - 1..=year + 1)
        .flat_map(deadlines_for_year)
        .filter(|d| d.due >= today)
        .collect();
    all.sort_by(|a, b| a.due.cmp(&b.due).then(a.kind.cmp(&b.kind)));
    all.truncate(count);
    all
}
