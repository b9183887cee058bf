//! KPI derivation from monthly figures.

use serde::Serialize;

use crate::FinancialPeriod;

/// Year and 1-based month of a period.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PeriodLabel {
    pub year: i32,
    pub month: u32,
}

impl PeriodLabel {
    pub fn previous(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

/// A single figure with its month-over-month change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub amount_cents: i64,
    pub display: String,
    /// Percentage change against the previous month, one decimal.
    pub trend_percent: Option<f64>,
}

impl Kpi {
    fn new(amount_cents: i64, previous: Option<i64>) -> Self {
        Self {
            amount_cents,
            display: format_eur(amount_cents),
            trend_percent: previous.and_then(|prev| trend(amount_cents, prev)),
        }
    }
}

/// KPIs of the latest period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub period: PeriodLabel,
    pub revenue: Kpi,
    pub expenses: Kpi,
    pub net_result: Kpi,
    pub tax_estimate: Kpi,
}

/// Summarize the latest period in `periods`; `None` when there is no data.
///
/// Trends compare against the calendar month right before the latest one and
/// are absent when that month is missing or its figure is zero. The tax
/// estimate never carries a trend.
pub fn summarize(periods: &[FinancialPeriod]) -> Option<KpiSummary> {
    let latest = periods.iter().max_by_key(|p| p.ordinal())?;
    let label = PeriodLabel {
        year: latest.year,
        month: latest.month,
    };
    let prev_label = label.previous();
    let previous = periods
        .iter()
        .find(|p| p.year == prev_label.year && p.month == prev_label.month);

    Some(KpiSummary {
        period: label,
        revenue: Kpi::new(latest.revenue, previous.map(|p| p.revenue)),
        expenses: Kpi::new(latest.expenses, previous.map(|p| p.expenses)),
        net_result: Kpi::new(latest.net_result(), previous.map(FinancialPeriod::net_result)),
        tax_estimate: Kpi::new(latest.tax_estimate, None),
    })
}

fn trend(current: i64, previous: i64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    let pct = (current - previous) as f64 / previous.unsigned_abs() as f64 * 100.0;
    Some((pct * 10.0).round() / 10.0)
}

/// Format cents as euros the Belgian way: `€ 12.450` or `€ 12.450,50`.
pub fn format_eur(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let euros = abs / 100;
    let rest = abs % 100;

    let digits = euros.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rest == 0 {
        format!("€ {sign}{grouped}")
    } else {
        format!("€ {sign}{grouped},{rest:02}")
    }
}
