//! Month-by-month expense summarization.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::contract::{contract_ceiling, spent_to_date};
use crate::model::{Ledger, Month};
use crate::normalize::{parse_currency, parse_dates};

/// Fallback activity label for rows that left the field blank.
pub const NO_ACTIVITY: &str = "Sin actividad";

/// One counted row in the detail list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummaryDetail {
    /// "Día 5", or "Día 5 y Día 12" for an activity spanning several days.
    pub day_label: String,
    pub amount: f64,
    pub activity: String,
}

/// One counted row in the charting series.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DayAmount {
    /// "Día 5", or "Día 5 y 12" for a multi-day row (single prefix; the
    /// detail list repeats it). Both shapes are the dashboard's.
    pub day_label: String,
    pub amount: f64,
}

/// Monthly financial summary. Derived, recomputed on demand, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MonthlySummary {
    /// Sum of the counted amounts; always equals the sum over `details`.
    pub total: f64,

    /// One entry per counted row.
    pub details: Vec<SummaryDetail>,

    /// One entry per counted row. Two rows landing on the same day stay as
    /// two separate points; the chart does the visual stacking.
    pub daily_series: Vec<DayAmount>,

    /// Duplicated from the contract-state view for convenience.
    pub contract_ceiling: Option<f64>,

    /// Remaining against the ceiling as of `today`, clamped at zero.
    pub remaining: Option<f64>,
}

/// Summarizes every entry row with at least one date in the target calendar
/// month. The match deliberately ignores the year: a ledger spanning several
/// years buckets all its Marches together, which is the dashboard's observed
/// behavior.
///
/// A row counts once with its full amount no matter how many of its dates
/// land in the month; the matching day numbers only shape the labels.
pub fn monthly_summary(ledger: &Ledger, month: Month, today: NaiveDate) -> MonthlySummary {
    let target = month.number();

    let mut total = 0.0;
    let mut details = Vec::new();
    let mut daily_series = Vec::new();

    for (_, row) in ledger.entries() {
        if row.date_spec.is_empty() || row.expense.is_empty() {
            continue;
        }
        let Some(amount) = parse_currency(&row.expense) else {
            continue;
        };

        let days: Vec<u32> = parse_dates(&row.date_spec)
            .into_iter()
            .filter(|d| d.month() == target)
            .map(|d| d.day())
            .collect();
        if days.is_empty() {
            continue;
        }

        total += amount;

        let activity = if row.activity.is_empty() {
            NO_ACTIVITY.to_string()
        } else {
            row.activity.clone()
        };

        daily_series.push(DayAmount {
            day_label: series_day_label(&days),
            amount,
        });
        details.push(SummaryDetail {
            day_label: detail_day_label(&days),
            amount,
            activity,
        });
    }

    let ceiling = contract_ceiling(ledger);
    let spent = spent_to_date(ledger, today);

    MonthlySummary {
        total,
        details,
        daily_series,
        contract_ceiling: ceiling,
        remaining: ceiling.map(|c| (c - spent).max(0.0)),
    }
}

fn series_day_label(days: &[u32]) -> String {
    let joined = days
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" y ");
    format!("Día {joined}")
}

fn detail_day_label(days: &[u32]) -> String {
    days.iter()
        .map(|d| format!("Día {d}"))
        .collect::<Vec<_>>()
        .join(" y ")
}
