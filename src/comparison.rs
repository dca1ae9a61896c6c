//! Side-by-side comparison of two ledger years.

use std::collections::BTreeMap;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::FIRST_ENTRY_INDEX;
use crate::contract::contract_ceiling;
use crate::error::{LedgerError, Result};
use crate::model::{Ledger, LedgerRow};
use crate::normalize::parse_currency;
use crate::store::RowStore;

/// Sign-based classification of a year's result against its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BudgetOutcome {
    /// Spend stayed at or under the ceiling.
    Savings,
    /// Spend exceeded the ceiling.
    Overspend,
}

/// Difference between ceiling and total spend, with its classification.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContractDelta {
    /// `ceiling - total`; negative when overspent.
    pub difference: f64,
    pub outcome: BudgetOutcome,
}

/// One year's side of the comparison.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YearFigures {
    /// Entry rows only (header and metadata rows dropped).
    pub rows: Vec<LedgerRow>,
    pub total: f64,
    pub ceiling: Option<f64>,
    /// Omitted when the year's ceiling does not parse.
    pub delta: Option<ContractDelta>,
}

/// Comparison of two independently fetched ledger years. Derived.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YearComparison {
    pub per_year: BTreeMap<String, YearFigures>,
}

/// Compares two ledgers for two distinct year keys.
///
/// Unlike the monthly and contract-state views, an unparseable expense here
/// contributes zero instead of being skipped. The asymmetry is inherited from
/// the dashboard and kept as-is.
pub fn compare_years(ledger_a: &Ledger, ledger_b: &Ledger) -> Result<YearComparison> {
    if ledger_a.year == ledger_b.year {
        return Err(LedgerError::SameYearComparison(ledger_a.year.clone()));
    }

    let mut per_year = BTreeMap::new();
    for ledger in [ledger_a, ledger_b] {
        per_year.insert(ledger.year.clone(), year_figures(ledger));
    }
    Ok(YearComparison { per_year })
}

/// Duplicate-key check happens before any store read; with identical keys the
/// request is rejected without touching the store. Missing year documents
/// read as empty row sets.
pub fn load_comparison(
    store: &impl RowStore,
    year_a: &str,
    year_b: &str,
) -> Result<YearComparison> {
    if year_a == year_b {
        return Err(LedgerError::SameYearComparison(year_a.to_string()));
    }

    debug!("loading comparison for {year_a} vs {year_b}");
    let rows_a = store.load(year_a)?.unwrap_or_default();
    let rows_b = store.load(year_b)?.unwrap_or_default();

    compare_years(
        &Ledger::new(year_a, rows_a),
        &Ledger::new(year_b, rows_b),
    )
}

fn year_figures(ledger: &Ledger) -> YearFigures {
    let rows: Vec<LedgerRow> = ledger
        .rows
        .get(FIRST_ENTRY_INDEX..)
        .unwrap_or_default()
        .to_vec();

    let total: f64 = rows
        .iter()
        .map(|row| parse_currency(&row.expense).unwrap_or(0.0))
        .sum();

    let ceiling = contract_ceiling(ledger);
    let delta = ceiling.map(|c| {
        let difference = c - total;
        ContractDelta {
            difference,
            outcome: if difference >= 0.0 {
                BudgetOutcome::Savings
            } else {
                BudgetOutcome::Overspend
            },
        }
    });

    YearFigures {
        rows,
        total,
        ceiling,
        delta,
    }
}
