//! Explicit application-session state.
//!
//! The dashboard's global mutable state (current year, role, selected view)
//! lives here as a plain object with a defined init (on auth resolution) and
//! teardown (on sign-out). Aggregators never read it implicitly; callers pass
//! what they need as arguments.

use chrono::NaiveDate;
use log::info;

use crate::error::{LedgerError, Result};
use crate::model::{Ledger, Month, Role};
use crate::monthly::{monthly_summary, MonthlySummary};

/// Aggregated views the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Monthly,
    ContractState,
    YearComparison,
}

impl Role {
    /// The restricted role sees monthly summaries only; contract-state and
    /// year-comparison views are withheld from it.
    pub fn allows_view(self, view: View) -> bool {
        match view {
            View::Monthly => true,
            View::ContractState | View::YearComparison => self != Role::Invitado,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub identity: String,
    pub role: Role,
    pub year: String,
    pub selected_month: Option<Month>,
}

impl Session {
    /// Builds a session from a resolved identity and its stored role string.
    /// An unrecognized role is an error; the caller must sign the user out.
    pub fn resolve(identity: &str, role_name: &str, year: &str) -> Result<Session> {
        let role = Role::from_name(role_name)
            .ok_or_else(|| LedgerError::UnknownRole(role_name.to_string()))?;
        info!("session opened for {identity} as {role:?} on year {year}");
        Ok(Session {
            identity: identity.to_string(),
            role,
            year: year.to_string(),
            selected_month: None,
        })
    }

    pub fn select_year(&mut self, year: &str) {
        self.year = year.to_string();
    }

    pub fn select_month(&mut self, month: Option<Month>) {
        self.selected_month = month;
    }

    pub fn allows_view(&self, view: View) -> bool {
        self.role.allows_view(view)
    }

    /// Reaction to the live subscription replacing the ledger snapshot: when
    /// a month is selected its summary is recomputed, synchronously, right
    /// here. No memoization, no concurrent recomputation.
    pub fn on_snapshot_replaced(
        &self,
        ledger: &Ledger,
        today: NaiveDate,
    ) -> Option<MonthlySummary> {
        let month = self.selected_month?;
        Some(monthly_summary(ledger, month, today))
    }

    /// Tears the session down.
    pub fn sign_out(self) {
        info!("session closed for {}", self.identity);
    }
}
