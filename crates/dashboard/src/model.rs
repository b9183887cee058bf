//! Records read from the firm's data store.

use serde::{Deserialize, Serialize};

use saldoo_core::{AccountId, CompanyId};

/// Where a period's figures came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Generated placeholder figures.
    #[default]
    Dummy,
    /// Imported from the firm's bookkeeping package.
    ExactOnline,
}

/// An SME client of a firm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub account_id: AccountId,
    pub name: String,
    #[serde(default)]
    pub exact_online_division: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// One month of figures for a company. Amounts are euro cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialPeriod {
    pub company_id: CompanyId,
    pub year: i32,
    /// 1-based.
    pub month: u32,
    pub revenue: i64,
    pub expenses: i64,
    pub gross_margin: i64,
    pub tax_estimate: i64,
    #[serde(default)]
    pub data_source: DataSource,
}

impl FinancialPeriod {
    pub fn net_result(&self) -> i64 {
        self.revenue - self.expenses
    }

    /// Sort key: later periods compare greater.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }
}

/// A question/answer entry managed by a firm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
}
