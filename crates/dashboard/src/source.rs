use async_trait::async_trait;
use thiserror::Error;

use saldoo_core::{AccountId, CompanyId};

use crate::{Company, Faq, FinancialPeriod};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("financial data unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected financial data response: {0}")]
    InvalidResponse(String),
}

/// Read access to the dashboard's data, scoped by firm or company.
#[async_trait]
pub trait FinancialSource: Send + Sync {
    /// Active client companies of a firm, ordered by name.
    async fn list_companies(&self, account_id: AccountId) -> Result<Vec<Company>, SourceError>;

    /// Monthly periods of a company, in any order.
    async fn financial_periods(&self, company_id: CompanyId) -> Result<Vec<FinancialPeriod>, SourceError>;

    /// All FAQ entries of a firm, active or not.
    async fn faqs(&self, account_id: AccountId) -> Result<Vec<Faq>, SourceError>;
}
