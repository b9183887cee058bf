//! Directory and financial data backed by the hosted data API (`/rest/v1`).
//!
//! All calls are made with the server key: tenant scoping happens in the
//! query filters, not in row-level policies.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use saldoo_auth::{Account, Directory, DirectoryError, NewAccount, Profile};
use saldoo_core::{AccountId, CompanyId, UserId};
use saldoo_dashboard::{Company, DataSource, Faq, FinancialPeriod, FinancialSource, SourceError};

use super::{Failure, HostedClient, HostedConfig, HostedSetupError};

/// Row of `financial_data`; amounts are euros with decimals.
#[derive(Debug, Deserialize)]
struct FinancialRow {
    company_id: CompanyId,
    year: i32,
    month: u32,
    #[serde(default)]
    revenue: f64,
    #[serde(default)]
    expenses: f64,
    #[serde(default)]
    gross_margin: f64,
    #[serde(default)]
    tax_estimate: f64,
    #[serde(default)]
    data_source: DataSource,
}

fn to_cents(euros: f64) -> i64 {
    (euros * 100.0).round() as i64
}

impl From<FinancialRow> for FinancialPeriod {
    fn from(row: FinancialRow) -> Self {
        FinancialPeriod {
            company_id: row.company_id,
            year: row.year,
            month: row.month,
            revenue: to_cents(row.revenue),
            expenses: to_cents(row.expenses),
            gross_margin: to_cents(row.gross_margin),
            tax_estimate: to_cents(row.tax_estimate),
            data_source: row.data_source,
        }
    }
}

/// Transport-level outcome of a data API call, before mapping into the
/// caller's error type.
enum CallError {
    Transport(String),
    Status(Failure),
    Body(String),
}

impl From<CallError> for DirectoryError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Transport(msg) => DirectoryError::Unavailable(msg),
            CallError::Status(f) if f.is_server_error() => DirectoryError::Unavailable(f.to_string()),
            CallError::Status(f) => DirectoryError::Rejected(f.to_string()),
            CallError::Body(msg) => DirectoryError::InvalidResponse(msg),
        }
    }
}

impl From<CallError> for SourceError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Transport(msg) => SourceError::Unavailable(msg),
            CallError::Status(f) => SourceError::Unavailable(f.to_string()),
            CallError::Body(msg) => SourceError::InvalidResponse(msg),
        }
    }
}

pub struct HostedDirectory {
    client: HostedClient,
}

impl HostedDirectory {
    pub fn new(config: &HostedConfig) -> Result<Self, HostedSetupError> {
        Ok(Self {
            client: HostedClient::new(config)?,
        })
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CallError> {
        let response: Response = self
            .client
            .as_service(request)
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CallError::Status(Failure::read(response).await));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CallError::Body(e.to_string()))
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>, CallError> {
        self.call(self.client.get(&format!("rest/v1/{table}")).query(query))
            .await
    }

    async fn rpc<T: DeserializeOwned>(&self, function: &str, args: serde_json::Value) -> Result<T, CallError> {
        self.call(self.client.post(&format!("rest/v1/rpc/{function}")).json(&args))
            .await
    }
}

#[async_trait]
impl Directory for HostedDirectory {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, DirectoryError> {
        let rows: Vec<Profile> = self
            .select(
                "users",
                &[
                    ("select", "*,account:accounts(*)".to_string()),
                    ("id", format!("eq.{user_id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_account_by_subdomain(&self, subdomain: &str) -> Result<Option<Account>, DirectoryError> {
        let rows: Vec<Account> = self
            .select(
                "accounts",
                &[
                    ("select", "*".to_string()),
                    ("subdomain", format!("eq.{subdomain}")),
                    ("is_active", "eq.true".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn is_subdomain_available(&self, subdomain: &str) -> Result<bool, DirectoryError> {
        Ok(self
            .rpc("is_subdomain_available", json!({ "subdomain_name": subdomain }))
            .await?)
    }

    async fn create_account_and_user(&self, new: &NewAccount) -> Result<AccountId, DirectoryError> {
        let args = json!({
            "user_id": new.user_id,
            "user_email": new.email,
            "user_first_name": new.first_name,
            "user_last_name": new.last_name,
            "account_name": new.account_name,
            "account_subdomain": new.subdomain,
        });
        Ok(self.rpc("create_account_and_user", args).await?)
    }
}

#[async_trait]
impl FinancialSource for HostedDirectory {
    async fn list_companies(&self, account_id: AccountId) -> Result<Vec<Company>, SourceError> {
        Ok(self
            .select(
                "companies",
                &[
                    ("select", "*".to_string()),
                    ("account_id", format!("eq.{account_id}")),
                    ("is_active", "eq.true".to_string()),
                    ("order", "name.asc".to_string()),
                ],
            )
            .await?)
    }

    async fn financial_periods(&self, company_id: CompanyId) -> Result<Vec<FinancialPeriod>, SourceError> {
        let rows: Vec<FinancialRow> = self
            .select(
                "financial_data",
                &[
                    ("select", "*".to_string()),
                    ("company_id", format!("eq.{company_id}")),
                    ("order", "year.desc,month.desc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(FinancialPeriod::from).collect())
    }

    async fn faqs(&self, account_id: AccountId) -> Result<Vec<Faq>, SourceError> {
        Ok(self
            .select(
                "faqs",
                &[
                    ("select", "*".to_string()),
                    ("account_id", format!("eq.{account_id}")),
                    ("order", "sort_order.asc".to_string()),
                ],
            )
            .await?)
    }
}
