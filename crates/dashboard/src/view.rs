//! Role-selected dashboard view model.

use chrono::NaiveDate;
use serde::Serialize;

use saldoo_auth::{Branding, Profile, Role};
use saldoo_core::CompanyId;

use crate::{
    Faq, FinancialSource, FiscalDeadline, KpiSummary, PeriodLabel, SourceError, faq_panel,
    summarize, upcoming_deadlines,
};

/// Number of deadlines on the fiscal calendar panel.
pub const CALENDAR_ENTRIES: usize = 4;

/// One row of an accountant's client overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSummary {
    pub company_id: CompanyId,
    pub name: String,
    pub latest_period: Option<PeriodLabel>,
    pub revenue: Option<String>,
    pub net_result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountantDashboard {
    pub clients: Vec<ClientSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrepreneurDashboard {
    /// `None` until the company has figures.
    pub kpis: Option<KpiSummary>,
    pub calendar: Vec<FiscalDeadline>,
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardView {
    Accountant(AccountantDashboard),
    Entrepreneur(EntrepreneurDashboard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardHeader {
    pub title: &'static str,
    pub firm_name: String,
    pub user_name: String,
    pub initials: String,
    pub role: Role,
    pub branding: Branding,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub title: String,
    pub header: DashboardHeader,
    pub view: DashboardView,
}

impl DashboardHeader {
    pub fn for_profile(profile: &Profile) -> Self {
        let title = match profile.role {
            Role::Entrepreneur => "My dashboard",
            Role::Accountant => "Clients overview",
        };
        Self {
            title,
            firm_name: profile.account.name.clone(),
            user_name: profile.full_name(),
            initials: profile.initials(),
            role: profile.role,
            branding: Branding::from(&profile.account),
        }
    }
}

/// Build the dashboard for `profile` as of `today`.
///
/// The primary panel (client list or KPIs) propagates source errors; the FAQ
/// panel falls back to the defaults.
pub async fn build_dashboard(
    profile: &Profile,
    source: &dyn FinancialSource,
    today: NaiveDate,
) -> Result<DashboardPage, SourceError> {
    let view = match profile.role {
        Role::Accountant => DashboardView::Accountant(accountant_view(profile, source).await?),
        Role::Entrepreneur => {
            DashboardView::Entrepreneur(entrepreneur_view(profile, source, today).await?)
        }
    };

    Ok(DashboardPage {
        title: format!("Dashboard - {}", profile.account.name),
        header: DashboardHeader::for_profile(profile),
        view,
    })
}

async fn accountant_view(
    profile: &Profile,
    source: &dyn FinancialSource,
) -> Result<AccountantDashboard, SourceError> {
    let companies = source.list_companies(profile.account.id).await?;

    let mut clients = Vec::with_capacity(companies.len());
    for company in companies {
        let periods = source.financial_periods(company.id).await?;
        let summary = summarize(&periods);
        clients.push(ClientSummary {
            company_id: company.id,
            name: company.name,
            latest_period: summary.as_ref().map(|s| s.period),
            revenue: summary.as_ref().map(|s| s.revenue.display.clone()),
            net_result: summary.as_ref().map(|s| s.net_result.display.clone()),
        });
    }

    Ok(AccountantDashboard { clients })
}

async fn entrepreneur_view(
    profile: &Profile,
    source: &dyn FinancialSource,
    today: NaiveDate,
) -> Result<EntrepreneurDashboard, SourceError> {
    let kpis = match profile.company_id {
        Some(company_id) => summarize(&source.financial_periods(company_id).await?),
        None => None,
    };

    let faqs = match source.faqs(profile.account.id).await {
        Ok(entries) => faq_panel(entries),
        Err(e) => {
            tracing::warn!(account_id = %profile.account.id, error = %e, "faq lookup failed; using defaults");
            faq_panel(Vec::new())
        }
    };

    Ok(EntrepreneurDashboard {
        kpis,
        calendar: upcoming_deadlines(today, CALENDAR_ENTRIES),
        faqs,
    })
}
