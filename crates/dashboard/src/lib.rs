//! `saldoo-dashboard`: financial KPIs, fiscal calendar and FAQ panel.
//!
//! Pure view-model construction: data comes in through [`FinancialSource`],
//! and the result is a [`DashboardPage`] chosen once from the user's role.

pub mod calendar;
pub mod faq;
pub mod kpi;
pub mod model;
pub mod source;
pub mod view;

pub use calendar::{DeadlineKind, FiscalDeadline, upcoming_deadlines};
pub use faq::{default_faqs, faq_panel};
pub use kpi::{Kpi, KpiSummary, PeriodLabel, format_eur, summarize};
pub use model::{Company, DataSource, Faq, FinancialPeriod};
pub use source::{FinancialSource, SourceError};
pub use view::{
    AccountantDashboard, ClientSummary, DashboardHeader, DashboardPage, DashboardView,
    EntrepreneurDashboard, build_dashboard,
};
