//! Demo data for running without a hosted backend.

use saldoo_auth::Account;
use saldoo_auth::Role;
use saldoo_core::{AccountId, CompanyId, UserId};
use saldoo_dashboard::{Company, DataSource, FinancialPeriod};

use super::{DirectoryUser, InMemoryDirectory, InMemoryIdentityProvider};

pub const DEMO_SUBDOMAIN: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo1234";
pub const DEMO_ACCOUNTANT_EMAIL: &str = "accountant@demo.saldoo.be";
pub const DEMO_ENTREPRENEUR_EMAIL: &str = "owner@demo.saldoo.be";

/// Ids of the seeded records.
#[derive(Debug, Clone, Copy)]
pub struct DemoSeed {
    pub account_id: AccountId,
    pub accountant_id: UserId,
    pub entrepreneur_id: UserId,
    pub company_id: CompanyId,
}

/// Seed one demo firm with an accountant, an entrepreneur and two months of
/// figures for the entrepreneur's company.
pub fn seed_demo(identity: &InMemoryIdentityProvider, directory: &InMemoryDirectory) -> DemoSeed {
    let seed = DemoSeed {
        account_id: AccountId::new(),
        accountant_id: UserId::new(),
        entrepreneur_id: UserId::new(),
        company_id: CompanyId::new(),
    };

    directory.insert_account(Account {
        id: seed.account_id,
        name: "Demo Boekhouding".to_string(),
        subdomain: DEMO_SUBDOMAIN.to_string(),
        logo_url: None,
        primary_color: "#0f766e".to_string(),
        contrast_color: "#ffffff".to_string(),
        is_active: true,
    });

    directory.insert_company(Company {
        id: seed.company_id,
        account_id: seed.account_id,
        name: "Demo BV".to_string(),
        exact_online_division: None,
        is_active: true,
    });

    for (id, email, first, last, role, company_id) in [
        (seed.accountant_id, DEMO_ACCOUNTANT_EMAIL, "Anna", "Peeters", Role::Accountant, None),
        (
            seed.entrepreneur_id,
            DEMO_ENTREPRENEUR_EMAIL,
            "Bart",
            "Wouters",
            Role::Entrepreneur,
            Some(seed.company_id),
        ),
    ] {
        identity.add_user(id, email, DEMO_PASSWORD);
        directory.insert_user(DirectoryUser {
            id,
            account_id: seed.account_id,
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role,
            company_id,
        });
    }

    // Figures in cents; January gives +12.5 % revenue and -3.2 % expenses.
    for (year, month, revenue, expenses, tax) in [
        (2024, 12, 1_106_700, 859_500, 119_000),
        (2025, 1, 1_245_000, 832_000, 124_000),
    ] {
        directory.insert_period(FinancialPeriod {
            company_id: seed.company_id,
            year,
            month,
            revenue,
            expenses,
            gross_margin: revenue - expenses,
            tax_estimate: tax,
            data_source: DataSource::Dummy,
        });
    }

    tracing::info!(subdomain = DEMO_SUBDOMAIN, "seeded demo firm");
    seed
}
