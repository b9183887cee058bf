use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use saldoo_auth::{Account, Directory, DirectoryError, NewAccount, Profile, Role};
use saldoo_core::{AccountId, CompanyId, UserId};
use saldoo_dashboard::{Company, Faq, FinancialPeriod, FinancialSource, SourceError};

/// A user row as stored: the firm is referenced, not embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub id: UserId,
    pub account_id: AccountId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub company_id: Option<CompanyId>,
}

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    users: HashMap<UserId, DirectoryUser>,
    companies: HashMap<CompanyId, Company>,
    periods: Vec<FinancialPeriod>,
    faqs: HashMap<AccountId, Vec<Faq>>,
}

impl Tables {
    fn subdomain_taken(&self, subdomain: &str) -> bool {
        self.accounts.values().any(|a| a.subdomain == subdomain)
    }
}

/// Directory and financial data held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Tables>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(&self, account: Account) {
        if let Ok(mut tables) = self.inner.write() {
            tables.accounts.insert(account.id, account);
        }
    }

    pub fn insert_user(&self, user: DirectoryUser) {
        if let Ok(mut tables) = self.inner.write() {
            tables.users.insert(user.id, user);
        }
    }

    pub fn insert_company(&self, company: Company) {
        if let Ok(mut tables) = self.inner.write() {
            tables.companies.insert(company.id, company);
        }
    }

    /// Insert or replace the period for the same company and month.
    pub fn insert_period(&self, period: FinancialPeriod) {
        if let Ok(mut tables) = self.inner.write() {
            tables.periods.retain(|p| {
                !(p.company_id == period.company_id && p.year == period.year && p.month == period.month)
            });
            tables.periods.push(period);
        }
    }

    pub fn insert_faq(&self, account_id: AccountId, faq: Faq) {
        if let Ok(mut tables) = self.inner.write() {
            tables.faqs.entry(account_id).or_default().push(faq);
        }
    }

    /// Flip a firm's active flag. Returns whether the firm exists.
    pub fn set_account_active(&self, account_id: AccountId, active: bool) -> bool {
        match self.inner.write() {
            Ok(mut tables) => match tables.accounts.get_mut(&account_id) {
                Some(account) => {
                    account.is_active = active;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn read_err() -> DirectoryError {
        DirectoryError::Unavailable("directory lock poisoned".to_string())
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, DirectoryError> {
        let tables = self.inner.read().map_err(|_| Self::read_err())?;
        let Some(user) = tables.users.get(&user_id) else {
            return Ok(None);
        };
        let Some(account) = tables.accounts.get(&user.account_id) else {
            return Ok(None);
        };
        Ok(Some(Profile {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            company_id: user.company_id,
            account: account.clone(),
        }))
    }

    async fn get_account_by_subdomain(&self, subdomain: &str) -> Result<Option<Account>, DirectoryError> {
        let tables = self.inner.read().map_err(|_| Self::read_err())?;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.is_active && a.subdomain == subdomain)
            .cloned())
    }

    async fn is_subdomain_available(&self, subdomain: &str) -> Result<bool, DirectoryError> {
        let tables = self.inner.read().map_err(|_| Self::read_err())?;
        Ok(!tables.subdomain_taken(subdomain))
    }

    async fn create_account_and_user(&self, new: &NewAccount) -> Result<AccountId, DirectoryError> {
        let mut tables = self.inner.write().map_err(|_| Self::read_err())?;
        if tables.subdomain_taken(new.subdomain.as_str()) {
            return Err(DirectoryError::Rejected(format!(
                "subdomain {} already exists",
                new.subdomain
            )));
        }
        if tables.users.contains_key(&new.user_id) {
            return Err(DirectoryError::Rejected(format!("user {} already exists", new.user_id)));
        }

        let account_id = AccountId::new();
        let account = Account {
            id: account_id,
            name: new.account_name.clone(),
            subdomain: new.subdomain.to_string(),
            logo_url: None,
            primary_color: saldoo_auth::profile::DEFAULT_PRIMARY_COLOR.to_string(),
            contrast_color: saldoo_auth::profile::DEFAULT_CONTRAST_COLOR.to_string(),
            is_active: true,
        };
        tables.accounts.insert(account_id, account);
        tables.users.insert(
            new.user_id,
            DirectoryUser {
                id: new.user_id,
                account_id,
                email: new.email.clone(),
                first_name: new.first_name.clone(),
                last_name: new.last_name.clone(),
                role: Role::Accountant,
                company_id: None,
            },
        );
        Ok(account_id)
    }
}

#[async_trait]
impl FinancialSource for InMemoryDirectory {
    async fn list_companies(&self, account_id: AccountId) -> Result<Vec<Company>, SourceError> {
        let tables = self
            .inner
            .read()
            .map_err(|_| SourceError::Unavailable("directory lock poisoned".to_string()))?;
        let mut companies: Vec<Company> = tables
            .companies
            .values()
            .filter(|c| c.account_id == account_id && c.is_active)
            .cloned()
            .collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn financial_periods(&self, company_id: CompanyId) -> Result<Vec<FinancialPeriod>, SourceError> {
        let tables = self
            .inner
            .read()
            .map_err(|_| SourceError::Unavailable("directory lock poisoned".to_string()))?;
        Ok(tables
            .periods
            .iter()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn faqs(&self, account_id: AccountId) -> Result<Vec<Faq>, SourceError> {
        let tables = self
            .inner
            .read()
            .map_err(|_| SourceError::Unavailable("directory lock poisoned".to_string()))?;
        Ok(tables.faqs.get(&account_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use saldoo_core::Subdomain;

    use super::*;

    fn new_account(subdomain: &str) -> NewAccount {
        NewAccount {
            user_id: UserId::new(),
            email: "an@kantoor.be".into(),
            first_name: "An".into(),
            last_name: "Claes".into(),
            account_name: "Kantoor Claes".into(),
            subdomain: Subdomain::parse(subdomain).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_then_lookup_profile_and_subdomain() {
        let dir = InMemoryDirectory::new();
        let new = new_account("kantoor");

        assert!(dir.is_subdomain_available("kantoor").await.unwrap());
        let account_id = dir.create_account_and_user(&new).await.unwrap();
        assert!(!dir.is_subdomain_available("kantoor").await.unwrap());

        let profile = dir.get_profile(new.user_id).await.unwrap().unwrap();
        assert_eq!(profile.role, Role::Accountant);
        assert_eq!(profile.account.id, account_id);
        assert_eq!(profile.account.primary_color, "#1e40af");

        let account = dir.get_account_by_subdomain("kantoor").await.unwrap().unwrap();
        assert_eq!(account.name, "Kantoor Claes");
    }

    #[tokio::test]
    async fn second_create_with_same_subdomain_is_rejected() {
        let dir = InMemoryDirectory::new();
        dir.create_account_and_user(&new_account("kantoor")).await.unwrap();

        let err = dir
            .create_account_and_user(&new_account("kantoor"))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Rejected(_)));
    }

    #[tokio::test]
    async fn inactive_firm_is_hidden_but_still_reserves_its_subdomain() {
        let dir = InMemoryDirectory::new();
        let account_id = dir.create_account_and_user(&new_account("kantoor")).await.unwrap();
        assert!(dir.set_account_active(account_id, false));

        assert_eq!(dir.get_account_by_subdomain("kantoor").await.unwrap(), None);
        assert!(!dir.is_subdomain_available("kantoor").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_user_has_no_profile() {
        let dir = InMemoryDirectory::new();
        assert_eq!(dir.get_profile(UserId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn companies_are_scoped_active_and_sorted() {
        let dir = InMemoryDirectory::new();
        let account_id = AccountId::new();
        for (name, active) in [("Zeeman", true), ("Atelier", true), ("Gesloten", false)] {
            dir.insert_company(Company {
                id: CompanyId::new(),
                account_id,
                name: name.into(),
                exact_online_division: None,
                is_active: active,
            });
        }
        dir.insert_company(Company {
            id: CompanyId::new(),
            account_id: AccountId::new(),
            name: "Elders".into(),
            exact_online_division: None,
            is_active: true,
        });

        let names: Vec<_> = dir
            .list_companies(account_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Atelier", "Zeeman"]);
    }
}
