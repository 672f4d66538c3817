//! Read-only data sources for the aggregation core.
//!
//! The core depends on [`LedgerSource`] only. [`database::DatabaseSource`] reads the
//! `SeaORM` tables and [`LedgerData`] doubles as an in-memory source loaded from a JSON
//! snapshot. Both normalise their rows into the canonical records of
//! [`crate::core::model`] before handing them over.

pub mod database;
pub mod snapshot;

use crate::core::dashboard::DashboardInput;
use crate::core::model::{BankAccount, BankAccountBalance, CurrencyRate, Payable, PaymentRecord};
use crate::errors::Result;
use serde::{Deserialize, Serialize};

pub use database::DatabaseSource;

/// Read-only feeds consumed by the dashboard.
#[allow(async_fn_in_trait)]
pub trait LedgerSource {
    /// Every payable.
    async fn payables(&self) -> Result<Vec<Payable>>;

    /// Payment records, optionally only those of one payable.
    async fn payment_records(&self, payable_id: Option<i64>) -> Result<Vec<PaymentRecord>>;

    /// The currency table.
    async fn currency_rates(&self) -> Result<Vec<CurrencyRate>>;

    /// Every bank account, active or not.
    async fn bank_accounts(&self) -> Result<Vec<BankAccount>>;

    /// Every bank balance breakdown row.
    async fn bank_account_balances(&self) -> Result<Vec<BankAccountBalance>>;

    /// A single payable by id.
    async fn payable(&self, id: i64) -> Result<Option<Payable>> {
        Ok(self.payables().await?.into_iter().find(|p| p.id == id))
    }
}

/// Every feed, fetched at once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerData {
    /// Currency table
    pub currencies: Vec<CurrencyRate>,
    /// Payables
    pub payables: Vec<Payable>,
    /// Payment records
    pub payment_records: Vec<PaymentRecord>,
    /// Bank accounts
    pub bank_accounts: Vec<BankAccount>,
    /// Bank balance rows
    pub bank_account_balances: Vec<BankAccountBalance>,
}

impl LedgerData {
    /// Fetches every feed from `source`, issuing the queries concurrently.
    pub async fn fetch<S: LedgerSource>(source: &S) -> Result<Self> {
        let (currencies, payables, payment_records, bank_accounts, bank_account_balances) = tokio::try_join!(
            source.currency_rates(),
            source.payables(),
            source.payment_records(None),
            source.bank_accounts(),
            source.bank_account_balances(),
        )?;

        Ok(Self {
            currencies,
            payables,
            payment_records,
            bank_accounts,
            bank_account_balances,
        })
    }

    /// Borrowed view for [`crate::core::dashboard::build_dashboard`].
    #[must_use]
    pub fn as_input(&self) -> DashboardInput<'_> {
        DashboardInput {
            currencies: &self.currencies,
            payables: &self.payables,
            payments: &self.payment_records,
            accounts: &self.bank_accounts,
            balances: &self.bank_account_balances,
        }
    }
}
