//! JSON snapshot source.
//!
//! A snapshot is one JSON document holding every feed:
//!
//! ```json
//! {
//!   "currencies": [{"code": "CNY", "exchangeRateToUsd": 7.2}],
//!   "payables": [{"id": 1, "payableNumber": "AP-1", "amount": 1000,
//!                 "currencyCode": "USD", "dueDate": "2024-06-30"}],
//!   "paymentRecords": [],
//!   "bankAccounts": [],
//!   "bankAccountBalances": []
//! }
//! ```
//!
//! Missing collections default to empty. Amounts may be numbers or numeric strings; a
//! non-numeric amount is kept as NaN for the core to coerce and report. A document that is
//! not of this shape at all fails as a whole.

use super::{LedgerData, LedgerSource};
use crate::core::model::{BankAccount, BankAccountBalance, CurrencyRate, Payable, PaymentRecord};
use crate::errors::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

impl LedgerData {
    /// Parses a snapshot document.
    ///
    /// # Errors
    /// Returns [`Error::Snapshot`] if the document is not a valid ledger snapshot.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Snapshot {
            message: format!("Invalid ledger snapshot: {e}"),
        })
    }

    /// Reads and parses a snapshot file.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Snapshot`] if it is
    /// not a valid ledger snapshot.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading ledger snapshot from: {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        let data = Self::from_json_str(&contents)?;
        info!(
            payables = data.payables.len(),
            payments = data.payment_records.len(),
            accounts = data.bank_accounts.len(),
            "Loaded ledger snapshot"
        );
        Ok(data)
    }
}

impl LedgerSource for LedgerData {
    async fn payables(&self) -> Result<Vec<Payable>> {
        Ok(self.payables.clone())
    }

    async fn payment_records(&self, payable_id: Option<i64>) -> Result<Vec<PaymentRecord>> {
        Ok(self
            .payment_records
            .iter()
            .filter(|r| payable_id.is_none_or(|id| r.payable_id == id))
            .cloned()
            .collect())
    }

    async fn currency_rates(&self) -> Result<Vec<CurrencyRate>> {
        Ok(self.currencies.clone())
    }

    async fn bank_accounts(&self) -> Result<Vec<BankAccount>> {
        Ok(self.bank_accounts.clone())
    }

    async fn bank_account_balances(&self) -> Result<Vec<BankAccountBalance>> {
        Ok(self.bank_account_balances.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::core::model::{BalanceStatus, Importance};
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "currencies": [{"code": "CNY", "name": "Yuan", "symbol": "¥", "exchangeRateToUsd": "7.2"}],
        "payables": [
            {"id": 1, "payableNumber": "AP-1", "amount": 1000, "currencyCode": "USD",
             "dueDate": "2024-06-30", "importance": "important", "status": "partial"}
        ],
        "paymentRecords": [
            {"id": 1, "payableId": 1, "amount": 400, "currencyCode": "USD", "paymentDate": "2024-06-01"},
            {"id": 2, "payableId": 1, "amount": "n/a", "currencyCode": "CNY", "paymentDate": "2024-06-02"},
            {"id": 3, "payableId": 2, "amount": 5, "currencyCode": "USD", "paymentDate": "2024-06-03"}
        ],
        "bankAccounts": [{"id": 1, "accountName": "Ops", "currencyCode": "USD", "currentBalance": 10}],
        "bankAccountBalances": [{"id": 1, "accountId": 1, "balance": 3, "status": "Frozen"}]
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let data = LedgerData::from_json_str(SNAPSHOT).unwrap();

        assert_eq!(data.currencies[0].exchange_rate_to_usd, 7.2);
        assert!(data.currencies[0].is_active);
        assert_eq!(data.payables[0].importance, Importance::Important);
        assert!(data.payment_records[1].amount.is_nan());
        assert!(data.bank_accounts[0].is_active);
        assert_eq!(data.bank_account_balances[0].status, BalanceStatus::Frozen);
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let data = LedgerData::from_json_str("{}").unwrap();
        assert_eq!(data, LedgerData::default());
    }

    #[test]
    fn test_malformed_document_fails_fast() {
        assert!(matches!(
            LedgerData::from_json_str(r#"{"payables": {"id": 1}}"#),
            Err(Error::Snapshot { .. })
        ));
        assert!(matches!(
            LedgerData::from_json_str("not json"),
            Err(Error::Snapshot { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{SNAPSHOT}").unwrap();

        let data = LedgerData::load(file.path()).unwrap();
        assert_eq!(data.payables.len(), 1);

        assert!(matches!(
            LedgerData::load("/nonexistent/snapshot.json"),
            Err(Error::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_source_filters_payment_records() -> Result<()> {
        let data = LedgerData::from_json_str(SNAPSHOT)?;

        assert_eq!(data.payment_records(None).await?.len(), 3);
        assert_eq!(data.payment_records(Some(1)).await?.len(), 2);
        assert!(data.payable(1).await?.is_some());
        assert!(data.payable(42).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_collects_every_feed() -> Result<()> {
        let data = LedgerData::from_json_str(SNAPSHOT)?;
        let fetched = LedgerData::fetch(&data).await?;
        // record 2 carries a NaN amount, so compare the NaN-free feeds only
        assert_eq!(fetched.payables, data.payables);
        assert_eq!(fetched.currencies, data.currencies);
        assert_eq!(fetched.bank_accounts, data.bank_accounts);
        assert_eq!(fetched.payment_records.len(), 3);
        Ok(())
    }
}
