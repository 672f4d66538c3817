//! Shared test utilities for the payables tracker.
//!
//! Builders for the canonical records with sensible defaults, plus helpers for setting up
//! an in-memory database and inserting rows into it.

use crate::{
    config::database::create_tables,
    core::{
        currency::RateTable,
        model::{BalanceStatus, BankAccount, BankAccountBalance, CurrencyRate, Importance, Payable, PayableStatus, PaymentRecord},
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Builds a date, panicking on an invalid calendar date (tests only).
#[must_use]
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Builds a rate table from `(code, rate)` pairs.
#[must_use]
pub fn rate_table(rates: &[(&str, f64)]) -> RateTable {
    let mut table = RateTable::new();
    for (code, rate) in rates {
        table.insert(code, *rate);
    }
    table
}

/// Creates a currency row with sensible defaults.
#[must_use]
pub fn currency(code: &str, rate: f64) -> CurrencyRate {
    CurrencyRate {
        code: code.to_string(),
        name: code.to_string(),
        symbol: code.to_string(),
        exchange_rate_to_usd: rate,
        is_active: true,
    }
}

/// Creates a payable with sensible defaults.
///
/// # Defaults
/// * `payable_number`: `AP-{id:04}`
/// * `supplier_name`: None
/// * `importance`: normal
/// * `status`: pending
#[must_use]
pub fn payable(id: i64, amount: f64, currency_code: &str, due_date: NaiveDate) -> Payable {
    Payable {
        id,
        payable_number: format!("AP-{id:04}"),
        supplier_name: None,
        amount,
        currency_code: currency_code.to_string(),
        due_date,
        importance: Importance::Normal,
        status: PayableStatus::Pending,
    }
}

/// Creates a payment record.
#[must_use]
pub fn payment(id: i64, payable_id: i64, amount: f64, currency_code: &str, payment_date: NaiveDate) -> PaymentRecord {
    PaymentRecord {
        id,
        payable_id,
        amount,
        currency_code: currency_code.to_string(),
        payment_date,
    }
}

/// Creates an active bank account.
#[must_use]
pub fn account(id: i64, name: &str, currency_code: &str, current_balance: f64) -> BankAccount {
    BankAccount {
        id,
        account_name: name.to_string(),
        bank_name: "Test Bank".to_string(),
        currency_code: currency_code.to_string(),
        current_balance,
        is_active: true,
    }
}

/// Creates a bank balance row.
#[must_use]
pub fn balance(id: i64, account_id: i64, amount: f64, status: BalanceStatus) -> BankAccountBalance {
    BankAccountBalance {
        id,
        account_id,
        balance: amount,
        status,
    }
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Inserts an active currency row.
pub async fn insert_currency(db: &DatabaseConnection, code: &str, rate: f64) -> Result<entities::CurrencyModel> {
    let model = entities::currency::ActiveModel {
        code: Set(code.to_string()),
        name: Set(code.to_string()),
        symbol: Set(code.to_string()),
        exchange_rate_to_usd: Set(rate),
        is_active: Set(true),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Inserts a payable with the given stored codes.
pub async fn insert_payable(
    db: &DatabaseConnection,
    id: i64,
    amount: f64,
    currency_code: &str,
    due_date: NaiveDate,
    importance: &str,
    status: &str,
) -> Result<entities::PayableModel> {
    let model = entities::payable::ActiveModel {
        id: Set(id),
        payable_number: Set(format!("AP-{id:04}")),
        supplier_name: Set(Some(format!("Supplier {id}"))),
        amount: Set(amount),
        currency_code: Set(currency_code.to_string()),
        due_date: Set(due_date),
        importance: Set(importance.to_string()),
        status: Set(status.to_string()),
    };
    Ok(model.insert(db).await?)
}

/// Inserts a payment record.
pub async fn insert_payment(
    db: &DatabaseConnection,
    id: i64,
    payable_id: i64,
    amount: f64,
    currency_code: &str,
    payment_date: NaiveDate,
) -> Result<entities::PaymentRecordModel> {
    let model = entities::payment_record::ActiveModel {
        id: Set(id),
        payable_id: Set(payable_id),
        amount: Set(amount),
        currency_code: Set(currency_code.to_string()),
        payment_date: Set(payment_date),
    };
    Ok(model.insert(db).await?)
}

/// Inserts an active bank account.
pub async fn insert_bank_account(
    db: &DatabaseConnection,
    id: i64,
    name: &str,
    currency_code: &str,
    current_balance: f64,
) -> Result<entities::BankAccountModel> {
    let model = entities::bank_account::ActiveModel {
        id: Set(id),
        account_name: Set(name.to_string()),
        bank_name: Set("Test Bank".to_string()),
        currency_code: Set(currency_code.to_string()),
        current_balance: Set(current_balance),
        is_active: Set(true),
    };
    Ok(model.insert(db).await?)
}

/// Inserts a bank balance row with a stored status code.
pub async fn insert_balance(
    db: &DatabaseConnection,
    id: i64,
    account_id: i64,
    amount: f64,
    status: &str,
) -> Result<entities::BankAccountBalanceModel> {
    let model = entities::bank_account_balance::ActiveModel {
        id: Set(id),
        account_id: Set(account_id),
        balance: Set(amount),
        status: Set(status.to_string()),
    };
    Ok(model.insert(db).await?)
}
