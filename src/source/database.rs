//! `SeaORM` data source.
//!
//! Reads the tracker tables and maps rows into the canonical records. This is the only
//! place that knows about stored text codes: unknown importance, status or balance codes
//! are logged and mapped to their defaults instead of failing the whole read.
//!
//! `SQLite` lets any value land in a REAL column, so amount columns are selected through
//! [`numeric_or_null`]: a stored value that is not a number reads as NaN, which the core
//! reports as a malformed amount, instead of failing the query for every row.

use super::LedgerSource;
use crate::core::model::{
    BalanceStatus, BankAccount, BankAccountBalance, CurrencyRate, Importance, Payable, PayableStatus,
    PaymentRecord,
};
use crate::entities::{bank_account, bank_account_balance, currency, payable, payment_record};
use crate::errors::Result;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{DatabaseConnection, FromQueryResult, QueryOrder, QuerySelect, Select, prelude::*};
use tracing::{instrument, warn};

/// Reads the ledger from a database connection.
#[derive(Clone, Copy, Debug)]
pub struct DatabaseSource<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DatabaseSource<'a> {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Selects `column` as a REAL, or NULL when the stored value is not numeric.
fn numeric_or_null(column: &str) -> SimpleExpr {
    Expr::cust(format!(
        "CASE WHEN typeof({column}) IN ('real', 'integer') THEN CAST({column} AS REAL) END"
    ))
}

fn amount_or_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

#[derive(Debug, FromQueryResult)]
struct PayableRow {
    id: i64,
    payable_number: String,
    supplier_name: Option<String>,
    amount: Option<f64>,
    currency_code: String,
    due_date: Date,
    importance: String,
    status: String,
}

#[derive(Debug, FromQueryResult)]
struct PaymentRow {
    id: i64,
    payable_id: i64,
    amount: Option<f64>,
    currency_code: String,
    payment_date: Date,
}

#[derive(Debug, FromQueryResult)]
struct CurrencyRow {
    code: String,
    name: String,
    symbol: String,
    exchange_rate_to_usd: Option<f64>,
    is_active: bool,
}

#[derive(Debug, FromQueryResult)]
struct AccountRow {
    id: i64,
    account_name: String,
    bank_name: String,
    currency_code: String,
    current_balance: Option<f64>,
    is_active: bool,
}

#[derive(Debug, FromQueryResult)]
struct BalanceRow {
    id: i64,
    account_id: i64,
    balance: Option<f64>,
    status: String,
}

fn select_payables() -> Select<crate::entities::Payable> {
    crate::entities::Payable::find()
        .select_only()
        .columns([
            payable::Column::Id,
            payable::Column::PayableNumber,
            payable::Column::SupplierName,
            payable::Column::CurrencyCode,
            payable::Column::DueDate,
            payable::Column::Importance,
            payable::Column::Status,
        ])
        .expr_as(numeric_or_null("amount"), "amount")
}

impl LedgerSource for DatabaseSource<'_> {
    #[instrument(skip(self))]
    async fn payables(&self) -> Result<Vec<Payable>> {
        let rows = select_payables()
            .order_by_asc(payable::Column::Id)
            .into_model::<PayableRow>()
            .all(self.db)
            .await?;
        Ok(rows.into_iter().map(payable_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn payment_records(&self, payable_id: Option<i64>) -> Result<Vec<PaymentRecord>> {
        let mut query = crate::entities::PaymentRecord::find()
            .select_only()
            .columns([
                payment_record::Column::Id,
                payment_record::Column::PayableId,
                payment_record::Column::CurrencyCode,
                payment_record::Column::PaymentDate,
            ])
            .expr_as(numeric_or_null("amount"), "amount");
        if let Some(id) = payable_id {
            query = query.filter(payment_record::Column::PayableId.eq(id));
        }
        let rows = query
            .order_by_asc(payment_record::Column::PaymentDate)
            .order_by_asc(payment_record::Column::Id)
            .into_model::<PaymentRow>()
            .all(self.db)
            .await?;
        Ok(rows.into_iter().map(payment_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn currency_rates(&self) -> Result<Vec<CurrencyRate>> {
        let rows = crate::entities::Currency::find()
            .select_only()
            .columns([
                currency::Column::Code,
                currency::Column::Name,
                currency::Column::Symbol,
                currency::Column::IsActive,
            ])
            .expr_as(numeric_or_null("exchange_rate_to_usd"), "exchange_rate_to_usd")
            .order_by_asc(currency::Column::Code)
            .into_model::<CurrencyRow>()
            .all(self.db)
            .await?;
        Ok(rows.into_iter().map(currency_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn bank_accounts(&self) -> Result<Vec<BankAccount>> {
        let rows = crate::entities::BankAccount::find()
            .select_only()
            .columns([
                bank_account::Column::Id,
                bank_account::Column::AccountName,
                bank_account::Column::BankName,
                bank_account::Column::CurrencyCode,
                bank_account::Column::IsActive,
            ])
            .expr_as(numeric_or_null("current_balance"), "current_balance")
            .order_by_asc(bank_account::Column::Id)
            .into_model::<AccountRow>()
            .all(self.db)
            .await?;
        Ok(rows.into_iter().map(account_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn bank_account_balances(&self) -> Result<Vec<BankAccountBalance>> {
        let rows = crate::entities::BankAccountBalance::find()
            .select_only()
            .columns([
                bank_account_balance::Column::Id,
                bank_account_balance::Column::AccountId,
                bank_account_balance::Column::Status,
            ])
            .expr_as(numeric_or_null("balance"), "balance")
            .order_by_asc(bank_account_balance::Column::Id)
            .into_model::<BalanceRow>()
            .all(self.db)
            .await?;
        Ok(rows.into_iter().map(balance_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn payable(&self, id: i64) -> Result<Option<Payable>> {
        let row = select_payables()
            .filter(payable::Column::Id.eq(id))
            .into_model::<PayableRow>()
            .one(self.db)
            .await?;
        Ok(row.map(payable_from_row))
    }
}

fn payable_from_row(row: PayableRow) -> Payable {
    let importance = Importance::from_code(&row.importance).unwrap_or_else(|| {
        warn!(payable_id = row.id, code = %row.importance, "Unknown importance code, using normal");
        Importance::Normal
    });
    let status = PayableStatus::from_code(&row.status).unwrap_or_else(|| {
        warn!(payable_id = row.id, code = %row.status, "Unknown status code, using pending");
        PayableStatus::Pending
    });

    Payable {
        id: row.id,
        payable_number: row.payable_number,
        supplier_name: row.supplier_name,
        amount: amount_or_nan(row.amount),
        currency_code: row.currency_code,
        due_date: row.due_date,
        importance,
        status,
    }
}

fn payment_from_row(row: PaymentRow) -> PaymentRecord {
    PaymentRecord {
        id: row.id,
        payable_id: row.payable_id,
        amount: amount_or_nan(row.amount),
        currency_code: row.currency_code,
        payment_date: row.payment_date,
    }
}

fn currency_from_row(row: CurrencyRow) -> CurrencyRate {
    CurrencyRate {
        code: row.code,
        name: row.name,
        symbol: row.symbol,
        exchange_rate_to_usd: amount_or_nan(row.exchange_rate_to_usd),
        is_active: row.is_active,
    }
}

fn account_from_row(row: AccountRow) -> BankAccount {
    BankAccount {
        id: row.id,
        account_name: row.account_name,
        bank_name: row.bank_name,
        currency_code: row.currency_code,
        current_balance: amount_or_nan(row.current_balance),
        is_active: row.is_active,
    }
}

fn balance_from_row(row: BalanceRow) -> BankAccountBalance {
    let status = BalanceStatus::from_code(&row.status).unwrap_or_else(|| {
        warn!(row_id = row.id, code = %row.status, "Unknown balance status, using pending");
        BalanceStatus::Pending
    });

    BankAccountBalance {
        id: row.id,
        account_id: row.account_id,
        balance: amount_or_nan(row.balance),
        status,
    }
}
