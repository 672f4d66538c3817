//! Canonical domain records consumed by the aggregation core.
//!
//! These are the shapes every data source normalises into. The core never looks at
//! alternative field spellings; that belongs to the adapters in [`crate::source`].
//! Amounts are plain `f64`. A non-finite amount marks a malformed record, which the
//! reconciler and aggregators coerce to zero and report as an issue.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// How important a payable is, ordered from least to most important.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Importance {
    /// No special flag
    #[default]
    Normal,
    /// Flagged as important by data entry
    Important,
    /// Flagged as very important by data entry
    VeryImportant,
}

impl Importance {
    /// Parses the stored code, returning `None` for anything unrecognised.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "important" => Some(Self::Important),
            "very_important" => Some(Self::VeryImportant),
            _ => None,
        }
    }

    /// Canonical code as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Important => "important",
            Self::VeryImportant => "very_important",
        }
    }
}

impl From<String> for Importance {
    fn from(value: String) -> Self {
        Self::from_code(&value).unwrap_or_default()
    }
}

/// Lifecycle status of a payable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum PayableStatus {
    /// Nothing paid yet
    #[default]
    Pending,
    /// Some payments applied, balance outstanding
    Partial,
    /// Fully paid
    Completed,
    /// Past due with balance outstanding
    Overdue,
}

impl PayableStatus {
    /// Parses the stored code, returning `None` for anything unrecognised.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            "completed" => Some(Self::Completed),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    /// Canonical code as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }
}

impl From<String> for PayableStatus {
    fn from(value: String) -> Self {
        Self::from_code(&value).unwrap_or_default()
    }
}

/// Status of a single bank balance row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum BalanceStatus {
    /// Funds that can be spent
    Available,
    /// Funds held back (deposits, guarantees)
    Unavailable,
    /// In flight, not yet settled
    #[default]
    Pending,
    /// Blocked by the bank
    Frozen,
}

impl BalanceStatus {
    /// Parses the stored code, returning `None` for anything unrecognised.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "unavailable" => Some(Self::Unavailable),
            "pending" => Some(Self::Pending),
            "frozen" => Some(Self::Frozen),
            _ => None,
        }
    }

    /// Canonical code as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
            Self::Pending => "Pending",
            Self::Frozen => "Frozen",
        }
    }
}

impl From<String> for BalanceStatus {
    fn from(value: String) -> Self {
        Self::from_code(&value).unwrap_or_default()
    }
}

/// One row of the currency table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRate {
    /// Three-letter code, e.g. `CNY`
    pub code: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Display symbol
    #[serde(default)]
    pub symbol: String,
    /// Units of this currency per 1 USD
    #[serde(default = "missing_amount", deserialize_with = "lenient_amount")]
    pub exchange_rate_to_usd: f64,
    /// Whether the currency is offered for new records
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// An obligation to pay a supplier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payable {
    /// Primary key
    pub id: i64,
    /// Unique display key, e.g. `AP-2024-0012`
    pub payable_number: String,
    /// Supplier display name, if known
    #[serde(default)]
    pub supplier_name: Option<String>,
    /// Amount owed in `currency_code`
    #[serde(default = "missing_amount", deserialize_with = "lenient_amount")]
    pub amount: f64,
    /// Currency the payable is denominated in
    pub currency_code: String,
    /// Date the payment falls due
    pub due_date: NaiveDate,
    /// Importance flag
    #[serde(default)]
    pub importance: Importance,
    /// Status as last stored upstream; informational only
    #[serde(default)]
    pub status: PayableStatus,
}

/// One payment applied against a payable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Primary key
    pub id: i64,
    /// The payable this payment settles
    pub payable_id: i64,
    /// Amount paid in `currency_code`
    #[serde(default = "missing_amount", deserialize_with = "lenient_amount")]
    pub amount: f64,
    /// Currency the payment was made in, may differ from the payable's
    pub currency_code: String,
    /// Date the payment was made
    pub payment_date: NaiveDate,
}

/// A company bank account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    /// Primary key
    pub id: i64,
    /// Account display name
    pub account_name: String,
    /// Name of the bank holding the account
    #[serde(default)]
    pub bank_name: String,
    /// Currency the account is held in
    pub currency_code: String,
    /// Single stored balance, used when no breakdown rows exist
    #[serde(default = "missing_amount", deserialize_with = "lenient_amount")]
    pub current_balance: f64,
    /// Inactive accounts are left out of the dashboard
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// One breakdown row of a bank account's balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountBalance {
    /// Primary key
    pub id: i64,
    /// Owning bank account
    pub account_id: i64,
    /// Amount in the account's currency
    #[serde(default = "missing_amount", deserialize_with = "lenient_amount")]
    pub balance: f64,
    /// What kind of funds this row holds
    #[serde(default)]
    pub status: BalanceStatus,
}

const fn default_true() -> bool {
    true
}

const fn missing_amount() -> f64 {
    f64::NAN
}

/// Accepts a JSON number or a numeric string. Anything else becomes NaN so the core
/// can coerce it to zero and report it instead of rejecting the whole document.
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => n,
        RawAmount::Text(s) => s.trim().replace(',', "").parse().unwrap_or(f64::NAN),
        RawAmount::Other(_) => f64::NAN,
    })
}
