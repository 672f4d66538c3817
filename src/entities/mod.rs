//! Entity module - SeaORM definitions of the tables the tracker reads.
//! The core never touches these directly: `crate::source::database` maps rows into the
//! canonical records in `crate::core::model`.

pub mod bank_account;
pub mod bank_account_balance;
pub mod currency;
pub mod payable;
pub mod payment_record;

// Re-export specific types to avoid conflicts
pub use bank_account::{Column as BankAccountColumn, Entity as BankAccount, Model as BankAccountModel};
pub use bank_account_balance::{
    Column as BankAccountBalanceColumn, Entity as BankAccountBalance, Model as BankAccountBalanceModel,
};
pub use currency::{Column as CurrencyColumn, Entity as Currency, Model as CurrencyModel};
pub use payable::{Column as PayableColumn, Entity as Payable, Model as PayableModel};
pub use payment_record::{
    Column as PaymentRecordColumn, Entity as PaymentRecord, Model as PaymentRecordModel,
};
