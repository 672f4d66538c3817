//! Bank account entity.
//!
//! `current_balance` is the single stored balance; the breakdown by availability lives in
//! `bank_account_balances`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bank account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account display name
    pub account_name: String,
    /// Name of the bank
    pub bank_name: String,
    /// Currency the account is held in
    pub currency_code: String,
    /// Stored current balance
    pub current_balance: f64,
    /// Soft-disable flag; inactive accounts are hidden from the dashboard
    pub is_active: bool,
}

/// Defines relationships between BankAccount and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many balance rows
    #[sea_orm(has_many = "super::bank_account_balance::Entity")]
    Balances,
}

impl Related<super::bank_account_balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Balances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
