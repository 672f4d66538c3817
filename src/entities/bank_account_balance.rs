//! Bank account balance entity - one availability bucket of an account's balance.
//!
//! `status` is one of `Available`, `Unavailable`, `Pending`, `Frozen`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bank account balance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_account_balances")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning bank account
    pub account_id: i64,
    /// Amount in the account's currency
    pub balance: f64,
    /// Availability status code
    pub status: String,
}

/// Defines relationships between BankAccountBalance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each row belongs to one bank account
    #[sea_orm(
        belongs_to = "super::bank_account::Entity",
        from = "Column::AccountId",
        to = "super::bank_account::Column::Id"
    )]
    BankAccount,
}

impl Related<super::bank_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
