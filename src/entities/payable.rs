//! Payable entity - an amount owed to a supplier.
//!
//! `importance` and `status` are stored as text codes (`normal`/`important`/`very_important`,
//! `pending`/`partial`/`completed`/`overdue`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payable database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payables")]
pub struct Model {
    /// Unique identifier for the payable
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display key shown to users, unique
    #[sea_orm(unique)]
    pub payable_number: String,
    /// Supplier display name
    pub supplier_name: Option<String>,
    /// Amount owed in `currency_code`
    pub amount: f64,
    /// Currency the payable is denominated in
    pub currency_code: String,
    /// Date the payment falls due
    pub due_date: Date,
    /// Importance code
    pub importance: String,
    /// Status code as last written by data entry
    pub status: String,
}

/// Defines relationships between Payable and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One payable has many payment records
    #[sea_orm(has_many = "super::payment_record::Entity")]
    PaymentRecords,
}

impl Related<super::payment_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
