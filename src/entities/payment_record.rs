//! Payment record entity - one payment applied against a payable.
//!
//! The payment currency may differ from the payable's currency.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_records")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the payable this payment settles
    pub payable_id: i64,
    /// Amount paid in `currency_code`
    pub amount: f64,
    /// Currency the payment was made in
    pub currency_code: String,
    /// Date the payment was made
    pub payment_date: Date,
}

/// Defines relationships between PaymentRecord and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one payable
    #[sea_orm(
        belongs_to = "super::payable::Entity",
        from = "Column::PayableId",
        to = "super::payable::Column::Id"
    )]
    Payable,
}

impl Related<super::payable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
