//! Currency entity - the exchange-rate table.
//!
//! `exchange_rate_to_usd` is the number of units of this currency per 1 USD.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Currency database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Three-letter currency code, unique
    #[sea_orm(unique)]
    pub code: String,
    /// Display name (e.g., "Chinese Yuan")
    pub name: String,
    /// Display symbol (e.g., "¥")
    pub symbol: String,
    /// Units of this currency per 1 USD
    pub exchange_rate_to_usd: f64,
    /// Whether the currency can be picked for new records
    pub is_active: bool,
}

/// Currencies are referenced by code only, so there are no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
