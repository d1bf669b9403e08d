//! Order line item entity - The (order, product) join table.
//!
//! Carries the quantity purchased per product per order, which the popularity
//! ranking sums. Rows are never mutated by this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Order this line item belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: i32,
    /// Product purchased
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i32,
    /// Units of the product in this order
    pub quantity: i32,
    /// Price per unit at purchase time
    pub unit_price: f64,
}

/// Defines relationships between OrderProduct and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The order side of the join
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// The product side of the join
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
