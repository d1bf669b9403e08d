//! Product entity - A menu item offered by a restaurant.
//!
//! A product carries two prices: `price` is the current effective price shown
//! to customers, `base_price` is the undiscounted reference price that
//! discount recomputation always starts from. The `promote` flag opts a
//! product out of promotions when it is explicitly `false`; unset counts as
//! participating.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name (e.g. "Margherita pizza")
    pub name: String,
    /// Optional longer description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Current effective price in currency units
    pub price: f64,
    /// Undiscounted reference price
    pub base_price: f64,
    /// Promotion participation; `None` and `Some(true)` both participate
    pub promote: Option<bool>,
    /// Owning restaurant
    pub restaurant_id: i32,
    /// Category of the product
    pub product_category_id: i32,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one restaurant
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id"
    )]
    Restaurant,
    /// Each product belongs to one product category
    #[sea_orm(
        belongs_to = "super::product_category::Entity",
        from = "Column::ProductCategoryId",
        to = "super::product_category::Column::Id"
    )]
    ProductCategory,
    /// Order line items referencing this product
    #[sea_orm(has_many = "super::order_product::Entity")]
    OrderProduct,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::product_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCategory.def()
    }
}

impl Related<super::order_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderProduct.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
