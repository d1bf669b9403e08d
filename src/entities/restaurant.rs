//! Restaurant entity - An establishment owning a catalog of products.
//!
//! The `discount` column is the restaurant-level promotional percentage; a
//! value of 0 means no promotion is running. Discount application walks the
//! restaurant's products and reprices the ones that participate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Restaurant database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the restaurant
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name
    pub name: String,
    /// Optional longer description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Street address
    pub address: String,
    /// Postal code
    pub postal_code: String,
    /// Optional website URL
    pub url: Option<String>,
    /// Flat shipping cost per order
    pub shipping_costs: f64,
    /// Rolling average service time, when known
    pub average_service_minutes: Option<f64>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Logo image path
    pub logo: Option<String>,
    /// Hero image path
    pub hero_image: Option<String>,
    /// Operational status (e.g. "online", "offline", "closed")
    pub status: String,
    /// Promotional discount percentage; 0 disables promotion
    pub discount: f64,
    /// Category of the restaurant
    pub restaurant_category_id: i32,
}

/// Defines relationships between Restaurant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each restaurant belongs to one restaurant category
    #[sea_orm(
        belongs_to = "super::restaurant_category::Entity",
        from = "Column::RestaurantCategoryId",
        to = "super::restaurant_category::Column::Id"
    )]
    RestaurantCategory,
    /// Products offered by this restaurant
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::restaurant_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantCategory.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
