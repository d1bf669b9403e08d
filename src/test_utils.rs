//! Shared test utilities for the quickbite backend.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::products::{self, NewProduct},
    entities::Product,
    errors::Result,
};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a restaurant category with the given name.
pub async fn create_restaurant_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<crate::entities::restaurant_category::Model> {
    let category = crate::entities::restaurant_category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    category.insert(db).await.map_err(Into::into)
}

/// Creates a product category with the given name.
pub async fn create_product_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<crate::entities::product_category::Model> {
    let category = crate::entities::product_category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    category.insert(db).await.map_err(Into::into)
}

/// Creates a test restaurant with its own category and sensible defaults.
///
/// # Defaults
/// * `address`: "1 Test Street", `postal_code`: "41013"
/// * `status`: "online", `shipping_costs`: 1.5
pub async fn create_test_restaurant(
    db: &DatabaseConnection,
    name: &str,
    discount: f64,
) -> Result<crate::entities::restaurant::Model> {
    let category = create_restaurant_category(db, &format!("{name} category")).await?;

    let restaurant = crate::entities::restaurant::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        address: Set("1 Test Street".to_string()),
        postal_code: Set("41013".to_string()),
        url: Set(None),
        shipping_costs: Set(1.5),
        average_service_minutes: Set(None),
        email: Set(None),
        phone: Set(None),
        logo: Set(None),
        hero_image: Set(None),
        status: Set("online".to_string()),
        discount: Set(discount),
        restaurant_category_id: Set(category.id),
        ..Default::default()
    };
    restaurant.insert(db).await.map_err(Into::into)
}

/// Creates a test product through the core creation path.
///
/// `base_price` defaults to `price`, matching the creation semantics.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    promote: Option<bool>,
    restaurant_id: i32,
    product_category_id: i32,
) -> Result<crate::entities::product::Model> {
    products::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            description: None,
            price,
            base_price: None,
            promote,
            restaurant_id,
            product_category_id,
        },
    )
    .await
}

/// Sets up a complete test environment: database, a restaurant with the
/// given discount, and a product category.
/// Returns (db, restaurant, `product_category`) for common test scenarios.
pub async fn setup_with_restaurant(
    discount: f64,
) -> Result<(
    DatabaseConnection,
    crate::entities::restaurant::Model,
    crate::entities::product_category::Model,
)> {
    let db = setup_test_db().await?;
    let restaurant = create_test_restaurant(&db, "Test Restaurant", discount).await?;
    let category = create_product_category(&db, "Test Category").await?;
    Ok((db, restaurant, category))
}

/// Creates a test order with one line item per (`product_id`, quantity) pair.
///
/// Line items record the product's current price as the unit price; the
/// order total is the sum over line items.
pub async fn create_test_order(
    db: &DatabaseConnection,
    restaurant_id: i32,
    items: &[(i32, i32)],
) -> Result<crate::entities::order::Model> {
    let mut total = 0.0;
    let mut lines = Vec::with_capacity(items.len());
    for &(product_id, quantity) in items {
        let unit_price = Product::find_by_id(product_id)
            .one(db)
            .await?
            .map_or(0.0, |prod| prod.price);
        total += unit_price * f64::from(quantity);
        lines.push((product_id, quantity, unit_price));
    }

    let order = crate::entities::order::ActiveModel {
        created_at: Set(chrono::Utc::now().naive_utc()),
        address: Set("1 Test Street".to_string()),
        price: Set(total),
        restaurant_id: Set(restaurant_id),
        ..Default::default()
    };
    let order = order.insert(db).await?;

    for (product_id, quantity, unit_price) in lines {
        let line = crate::entities::order_product::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
        };
        line.insert(db).await?;
    }

    Ok(order)
}
