//! Database connection and schema bootstrap using `SeaORM`.
//!
//! The schema is generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database always matches the
//! Rust structs without hand-written SQL. Tables are created in dependency
//! order so foreign keys resolve.

use crate::entities::{
    Order, OrderProduct, Product, ProductCategory, Restaurant, RestaurantCategory,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at the given URL.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Lookup tables come first, then restaurants and products, then orders and
/// line items, so every foreign key target exists when its referrer is
/// created.
///
/// # Errors
/// Returns an error if any table creation statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(RestaurantCategory),
        schema.create_table_from_entity(ProductCategory),
        schema.create_table_from_entity(Restaurant),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Order),
        schema.create_table_from_entity(OrderProduct),
    ];

    for statement in &mut statements {
        // Restart-safe: the schema may already exist
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}
