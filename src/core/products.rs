//! Product catalog logic - listing, CRUD, popularity ranking, and
//! promotion/discount application.
//!
//! All functions are async, take the database connection first, and return
//! `Result` so callers decide how failures surface. Repricing always starts
//! from `base_price` (see [`crate::core::pricing`]), which makes discount
//! application idempotent.

use crate::{
    core::pricing,
    entities::{
        Product, ProductCategory, Restaurant, RestaurantCategory, order_product, product,
        product_category, restaurant, restaurant_category,
    },
    errors::{Error, Result},
};
use sea_orm::{
    Condition, FromQueryResult, JoinType, QueryOrder, QuerySelect, Set,
    prelude::*,
    sea_query::Expr,
};
use serde::{Deserialize, Serialize};

/// How many entries the popularity ranking returns at most.
const POPULAR_LIMIT: usize = 3;

/// A product joined with its eager-loaded category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    /// The product row
    #[serde(flatten)]
    pub product: product::Model,
    /// Its category, if the referenced row exists
    pub product_category: Option<product_category::Model>,
}

/// A restaurant joined with its eager-loaded category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantWithCategory {
    /// The restaurant row
    #[serde(flatten)]
    pub restaurant: restaurant::Model,
    /// Its category, if the referenced row exists
    pub restaurant_category: Option<restaurant_category::Model>,
}

/// One entry of the popularity ranking: a product annotated with total units
/// sold and its owning restaurant (with category).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularProduct {
    /// The product row
    #[serde(flatten)]
    pub product: product::Model,
    /// Total units sold across all orders
    pub sold_product_count: i64,
    /// The owning restaurant with its category
    pub restaurant: Option<RestaurantWithCategory>,
}

/// Fields accepted when creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Display name
    pub name: String,
    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Initial price
    pub price: f64,
    /// Undiscounted reference price; defaults to `price` when omitted
    #[serde(default)]
    pub base_price: Option<f64>,
    /// Promotion participation flag
    #[serde(default)]
    pub promote: Option<bool>,
    /// Owning restaurant
    pub restaurant_id: i32,
    /// Category of the product
    pub product_category_id: i32,
}

/// Partial update payload; only the provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductChanges {
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New effective price
    pub price: Option<f64>,
    /// New reference price
    pub base_price: Option<f64>,
    /// New promotion flag
    pub promote: Option<bool>,
    /// New category
    pub product_category_id: Option<i32>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("product name cannot be empty"));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::validation(format!("invalid price: {price}")));
    }
    Ok(())
}

/// Retrieves all products of a restaurant, each with its eager-loaded
/// category.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_by_restaurant(
    db: &DatabaseConnection,
    restaurant_id: i32,
) -> Result<Vec<ProductWithCategory>> {
    let rows = Product::find()
        .filter(product::Column::RestaurantId.eq(restaurant_id))
        .find_also_related(ProductCategory)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(prod, category)| ProductWithCategory {
            product: prod,
            product_category: category,
        })
        .collect())
}

/// Retrieves a single product by id with its category.
///
/// # Errors
/// Returns [`Error::NotFound`] when no product has the given id, or an error
/// if the database query fails.
pub async fn get_with_category(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<ProductWithCategory> {
    let (prod, category) = Product::find_by_id(product_id)
        .find_also_related(ProductCategory)
        .one(db)
        .await?
        .ok_or(Error::not_found("product", product_id))?;

    Ok(ProductWithCategory {
        product: prod,
        product_category: category,
    })
}

/// Creates a new product, returning the persisted row with its generated id.
///
/// `base_price` defaults to the submitted price so a freshly created product
/// starts undiscounted.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty name or a non-finite/negative
/// price, or an error if the insert fails.
pub async fn create_product(db: &DatabaseConnection, new: NewProduct) -> Result<product::Model> {
    validate_name(&new.name)?;
    validate_price(new.price)?;
    let base_price = new.base_price.unwrap_or(new.price);
    validate_price(base_price)?;

    let prod = product::ActiveModel {
        name: Set(new.name.trim().to_string()),
        description: Set(new.description),
        price: Set(new.price),
        base_price: Set(base_price),
        promote: Set(new.promote),
        restaurant_id: Set(new.restaurant_id),
        product_category_id: Set(new.product_category_id),
        ..Default::default()
    };
    prod.insert(db).await.map_err(Into::into)
}

/// Applies a partial update to an existing product and returns the refreshed
/// row.
///
/// # Errors
/// Returns [`Error::NotFound`] when the product does not exist,
/// [`Error::Validation`] for invalid fields, or an error if the update fails.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i32,
    changes: ProductChanges,
) -> Result<product::Model> {
    let mut prod: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::not_found("product", product_id))?
        .into();

    if let Some(name) = changes.name {
        validate_name(&name)?;
        prod.name = Set(name.trim().to_string());
    }
    if let Some(description) = changes.description {
        prod.description = Set(Some(description));
    }
    if let Some(price) = changes.price {
        validate_price(price)?;
        prod.price = Set(price);
    }
    if let Some(base_price) = changes.base_price {
        validate_price(base_price)?;
        prod.base_price = Set(base_price);
    }
    if let Some(promote) = changes.promote {
        prod.promote = Set(Some(promote));
    }
    if let Some(category_id) = changes.product_category_id {
        prod.product_category_id = Set(category_id);
    }

    prod.update(db).await.map_err(Into::into)
}

/// Deletes a product by id, returning the number of rows removed.
///
/// Zero rows is not an error; callers turn the count into a user-facing
/// message.
///
/// # Errors
/// Returns an error if the delete fails.
pub async fn delete_product(db: &DatabaseConnection, product_id: i32) -> Result<u64> {
    let outcome = Product::delete_by_id(product_id).exec(db).await?;
    Ok(outcome.rows_affected)
}

/// Flips a product's promotion flag and returns the refreshed row.
///
/// An unset flag counts as participating, so toggling it sets `false`; only
/// an explicit `true` toggles to `false`, everything else toggles to `true`.
/// The flag is always explicit after the first toggle.
///
/// # Errors
/// Returns [`Error::NotFound`] when the product does not exist, or an error
/// if the update fails.
pub async fn toggle_promotion(db: &DatabaseConnection, product_id: i32) -> Result<product::Model> {
    let prod = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::not_found("product", product_id))?;

    let flipped = !pricing::applies_promotion(prod.promote);
    let mut active: product::ActiveModel = prod.into();
    active.promote = Set(Some(flipped));

    active.update(db).await.map_err(Into::into)
}

/// Fetches a product with its category, repricing it first when the owning
/// restaurant runs a discount and the product participates in promotion.
///
/// The new price is persisted before returning. Recomputation starts from
/// `base_price`, so repeated calls settle on the same price.
///
/// # Errors
/// Returns [`Error::NotFound`] when either the restaurant or the product is
/// missing, or an error if a database operation fails.
pub async fn product_with_live_discount(
    db: &DatabaseConnection,
    restaurant_id: i32,
    product_id: i32,
) -> Result<ProductWithCategory> {
    let rest = Restaurant::find_by_id(restaurant_id)
        .one(db)
        .await?
        .ok_or(Error::not_found("restaurant", restaurant_id))?;

    let (prod, category) = Product::find_by_id(product_id)
        .find_also_related(ProductCategory)
        .one(db)
        .await?
        .ok_or(Error::not_found("product", product_id))?;

    let prod = if pricing::applies_promotion(prod.promote) && pricing::has_discount(rest.discount) {
        let new_price = pricing::effective_price(prod.base_price, rest.discount);
        let mut active: product::ActiveModel = prod.into();
        active.price = Set(new_price);
        active.update(db).await?
    } else {
        prod
    };

    Ok(ProductWithCategory {
        product: prod,
        product_category: category,
    })
}

/// Applies the restaurant's discount across its catalog and returns the
/// refreshed product list with categories.
///
/// With a nonzero discount, a single filtered bulk UPDATE reprices every
/// product of the restaurant whose promote flag is not explicitly `false`:
/// `price = base_price * factor`. With a zero discount the catalog is left
/// untouched; prices are not reset.
///
/// # Errors
/// Returns [`Error::NotFound`] when the restaurant does not exist, or an
/// error if a database operation fails.
pub async fn apply_restaurant_discount(
    db: &DatabaseConnection,
    restaurant_id: i32,
) -> Result<Vec<ProductWithCategory>> {
    let rest = Restaurant::find_by_id(restaurant_id)
        .one(db)
        .await?
        .ok_or(Error::not_found("restaurant", restaurant_id))?;

    if pricing::has_discount(rest.discount) {
        let factor = pricing::discount_factor(rest.discount);
        Product::update_many()
            .col_expr(
                product::Column::Price,
                Expr::col(product::Column::BasePrice).mul(factor),
            )
            .filter(product::Column::RestaurantId.eq(restaurant_id))
            .filter(
                Condition::any()
                    .add(product::Column::Promote.is_null())
                    .add(product::Column::Promote.eq(true)),
            )
            .exec(db)
            .await?;
    }

    list_by_restaurant(db, restaurant_id).await
}

/// Flat row produced by the popularity aggregation query.
#[derive(Debug, FromQueryResult)]
struct PopularRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: f64,
    base_price: f64,
    promote: Option<bool>,
    restaurant_id: i32,
    product_category_id: i32,
    sold_product_count: i64,
}

/// Ranks products by total units sold and returns the top 3.
///
/// Sums `order_products.quantity` per product (inner join, so products never
/// ordered are excluded), orders by the sum descending, and truncates in
/// memory. Tie order among equal counts is store-defined. Each entry carries
/// its restaurant with the restaurant's category.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn popular_products(db: &DatabaseConnection) -> Result<Vec<PopularProduct>> {
    let mut rows: Vec<PopularRow> = Product::find()
        .select_only()
        .columns([
            product::Column::Id,
            product::Column::Name,
            product::Column::Description,
            product::Column::Price,
            product::Column::BasePrice,
            product::Column::Promote,
            product::Column::RestaurantId,
            product::Column::ProductCategoryId,
        ])
        .column_as(order_product::Column::Quantity.sum(), "sold_product_count")
        .join(JoinType::InnerJoin, product::Relation::OrderProduct.def())
        .group_by(product::Column::Id)
        .order_by_desc(order_product::Column::Quantity.sum())
        .into_model::<PopularRow>()
        .all(db)
        .await?;
    rows.truncate(POPULAR_LIMIT);

    let mut ranking = Vec::with_capacity(rows.len());
    for row in rows {
        let rest = Restaurant::find_by_id(row.restaurant_id)
            .find_also_related(RestaurantCategory)
            .one(db)
            .await?
            .map(|(rest, category)| RestaurantWithCategory {
                restaurant: rest,
                restaurant_category: category,
            });

        ranking.push(PopularProduct {
            product: product::Model {
                id: row.id,
                name: row.name,
                description: row.description,
                price: row.price,
                base_price: row.base_price,
                promote: row.promote,
                restaurant_id: row.restaurant_id,
                product_category_id: row.product_category_id,
            },
            sold_product_count: row.sold_product_count,
            restaurant: rest,
        });
    }
    Ok(ranking)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_product_echoes_fields() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;

        let created = create_product(
            &db,
            NewProduct {
                name: "Pizza".to_string(),
                description: None,
                price: 9.5,
                base_price: None,
                promote: None,
                restaurant_id: rest.id,
                product_category_id: category.id,
            },
        )
        .await?;

        assert!(created.id > 0);
        assert_eq!(created.name, "Pizza");
        assert_eq!(created.price, 9.5);
        assert_eq!(created.base_price, 9.5);
        assert_eq!(created.promote, None);
        assert_eq!(created.restaurant_id, rest.id);
        assert_eq!(created.product_category_id, category.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;

        for (name, price) in [
            ("", 10.0),
            ("   ", 10.0),
            ("Soup", -1.0),
            ("Soup", f64::NAN),
            ("Soup", f64::INFINITY),
        ] {
            let result = create_product(
                &db,
                NewProduct {
                    name: name.to_string(),
                    description: None,
                    price,
                    base_price: None,
                    promote: None,
                    restaurant_id: rest.id,
                    product_category_id: category.id,
                },
            )
            .await;
            assert!(matches!(
                result.unwrap_err(),
                Error::Validation { message: _ }
            ));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_list_by_restaurant_with_category() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;
        let other = create_test_restaurant(&db, "Elsewhere", 0.0).await?;

        let mine = create_test_product(&db, "Pasta", 12.0, None, rest.id, category.id).await?;
        create_test_product(&db, "Burger", 8.0, None, other.id, category.id).await?;

        let listed = list_by_restaurant(&db, rest.id).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].product, mine);
        assert_eq!(listed[0].product_category.as_ref().unwrap().id, category.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_with_category_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_with_category(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "product",
                id: 999
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_applies_only_given_fields() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;
        let prod = create_test_product(&db, "Original", 10.0, None, rest.id, category.id).await?;

        let updated = update_product(
            &db,
            prod.id,
            ProductChanges {
                name: Some("Renamed".to_string()),
                price: Some(11.0),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.price, 11.0);
        // Untouched fields survive
        assert_eq!(updated.base_price, prod.base_price);
        assert_eq!(updated.description, prod.description);
        assert_eq!(updated.promote, prod.promote);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_product(&db, 42, ProductChanges::default()).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_row_counts() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;
        let prod = create_test_product(&db, "Doomed", 5.0, None, rest.id, category.id).await?;

        assert_eq!(delete_product(&db, prod.id).await?, 1);
        // Second delete matches nothing and must not error
        assert_eq!(delete_product(&db, prod.id).await?, 0);
        assert_eq!(delete_product(&db, 999).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_promotion_is_involution() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;
        let prod = create_test_product(&db, "Flip", 5.0, None, rest.id, category.id).await?;

        // Unset participates, so the first toggle opts out.
        let off = toggle_promotion(&db, prod.id).await?;
        assert_eq!(off.promote, Some(false));

        let on = toggle_promotion(&db, prod.id).await?;
        assert_eq!(on.promote, Some(true));

        let off_again = toggle_promotion(&db, prod.id).await?;
        assert_eq!(off_again.promote, Some(false));

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_promotion_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = toggle_promotion(&db, 7).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_live_discount_reprices_and_is_idempotent() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(20.0).await?;
        let prod = create_test_product(&db, "Pizza", 10.0, None, rest.id, category.id).await?;

        let first = product_with_live_discount(&db, rest.id, prod.id).await?;
        assert_eq!(first.product.price, 8.0);

        // Recomputed from base_price, so a second pass does not compound.
        let second = product_with_live_discount(&db, rest.id, prod.id).await?;
        assert_eq!(second.product.price, 8.0);
        assert_eq!(second.product.base_price, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_live_discount_skips_opted_out_product() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(50.0).await?;
        let prod =
            create_test_product(&db, "Stubborn", 10.0, Some(false), rest.id, category.id).await?;

        let fetched = product_with_live_discount(&db, rest.id, prod.id).await?;
        assert_eq!(fetched.product.price, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_zero_is_noop() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;
        create_test_product(&db, "A", 10.0, None, rest.id, category.id).await?;
        create_test_product(&db, "B", 20.0, Some(true), rest.id, category.id).await?;

        let listed = apply_restaurant_discount(&db, rest.id).await?;
        assert_eq!(listed.len(), 2);
        for entry in &listed {
            assert_eq!(entry.product.price, entry.product.base_price);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_reprices_participating_products() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(20.0).await?;
        let unset = create_test_product(&db, "Unset", 10.0, None, rest.id, category.id).await?;
        let on = create_test_product(&db, "On", 20.0, Some(true), rest.id, category.id).await?;
        let off = create_test_product(&db, "Off", 30.0, Some(false), rest.id, category.id).await?;

        let listed = apply_restaurant_discount(&db, rest.id).await?;
        let price_of = |id: i32| {
            listed
                .iter()
                .find(|entry| entry.product.id == id)
                .unwrap()
                .product
                .price
        };

        assert_eq!(price_of(unset.id), 8.0);
        assert_eq!(price_of(on.id), 16.0);
        // Opted-out product keeps its price regardless of the discount
        assert_eq!(price_of(off.id), 30.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_twice_is_idempotent() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(20.0).await?;
        let prod = create_test_product(&db, "Pizza", 10.0, None, rest.id, category.id).await?;

        apply_restaurant_discount(&db, rest.id).await?;
        let again = apply_restaurant_discount(&db, rest.id).await?;

        assert_eq!(again[0].product.id, prod.id);
        assert_eq!(again[0].product.price, 8.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_over_hundred_floors_at_zero() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(150.0).await?;
        create_test_product(&db, "Freebie", 10.0, None, rest.id, category.id).await?;

        let listed = apply_restaurant_discount(&db, rest.id).await?;
        assert_eq!(listed[0].product.price, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_scopes_to_one_restaurant() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(50.0).await?;
        let other = create_test_restaurant(&db, "Elsewhere", 50.0).await?;
        create_test_product(&db, "Mine", 10.0, None, rest.id, category.id).await?;
        let theirs =
            create_test_product(&db, "Theirs", 10.0, None, other.id, category.id).await?;

        apply_restaurant_discount(&db, rest.id).await?;

        let untouched = get_with_category(&db, theirs.id).await?;
        assert_eq!(untouched.product.price, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_discount_restaurant_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = apply_restaurant_discount(&db, 1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "restaurant",
                id: 1
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_popular_products_ranks_and_truncates() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;
        let a = create_test_product(&db, "A", 1.0, None, rest.id, category.id).await?;
        let b = create_test_product(&db, "B", 2.0, None, rest.id, category.id).await?;
        let c = create_test_product(&db, "C", 3.0, None, rest.id, category.id).await?;
        let d = create_test_product(&db, "D", 4.0, None, rest.id, category.id).await?;
        // Never ordered, must not appear
        create_test_product(&db, "E", 5.0, None, rest.id, category.id).await?;

        create_test_order(&db, rest.id, &[(a.id, 1), (b.id, 5), (c.id, 3)]).await?;
        create_test_order(&db, rest.id, &[(b.id, 2), (d.id, 4)]).await?;

        let ranking = popular_products(&db).await?;
        assert_eq!(ranking.len(), 3);

        // b: 7, d: 4, c: 3 (a with 1 falls outside the top 3)
        assert_eq!(ranking[0].product.id, b.id);
        assert_eq!(ranking[0].sold_product_count, 7);
        assert_eq!(ranking[1].product.id, d.id);
        assert_eq!(ranking[1].sold_product_count, 4);
        assert_eq!(ranking[2].product.id, c.id);
        assert_eq!(ranking[2].sold_product_count, 3);

        // Nested restaurant and restaurant category come along
        let nested = ranking[0].restaurant.as_ref().unwrap();
        assert_eq!(nested.restaurant.id, rest.id);
        assert!(nested.restaurant_category.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_popular_products_empty_without_orders() -> Result<()> {
        let (db, rest, category) = setup_with_restaurant(0.0).await?;
        create_test_product(&db, "Lonely", 9.0, None, rest.id, category.id).await?;

        let ranking = popular_products(&db).await?;
        assert!(ranking.is_empty());

        Ok(())
    }
}
