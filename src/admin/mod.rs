//! Orders and products endpoints of the admin API

mod order;
mod product;
mod types;

use log::debug;
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Result;

pub use order::*;
pub use product::*;
pub use types::*;

/// Orders collection endpoint
pub const ORDERS_PATH: &str = "/api/admin/orders";

/// Products collection endpoint
pub const PRODUCTS_PATH: &str = "/api/admin/products";

#[derive(Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Deserialize)]
struct ProductEnvelope {
    product: Product,
}

#[derive(Deserialize)]
struct MaybeProduct {
    #[serde(default)]
    product: Option<Product>,
}

/// Client for the admin endpoints.
///
/// Every operation passes straight through to the backend; required-field
/// checks belong to the caller (see [`Product::validate`]).
#[derive(Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    /// Create a new AdminApi
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List orders matching `filters`
    pub async fn list_orders(&self, filters: &OrderFilters) -> Result<Page<Order>> {
        self.client
            .get(ORDERS_PATH)
            .query(filters)?
            .execute()
            .await
    }

    /// Fetch one order
    pub async fn get_order(&self, id: &str) -> Result<Order> {
        let envelope: OrderEnvelope = self
            .client
            .get(&item_path(ORDERS_PATH, id))
            .execute()
            .await?;
        Ok(envelope.order)
    }

    /// List products matching `filters`
    pub async fn list_products(&self, filters: &ProductFilters) -> Result<Page<Product>> {
        self.client
            .get(PRODUCTS_PATH)
            .query(filters)?
            .execute()
            .await
    }

    /// Fetch one product
    pub async fn get_product(&self, id: &str) -> Result<Product> {
        let envelope: ProductEnvelope = self
            .client
            .get(&item_path(PRODUCTS_PATH, id))
            .execute()
            .await?;
        Ok(envelope.product)
    }

    /// Create a product. Returns the stored product when the backend echoes it.
    pub async fn create_product(&self, product: &Product) -> Result<Option<Product>> {
        let value = self
            .client
            .post(PRODUCTS_PATH)
            .json(product)?
            .execute_value()
            .await?;
        Ok(echoed_product(value))
    }

    /// Replace a product. Returns the stored product when the backend echoes it.
    pub async fn update_product(&self, id: &str, product: &Product) -> Result<Option<Product>> {
        let value = self
            .client
            .put(&item_path(PRODUCTS_PATH, id))
            .json(product)?
            .execute_value()
            .await?;
        Ok(echoed_product(value))
    }

    /// Delete a product
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.client
            .delete(&item_path(PRODUCTS_PATH, id))
            .execute_value()
            .await?;
        Ok(())
    }

    /// Order and product totals, read from single-item list pages
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let orders = self
            .list_orders(&OrderFilters {
                limit: Some(1),
                ..Default::default()
            })
            .await?;
        let products = self
            .list_products(&ProductFilters {
                limit: Some(1),
                ..Default::default()
            })
            .await?;

        Ok(DashboardStats {
            orders_count: orders.total,
            products_count: products.total,
        })
    }
}

fn item_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, urlencoding::encode(id))
}

fn echoed_product(value: serde_json::Value) -> Option<Product> {
    match serde_json::from_value::<MaybeProduct>(value) {
        Ok(envelope) => envelope.product,
        Err(err) => {
            debug!("mutation response carried no product: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_path_encodes_id() {
        assert_eq!(item_path(PRODUCTS_PATH, "abc123"), "/api/admin/products/abc123");
        assert_eq!(item_path(ORDERS_PATH, "a/b c"), "/api/admin/orders/a%2Fb%20c");
    }

    #[test]
    fn echoed_product_is_optional() {
        assert!(echoed_product(json!({"ok": true})).is_none());
        assert!(echoed_product(json!([1])).is_none());

        let product = echoed_product(json!({"product": {"_id": "p1", "name": "Tee"}})).unwrap();
        assert_eq!(product.id.as_deref(), Some("p1"));
    }
}
