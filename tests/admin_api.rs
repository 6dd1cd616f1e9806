use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dumbbers_admin::admin::{AdminApi, OrderFilters, OrderStatus, ProductFilters};
use dumbbers_admin::auth::{MemorySessionStore, Session};
use dumbbers_admin::client::ApiClient;
use dumbbers_admin::config::ClientOptions;
use dumbbers_admin::prelude::Product;

fn admin_for(server: &MockServer) -> AdminApi {
    let options = ClientOptions::default().with_base_url(&server.uri());
    let session = Session::new(MemorySessionStore::with_token("abc"));
    AdminApi::new(ApiClient::new(&options, session).unwrap())
}

#[tokio::test]
async fn test_list_products_sends_only_set_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .and(query_param("category", "PANTS"))
        .and(query_param("page", "1"))
        .and(|req: &wiremock::Request| {
            !req.url
                .query_pairs()
                .any(|(k, _)| k == "isActive" || k == "q" || k == "brand")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"_id": "p1", "name": "Cargo Pants", "slug": "cargo-pants", "category": "PANTS", "isActive": true}
            ],
            "total": 1,
            "page": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = ProductFilters {
        page: Some(1),
        category: Some("PANTS".to_string()),
        q: Some(String::new()),
        ..Default::default()
    };
    let page = admin_for(&server).list_products(&filters).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id.as_deref(), Some("p1"));
    assert_eq!(page.items[0].is_active, Some(true));
}

#[tokio::test]
async fn test_list_orders_with_status_and_dates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/orders"))
        .and(header("Authorization", "Bearer abc"))
        .and(query_param("status", "fulfilled"))
        .and(query_param("from", "2024-05-01"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "items": [{
                    "_id": "o1",
                    "status": "fulfilled",
                    "amountPaise": 129900,
                    "items": [{"name": "Tee", "size": "M", "color": "Black", "price": 649.5, "quantity": 2}],
                    "razorpayPaymentId": "pay_1",
                    "createdAt": "2024-05-02T10:00:00Z"
                }],
                "total": 41,
                "page": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = OrderFilters {
        limit: Some(20),
        status: Some(OrderStatus::Fulfilled),
        from: chrono::NaiveDate::from_ymd_opt(2024, 5, 1),
        ..Default::default()
    };
    let page = admin_for(&server).list_orders(&filters).await.unwrap();

    assert_eq!(page.page_count(20), 3);
    let order = &page.items[0];
    assert_eq!(order.status, OrderStatus::Fulfilled);
    assert_eq!(order.item_count(), 2);
    assert!(order.has_payment());
}

#[tokio::test]
async fn test_get_order_unwraps_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/orders/o1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order": {"_id": "o1", "status": "paid", "amountPaise": 50000}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = admin_for(&server).get_order("o1").await.unwrap();
    assert_eq!(order.id, "o1");
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.amount_paise, 50000);
}

#[tokio::test]
async fn test_item_ids_are_percent_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/orders/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order": {"_id": "a/b", "status": "created"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = admin_for(&server).get_order("a/b").await.unwrap();
    assert_eq!(order.id, "a/b");
}

#[tokio::test]
async fn test_missing_order_surfaces_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/orders/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Order not found"
        })))
        .mount(&server)
        .await;

    let err = admin_for(&server).get_order("nope").await.unwrap_err();
    assert_eq!(err.to_string(), "Order not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_get_product_unwraps_product() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"product": {
                "_id": "p1",
                "name": "Tee",
                "slug": "tee",
                "gender": "MEN",
                "variants": [{"size": "L", "color": "White", "sku": "TEE-L", "mrp": 999, "price": 799, "stock": 4}]
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product = admin_for(&server).get_product("p1").await.unwrap();
    assert_eq!(product.slug, "tee");
    assert_eq!(product.variants.len(), 1);
    assert_eq!(product.total_stock(), 4);
}

#[tokio::test]
async fn test_create_product_posts_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/products"))
        .and(body_partial_json(json!({"name": "Tee", "slug": "tee", "gender": "UNISEX"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {"product": {"_id": "p9", "name": "Tee", "slug": "tee"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product = Product {
        name: "Tee".to_string(),
        slug: "tee".to_string(),
        ..Default::default()
    };
    let created = admin_for(&server).create_product(&product).await.unwrap();
    assert_eq!(created.and_then(|p| p.id).as_deref(), Some("p9"));
}

#[tokio::test]
async fn test_update_product_without_echo() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/products/p1"))
        .and(body_partial_json(json!({"slug": "tee"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let product = Product {
        name: "Tee".to_string(),
        slug: "tee".to_string(),
        ..Default::default()
    };
    let updated = admin_for(&server).update_product("p1", &product).await.unwrap();
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_delete_product() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/p1"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    admin_for(&server).delete_product("p1").await.unwrap();
}

#[tokio::test]
async fn test_delete_refused_by_backend() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Product has open orders"
        })))
        .mount(&server)
        .await;

    let err = admin_for(&server).delete_product("p1").await.unwrap_err();
    assert_eq!(err.to_string(), "Product has open orders");
}

#[tokio::test]
async fn test_dashboard_stats_reads_totals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/orders"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 12})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/products"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let stats = admin_for(&server).dashboard_stats().await.unwrap();
    assert_eq!(stats.orders_count, 12);
    assert_eq!(stats.products_count, 7);
}
