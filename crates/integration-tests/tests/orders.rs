//! Order history, detail and upcoming order tests.

use knuspr_core::FlexibleId;
use knuspr_integration_tests::{connected_client, endpoints, envelope, storefront};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_order_history_paging_and_wrapper() {
    let server = storefront().await;
    Mock::given(method("GET"))
        .and(path(endpoints::DELIVERED_ORDERS))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "orders": [
                {"id": 1, "status": "delivered", "deliveredAt": "2024-01-15", "totalPrice": 45.5},
                {"orderNumber": "K-2", "createdAt": "2024-01-01", "price": 12.0}
            ]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = connected_client(&server).await;
    let orders = client
        .get_order_history(10, 20)
        .await
        .expect("history should load");

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].display_id(), "1");
    assert_eq!(orders[0].display_date(), Some("2024-01-15"));
    assert_eq!(orders[0].display_total(), Some(45.5));
    assert_eq!(orders[1].display_id(), "K-2");
    assert_eq!(orders[1].display_total(), Some(12.0));

    client.close().await;
}

#[tokio::test]
async fn test_order_detail_lines() {
    let server = storefront().await;
    Mock::given(method("GET"))
        .and(path(endpoints::order_detail("ord-001")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "ord-001",
            "status": "delivered",
            "items": [
                {"productId": 1001, "name": "Bio Vollmilch", "quantity": 2, "price": 2.98},
                {"productId": 1002, "quantity": 1}
            ]
        }))))
        .mount(&server)
        .await;

    let mut client = connected_client(&server).await;
    let order = client
        .get_order_detail("ord-001")
        .await
        .expect("detail should load");

    assert_eq!(order.id, Some(FlexibleId::from("ord-001")));
    let products = order.all_products();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].display_name(), "Bio Vollmilch");
    assert_eq!(products[1].display_name(), "Unknown");

    client.close().await;
}

#[tokio::test]
async fn test_upcoming_orders_bare_list() {
    let server = storefront().await;
    Mock::given(method("GET"))
        .and(path(endpoints::UPCOMING_ORDERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 99, "status": "scheduled", "deliveryDate": "2024-02-01"}
        ])))
        .mount(&server)
        .await;

    let mut client = connected_client(&server).await;
    let orders = client
        .get_upcoming_orders()
        .await
        .expect("upcoming should load");

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status.as_deref(), Some("scheduled"));
    assert_eq!(orders[0].display_date(), Some("2024-02-01"));

    client.close().await;
}
