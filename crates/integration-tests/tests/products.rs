//! Product search tests.

use knuspr_core::ProductId;
use knuspr_integration_tests::{connected_client, endpoints, envelope, storefront};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_search_sends_storefront_parameters() {
    let server = storefront().await;
    Mock::given(method("GET"))
        .and(path(endpoints::SEARCH))
        .and(query_param("search", "Bio Milch"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "5"))
        .and(query_param("companyId", "1"))
        .and(query_param("filterData", r#"{"filters":[]}"#))
        .and(query_param("canCorrect", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"productList": []}))))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = connected_client(&server).await;
    let results = client
        .search_products("Bio Milch", 5)
        .await
        .expect("search should succeed");

    assert!(results.is_empty());
    client.close().await;
}

#[tokio::test]
async fn test_search_drops_promoted_results() {
    let server = storefront().await;
    Mock::given(method("GET"))
        .and(path(endpoints::SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "productList": [
                {
                    "productId": 1001,
                    "productName": "Bio Vollmilch",
                    "price": {"full": 1.49, "currency": "EUR"},
                    "brand": "Berchtesgadener Land",
                    "textualAmount": "1 l",
                    "badge": [{"slug": "bio"}]
                },
                {
                    "productId": 1002,
                    "productName": "Sponsored Milk",
                    "price": 0.99,
                    "badge": [{"slug": "promoted"}]
                },
                {
                    "productId": 1003,
                    "productName": "H-Milch",
                    "price": 1.29,
                    "inStock": false,
                    "imgPath": "/img/1003.jpg",
                    "countryOfOrigin": "DE"
                }
            ]
        }))))
        .mount(&server)
        .await;

    let mut client = connected_client(&server).await;
    let results = client
        .search_products("milch", 10)
        .await
        .expect("search should succeed");

    let ids: Vec<ProductId> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![ProductId::new(1001), ProductId::new(1003)]);

    let first = &results[0];
    assert!((first.price_value() - 1.49).abs() < f64::EPSILON);
    assert_eq!(first.amount, "1 l");
    assert!(first.in_stock);

    let second = &results[1];
    assert!((second.price_value() - 1.29).abs() < f64::EPSILON);
    assert!(!second.in_stock);
    assert_eq!(second.image_path.as_deref(), Some("/img/1003.jpg"));
    assert_eq!(second.extra()["countryOfOrigin"], "DE");

    client.close().await;
}

#[tokio::test]
async fn test_search_without_product_list_is_empty() {
    let server = storefront().await;
    Mock::given(method("GET"))
        .and(path(endpoints::SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .mount(&server)
        .await;

    let mut client = connected_client(&server).await;
    let results = client
        .search_products("nothing", 10)
        .await
        .expect("search should succeed");

    assert!(results.is_empty());
    client.close().await;
}
