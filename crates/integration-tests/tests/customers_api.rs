//! Customer JSON API against a running server.

#![allow(clippy::unwrap_used)]

use nighthawk_integration_tests::{CustomerJson, SEEDED_EMAIL, TestContext, unique_email};
use nighthawk_server::seed::SAMPLE_CUSTOMERS;
use serde_json::json;

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_list_is_sorted_and_includes_seeded_customers() {
    let ctx = TestContext::new();

    let customers: Vec<CustomerJson> = ctx
        .client
        .get(ctx.url("/api/customer/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(customers.iter().any(|c| c.email == SEEDED_EMAIL));
    let seeded: Vec<&str> = customers
        .iter()
        .filter(|c| SAMPLE_CUSTOMERS.iter().any(|s| s.email == c.email))
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        seeded,
        [
            "Alexander Graham Bell",
            "John Mortensen",
            "Madam Currie",
            "Nikola Tesla",
            "Thomas Edison",
        ]
    );
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_create_show_delete() {
    let ctx = TestContext::new();
    let email = unique_email("create");

    let response = ctx.create_customer(&email, "Grace%20Hopper", "12-09-1906").await;
    assert_eq!(response.status(), 201);
    assert_eq!(
        response.text().await.unwrap(),
        format!("{email} is created successfully")
    );

    let created = ctx.find_customer(&email).await.unwrap();
    assert_eq!(created.name, "Grace Hopper");
    assert_eq!(created.last_visited.as_deref(), Some("1906-12-09"));
    assert!(created.order_history.is_empty());

    let shown: CustomerJson = ctx
        .client
        .get(ctx.url(&format!("/api/customer/{}", created.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(shown.email, email);

    let deleted = ctx
        .client
        .delete(ctx.url(&format!("/api/customer/delete/{}", created.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 200);

    let missing = ctx
        .client
        .get(ctx.url(&format!("/api/customer/{}", created.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 400);

    let again = ctx
        .client
        .delete(ctx.url(&format!("/api/customer/delete/{}", created.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 400);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_duplicate_email_conflicts() {
    let ctx = TestContext::new();
    let email = unique_email("dup");

    let first = ctx.create_customer(&email, "First%20Person", "01-01-2000").await;
    assert_eq!(first.status(), 201);

    let second = ctx.create_customer(&email, "Second%20Person", "01-01-2000").await;
    assert_eq!(second.status(), 409);

    let id = ctx.find_customer(&email).await.unwrap().id;
    ctx.delete_customer(id).await;
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_bad_date_is_rejected() {
    let ctx = TestContext::new();
    let email = unique_email("baddate");

    let response = ctx.create_customer(&email, "Ada%20Lovelace", "2020-01-01").await;
    assert_eq!(response.status(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        "2020-01-01 error; try MM-dd-yyyy"
    );
    assert!(ctx.find_customer(&email).await.is_none());
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_search_matches_substring_ignoring_case() {
    let ctx = TestContext::new();

    let matches: Vec<CustomerJson> = ctx
        .client
        .post(ctx.url("/api/customer/search"))
        .json(&json!({ "term": "TESLA" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(matches.iter().any(|c| c.email == "niko@gmail.com"));
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_set_stats_merges_by_date() {
    let ctx = TestContext::new();
    let email = unique_email("stats");
    ctx.create_customer(&email, "Stats%20Person", "03-04-2001").await;
    let id = ctx.find_customer(&email).await.unwrap().id;

    let post = |body: serde_json::Value| {
        ctx.client
            .post(ctx.url("/api/customer/setStats"))
            .json(&body)
            .send()
    };

    let first = post(json!({"id": id, "date": "2024-01-01", "product": "Eggs", "quantity": 2}))
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    post(json!({"id": id.to_string(), "date": "2024-01-02", "product": "Beef"}))
        .await
        .unwrap();
    let updated: CustomerJson = post(json!({"id": id, "date": "2024-01-01", "quantity": 3}))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated.order_history.len(), 2);
    assert_eq!(updated.order_history["2024-01-01"], json!({"quantity": 3}));
    assert_eq!(updated.order_history["2024-01-02"], json!({"product": "Beef"}));

    ctx.delete_customer(id).await;
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_set_stats_unknown_customer() {
    let ctx = TestContext::new();

    let response = ctx
        .client
        .post(ctx.url("/api/customer/setStats"))
        .json(&json!({"id": i32::MAX, "date": "2024-01-01"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}
