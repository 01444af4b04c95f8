//! Login and logout flow against a running server.

#![allow(clippy::unwrap_used)]

use nighthawk_integration_tests::{SEEDED_EMAIL, SEEDED_PASSWORD, TestContext};

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_login_then_logout() {
    let ctx = TestContext::new();

    let page = ctx
        .client
        .post(ctx.url("/login"))
        .form(&[("email", SEEDED_EMAIL), ("password", SEEDED_PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_eq!(page.url().path(), "/mvc/customer/read");
    let html = page.text().await.unwrap();
    assert!(html.contains("Sign out"));
    assert!(html.contains(SEEDED_EMAIL));

    let page = ctx.client.post(ctx.url("/logout")).send().await.unwrap();
    assert_eq!(page.url().path(), "/login");
    let html = page.text().await.unwrap();
    assert!(html.contains("You have been signed out."));
    assert!(!html.contains("Sign out"));
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_wrong_password_and_unknown_email_look_alike() {
    let ctx = TestContext::new();

    let wrong = ctx
        .client
        .post(ctx.url("/login"))
        .form(&[("email", SEEDED_EMAIL), ("password", "nope")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let unknown = ctx
        .client
        .post(ctx.url("/login"))
        .form(&[("email", "nobody@example.com"), ("password", "nope")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(wrong.contains("Invalid email or password"));
    assert!(unknown.contains("Invalid email or password"));
}
