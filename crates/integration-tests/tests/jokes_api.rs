//! Joke JSON API against a running server.

#![allow(clippy::unwrap_used)]

use nighthawk_integration_tests::{JokeJson, TestContext};

async fn first_joke(ctx: &TestContext) -> JokeJson {
    let jokes: Vec<JokeJson> = ctx
        .client
        .get(ctx.url("/api/jokes/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    jokes.into_iter().next().expect("seeded jokes missing")
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_like_increments_haha_only() {
    let ctx = TestContext::new();
    let before = first_joke(&ctx).await;

    let after: JokeJson = ctx
        .client
        .put(ctx.url(&format!("/api/jokes/like/{}", before.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after.joke, before.joke);
    assert!(after.haha > before.haha);
    assert!(after.boohoo >= before.boohoo);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_jeer_increments_boohoo() {
    let ctx = TestContext::new();
    let before = first_joke(&ctx).await;

    let after: JokeJson = ctx
        .client
        .put(ctx.url(&format!("/api/jokes/jeer/{}", before.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(after.boohoo > before.boohoo);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_unknown_joke_is_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .client
        .put(ctx.url(&format!("/api/jokes/like/{}", i32::MAX)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}
