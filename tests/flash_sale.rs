//! Flash-sale board: polling plus optimistic purchases.

mod common;

use common::{client, signed_in, toasts, wait_until, MockApi, MockResponse};
use creator_sync::lifecycle::ViewScope;
use creator_sync::notify::ToastLevel;
use creator_sync::session::Session;
use creator_sync::views::{ActionResult, FlashSaleBoard};
use serde_json::{json, Value};
use std::time::Duration;

fn sales(sold: u64) -> MockResponse {
    MockResponse::data(json!({
        "sales": [
            {"id": "s1", "title": "Hoodie", "priceCents": 4500, "stock": 100, "sold": sold},
            {"id": "s2", "title": "Poster", "stock": 1, "remaining": 0}
        ]
    }))
}

fn receipt(sold: u64) -> Value {
    json!({"sale": {"id": "s1", "stock": 100, "sold": sold}})
}

#[tokio::test]
async fn purchase_updates_stock_then_poll_confirms() {
    let mock = MockApi::start().await;
    mock.respond("GET", "/flash-sales", sales(97)).await;
    mock.respond("GET", "/flash-sales", sales(98)).await;
    mock.respond(
        "POST",
        "/flash-sales/s1/purchase",
        MockResponse::data(receipt(98)).with_delay(200),
    )
    .await;
    let scope = ViewScope::mount();
    let queue = toasts();
    let session = signed_in("fan");
    let board = FlashSaleBoard::new(
        client(&mock, session.clone()),
        session,
        scope.handle(),
        queue.clone(),
        Duration::from_secs(60),
    );

    board.mount();
    assert!(board.is_polling());
    assert!(
        wait_until(Duration::from_secs(2), || board.remaining_label("s1").is_some()).await
    );
    assert_eq!(board.remaining_label("s1").as_deref(), Some("3 left"));
    assert!(board.can_purchase("s1"));

    let (result, _) = tokio::join!(board.purchase("s1"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(board.remaining_label("s1").as_deref(), Some("2 left"));
        assert!(!board.can_purchase("s1"));
    });

    assert!(result.is_committed());
    assert_eq!(board.remaining_label("s1").as_deref(), Some("2 left"));
    let toast = queue.latest().unwrap();
    assert_eq!(toast.level, ToastLevel::Info);
    assert_eq!(toast.message, "Purchased Hoodie");

    board.refresh().await.unwrap();
    assert_eq!(board.remaining_label("s1").as_deref(), Some("2 left"));
    let purchase = mock.requests_to("POST", "/flash-sales/s1/purchase").await;
    assert_eq!(purchase.len(), 1);
    assert_eq!(purchase[0].json(), json!({"quantity": 1}));
}

#[tokio::test]
async fn rejected_purchase_restores_stock() {
    let mock = MockApi::start().await;
    mock.respond("GET", "/flash-sales", sales(97)).await;
    mock.respond(
        "POST",
        "/flash-sales/s1/purchase",
        MockResponse::error(409, "SOLD_OUT", "This item just sold out"),
    )
    .await;
    let scope = ViewScope::mount();
    let queue = toasts();
    let session = signed_in("fan");
    let board = FlashSaleBoard::new(
        client(&mock, session.clone()),
        session,
        scope.handle(),
        queue.clone(),
        Duration::from_secs(60),
    );
    board.refresh().await.unwrap();

    let result = board.purchase("s1").await;

    assert!(result.outcome().is_some_and(|o| o.is_reverted()));
    assert_eq!(board.remaining_label("s1").as_deref(), Some("3 left"));
    let toast = queue.latest().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "This item just sold out");
}

#[tokio::test]
async fn sold_out_and_unknown_sales_are_unavailable() {
    let mock = MockApi::start().await;
    mock.respond("GET", "/flash-sales", sales(97)).await;
    let scope = ViewScope::mount();
    let session = signed_in("fan");
    let board = FlashSaleBoard::new(
        client(&mock, session.clone()),
        session,
        scope.handle(),
        toasts(),
        Duration::from_secs(60),
    );
    board.refresh().await.unwrap();

    assert_eq!(board.remaining_label("s2").as_deref(), Some("Sold out"));
    assert!(!board.can_purchase("s2"));
    assert!(matches!(board.purchase("s2").await, ActionResult::Unavailable));
    assert!(matches!(board.purchase("nope").await, ActionResult::Unavailable));
    assert!(mock.requests_to("POST", "/flash-sales/s2/purchase").await.is_empty());
}

#[tokio::test]
async fn anonymous_purchase_requires_sign_in() {
    let mock = MockApi::start().await;
    mock.respond("GET", "/flash-sales", sales(97)).await;
    let scope = ViewScope::mount();
    let session = Session::anonymous();
    let board = FlashSaleBoard::new(
        client(&mock, session.clone()),
        session,
        scope.handle(),
        toasts(),
        Duration::from_secs(60),
    );
    board.refresh().await.unwrap();

    assert!(matches!(board.purchase("s1").await, ActionResult::SignInRequired));
}

#[tokio::test]
async fn polling_picks_up_server_changes_and_stops_on_unmount() {
    let mock = MockApi::start().await;
    mock.respond("GET", "/flash-sales", sales(97)).await;
    mock.respond("GET", "/flash-sales", sales(99)).await;
    let scope = ViewScope::mount();
    let session = Session::anonymous();
    let board = FlashSaleBoard::new(
        client(&mock, session.clone()),
        session,
        scope.handle(),
        toasts(),
        Duration::from_millis(100),
    );

    board.mount();
    assert!(
        wait_until(Duration::from_secs(3), || {
            board.remaining_label("s1").as_deref() == Some("1 left")
        })
        .await
    );

    scope.unmount();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let settled = mock.requests_to("GET", "/flash-sales").await.len();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(mock.requests_to("GET", "/flash-sales").await.len(), settled);
}

#[tokio::test]
async fn failed_refresh_keeps_last_list() {
    let mock = MockApi::start().await;
    mock.respond("GET", "/flash-sales", sales(97)).await;
    mock.respond("GET", "/flash-sales", MockResponse::raw(500, "oops"))
        .await;
    let scope = ViewScope::mount();
    let queue = toasts();
    let session = Session::anonymous();
    let board = FlashSaleBoard::new(
        client(&mock, session.clone()),
        session,
        scope.handle(),
        queue.clone(),
        Duration::from_secs(60),
    );

    board.refresh().await.unwrap();
    assert!(board.refresh().await.is_err());

    assert_eq!(board.sales().len(), 2);
    let toast = queue.latest().unwrap();
    assert_eq!(toast.level, ToastLevel::Warning);
    assert_eq!(toast.message, "Failed to refresh flash sales");
}

#[tokio::test]
async fn fetch_sent_before_purchase_does_not_undo_it() {
    let mock = MockApi::start().await;
    mock.respond("GET", "/flash-sales", sales(97)).await;
    mock.respond("GET", "/flash-sales", sales(97).with_delay(300))
        .await;
    mock.respond(
        "POST",
        "/flash-sales/s1/purchase",
        MockResponse::data(receipt(98)),
    )
    .await;
    let scope = ViewScope::mount();
    let session = signed_in("fan");
    let board = FlashSaleBoard::new(
        client(&mock, session.clone()),
        session,
        scope.handle(),
        toasts(),
        Duration::from_secs(60),
    );
    board.refresh().await.unwrap();

    let (refreshed, purchased) = tokio::join!(board.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        board.purchase("s1").await
    });

    assert!(refreshed.is_ok());
    assert!(purchased.is_committed());
    assert_eq!(board.remaining_label("s1").as_deref(), Some("2 left"));

    board.refresh().await.unwrap();
    assert_eq!(board.remaining_label("s1").as_deref(), Some("3 left"));
}
