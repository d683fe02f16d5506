//! End-to-end cart flow against recorded response fixtures.

use amz_paapi::{Cart, ClientConfig, Credentials, Error, ItemIds, PaapiClient};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CART_CREATE: &str = include_str!("fixtures/cart_create.xml");
const CART_ADD: &str = include_str!("fixtures/cart_add.xml");
const CART_MODIFY: &str = include_str!("fixtures/cart_modify.xml");
const CART_CLEAR: &str = include_str!("fixtures/cart_clear.xml");

fn make_client(server: &MockServer) -> PaapiClient {
    let mut config = ClientConfig::new();
    config.retry_count = 1;
    config.retry_backoff = Duration::ZERO;
    let credentials = Credentials::new("mytag-20", "AKIAEXAMPLE", "secret").unwrap();
    PaapiClient::with_base_url(credentials, &config, Some(server.uri())).unwrap()
}

async fn mount_operation(server: &MockServer, operation: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/onca/xml"))
        .and(query_param("Operation", operation))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_cart_lifecycle() {
    let server = MockServer::start().await;
    mount_operation(&server, "CartCreate", CART_CREATE).await;
    mount_operation(&server, "CartAdd", CART_ADD).await;
    mount_operation(&server, "CartModify", CART_MODIFY).await;
    mount_operation(&server, "CartClear", CART_CLEAR).await;

    let mut cart = Cart::new(make_client(&server));

    // create binds the mirror to the remote cart
    cart.create("B00JM5GW10", 1).await.unwrap();
    assert_eq!(cart.cart_id(), Some("351-9409939-3647538"));
    assert_eq!(cart.hmac(), Some("b021GmONiGrGa1b9/tSKEeSGcmE="));
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.subtotal().unwrap().amount, 1999);
    assert!(cart.purchase_url().unwrap().contains("aws-merge"));

    // a new item goes out as CartAdd and the mirror picks up both lines
    cart.add("B00ABCDEF0", 1).await.unwrap();
    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.quantity_of("B00ABCDEF0"), 1);
    assert_eq!(cart.subtotal().unwrap().amount, 4998);

    // removal is a CartModify to quantity zero; the echo drops the line
    cart.remove("B00ABCDEF0", None).await.unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.quantity_of("B00JM5GW10"), 1);
    assert_eq!(cart.subtotal().unwrap().amount, 1999);

    // clear empties the cart but keeps it usable
    cart.clear().await.unwrap();
    assert!(cart.items().is_empty());
    assert!(cart.is_bound());

    let operations: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == "Operation")
                .map(|(_, v)| v.into_owned())
                .unwrap()
        })
        .collect();
    assert_eq!(operations, vec!["CartCreate", "CartAdd", "CartModify", "CartClear"]);
}

#[tokio::test]
async fn test_every_request_is_signed() {
    let server = MockServer::start().await;
    mount_operation(&server, "CartCreate", CART_CREATE).await;

    let mut cart = Cart::new(make_client(&server));
    cart.create("B00JM5GW10", 1).await.unwrap();

    for request in server.received_requests().await.unwrap() {
        let pairs: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let has = |key: &str| pairs.iter().any(|(k, _)| k == key);
        assert!(has("Signature"));
        assert!(has("Timestamp"));
        assert!(has("AWSAccessKeyId"));
        assert!(has("AssociateTag"));
        assert!(has("Service"));
        assert!(has("Version"));
    }
}

#[tokio::test]
async fn test_vendor_error_surfaces_through_the_cart() {
    let server = MockServer::start().await;
    let body = "<CartCreateResponse><Cart><Request><Errors><Error>\
        <Code>AWS.ECommerceService.ItemNotAccessible</Code>\
        <Message>This item is not accessible through the Product Advertising API.</Message>\
        </Error></Errors></Request></Cart></CartCreateResponse>";
    mount_operation(&server, "CartCreate", body).await;

    let mut cart = Cart::new(make_client(&server));
    let err = cart.create("B00JM5GW10", 1).await.unwrap_err();

    assert!(matches!(err, Error::Vendor(_)));
    assert!(err.to_string().contains("ItemNotAccessible"));
    assert!(!cart.is_bound());

    // retryable, so the configured single retry went out too
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_asins_never_reach_the_wire() {
    let server = MockServer::start().await;
    let mut cart = Cart::new(make_client(&server));

    let err = cart.create(ItemIds::from("short"), 1).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
