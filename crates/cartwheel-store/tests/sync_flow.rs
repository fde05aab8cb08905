//! End-to-end cart synchronization flows: real `CartClient` against a
//! wiremock server, real JSON-file persistence across store instances.

use cartwheel_core::Product;
use cartwheel_remote::CartClient;
use cartwheel_store::{AddOutcome, CartStore, JsonFileStorage, MutationOutcome};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CartClient {
    CartClient::new(&server.uri(), 30, "cartwheel-test").expect("client construction")
}

fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("cartwheel-flow-{}-{name}.json", std::process::id()))
}

fn product(id: i64, price: &str) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        price: price.parse().unwrap(),
        image: "/no-image.png".to_owned(),
        has_discount: false,
        special_price: None,
        original_price: None,
    }
}

#[tokio::test]
async fn add_then_rehydrate_from_disk_in_next_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": 1 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "products": [
                { "product_id": 42, "name": "Mug", "price": 12.5, "quantity": 1, "store_id": 3, "key": "k-1" }
            ] }
        })))
        .mount(&server)
        .await;

    let storage_path = scratch_path("rehydrate");
    let _ = std::fs::remove_file(&storage_path);

    // Session one: add an item; the post-add re-sync adopts the server cart.
    {
        let mut store = CartStore::new(client(&server), JsonFileStorage::new(&storage_path));
        store.hydrate().await;
        assert!(store.lines().is_empty());

        let outcome = store.add_line(product(42, "12.5"), "3", 1, None).await;
        assert_eq!(outcome, AddOutcome::Completed);
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.lines()[0].key.as_deref(), Some("k-1"));
    }

    // Session two: a fresh store hydrates from the persisted snapshot and
    // never touches the network.
    let offline = CartClient::new("http://127.0.0.1:1", 1, "cartwheel-test").unwrap();
    let mut store = CartStore::new(offline, JsonFileStorage::new(&storage_path));
    store.hydrate().await;

    assert_eq!(store.lines().len(), 1);
    assert_eq!(store.lines()[0].product.id, 42);
    assert_eq!(store.quantity_for(42, "3"), 1);

    let _ = std::fs::remove_file(storage_path);
}

#[tokio::test]
async fn store_conflict_resolved_by_replacing_cart() {
    let server = MockServer::start().await;

    // First add attempt hits the single-store rule; the retry succeeds.
    Mock::given(method("POST"))
        .and(path("/cart/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": 0,
            "error": ["Your cart already contains items from a different store"]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": 1 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "products": [
                { "product_id": 1, "name": "Old", "price": 10, "quantity": 2, "store_id": 1, "key": "k-old" }
            ] }
        })))
        .mount(&server)
        .await;

    let storage_path = scratch_path("conflict");
    let _ = std::fs::remove_file(&storage_path);

    let mut store = CartStore::new(client(&server), JsonFileStorage::new(&storage_path));
    store.hydrate().await;
    assert_eq!(store.lines().len(), 1, "existing cart holds the old store's item");

    let outcome = store.add_line(product(2, "20"), "9", 1, None).await;
    let AddOutcome::NeedsDecision(conflict) = outcome else {
        panic!("expected a store conflict, got {outcome:?}");
    };
    assert_eq!(store.lines()[0].product.id, 1, "rolled back while undecided");

    let outcome = store.resolve_conflict(conflict, true).await;
    assert_eq!(outcome, AddOutcome::Completed);
    assert_eq!(store.lines().len(), 1);
    assert_eq!(store.lines()[0].product.id, 2);
    assert_eq!(store.lines()[0].store_id, "9");

    let _ = std::fs::remove_file(storage_path);
}

#[tokio::test]
async fn failed_remove_rolls_back_to_pre_mutation_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "items": [
                { "product_id": 7, "name": "Hat", "price": "$15.00", "quantity": 2, "store_id": 4, "key": "k-7" }
            ] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/remove"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let storage_path = scratch_path("remove-rollback");
    let _ = std::fs::remove_file(&storage_path);

    let mut store = CartStore::new(client(&server), JsonFileStorage::new(&storage_path));
    store.hydrate().await;
    assert_eq!(store.lines().len(), 1);
    assert_eq!(store.total(), "30".parse().unwrap());

    let outcome = store.remove_line(7, "4", None).await;
    assert!(matches!(outcome, MutationOutcome::Failed { .. }));
    assert_eq!(store.lines().len(), 1, "failed remove must restore the line");
    assert_eq!(store.lines()[0].quantity, 2);

    let _ = std::fs::remove_file(storage_path);
}

#[tokio::test]
async fn clear_cart_is_local_even_when_server_is_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "products": [ { "product_id": 7, "quantity": 2, "store_id": 4 } ] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/empty"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let storage_path = scratch_path("clear");
    let _ = std::fs::remove_file(&storage_path);

    let mut store = CartStore::new(client(&server), JsonFileStorage::new(&storage_path));
    store.hydrate().await;
    assert_eq!(store.item_count(), 2);

    let acknowledged = store.clear_cart().await;
    assert!(!acknowledged, "server refusal is advisory only");
    assert!(store.lines().is_empty());

    // The emptied snapshot is what the next session sees.
    let mut next = CartStore::new(client(&server), JsonFileStorage::new(&storage_path));
    next.hydrate().await;
    assert_eq!(next.lines().len(), 1, "empty local snapshot falls back to remote");

    let _ = std::fs::remove_file(storage_path);
}
