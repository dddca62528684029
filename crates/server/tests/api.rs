use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::repository::memory::MemoryStore;
use tower::ServiceExt;

use server::routes;
use server::state::AppState;

struct TestApp {
    router: Router,
    store: MemoryStore,
}

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

fn app() -> TestApp {
    let store = MemoryStore::default();
    let router = routes::build_router(AppState::new(store.repositories()));
    TestApp { router, store }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<&str>) -> Reply {
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        Reply { status, content_type, body: String::from_utf8(bytes.to_vec()).unwrap() }
    }

    async fn get(&self, uri: &str) -> Reply {
        self.send("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> Reply {
        self.send("POST", uri, Some(&body.to_string())).await
    }

    async fn patch(&self, uri: &str, body: Value) -> Reply {
        self.send("PATCH", uri, Some(&body.to_string())).await
    }

    async fn delete(&self, uri: &str) -> Reply {
        self.send("DELETE", uri, None).await
    }

    async fn seed_order(&self) {
        let r = self
            .post("/customers/", json!({"name":"Acme","address":"1 Main St","tax_id":"T1","email":"a@acme.com","phone_number":"555-0100"}))
            .await;
        assert_eq!(r.status, StatusCode::OK);
        let r = self.post("/orders/", json!({"customer_id":1,"date":"2024-03-01T10:30:00Z"})).await;
        assert_eq!(r.status, StatusCode::OK);
    }

    async fn seed_service(&self) {
        let r = self.post("/services/", json!({"title":"Audit","description":"Yearly","price":120.5})).await;
        assert_eq!(r.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn created_customer_reads_back_with_assigned_id() {
    let app = app();
    let acme = json!({"name":"Acme","address":"1 Main St","tax_id":"T1","email":"a@acme.com","phone_number":"555-0100"});

    let r = app.post("/customers/", acme).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body, "Added successfully");

    let r = app.get("/customers/1").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        r.json(),
        json!({"id":1,"name":"Acme","address":"1 Main St","tax_id":"T1","email":"a@acme.com","phone_number":"555-0100"})
    );
}

#[tokio::test]
async fn client_supplied_id_is_ignored_on_create() {
    let app = app();
    app.post("/services/", json!({"id":77,"title":"Audit","description":"Yearly","price":1.0})).await;
    assert_eq!(app.get("/services/1").await.json()["id"], 1);
    assert_eq!(app.get("/services/77").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_collections_list_as_empty_arrays() {
    let app = app();
    for uri in ["/customers/", "/customers", "/services/", "/orders"] {
        let r = app.get(uri).await;
        assert_eq!(r.status, StatusCode::OK, "{uri}");
        assert_eq!(r.json(), json!([]), "{uri}");
    }
}

#[tokio::test]
async fn list_returns_every_record() {
    let app = app();
    app.seed_service().await;
    app.seed_service().await;
    let r = app.get("/services").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let app = app();
    let r = app.get("/customers/99").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - There is no customer with id 99 in the database");
}

#[tokio::test]
async fn non_numeric_id_is_rejected_before_storage() {
    let app = app();
    // storage would fail if it were reached
    app.store.customers.set_fail_reads(true);
    app.store.orders.set_fail_reads(true);

    let r = app.get("/customers/abc").await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body, "400 - Incorrect parameter for id: abc");

    let r = app.delete("/customers/1x").await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);

    let r = app.post("/orders/7/services/three", json!({})).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body, "400 - Incorrect parameter for id: three");
    assert_eq!(app.store.customers.mutation_count(), 0);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();
    let r = app.send("POST", "/customers/", Some("{\"name\":")).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body, "400 - Couldn't parse JSON data");

    // orders need both customer_id and date
    let r = app.post("/orders/", json!({"customer_id":1})).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.orders.mutation_count(), 0);
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let app = app();
    let r = app.post("/services/", json!({"title":"Audit","description":"Yearly","price":-1.0})).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert!(r.body.starts_with("400 - price must be"));
    assert_eq!(app.store.services.mutation_count(), 0);
}

#[tokio::test]
async fn update_of_absent_service_mutates_nothing() {
    let app = app();
    let r = app
        .patch("/services/", json!({"id":999,"title":"Audit","description":"Yearly","price":1.0}))
        .await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - The service doesn't exist");
    assert_eq!(app.store.services.mutation_count(), 0);
}

#[tokio::test]
async fn delete_of_absent_customer_mutates_nothing() {
    let app = app();
    let r = app.delete("/customers/5").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - The customer doesn't exist");
    assert_eq!(app.store.customers.mutation_count(), 0);
}

#[tokio::test]
async fn update_then_delete() {
    let app = app();
    app.seed_service().await;

    let r = app
        .patch("/services", json!({"id":1,"title":"Audit","description":"Quarterly","price":300.0}))
        .await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body, "Updated successfully");
    assert_eq!(app.get("/services/1").await.json()["description"], "Quarterly");

    let r = app.delete("/services/1").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body, "Deleted successfully");
    assert_eq!(app.get("/services/1").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_dates_round_trip_as_rfc3339() {
    let app = app();
    app.seed_order().await;
    let r = app.get("/orders/1").await;
    assert_eq!(r.json(), json!({"id":1,"customer_id":1,"date":"2024-03-01T10:30:00Z"}));

    let r = app.patch("/orders/", json!({"id":1,"customer_id":1,"date":"2024-04-02T09:00:00Z"})).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(app.get("/orders/1").await.json()["date"], "2024-04-02T09:00:00Z");
}

#[tokio::test]
async fn adding_service_to_absent_order_stops_at_order_check() {
    let app = app();
    // the service check would report a different message if it ran
    app.store.services.set_fail_reads(true);
    let r = app.post("/orders/7/services/3", json!({})).await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - The order doesn't exist");
    assert_eq!(app.store.order_services.mutation_count(), 0);
}

#[tokio::test]
async fn adding_absent_service_to_order_is_not_found() {
    let app = app();
    app.seed_order().await;
    let r = app.send("POST", "/orders/1/services/3", None).await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - The service doesn't exist");
    assert_eq!(app.store.order_services.mutation_count(), 0);
}

#[tokio::test]
async fn order_service_lifecycle() {
    let app = app();
    app.seed_order().await;
    app.seed_service().await;

    let r = app.send("POST", "/orders/1/services/1", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body, "Added successfully");

    let r = app.get("/orders/1/services").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json()[0]["title"], "Audit");

    let r = app.get("/orders/1/services/1").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json()["price"], 120.5);

    let r = app.delete("/orders/1/services/1").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body, "Deleted successfully");

    let r = app.delete("/orders/1/services/1").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - The service doesn't exist or isn't included in the order");

    let r = app.get("/orders/1/services/1").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - There is no service with id 1 for order with id 1 in the database");

    assert_eq!(app.get("/orders/1/services").await.json(), json!([]));
}

#[tokio::test]
async fn duplicate_pair_is_a_server_error() {
    let app = app();
    app.seed_order().await;
    app.seed_service().await;
    assert_eq!(app.send("POST", "/orders/1/services/1", None).await.status, StatusCode::OK);
    let r = app.send("POST", "/orders/1/services/1", None).await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.body, "500 - Couldn't add data to the database");
}

#[tokio::test]
async fn mutation_failures_are_server_errors() {
    let app = app();
    app.seed_service().await;
    app.store.services.set_fail_mutations(true);

    let r = app.post("/services/", json!({"title":"Audit","description":"Yearly","price":1.0})).await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.body, "500 - Couldn't add data to the database");

    let r = app.patch("/services/", json!({"id":1,"title":"Audit","description":"Yearly","price":1.0})).await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.body, "500 - Couldn't update data in the database");

    let r = app.delete("/services/1").await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.body, "500 - Couldn't delete the service from the database");
}

#[tokio::test]
async fn read_failures_are_not_found() {
    let app = app();
    app.store.services.set_fail_reads(true);
    let r = app.get("/services/").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - Couldn't extract any entry from the services database");

    app.store.order_services.set_fail_reads(true);
    let r = app.get("/orders/4/services").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - There are no services for order with id 4 in the database");
}

#[tokio::test]
async fn error_bodies_are_plain_text() {
    let app = app();
    let r = app.get("/orders/3").await;
    assert!(r.content_type.unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let r = app.get("/api-docs/openapi.json").await;
    assert_eq!(r.status, StatusCode::OK);
    let doc = r.json();
    assert!(doc["paths"]["/customers/{id}"].is_object());
    assert!(doc["paths"]["/orders/{id}/services/{service_id}"]["post"].is_object());
}

#[tokio::test]
async fn order_for_unknown_customer_is_rejected() {
    let app = app();
    let r = app.post("/orders/", json!({"customer_id":999,"date":"2024-03-01T10:30:00Z"})).await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.body, "500 - Couldn't add data to the database");
    assert_eq!(app.get("/orders/").await.json(), json!([]));

    app.seed_order().await;
    let r = app.patch("/orders/", json!({"id":1,"customer_id":999,"date":"2024-03-01T10:30:00Z"})).await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.body, "500 - Couldn't update data in the database");
    assert_eq!(app.get("/orders/1").await.json()["customer_id"], 1);
}

#[tokio::test]
async fn customer_with_orders_is_not_deleted() {
    let app = app();
    app.seed_order().await;
    let r = app.delete("/customers/1").await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.body, "500 - Couldn't delete the customer from the database");
    assert_eq!(app.get("/customers/1").await.status, StatusCode::OK);

    assert_eq!(app.delete("/orders/1").await.status, StatusCode::OK);
    assert_eq!(app.delete("/customers/1").await.status, StatusCode::OK);
}

#[tokio::test]
async fn deleting_an_order_or_service_drops_its_pairs() {
    let app = app();
    app.seed_order().await;
    app.seed_service().await;
    app.seed_service().await;
    assert_eq!(app.send("POST", "/orders/1/services/1", None).await.status, StatusCode::OK);
    assert_eq!(app.send("POST", "/orders/1/services/2", None).await.status, StatusCode::OK);

    assert_eq!(app.delete("/services/1").await.status, StatusCode::OK);
    let r = app.get("/orders/1/services").await;
    assert_eq!(r.json().as_array().unwrap().len(), 1);
    assert_eq!(r.json()[0]["id"], 2);

    assert_eq!(app.delete("/orders/1").await.status, StatusCode::OK);
    assert_eq!(app.get("/orders/1/services").await.json(), json!([]));
}

#[tokio::test]
async fn single_read_failures_are_not_found_without_mutation() {
    let app = app();
    app.post("/customers/", json!({"name":"Acme"})).await;
    let before = app.store.customers.mutation_count();
    app.store.customers.set_fail_reads(true);

    let r = app.get("/customers/1").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - There is no customer with id 1 in the database");

    let r = app.patch("/customers/", json!({"id":1,"name":"Acme Corp"})).await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - The customer doesn't exist");

    let r = app.delete("/customers/1").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.body, "404 - The customer doesn't exist");

    assert_eq!(app.store.customers.mutation_count(), before);
    app.store.customers.set_fail_reads(false);
    assert_eq!(app.get("/customers/1").await.json()["name"], "Acme");
}
