use inventory_api::{
    app::build_app,
    client::{ApiClient, DeleteOutcome},
    config::{AppState, Settings, StorageBackend},
    db::DeletePolicy,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(DeletePolicy::Restrict).await
    }

    async fn spawn_with(delete_policy: DeletePolicy) -> Self {
        Self::spawn_with_settings(Settings { delete_policy, ..test_settings() }).await
    }

    async fn spawn_with_settings(settings: Settings) -> Self {
        // Mesmo router de produção, numa porta efêmera
        let app = build_app(AppState::in_memory(&settings));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_settings() -> Settings {
    Settings {
        storage: StorageBackend::Memory,
        bcrypt_cost: 4,
        ..Settings::default()
    }
}

fn jan() -> Value {
    json!({
        "username": "jan_kowalski",
        "email": "jan.kowalski@example.com",
        "password": "SuperSecret123",
        "first_name": "Jan",
        "last_name": "Kowalski"
    })
}

fn item_body(inventory: i64) -> Value {
    json!({
        "inventory": inventory,
        "department": 12,
        "asset_group": 8,
        "category": "491",
        "inventory_number": "W-491-0001",
        "asset_component": 100234,
        "sub_number": 0,
        "acquisition_date": "2019-10-14",
        "asset_description": "Komputer stacjonarny",
        "quantity": 1,
        "initial_value": "1500",
        "lastInventoryRoom": "104"
    })
}

async fn create(client: &reqwest::Client, url: String, body: &Value) -> Value {
    let res = client.post(url).json(body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn user_lifecycle_over_http() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create(&client, srv.url("/users/"), &jan()).await;
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    // Mesmo username: 400 e nenhum registro novo
    let res = client.post(srv.url("/users/")).json(&jan()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["field"], "username");

    let res = client.get(srv.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let users: Vec<Value> = res.json().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "jan_kowalski");
    assert_eq!(users[0]["email"], "jan.kowalski@example.com");

    let users: Vec<Value> = client.get(srv.url("/users/")).send().await.unwrap().json().await.unwrap();
    let target = users[0]["id"].as_i64().unwrap();
    assert_eq!(target, id);

    let res = client
        .put(srv.url(&format!("/users/{target}/")))
        .json(&json!({ "username": "jan_nowak", "email": "jan.nowak@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let fetched: Value = client
        .get(srv.url(&format!("/users/{target}/")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["username"], "jan_nowak");
    assert_eq!(fetched["email"], "jan.nowak@example.com");
    assert_eq!(fetched["first_name"], "Jan");
    assert_eq!(fetched["last_name"], "Kowalski");
    assert_eq!(fetched["date_joined"], created["date_joined"]);

    let res = client.delete(srv.url(&format!("/users/{target}/"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client.delete(srv.url(&format!("/users/{target}/"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_users_are_rejected_without_writes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut bang = jan();
    bang["username"] = json!("jan!");
    let res = client.post(srv.url("/users/")).json(&bang).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut no_email = jan();
    no_email.as_object_mut().unwrap().remove("email");
    let res = client.post(srv.url("/users/")).json(&no_email).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["field"], "email");

    let users: Vec<Value> = client.get(srv.url("/users/")).send().await.unwrap().json().await.unwrap();
    assert!(users.is_empty());

    let res = client.get(srv.url("/users/999/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = client
        .put(srv.url("/users/999/"))
        .json(&json!({ "email": "x@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inventories_and_items_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user = create(&client, srv.url("/users/"), &jan()).await;
    let user_id = user["id"].as_i64().unwrap();

    let res = client
        .post(srv.url("/inventories/"))
        .json(&json!({ "name": "2025", "date": "2025-03-01", "user": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let inventory = create(
        &client,
        srv.url("/inventories/"),
        &json!({ "name": "2025", "date": "2025-03-01", "user": user_id }),
    )
    .await;
    let inventory_id = inventory["id"].as_i64().unwrap();
    assert_eq!(inventory["user"], user_id);
    assert_eq!(inventory["items"], json!([]));

    let item = create(&client, srv.url("/items/"), &item_body(inventory_id)).await;
    let item_id = item["id"].as_i64().unwrap();
    assert_eq!(item["initial_value"], "1500.00");
    assert_eq!(item["lastInventoryRoom"], "104");
    assert_eq!(item["currentRoom"], Value::Null);

    let filtered: Vec<Value> = client
        .get(srv.url(&format!("/inventories/?user_id={user_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["items"], json!([item_id]));

    let res = client
        .patch(srv.url(&format!("/items/{item_id}")))
        .json(&json!({ "currentRoom": "105", "scanned": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let moved: Value = res.json().await.unwrap();
    assert_eq!(moved["currentRoom"], "105");
    assert_eq!(moved["scanned"], true);
    assert_eq!(moved["inventory_number"], "W-491-0001");

    let items: Vec<Value> = client
        .get(srv.url(&format!("/items/?inventory_id={inventory_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items.len(), 1);

    // Restrict: pais com filhos não podem ser removidos
    let res = client.delete(srv.url(&format!("/users/{user_id}/"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let res = client.delete(srv.url(&format!("/inventories/{inventory_id}/"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    for path in [
        format!("/items/{item_id}/"),
        format!("/inventories/{inventory_id}/"),
        format!("/users/{user_id}/"),
    ] {
        let res = client.delete(srv.url(&path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT, "{path}");
    }
}

#[tokio::test]
async fn invalid_item_values_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let user = create(&client, srv.url("/users/"), &jan()).await;
    let inventory = create(
        &client,
        srv.url("/inventories/"),
        &json!({ "name": "2025", "date": "2025-03-01", "user": user["id"] }),
    )
    .await;

    let mut precise = item_body(inventory["id"].as_i64().unwrap());
    precise["initial_value"] = json!("10.555");
    let res = client.post(srv.url("/items/")).json(&precise).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["details"].get("initial_value").is_some());

    let orphan = item_body(999);
    let res = client.post(srv.url("/items/")).json(&orphan).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let items: Vec<Value> = client.get(srv.url("/items/")).send().await.unwrap().json().await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn client_bulk_delete_reports_blocked_ids() {
    let srv = TestServer::spawn().await;
    let http = reqwest::Client::new();

    let mut ids = Vec::new();
    for name in ["anna", "piotr", "zofia"] {
        let mut body = jan();
        body["username"] = json!(name);
        ids.push(create(&http, srv.url("/users/"), &body).await["id"].as_i64().unwrap());
    }
    create(
        &http,
        srv.url("/inventories/"),
        &json!({ "name": "2025", "date": "2025-03-01", "user": ids[1] }),
    )
    .await;

    let client = ApiClient::new(&srv.base_url);
    let report = client.bulk_delete_all("users", 3).await.unwrap();
    assert_eq!(report.deleted, 2);
    assert_eq!(report.failed, vec![ids[1]]);

    let report = client.bulk_delete_all("inventories", 3).await.unwrap();
    assert_eq!(report.deleted, 1);
    let report = client.bulk_delete_all("users", 3).await.unwrap();
    assert_eq!(report.deleted, 1);
    assert!(report.failed.is_empty());
    assert!(client.list_ids("users").await.unwrap().is_empty());
}

#[tokio::test]
async fn client_treats_already_deleted_ids_as_missing() {
    let srv = TestServer::spawn().await;
    let http = reqwest::Client::new();
    let client = ApiClient::new(&srv.base_url);

    let mut ids = Vec::new();
    for name in ["anna", "piotr", "zofia"] {
        let mut body = jan();
        body["username"] = json!(name);
        ids.push(create(&http, srv.url("/users/"), &body).await["id"].as_i64().unwrap());
    }

    // Snapshot antigo: um dos ids some antes do laço chegar nele
    let snapshot = client.list_ids("users").await.unwrap();
    assert_eq!(snapshot, ids);
    assert_eq!(client.delete("users", ids[1]).await.unwrap(), DeleteOutcome::Deleted);

    let mut outcomes = Vec::new();
    for id in snapshot {
        outcomes.push(client.delete("users", id).await.unwrap());
    }
    assert_eq!(
        outcomes,
        vec![DeleteOutcome::Deleted, DeleteOutcome::Missing, DeleteOutcome::Deleted]
    );
    assert!(client.list_ids("users").await.unwrap().is_empty());

    let report = client.bulk_delete_all("users", 3).await.unwrap();
    assert_eq!(report.deleted, 0);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn cascade_policy_removes_children() {
    let srv = TestServer::spawn_with(DeletePolicy::Cascade).await;
    let client = reqwest::Client::new();

    let user = create(&client, srv.url("/users/"), &jan()).await;
    let inventory = create(
        &client,
        srv.url("/inventories/"),
        &json!({ "name": "2025", "date": "2025-03-01", "user": user["id"] }),
    )
    .await;
    create(&client, srv.url("/items/"), &item_body(inventory["id"].as_i64().unwrap())).await;

    let res = client
        .delete(srv.url(&format!("/users/{}/", user["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let items: Vec<Value> = client.get(srv.url("/items/")).send().await.unwrap().json().await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn api_root_and_openapi_document() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let root: Value = client.get(srv.url("/")).send().await.unwrap().json().await.unwrap();
    assert!(root["users"].as_str().unwrap().ends_with("/users/"));
    assert!(root["items"].as_str().unwrap().ends_with("/items/"));

    let res = client.get(srv.url("/api-docs/openapi.json")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let doc: Value = res.json().await.unwrap();
    assert!(doc["paths"].get("/users/{id}/").is_some());

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrongly_typed_bodies_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/users/"))
        .json(&json!({ "username": "jan", "email": 5, "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["field"], "body");

    let user = create(&client, srv.url("/users/"), &jan()).await;
    let user_id = user["id"].as_i64().unwrap();

    let res = client
        .post(srv.url("/inventories/"))
        .json(&json!({ "name": "2025", "date": "2025-13-45", "user": user_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .put(srv.url(&format!("/users/{user_id}/")))
        .json(&json!({ "is_staff": "yes" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/items/"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"inventory\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let fetched: Value = client
        .get(srv.url(&format!("/users/{user_id}/")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["is_staff"], false);
    let inventories: Vec<Value> = client.get(srv.url("/inventories/")).send().await.unwrap().json().await.unwrap();
    assert!(inventories.is_empty());
}

#[tokio::test]
async fn api_prefix_serves_index_with_and_without_slash() {
    let srv = TestServer::spawn_with_settings(Settings {
        api_prefix: "/api".to_string(),
        ..test_settings()
    })
    .await;
    let client = reqwest::Client::new();

    for path in ["/api", "/api/"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{path}");
        let root: Value = res.json().await.unwrap();
        assert!(root["users"].as_str().unwrap().ends_with("/api/users/"));
    }

    let res = client.get(srv.url("/api/users/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.get(srv.url("/users/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
