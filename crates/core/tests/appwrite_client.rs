//! AppwriteClient against a local stand-in for the Appwrite REST API

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};

use todo_core::appwrite::{AppwriteClient, AppwriteConfig};
use todo_core::ops::{purge_account, reassign_order, ReorderOptions};
use todo_core::task::TaskRepository;
use todo_core::user::{FileStorage, UserDirectory};
use todo_core::Error;

const PROJECT: &str = "proj-1";

#[derive(Default)]
struct FakeState {
    documents: Vec<Value>,
    users: Vec<Value>,
    files: Vec<(String, String)>,
    requests: Vec<String>,
    api_keys: Vec<Option<String>>,
}

#[derive(Clone, Default)]
struct Fake(Arc<Mutex<FakeState>>);

impl Fake {
    fn requests(&self) -> Vec<String> {
        self.0.lock().unwrap().requests.clone()
    }

    fn document(&self, id: &str) -> Option<Value> {
        let state = self.0.lock().unwrap();
        state.documents.iter().find(|d| d["$id"] == id).cloned()
    }
}

fn error(status: StatusCode, message: &str, kind: &str) -> Response {
    (
        status,
        Json(json!({ "message": message, "code": status.as_u16(), "type": kind })),
    )
        .into_response()
}

/// Records the request and checks the project header
fn admit(fake: &Fake, headers: &HeaderMap, line: String) -> Result<(), Response> {
    let mut state = fake.0.lock().unwrap();
    state.requests.push(line);
    state.api_keys.push(
        headers
            .get("x-appwrite-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    match headers.get("x-appwrite-project").and_then(|v| v.to_str().ok()) {
        Some(PROJECT) => Ok(()),
        _ => Err(error(
            StatusCode::UNAUTHORIZED,
            "Project is not accessible in this region.",
            "general_access_forbidden",
        )),
    }
}

fn parse_queries(raw: Option<String>) -> Vec<Value> {
    raw.unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| urlencoding::decode(key).map(|k| k == "queries[]").unwrap_or(false))
        .filter_map(|(_, value)| {
            let value = value.replace('+', " ");
            let decoded = urlencoding::decode(&value).ok()?;
            serde_json::from_str(&decoded).ok()
        })
        .collect()
}

async fn list_documents(
    State(fake): State<Fake>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    if let Err(resp) = admit(&fake, &headers, "GET documents".into()) {
        return resp;
    }

    let queries = parse_queries(raw);
    let mut user_id = None;
    let mut limit = 25usize;
    let mut cursor = None;
    for q in &queries {
        match q["method"].as_str() {
            Some("equal") if q["attribute"] == "userId" => user_id = Some(q["values"][0].clone()),
            Some("limit") => limit = q["values"][0].as_u64().unwrap_or(25) as usize,
            Some("cursorAfter") => cursor = q["values"][0].as_str().map(str::to_string),
            _ => {}
        }
    }

    let state = fake.0.lock().unwrap();
    let mut docs: Vec<Value> = state
        .documents
        .iter()
        .filter(|d| Some(&d["userId"]) == user_id.as_ref())
        .cloned()
        .collect();
    docs.sort_by_key(|d| d["order"].as_i64().unwrap_or_default());
    let total = docs.len();

    let start = match cursor {
        Some(id) => docs.iter().position(|d| d["$id"] == id.as_str()).map_or(0, |i| i + 1),
        None => 0,
    };
    let page: Vec<Value> = docs.into_iter().skip(start).take(limit).collect();

    Json(json!({ "total": total, "documents": page })).into_response()
}

async fn update_document(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path((_db, _col, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = admit(&fake, &headers, format!("PATCH {}", id)) {
        return resp;
    }

    let mut state = fake.0.lock().unwrap();
    match state.documents.iter_mut().find(|d| d["$id"] == id.as_str()) {
        Some(doc) => {
            doc["order"] = body["data"]["order"].clone();
            Json(doc.clone()).into_response()
        }
        None => error(
            StatusCode::NOT_FOUND,
            "Document with the requested ID could not be found.",
            "document_not_found",
        ),
    }
}

async fn delete_document(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path((_db, _col, id)): Path<(String, String, String)>,
) -> Response {
    if let Err(resp) = admit(&fake, &headers, format!("DELETE document {}", id)) {
        return resp;
    }
    let mut state = fake.0.lock().unwrap();
    state.documents.retain(|d| d["$id"] != id.as_str());
    StatusCode::NO_CONTENT.into_response()
}

async fn get_user(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = admit(&fake, &headers, format!("GET user {}", id)) {
        return resp;
    }
    let state = fake.0.lock().unwrap();
    match state.users.iter().find(|u| u["$id"] == id.as_str()) {
        Some(user) => Json(user.clone()).into_response(),
        None => error(
            StatusCode::NOT_FOUND,
            "User with the requested ID could not be found.",
            "user_not_found",
        ),
    }
}

async fn delete_user(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = admit(&fake, &headers, format!("DELETE user {}", id)) {
        return resp;
    }
    let mut state = fake.0.lock().unwrap();
    state.users.retain(|u| u["$id"] != id.as_str());
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_file(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path((bucket, file)): Path<(String, String)>,
) -> Response {
    if let Err(resp) = admit(&fake, &headers, format!("DELETE file {}/{}", bucket, file)) {
        return resp;
    }
    let mut state = fake.0.lock().unwrap();
    state.files.retain(|(b, f)| !(b == &bucket && f == &file));
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_fake(fake: Fake) -> String {
    let app = Router::new()
        .route(
            "/v1/databases/{db}/collections/{col}/documents",
            get(list_documents),
        )
        .route(
            "/v1/databases/{db}/collections/{col}/documents/{id}",
            delete(delete_document).patch(update_document),
        )
        .route("/v1/users/{id}", get(get_user).delete(delete_user))
        .route("/v1/storage/buckets/{bucket}/files/{file}", delete(delete_file))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn doc(id: &str, user_id: &str, status: &str, order: i64) -> Value {
    json!({
        "$id": id,
        "$collectionId": "todos",
        "userId": user_id,
        "status": status,
        "order": order,
        "title": format!("task {}", id),
    })
}

fn client(endpoint: &str) -> AppwriteClient {
    AppwriteClient::new(
        AppwriteConfig::new(PROJECT, "db", "todos")
            .with_endpoint(endpoint)
            .with_api_key("secret-key"),
    )
    .unwrap()
}

#[tokio::test]
async fn list_pages_through_all_documents() {
    let fake = Fake::default();
    {
        let mut state = fake.0.lock().unwrap();
        for (i, order) in [50, 10, 40, 20, 30].iter().enumerate() {
            state.documents.push(doc(&format!("d{}", i), "u1", "todo", *order));
        }
        state.documents.push(doc("other", "u2", "todo", 1));
    }
    let endpoint = spawn_fake(fake.clone()).await;

    let records = client(&endpoint)
        .with_page_size(2)
        .list_for_user("u1")
        .await
        .unwrap();

    let orders: Vec<i64> = records.iter().map(|r| r.order).collect();
    assert_eq!(orders, vec![10, 20, 30, 40, 50]);
    assert_eq!(records[0].attributes["title"], "task d1");

    let lists = fake
        .requests()
        .into_iter()
        .filter(|r| r == "GET documents")
        .count();
    assert_eq!(lists, 3);
}

#[tokio::test]
async fn reassign_order_writes_back_through_client() {
    let fake = Fake::default();
    {
        let mut state = fake.0.lock().unwrap();
        state.documents.push(doc("a", "u1", "Doing", 1));
        state.documents.push(doc("b", "u1", "todo", 9));
        state.documents.push(doc("c", "u1", "archived", 5));
        state.documents.push(doc("d", "u1", "todo", 3));
    }
    let endpoint = spawn_fake(fake.clone()).await;
    let client = client(&endpoint);

    let updated = reassign_order(&client, "u1", ReorderOptions::default())
        .await
        .unwrap();

    let result: Vec<_> = updated.iter().map(|t| (t.id.as_str(), t.order)).collect();
    assert_eq!(result, vec![("d", 100), ("b", 200), ("a", 300)]);
    assert_eq!(fake.document("a").unwrap()["order"], 300);
    assert_eq!(fake.document("c").unwrap()["order"], 5);
    assert_eq!(
        fake.requests()[1..].to_vec(),
        vec!["PATCH d", "PATCH b", "PATCH a"]
    );
}

#[tokio::test]
async fn null_order_documents_are_reordered() {
    let fake = Fake::default();
    {
        let mut state = fake.0.lock().unwrap();
        state.documents.push(doc("b", "u1", "todo", 5));
        let mut unset = doc("a", "u1", "todo", 0);
        unset["order"] = Value::Null;
        state.documents.push(unset);
    }
    let endpoint = spawn_fake(fake.clone()).await;
    let client = client(&endpoint);

    let fetched = client.list_for_user("u1").await.unwrap();
    assert_eq!(fetched.len(), 2);

    let updated = reassign_order(&client, "u1", ReorderOptions::default())
        .await
        .unwrap();

    let result: Vec<_> = updated.iter().map(|t| (t.id.as_str(), t.order)).collect();
    assert_eq!(result, vec![("a", 100), ("b", 200)]);
    assert_eq!(fake.document("a").unwrap()["order"], 100);
}

#[tokio::test]
async fn backend_error_message_is_verbatim() {
    let endpoint = spawn_fake(Fake::default()).await;

    let err = client(&endpoint).update_order("missing", 100).await.unwrap_err();

    assert_eq!(err.to_string(), "Document with the requested ID could not be found.");
    match err {
        Error::Backend { code, kind, .. } => {
            assert_eq!(code, 404);
            assert_eq!(kind.as_deref(), Some("document_not_found"));
        }
        e => panic!("Expected Backend error, got: {:?}", e),
    }
}

#[tokio::test]
async fn wrong_project_is_rejected() {
    let endpoint = spawn_fake(Fake::default()).await;
    let client = AppwriteClient::new(
        AppwriteConfig::new("other-project", "db", "todos").with_endpoint(&endpoint),
    )
    .unwrap();

    let err = client.list_for_user("u1").await.unwrap_err();
    assert!(matches!(err, Error::Backend { code: 401, .. }));
}

#[tokio::test]
async fn purge_issues_calls_in_order_with_api_key() {
    let fake = Fake::default();
    {
        let mut state = fake.0.lock().unwrap();
        state
            .users
            .push(json!({ "$id": "u1", "name": "Ada", "prefs": { "avatar": "f1" } }));
        state.files.push(("avatars".into(), "f1".into()));
        state.documents.push(doc("t1", "u1", "todo", 1));
        state.documents.push(doc("t2", "u1", "doing", 2));
    }
    let endpoint = spawn_fake(fake.clone()).await;
    let client = client(&endpoint);

    let report = purge_account(&client, &client, &client, Some("avatars"), "u1")
        .await
        .unwrap();

    assert!(report.avatar_deleted);
    assert_eq!(report.tasks_deleted, 2);
    assert_eq!(
        fake.requests(),
        vec![
            "GET user u1",
            "DELETE file avatars/f1",
            "GET documents",
            "DELETE document t1",
            "DELETE document t2",
            "DELETE user u1",
        ]
    );

    let state = fake.0.lock().unwrap();
    assert!(state.users.is_empty());
    assert!(state.files.is_empty());
    assert!(state.documents.is_empty());
    assert!(state
        .api_keys
        .iter()
        .all(|key| key.as_deref() == Some("secret-key")));
}

#[tokio::test]
async fn trait_objects_share_one_client() {
    let endpoint = spawn_fake(Fake::default()).await;
    let client = Arc::new(client(&endpoint));

    let tasks: Arc<dyn TaskRepository> = client.clone();
    let users: Arc<dyn UserDirectory> = client.clone();
    let files: Arc<dyn FileStorage> = client;

    assert!(tasks.list_for_user("nobody").await.unwrap().is_empty());
    assert!(matches!(users.get("nobody").await, Err(Error::Backend { code: 404, .. })));
    files.delete_file("avatars", "none").await.unwrap();
}
