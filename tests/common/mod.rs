#![allow(dead_code)]

//! In-process stand-in for the checklist backend.
//!
//! Routes mirror the real `/api` surface. Rows of a sheet are kept flat, in
//! sibling order, and folded into a forest on every answer. Faults and delays
//! can be injected per `"METHOD /path"` (path without the `/api` prefix).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::Json;
use serde_json::{Value, json};

use checklist::remote::ApiClient;
use checklist::store::{MemoryTokenStore, TokenStore};

pub const PASSWORD: &str = "correct horse";

#[derive(Clone, Debug)]
pub enum FaultBody {
    Json(Value),
    Text(&'static str),
    Empty,
}

#[derive(Clone, Debug)]
struct Fault {
    status: u16,
    body: FaultBody,
    once: bool,
}

#[derive(Clone, Debug)]
struct MockUser {
    id: i64,
    name: String,
    email: String,
    password: String,
    smartsheet_token: String,
}

#[derive(Clone, Debug)]
struct Row {
    id: i64,
    name: String,
    status: String,
    assignee: String,
    notes: String,
    parent_id: Option<i64>,
}

#[derive(Default)]
pub struct MockState {
    users: Vec<MockUser>,
    access: HashMap<String, i64>,
    refresh: HashMap<String, i64>,
    next_token: u64,
    sheets: Vec<(String, String)>,
    rows: HashMap<String, Vec<Row>>,
    next_row: i64,
    faults: HashMap<String, Fault>,
    delays: HashMap<String, Duration>,
    refresh_fails: bool,
    requests: Vec<String>,
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct MockBackend {
    pub base_url: String,
    state: Shared,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub async fn spawn_backend() -> Result<MockBackend> {
    let state: Shared = Arc::new(Mutex::new(MockState {
        next_row: 100,
        ..MockState::default()
    }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind mock backend")?;
    let addr = listener.local_addr().context("mock backend addr")?;

    let app = router(state.clone());
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(MockBackend {
        base_url: format!("http://{}/api", addr),
        state,
        task,
    })
}

impl MockBackend {
    pub fn client(&self, tokens: Arc<dyn TokenStore>) -> ApiClient {
        ApiClient::new(&self.base_url, Some(Duration::from_secs(5)), tokens)
            .expect("build api client")
    }

    /// Creates a user and returns an already signed-in client for them.
    pub fn signed_in_client(&self, email: &str) -> (ApiClient, Arc<MemoryTokenStore>) {
        self.add_user("Test User", email);
        let (access, refresh) = self.issue_tokens(email);
        let store = Arc::new(MemoryTokenStore::with_tokens(&access, &refresh));
        (self.client(store.clone()), store)
    }

    pub fn add_user(&self, name: &str, email: &str) -> i64 {
        let mut st = lock(&self.state);
        let id = st.users.len() as i64 + 1;
        st.users.push(MockUser {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            smartsheet_token: "ss-token".to_string(),
        });
        id
    }

    pub fn issue_tokens(&self, email: &str) -> (String, String) {
        let mut st = lock(&self.state);
        let user = st
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id)
            .expect("known user");
        st.issue(user)
    }

    /// Every access token stops working; refresh tokens stay valid.
    pub fn expire_access_tokens(&self) {
        lock(&self.state).access.clear();
    }

    pub fn set_refresh_fails(&self, fails: bool) {
        lock(&self.state).refresh_fails = fails;
    }

    pub fn fail(&self, route: &str, status: u16, body: FaultBody) {
        self.add_fault(route, status, body, false);
    }

    pub fn fail_once(&self, route: &str, status: u16, body: FaultBody) {
        self.add_fault(route, status, body, true);
    }

    fn add_fault(&self, route: &str, status: u16, body: FaultBody, once: bool) {
        lock(&self.state)
            .faults
            .insert(route.to_string(), Fault { status, body, once });
    }

    pub fn clear_faults(&self) {
        lock(&self.state).faults.clear();
    }

    pub fn delay(&self, route: &str, by: Duration) {
        lock(&self.state).delays.insert(route.to_string(), by);
    }

    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }

    pub fn count(&self, route: &str) -> usize {
        lock(&self.state)
            .requests
            .iter()
            .filter(|r| r.as_str() == route)
            .count()
    }

    pub fn add_sheet(&self, name: &str) -> String {
        lock(&self.state).create_sheet(name)
    }

    pub fn add_row(&self, sheet: &str, name: &str, parent_id: Option<i64>) -> i64 {
        let mut st = lock(&self.state);
        st.next_row += 1;
        let id = st.next_row;
        st.rows.entry(sheet.to_string()).or_default().push(Row {
            id,
            name: name.to_string(),
            status: "Not Started".to_string(),
            assignee: String::new(),
            notes: String::new(),
            parent_id,
        });
        id
    }

    pub fn row_names(&self, sheet: &str) -> Vec<String> {
        lock(&self.state)
            .rows
            .get(sheet)
            .map(|rows| rows.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }
}

impl MockState {
    fn issue(&mut self, user: i64) -> (String, String) {
        self.next_token += 1;
        let access = format!("access-{}", self.next_token);
        let refresh = format!("refresh-{}", self.next_token);
        self.access.insert(access.clone(), user);
        self.refresh.insert(refresh.clone(), user);
        (access, refresh)
    }

    fn create_sheet(&mut self, name: &str) -> String {
        let id = format!("00000000-0000-4000-8000-{:012}", self.sheets.len() + 1);
        self.sheets.push((id.clone(), name.to_string()));
        self.rows.insert(id.clone(), Vec::new());
        id
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<&MockUser> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let id = self.access.get(token)?;
        self.users.iter().find(|u| u.id == *id)
    }

    fn forest(&self, sheet: &str) -> Value {
        let rows = self.rows.get(sheet).map(Vec::as_slice).unwrap_or(&[]);
        Value::Array(children_of(rows, None))
    }
}

fn children_of(rows: &[Row], parent: Option<i64>) -> Vec<Value> {
    rows.iter()
        .filter(|r| r.parent_id == parent)
        .map(|r| {
            json!({
                "id": r.id,
                "name": r.name,
                "status": r.status,
                "assignee": r.assignee,
                "notes": r.notes,
                "parent_id": r.parent_id,
                "children": children_of(rows, Some(r.id)),
            })
        })
        .collect()
}

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/register/", post(register))
        .route("/token/", post(obtain_token))
        .route("/token/refresh/", post(refresh_token))
        .route("/logout/", post(logout))
        .route("/profile/", get(profile).patch(update_profile))
        .route("/sheets/", get(list_sheets).post(create_sheet))
        .route("/sheets/:sheet/", delete(delete_sheet))
        .route("/sheets/:sheet/items/", get(list_items))
        .route("/sheets/:sheet/items/create/", post(create_item))
        .route(
            "/sheets/:sheet/items/:row/",
            put(update_item).delete(delete_item),
        )
        .route("/sheets/:sheet/items/:row/:action/", post(restructure));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), record_and_inject))
        .with_state(state)
}

async fn record_and_inject(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let path = req.uri().path();
    let key = format!("{} {}", req.method(), path.strip_prefix("/api").unwrap_or(path));
    let (fault, delay) = {
        let mut st = lock(&state);
        st.requests.push(key.clone());
        let fault = st.faults.get(&key).cloned();
        if fault.as_ref().is_some_and(|f| f.once) {
            st.faults.remove(&key);
        }
        (fault, st.delays.get(&key).copied())
    };

    if let Some(by) = delay {
        tokio::time::sleep(by).await;
    }
    let Some(fault) = fault else {
        return next.run(req).await;
    };
    let status = StatusCode::from_u16(fault.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match fault.body {
        FaultBody::Json(body) => (status, Json(body)).into_response(),
        FaultBody::Text(text) => (status, text).into_response(),
        FaultBody::Empty => status.into_response(),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "detail": "Given token not valid for any token type",
            "code": "token_not_valid",
        })),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found." }))).into_response()
}

fn text_field(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = lock(&state);
    let email = text_field(&body, "email");
    if st.users.iter().any(|u| u.email == email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "email": ["user with this email already exists."] })),
        )
            .into_response();
    }
    let id = st.users.len() as i64 + 1;
    let user = MockUser {
        id,
        name: text_field(&body, "name"),
        email,
        password: text_field(&body, "password"),
        smartsheet_token: text_field(&body, "smartsheet_token"),
    };
    let reply_user = json!({ "id": user.id, "name": user.name, "email": user.email });
    st.users.push(user);
    let (access, refresh) = st.issue(id);
    (
        StatusCode::CREATED,
        Json(json!({ "access": access, "refresh": refresh, "user": reply_user })),
    )
        .into_response()
}

async fn obtain_token(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = lock(&state);
    let email = text_field(&body, "email");
    let password = text_field(&body, "password");
    let Some(id) = st
        .users
        .iter()
        .find(|u| u.email == email && u.password == password)
        .map(|u| u.id)
    else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "No active account found with the given credentials" })),
        )
            .into_response();
    };
    let (access, refresh) = st.issue(id);
    Json(json!({ "access": access, "refresh": refresh })).into_response()
}

async fn refresh_token(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = lock(&state);
    let refresh = text_field(&body, "refresh");
    let user = st.refresh.get(&refresh).copied();
    match user {
        Some(id) if !st.refresh_fails => {
            st.next_token += 1;
            let access = format!("access-{}", st.next_token);
            st.access.insert(access.clone(), id);
            Json(json!({ "access": access })).into_response()
        }
        _ => unauthorized(),
    }
}

async fn logout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    if st.refresh.remove(&text_field(&body, "refresh")).is_none() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let st = lock(&state);
    let Some(user) = st.user_for(&headers) else {
        return unauthorized();
    };
    Json(json!({
        "email": user.email,
        "name": user.name,
        "has_smartsheet_token": !user.smartsheet_token.is_empty(),
    }))
    .into_response()
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = lock(&state);
    let Some(id) = st.user_for(&headers).map(|u| u.id) else {
        return unauthorized();
    };
    let Some(user) = st.users.iter_mut().find(|u| u.id == id) else {
        return not_found();
    };
    if let Some(name) = body.get("name").and_then(Value::as_str) {
        user.name = name.to_string();
    }
    Json(json!({
        "email": user.email,
        "name": user.name,
        "has_smartsheet_token": !user.smartsheet_token.is_empty(),
    }))
    .into_response()
}

async fn list_sheets(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    let sheets: Vec<Value> = st
        .sheets
        .iter()
        .rev()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    Json(sheets).into_response()
}

async fn create_sheet(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    let name = text_field(&body, "name");
    if name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "name": ["This field may not be blank."] })),
        )
            .into_response();
    }
    let id = st.create_sheet(&name);
    (StatusCode::CREATED, Json(json!({ "id": id, "name": name }))).into_response()
}

async fn delete_sheet(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(sheet): Path<String>,
) -> Response {
    let mut st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    let before = st.sheets.len();
    st.sheets.retain(|(id, _)| *id != sheet);
    if st.sheets.len() == before {
        return not_found();
    }
    st.rows.remove(&sheet);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_items(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(sheet): Path<String>,
) -> Response {
    let st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    if !st.rows.contains_key(&sheet) {
        return not_found();
    }
    Json(st.forest(&sheet)).into_response()
}

async fn create_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(sheet): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    let name = text_field(&body, "name");
    if name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "name": ["This field may not be blank."] })),
        )
            .into_response();
    }
    let parent_id = body.get("parent_id").and_then(Value::as_i64);
    st.next_row += 1;
    let id = st.next_row;
    let Some(rows) = st.rows.get_mut(&sheet) else {
        return not_found();
    };
    if let Some(parent) = parent_id {
        if !rows.iter().any(|r| r.id == parent) {
            return not_found();
        }
    }
    let status = match text_field(&body, "status") {
        s if s.is_empty() => "Not Started".to_string(),
        s => s,
    };
    rows.push(Row {
        id,
        name,
        status,
        assignee: text_field(&body, "assignee"),
        notes: text_field(&body, "notes"),
        parent_id,
    });
    (StatusCode::CREATED, Json(st.forest(&sheet))).into_response()
}

async fn update_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((sheet, row)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Response {
    let mut st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    let Some(target) = st
        .rows
        .get_mut(&sheet)
        .and_then(|rows| rows.iter_mut().find(|r| r.id == row))
    else {
        return not_found();
    };
    if let Some(v) = body.get("name").and_then(Value::as_str) {
        target.name = v.to_string();
    }
    if let Some(v) = body.get("status").and_then(Value::as_str) {
        target.status = v.to_string();
    }
    if let Some(v) = body.get("assignee").and_then(Value::as_str) {
        target.assignee = v.to_string();
    }
    if let Some(v) = body.get("notes").and_then(Value::as_str) {
        target.notes = v.to_string();
    }
    Json(st.forest(&sheet)).into_response()
}

async fn delete_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((sheet, row)): Path<(String, i64)>,
) -> Response {
    let mut st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    let Some(rows) = st.rows.get_mut(&sheet) else {
        return not_found();
    };
    if !rows.iter().any(|r| r.id == row) {
        return not_found();
    }
    let mut doomed = vec![row];
    let mut i = 0;
    while i < doomed.len() {
        let parent = doomed[i];
        doomed.extend(rows.iter().filter(|r| r.parent_id == Some(parent)).map(|r| r.id));
        i += 1;
    }
    rows.retain(|r| !doomed.contains(&r.id));
    Json(st.forest(&sheet)).into_response()
}

async fn restructure(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((sheet, row, action)): Path<(String, i64, String)>,
) -> Response {
    let mut st = lock(&state);
    if st.user_for(&headers).is_none() {
        return unauthorized();
    }
    let Some(rows) = st.rows.get_mut(&sheet) else {
        return not_found();
    };
    let Some(pos) = rows.iter().position(|r| r.id == row) else {
        return not_found();
    };
    let parent = rows[pos].parent_id;
    let prev = rows[..pos].iter().rposition(|r| r.parent_id == parent);
    let next = rows[pos + 1..]
        .iter()
        .position(|r| r.parent_id == parent)
        .map(|i| pos + 1 + i);

    match action.as_str() {
        "indent" => {
            let Some(prev) = prev else {
                return bad_request("Cannot indent: no sibling above");
            };
            let mut moved = rows.remove(pos);
            moved.parent_id = Some(rows[prev].id);
            rows.push(moved);
        }
        "outdent" => {
            let Some(parent_id) = parent else {
                return bad_request("Cannot outdent: already at top level");
            };
            let Some(parent_pos) = rows.iter().position(|r| r.id == parent_id) else {
                return not_found();
            };
            let grandparent = rows[parent_pos].parent_id;
            let mut moved = rows.remove(pos);
            moved.parent_id = grandparent;
            let parent_pos = rows.iter().position(|r| r.id == parent_id).unwrap_or(0);
            rows.insert(parent_pos + 1, moved);
        }
        "move-up" => {
            let Some(prev) = prev else {
                return bad_request("Cannot move up: already at the top");
            };
            rows.swap(prev, pos);
        }
        "move-down" => {
            let Some(next) = next else {
                return bad_request("Cannot move down: already at the bottom");
            };
            rows.swap(pos, next);
        }
        _ => return not_found(),
    }
    Json(st.forest(&sheet)).into_response()
}
