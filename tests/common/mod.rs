#![allow(dead_code)]

//! Mock storefront backend for integration tests.
//!
//! Issues real HS256 credentials and verifies them on protected routes, so
//! tests exercise the same trust boundary as production: the client's
//! decoded role is only a hint, the backend decides.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use storefront::{Database, Session, StorefrontClient, db::SqliteStorage};
use url::Url;

pub const JWT_SECRET: &[u8] = b"test-jwt-secret";

/// Login with this email makes the backend fail with a 500.
pub const FAULTY_EMAIL: &str = "explode@example.com";

#[derive(Clone)]
struct MockUser {
    id: String,
    password: String,
    role: String,
    first_name: String,
    last_name: String,
    image_url: String,
}

/// How the mock backend shapes its responses.
#[derive(Clone)]
pub struct BackendOptions {
    /// JSON field carrying the credential in login responses
    pub token_field: &'static str,
    /// Whether signup responds with a credential
    pub signup_signs_in: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            token_field: "token",
            signup_signs_in: false,
        }
    }
}

#[derive(Clone)]
struct BackendState {
    users: Arc<Mutex<HashMap<String, MockUser>>>,
    products: Arc<Mutex<Vec<Value>>>,
    options: BackendOptions,
}

pub struct TestBackend {
    pub url: Url,
    state: BackendState,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestBackend {
    pub fn add_user(&self, email: &str, password: &str, role: &str) {
        self.state.users.lock().unwrap().insert(
            email.to_string(),
            MockUser {
                id: uuid::Uuid::new_v4().to_string(),
                password: password.to_string(),
                role: role.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                image_url: format!("https://img.example.com/{}.png", role),
            },
        );
    }

    pub fn product_count(&self) -> usize {
        self.state.products.lock().unwrap().len()
    }

    pub fn has_user(&self, email: &str) -> bool {
        self.state.users.lock().unwrap().contains_key(email)
    }

    pub fn client(&self) -> StorefrontClient {
        StorefrontClient::new(self.url.clone())
    }

    /// A session over a fresh in-memory database.
    pub async fn session(&self) -> (Session<SqliteStorage>, Database) {
        let db = Database::open(":memory:")
            .await
            .expect("Failed to open test database");
        (self.session_on(&db), db)
    }

    /// A session over an existing database, like reloading the page.
    pub fn session_on(&self, db: &Database) -> Session<SqliteStorage> {
        let client = self.client();
        let storage = db.storage(&client.origin());
        Session::new(client, storage)
    }
}

pub async fn start_backend() -> TestBackend {
    start_backend_with(BackendOptions::default()).await
}

pub async fn start_backend_with(options: BackendOptions) -> TestBackend {
    let state = BackendState {
        users: Arc::new(Mutex::new(HashMap::new())),
        products: Arc::new(Mutex::new(Vec::new())),
        options,
    };

    let app = Router::new()
        .route("/api/users/login", post(login))
        .route("/api/users/signup", post(signup))
        .route("/api/product/addProduct", post(add_product))
        .route("/api/product/search", get(search))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    TestBackend {
        url: Url::parse(&format!("http://{}", addr)).unwrap(),
        state,
        handle,
    }
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Sign arbitrary claims with the backend's secret.
pub fn mint_token(claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .unwrap()
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn issue_token(email: &str, user: &MockUser) -> String {
    let now = now();
    mint_token(&json!({
        "id": user.id,
        "email": email,
        "role": user.role,
        "firstName": user.first_name,
        "lastName": user.last_name,
        "imageUrl": user.image_url,
        "iat": now,
        "exp": now + 3600,
    }))
}

async fn login(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if email == FAULTY_EMAIL {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }

    let users = state.users.lock().unwrap();
    match users.get(email) {
        Some(user) if user.password == password => {
            let token = issue_token(email, user);
            let mut body = serde_json::Map::new();
            body.insert(state.options.token_field.to_string(), Value::String(token));
            (StatusCode::OK, Json(Value::Object(body))).into_response()
        }
        _ => message(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn signup(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    let field = |name: &str| body[name].as_str().unwrap_or_default().to_string();
    let (email, password) = (field("email"), field("password"));

    if email.is_empty() || password.is_empty() || field("firstName").is_empty() {
        return message(StatusCode::BAD_REQUEST, "All fields are required");
    }

    let mut users = state.users.lock().unwrap();
    if users.contains_key(&email) {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }

    let user = MockUser {
        id: uuid::Uuid::new_v4().to_string(),
        password,
        role: field("role"),
        first_name: field("firstName"),
        last_name: field("lastName"),
        image_url: field("imageUrl"),
    };
    let token = issue_token(&email, &user);
    users.insert(email, user);

    if state.options.signup_signs_in {
        (StatusCode::CREATED, Json(json!({ "token": token }))).into_response()
    } else {
        message(StatusCode::CREATED, "User created")
    }
}

async fn add_product(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return message(StatusCode::UNAUTHORIZED, "No token provided");
    };

    let claims = match jsonwebtoken::decode::<Value>(
        token,
        &DecodingKey::from_secret(JWT_SECRET),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(data) => data.claims,
        Err(_) => return message(StatusCode::UNAUTHORIZED, "Invalid token"),
    };

    if claims["role"] != "admin" {
        return message(StatusCode::FORBIDDEN, "Admin access required");
    }

    let product = json!({
        "_id": uuid::Uuid::new_v4().to_string(),
        "brand": body["brand"],
        "Model": body["Model"],
        "price": body["price"],
        "stock": body["stock"],
    });
    state.products.lock().unwrap().push(product.clone());

    (StatusCode::CREATED, Json(product)).into_response()
}

async fn search(
    State(state): State<BackendState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = params
        .get("query")
        .map(|q| q.to_lowercase())
        .unwrap_or_default();

    let products = state.products.lock().unwrap();
    let matches: Vec<Value> = products
        .iter()
        .filter(|p| {
            ["brand", "Model"].iter().any(|key| {
                p[*key]
                    .as_str()
                    .is_some_and(|s| s.to_lowercase().contains(&query))
            })
        })
        .cloned()
        .collect();

    (StatusCode::OK, Json(matches)).into_response()
}
