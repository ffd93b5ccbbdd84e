#![allow(dead_code)]
//! 테스트용 모의 백엔드
//! 127.0.0.1:0 에 axum 서버를 띄우고, 요청 횟수 / 지연 / 실패를 조절할 수 있다.
use auction_client::config::ClientConfig;
use auction_client::counters::CartCounter;
use auction_client::http::ApiClient;
use auction_client::session::Session;
use auction_client::storage::MemoryStore;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::time::Duration;

pub const BUYER_ID: &str = "u-buyer";
pub const BUYER_EMAIL: &str = "buyer@example.com";
pub const SELLER_ID: &str = "u-seller";
pub const SELLER_EMAIL: &str = "seller@example.com";
pub const PASSWORD: &str = "secret";

pub const LIVE_ITEM: &str = "item-live";
pub const ENDED_ITEM: &str = "item-ended";
pub const WON_ITEM: &str = "item-won";
pub const WON_AUCTION: &str = "auc-won";
pub const PAID_ITEM: &str = "item-paid";

/// 트레이싱 초기화 (여러 테스트에서 호출해도 한 번만 적용)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

// region:    --- Backend State
#[derive(Clone)]
struct MockUser {
    id: String,
    name: String,
    email: String,
    password: String,
    role: String,
}

#[derive(Default)]
pub struct Backend {
    users: Vec<MockUser>,
    tokens: HashMap<String, String>,
    items: Vec<Value>,
    bids: Vec<Value>,
    cart: HashSet<(String, String)>,
    watchlist: HashSet<(String, String)>,
    payments: Vec<Value>,
    notifications: Vec<Value>,
    hits: HashMap<String, usize>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    seq: u64,
}

type Shared = Arc<Mutex<Backend>>;

impl Backend {
    fn seeded() -> Self {
        let now = Utc::now();
        let mut backend = Backend::default();

        backend.users = vec![
            MockUser {
                id: BUYER_ID.into(),
                name: "Bea Buyer".into(),
                email: BUYER_EMAIL.into(),
                password: PASSWORD.into(),
                role: "BUYER".into(),
            },
            MockUser {
                id: SELLER_ID.into(),
                name: "Sam Seller".into(),
                email: SELLER_EMAIL.into(),
                password: PASSWORD.into(),
                role: "SELLER".into(),
            },
        ];

        backend.items = vec![
            json!({
                "id": LIVE_ITEM,
                "title": "Vintage Camera",
                "description": "Rangefinder, 1962",
                "minimumBid": 50.0,
                "currentBid": 100.0,
                "images": null,
                "auctionEndTime": (now + ChronoDuration::days(1)).to_rfc3339(),
                "status": "ACTIVE",
                "sellerId": SELLER_ID,
                "totalBids": 1
            }),
            json!({
                "_id": ENDED_ITEM,
                "title": "Old Radio",
                "minimumBid": 20.0,
                "auctionEndTime": (now - ChronoDuration::hours(1)).to_rfc3339(),
                "status": "ACTIVE",
                "sellerId": SELLER_ID
            }),
        ];

        backend.bids = vec![
            json!({
                "id": "bid-seed",
                "itemId": LIVE_ITEM,
                "bidderId": "u-other",
                "amount": 100.0,
                "timestamp": (now - ChronoDuration::minutes(30)).to_rfc3339(),
                "status": "ACTIVE"
            }),
            // 낙찰 (미결제): item.id / auction._id / bidAmount 변형
            json!({
                "_id": "bid-won",
                "item": { "_id": WON_ITEM, "title": "Antique Clock" },
                "auction": { "_id": WON_AUCTION },
                "bidderId": BUYER_ID,
                "bidAmount": 200.0,
                "bidTime": (now - ChronoDuration::days(2)).to_rfc3339(),
                "status": "WON"
            }),
            // 낙찰 (결제 완료)
            json!({
                "id": "bid-paid",
                "itemId": PAID_ITEM,
                "auctionId": "auc-paid",
                "bidderId": BUYER_ID,
                "amount": 80.0,
                "status": "WON",
                "item": { "id": PAID_ITEM, "title": "Brass Lamp" }
            }),
            json!({
                "id": "bid-lost",
                "itemId": "item-lost",
                "bidderId": BUYER_ID,
                "amount": 10.0,
                "status": "LOST"
            }),
        ];

        backend.payments = vec![json!({
            "paymentId": "pay-seed",
            "itemId": PAID_ITEM,
            "auctionId": "auc-paid",
            "userId": BUYER_ID,
            "amount": 81.6
        })];

        backend.notifications = vec![
            json!({ "id": "n-1", "userId": BUYER_ID, "title": "Outbid", "message": "You were outbid", "type": "OUTBID", "read": false }),
            json!({ "id": "n-2", "userId": BUYER_ID, "title": "Won", "message": "You won", "type": "WON", "read": false }),
            json!({ "id": "n-3", "userId": BUYER_ID, "title": "Welcome", "message": "Hi", "type": "INFO", "read": true }),
        ];

        backend
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.seq += 1;
        format!("{prefix}-{}", self.seq)
    }

    fn user_json(user: &MockUser) -> Value {
        json!({ "id": user.id, "name": user.name, "email": user.email, "role": user.role })
    }

    fn item(&self, id: &str) -> Option<&Value> {
        self.items.iter().find(|i| item_id(i) == id)
    }

    fn issue_token(&mut self, user_id: &str) -> String {
        let token = self.next_id(&format!("tok-{user_id}"));
        self.tokens.insert(token.clone(), user_id.to_string());
        token
    }
}

fn item_id(item: &Value) -> &str {
    item.get("id")
        .or_else(|| item.get("_id"))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn bid_item_id(bid: &Value) -> Option<&str> {
    bid.get("itemId").and_then(Value::as_str).or_else(|| {
        bid.get("item")
            .and_then(|i| i.get("id").or_else(|| i.get("_id")))
            .and_then(Value::as_str)
    })
}
// endregion: --- Backend State

// region:    --- Mock Server
pub struct MockServer {
    pub base_url: String,
    state: Shared,
}

impl MockServer {
    pub async fn start() -> Self {
        init_tracing();
        let state: Shared = Arc::new(Mutex::new(Backend::seeded()));
        let app = router(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("모의 서버 바인드 실패");
        let addr = listener.local_addr().expect("주소 조회 실패");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("모의 서버 실행 실패");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::default().with_base_url(self.base_url.clone())
    }

    pub fn client(&self) -> Arc<ApiClient> {
        let store = Arc::new(MemoryStore::new());
        Arc::new(ApiClient::new(&self.config(), store).expect("클라이언트 생성 실패"))
    }

    /// 새 세션 (로그인 전)
    pub async fn session(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(self.client()));
        session.init().await;
        session
    }

    /// 로그인된 세션
    pub async fn signed_in(&self, email: &str) -> Arc<Session> {
        let session = self.session().await;
        session.login(email, PASSWORD).await.expect("로그인 실패");
        session
    }

    pub fn cart_counter(&self, session: &Arc<Session>) -> Arc<CartCounter> {
        Arc::new(CartCounter::new(Arc::clone(session)))
    }

    /// 경로별 요청 횟수
    pub fn hits(&self, key: &str) -> usize {
        self.lock().hits.get(key).copied().unwrap_or(0)
    }

    pub fn delay(&self, key: &str, delay: Duration) {
        self.lock().delays.insert(key.to_string(), delay);
    }

    pub fn clear_delay(&self, key: &str) {
        self.lock().delays.remove(key);
    }

    pub fn fail(&self, key: &str) {
        self.lock().failures.insert(key.to_string());
    }

    pub fn recover(&self, key: &str) {
        self.lock().failures.remove(key);
    }

    /// 모든 토큰 무효화 (다음 요청이 401)
    pub fn expire_tokens(&self) {
        self.lock().tokens.clear();
    }

    pub fn payments(&self) -> Vec<Value> {
        self.lock().payments.clone()
    }

    pub fn set_current_bid(&self, id: &str, amount: f64) {
        let mut backend = self.lock();
        if let Some(item) = backend.items.iter_mut().find(|i| item_id(i) == id) {
            item["currentBid"] = json!(amount);
        }
    }

    pub fn set_auction_end(&self, id: &str, end: DateTime<Utc>) {
        let mut backend = self.lock();
        if let Some(item) = backend.items.iter_mut().find(|i| item_id(i) == id) {
            item["auctionEndTime"] = json!(end.to_rfc3339());
        }
    }

    pub fn in_watchlist(&self, user_id: &str, item: &str) -> bool {
        self.lock()
            .watchlist
            .contains(&(user_id.to_string(), item.to_string()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.state.lock().expect("모의 서버 상태 잠금 실패")
    }
}
// endregion: --- Mock Server

// region:    --- Routes
fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/items", get(list_items))
        .route("/api/items/:id", get(get_item))
        .route("/api/bids", post(place_bid))
        .route("/api/bids/user", get(my_bids))
        .route("/api/bids/item/:id", get(bids_for_item))
        .route("/api/cart", get(cart_items).delete(clear_cart))
        .route("/api/cart/count", get(cart_count))
        .route("/api/cart/check/:id", get(cart_check))
        .route("/api/cart/:id", post(cart_add).delete(cart_remove))
        .route("/api/watchlist/check/:id", get(watchlist_check))
        .route("/api/watchlist/:id", post(watchlist_add).delete(watchlist_remove))
        .route("/api/payments/confirm", post(confirm_payment))
        .route("/api/payments/exists", get(payment_exists))
        .route("/api/notifications", get(notifications))
        .route("/api/notifications/:id/read", put(mark_read))
        .with_state(state)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// 요청 기록, 지연, 강제 실패 처리
async fn enter(state: &Shared, key: &str) -> Result<(), Response> {
    let (delay, fail) = {
        let mut backend = state.lock().expect("lock");
        *backend.hits.entry(key.to_string()).or_default() += 1;
        (
            backend.delays.get(key).copied(),
            backend.failures.contains(key),
        )
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if fail {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "mock failure"));
    }
    Ok(())
}

fn authed(state: &Shared, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Missing token"))?;
    state
        .lock()
        .expect("lock")
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Token expired"))
}

macro_rules! guard {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(r) => return r,
        }
    };
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    guard!(enter(&state, "login").await);
    let mut backend = state.lock().expect("lock");
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let Some(user) = backend
        .users
        .iter()
        .find(|u| u.email == email && u.password == password)
        .cloned()
    else {
        return error(StatusCode::BAD_REQUEST, "Invalid credentials");
    };
    let token = backend.issue_token(&user.id);
    Json(json!({ "token": token, "tokenType": "Bearer" })).into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    guard!(enter(&state, "register").await);
    let mut backend = state.lock().expect("lock");
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if backend.users.iter().any(|u| u.email == email) {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    let id = backend.next_id("u");
    backend.users.push(MockUser {
        id: id.clone(),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email,
        password: body["password"].as_str().unwrap_or_default().to_string(),
        role: body["role"].as_str().unwrap_or("BUYER").to_string(),
    });
    let token = backend.issue_token(&id);
    Json(json!({ "token": token })).into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(enter(&state, "me").await);
    let user_id = guard!(authed(&state, &headers));
    let backend = state.lock().expect("lock");
    match backend.users.iter().find(|u| u.id == user_id) {
        Some(user) => Json(Backend::user_json(user)).into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Unknown user"),
    }
}

async fn list_items(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    guard!(enter(&state, "items").await);
    let backend = state.lock().expect("lock");
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: usize = query.get("size").and_then(|s| s.parse().ok()).unwrap_or(20);
    let content: Vec<Value> = backend.items.iter().skip(page * size).take(size).cloned().collect();
    let total = backend.items.len();
    Json(json!({
        "content": content,
        "totalElements": total,
        "totalPages": total.div_ceil(size.max(1)),
        "number": page,
        "size": size
    }))
    .into_response()
}

/// 지연 전에 상태를 읽어 두므로 느린 응답은 오래된 값을 돌려준다
async fn get_item(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let (item, delay, fail) = {
        let mut backend = state.lock().expect("lock");
        *backend.hits.entry("item".to_string()).or_default() += 1;
        (
            backend.item(&id).cloned(),
            backend.delays.get("item").copied(),
            backend.failures.contains("item"),
        )
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if fail {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "mock failure");
    }
    match item {
        Some(item) => Json(item).into_response(),
        None => error(StatusCode::NOT_FOUND, "Item not found"),
    }
}

async fn bids_for_item(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    guard!(enter(&state, "item_bids").await);
    let backend = state.lock().expect("lock");
    let bids: Vec<Value> = backend
        .bids
        .iter()
        .filter(|b| bid_item_id(b) == Some(id.as_str()))
        .cloned()
        .collect();
    Json(bids).into_response()
}

async fn my_bids(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(enter(&state, "my_bids").await);
    let user_id = guard!(authed(&state, &headers));
    let backend = state.lock().expect("lock");
    let bids: Vec<Value> = backend
        .bids
        .iter()
        .filter(|b| b["bidderId"].as_str() == Some(user_id.as_str()))
        .cloned()
        .collect();
    Json(bids).into_response()
}

async fn place_bid(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    guard!(enter(&state, "place_bid").await);
    let user_id = guard!(authed(&state, &headers));
    let mut backend = state.lock().expect("lock");
    let item_id = body["itemId"].as_str().unwrap_or_default().to_string();
    let amount = body["bidAmount"].as_f64().unwrap_or_default();

    let Some(item) = backend.item(&item_id).cloned() else {
        return error(StatusCode::NOT_FOUND, "Item not found");
    };
    let current = item["currentBid"].as_f64().unwrap_or_default();
    if amount <= current {
        return error(
            StatusCode::BAD_REQUEST,
            "Bid amount must be higher than current bid",
        );
    }

    let id = backend.next_id("bid");
    let bid = json!({
        "id": id,
        "itemId": item_id,
        "bidderId": user_id,
        "amount": amount,
        "timestamp": Utc::now().to_rfc3339(),
        "status": "ACTIVE",
        "item": { "id": item_id, "title": item["title"] }
    });
    backend.bids.push(bid.clone());
    if let Some(item) = backend.items.iter_mut().find(|i| item_id == self::item_id(i)) {
        item["currentBid"] = json!(amount);
        let total = item["totalBids"].as_u64().unwrap_or_default();
        item["totalBids"] = json!(total + 1);
    }
    Json(bid).into_response()
}

async fn cart_items(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(enter(&state, "cart").await);
    let user_id = guard!(authed(&state, &headers));
    let backend = state.lock().expect("lock");
    let items: Vec<Value> = backend
        .items
        .iter()
        .filter(|i| backend.cart.contains(&(user_id.clone(), item_id(i).to_string())))
        .cloned()
        .collect();
    Json(items).into_response()
}

async fn cart_count(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(enter(&state, "cart_count").await);
    let user_id = guard!(authed(&state, &headers));
    let backend = state.lock().expect("lock");
    let count = backend.cart.iter().filter(|(u, _)| *u == user_id).count();
    Json(json!({ "count": count })).into_response()
}

async fn cart_check(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(enter(&state, "cart_check").await);
    let user_id = guard!(authed(&state, &headers));
    let backend = state.lock().expect("lock");
    Json(json!({ "inCart": backend.cart.contains(&(user_id, id)) })).into_response()
}

async fn cart_add(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(enter(&state, "cart_add").await);
    let user_id = guard!(authed(&state, &headers));
    state.lock().expect("lock").cart.insert((user_id, id));
    Json(json!({ "status": "added" })).into_response()
}

async fn cart_remove(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(enter(&state, "cart_remove").await);
    let user_id = guard!(authed(&state, &headers));
    state.lock().expect("lock").cart.remove(&(user_id, id));
    Json(json!({ "status": "removed" })).into_response()
}

async fn clear_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(enter(&state, "cart_clear").await);
    let user_id = guard!(authed(&state, &headers));
    state.lock().expect("lock").cart.retain(|(u, _)| *u != user_id);
    StatusCode::NO_CONTENT.into_response()
}

async fn watchlist_check(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(enter(&state, "watchlist_check").await);
    let user_id = guard!(authed(&state, &headers));
    let backend = state.lock().expect("lock");
    Json(json!({ "inWatchlist": backend.watchlist.contains(&(user_id, id)) })).into_response()
}

async fn watchlist_add(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(enter(&state, "watchlist_add").await);
    let user_id = guard!(authed(&state, &headers));
    state.lock().expect("lock").watchlist.insert((user_id, id));
    Json(json!({ "status": "added" })).into_response()
}

async fn watchlist_remove(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(enter(&state, "watchlist_remove").await);
    let user_id = guard!(authed(&state, &headers));
    state.lock().expect("lock").watchlist.remove(&(user_id, id));
    Json(json!({ "status": "removed" })).into_response()
}

async fn confirm_payment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    guard!(enter(&state, "payment_confirm").await);
    guard!(authed(&state, &headers));
    let mut backend = state.lock().expect("lock");
    let payment_id = backend.next_id("pay");
    backend.payments.push(json!({
        "paymentId": payment_id,
        "itemId": body["itemId"],
        "auctionId": body["auctionId"],
        "userId": body["userId"],
        "amount": body["amount"],
        "paymentMethod": body["paymentMethod"]
    }));
    Json(json!({
        "paymentId": payment_id,
        "status": "SUCCESS",
        "auctionId": body["auctionId"],
        "buyerId": body["userId"],
        "sellerId": SELLER_ID,
        "amount": body["amount"],
        "paymentMethod": body["paymentMethod"],
        "timestamp": Utc::now().to_rfc3339()
    }))
    .into_response()
}

async fn payment_exists(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    guard!(enter(&state, "payment_exists").await);
    guard!(authed(&state, &headers));
    let backend = state.lock().expect("lock");
    let user_id = query.get("userId").map(String::as_str);
    let paid = backend.payments.iter().any(|p| {
        let same_user = p["userId"].as_str() == user_id;
        let same_item = query
            .get("itemId")
            .is_some_and(|id| p["itemId"].as_str() == Some(id.as_str()));
        let same_auction = query
            .get("auctionId")
            .is_some_and(|id| p["auctionId"].as_str() == Some(id.as_str()));
        same_user && (same_item || same_auction)
    });
    Json(json!({ "paid": paid })).into_response()
}

async fn notifications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(enter(&state, "notifications").await);
    let user_id = guard!(authed(&state, &headers));
    let backend = state.lock().expect("lock");
    let list: Vec<Value> = backend
        .notifications
        .iter()
        .filter(|n| n["userId"].as_str() == Some(user_id.as_str()))
        .cloned()
        .collect();
    Json(list).into_response()
}

async fn mark_read(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(enter(&state, "mark_read").await);
    guard!(enter(&state, &format!("mark_read:{id}")).await);
    guard!(authed(&state, &headers));
    let mut backend = state.lock().expect("lock");
    if let Some(n) = backend
        .notifications
        .iter_mut()
        .find(|n| n["id"].as_str() == Some(id.as_str()))
    {
        n["read"] = json!(true);
    }
    Json(json!({ "status": "ok" })).into_response()
}
// endregion: --- Routes
