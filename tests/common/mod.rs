#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use rocketshoes_cart::{
    repositories::{FileStore, HttpStorefrontApi},
    CartStore, Notifier,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Collects notifications so tests can assert on them
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[derive(Clone, Default)]
struct StorefrontState {
    products: Arc<Mutex<HashMap<u64, Value>>>,
    stock: Arc<Mutex<HashMap<u64, u32>>>,
}

pub struct TestEnvironment {
    pub base_url: String,
    pub storage_path: PathBuf,
    state: StorefrontState,
    _storage_dir: TempDir,
}

// Mock handlers for the storefront API
async fn mock_get_product(
    Path(product_id): Path<u64>,
    State(state): State<StorefrontState>,
) -> Response {
    let products = state.products.lock().unwrap();
    match products.get(&product_id) {
        Some(product) => Json(product.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn mock_get_stock(
    Path(product_id): Path<u64>,
    State(state): State<StorefrontState>,
) -> Response {
    let stock = state.stock.lock().unwrap();
    match stock.get(&product_id) {
        Some(amount) => Json(json!({ "id": product_id, "amount": amount })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

fn create_mock_app(state: StorefrontState) -> Router {
    Router::new()
        .route("/products/:id", get(mock_get_product))
        .route("/stock/:id", get(mock_get_stock))
        .with_state(state)
}

fn seed(state: &StorefrontState) {
    let catalog = [
        (1, "Tênis de Caminhada Leve Confortável", 179.9, 3),
        (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5),
        (3, "Tênis Adidas Duramo Lite 2.0", 219.9, 2),
        (4, "Tênis Adidas Duramo Lite 2.0", 219.9, 1),
        (5, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5),
        (6, "Tênis Adidas Duramo Lite 2.0", 219.9, 10),
        (7, "Tênis Esgotado", 99.9, 0),
    ];

    let mut products = state.products.lock().unwrap();
    let mut stock = state.stock.lock().unwrap();
    for (id, title, price, amount) in catalog {
        products.insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{}.jpg", id),
            }),
        );
        stock.insert(id, amount);
    }
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let state = StorefrontState::default();
        seed(&state);

        let app = create_mock_app(state.clone());

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
        let storage_path = storage_dir.path().join("storage.json");

        Self {
            base_url,
            storage_path,
            state,
            _storage_dir: storage_dir,
        }
    }

    /// Open a cart store against the mock API and this environment's storage file
    pub fn open_store(&self) -> (CartStore, Arc<RecordingNotifier>) {
        let api = Arc::new(
            HttpStorefrontApi::new(self.base_url.clone(), Duration::from_secs(5))
                .expect("Failed to build API client"),
        );
        let storage = Arc::new(FileStore::new(self.storage_path.clone()));
        let notifier = Arc::new(RecordingNotifier::default());

        let store = CartStore::open(api.clone(), api, storage, notifier.clone())
            .expect("Failed to open cart store");

        (store, notifier)
    }

    pub fn set_stock(&self, product_id: u64, amount: u32) {
        self.state.stock.lock().unwrap().insert(product_id, amount);
    }

    pub fn insert_product(&self, product: Value, amount: u32) {
        let id = product["id"].as_u64().expect("product id");
        self.state.products.lock().unwrap().insert(id, product);
        self.state.stock.lock().unwrap().insert(id, amount);
    }
}
