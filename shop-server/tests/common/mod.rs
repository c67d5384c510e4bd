//! Shared test harness: in-memory database, captured mail, in-process HTTP
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::ProductCreate;
use shop_server::auth::TokenKind;
use shop_server::db::DbService;
use shop_server::db::models::CustomerCreate;
use shop_server::routes::build_app;
use shop_server::services::MemoryMailer;
use shop_server::{Config, ServerState};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@shop.local";
pub const ADMIN_PASSWORD: &str = "admin12345";

/// Password of every fixture customer
pub const CUSTOMER_PASSWORD: &str = "hunter22!";

pub struct TestApp {
    pub state: ServerState,
    pub mailer: Arc<MemoryMailer>,
    _work_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let work_dir = tempfile::tempdir().unwrap();
    let mut config = Config::in_memory(work_dir.path().to_string_lossy().into_owned());
    configure(&mut config);

    let db = Surreal::new::<Mem>(()).await.unwrap();
    let db = DbService::prepare(db).await.unwrap().db;
    let mailer = Arc::new(MemoryMailer::new());
    let state = ServerState::build(&config, db, mailer.clone()).await.unwrap();

    TestApp {
        state,
        mailer,
        _work_dir: work_dir,
    }
}

impl TestApp {
    pub async fn product(&self, name: &str, price: f64, quantity: i64) -> String {
        self.state
            .products()
            .create(ProductCreate {
                name: name.into(),
                price,
                quantity,
                image_url: None,
            })
            .await
            .unwrap()
            .id
    }

    /// `(available, reserved)` of a product
    pub async fn stock(&self, product_id: &str) -> (i64, i64) {
        let p = self
            .state
            .products()
            .find_by_id(product_id)
            .await
            .unwrap()
            .unwrap();
        (p.available_quantity, p.reserved_quantity)
    }

    /// Registered customer and a customer token for it
    pub async fn customer(&self, name: &str, email: &str) -> (String, String) {
        let password_hash = shop_server::auth::password::hash_password(CUSTOMER_PASSWORD).unwrap();
        let customer = self
            .state
            .customers()
            .create(CustomerCreate {
                name: name.into(),
                date_of_birth: "1990-04-12".into(),
                email: email.into(),
                password_hash,
                is_admin: false,
            })
            .await
            .unwrap();
        let token = self
            .state
            .jwt_service
            .generate_token(&customer.id, TokenKind::Customer)
            .unwrap();
        (customer.id, token)
    }

    pub async fn admin_id(&self) -> String {
        self.state.customers().find_admin().await.unwrap().unwrap().id
    }

    pub async fn admin_token(&self) -> String {
        let id = self.admin_id().await;
        self.state
            .jwt_service
            .generate_token(&id, TokenKind::Admin)
            .unwrap()
    }

    /// Send a request through the full middleware stack
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let app = build_app(&self.state).with_state(self.state.clone());
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// JSON request with optional `(header, value)` auth
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        auth: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((header, token)) = auth {
            builder = builder.header(header, token);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }
}

/// multipart/form-data body with text fields only
pub fn multipart_form(boundary: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}

/// Multipart body with text fields and one `image` file part
pub fn multipart_with_image(
    boundary: &str,
    fields: &[(&str, &str)],
    file_name: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// A tiny valid PNG
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::new(2, 2);
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

impl TestApp {
    /// Files currently stored in the image directory
    pub fn stored_images(&self) -> usize {
        std::fs::read_dir(self.state.config.images_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
