//! HTTP 接口测试 (通过完整中间件栈的进程内请求)

mod common;

use axum::body::Body;
use common::{
    ADMIN_EMAIL, ADMIN_PASSWORD, CUSTOMER_PASSWORD, multipart_form, multipart_with_image, png_bytes,
    spawn_app,
};
use http::{Request, StatusCode};
use serde_json::json;
use shop_server::auth::{ADMIN_TOKEN_HEADER, AUTH_TOKEN_HEADER};

#[tokio::test]
async fn health_reports_database() {
    let app = spawn_app().await;
    let (status, body) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn empty_catalogue_is_not_a_success() {
    let app = spawn_app().await;
    let (status, body) = app.call("GET", "/products/all", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn admin_creates_product_from_form() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let boundary = "shopformboundary";
    let form = multipart_form(
        boundary,
        &[("name", "Walnut Desk"), ("price", "120.5"), ("quantity", "4")],
    );

    let request = Request::builder()
        .method("POST")
        .uri("/products/add")
        .header(ADMIN_TOKEN_HEADER, &admin)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(form))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call("GET", &format!("/products/details/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["name"], "Walnut Desk");
    assert_eq!(body["product"]["price"], 120.5);
    assert_eq!(body["product"]["availableQuantity"], 4);
    assert_eq!(body["product"]["hasOpenOrders"], false);

    // Same name again
    let request = Request::builder()
        .method("POST")
        .uri("/products/add")
        .header(ADMIN_TOKEN_HEADER, &admin)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_form(
            boundary,
            &[("name", "Walnut Desk"), ("price", "99")],
        )))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6003);
}

#[tokio::test]
async fn duplicate_name_does_not_store_the_upload() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.product("Walnut Desk", 120.0, 4).await;
    let boundary = "shopformboundary";
    let png = png_bytes();

    let upload = |name: &str| {
        Request::builder()
            .method("POST")
            .uri("/products/add")
            .header(ADMIN_TOKEN_HEADER, &admin)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(multipart_with_image(
                boundary,
                &[("name", name), ("price", "99")],
                "desk.png",
                &png,
            )))
            .unwrap()
    };

    let (status, body) = app.send(upload("Walnut Desk")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6003);
    assert_eq!(app.stored_images(), 0);

    let (status, body) = app.send(upload("Oak Desk")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(app.stored_images(), 1);
    let id = body["id"].as_str().unwrap().to_string();
    let (_, body) = app
        .call("GET", &format!("/products/details/{id}"), None, None)
        .await;
    assert!(body["product"]["imageUrl"].as_str().unwrap().starts_with("/images/"));
}

#[tokio::test]
async fn tokens_are_checked_by_kind() {
    let app = spawn_app().await;
    let (_, customer_token) = app.customer("Alice Doe", "alice@example.com").await;

    let (status, _) = app.call("GET", "/customer/getcustomer", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            "GET",
            "/customer/getcustomer",
            Some((AUTH_TOKEN_HEADER, "not-a-token")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A customer token never opens admin routes
    let (status, body) = app
        .call(
            "GET",
            "/admin/customers",
            Some((ADMIN_TOKEN_HEADER, customer_token.as_str())),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .call(
            "GET",
            "/customer/getcustomer",
            Some((AUTH_TOKEN_HEADER, customer_token.as_str())),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["email"], "alice@example.com");
    assert!(body["customer"].get("passwordHash").is_none());
}

#[tokio::test]
async fn admin_token_for_a_non_admin_is_refused() {
    let app = spawn_app().await;
    let (customer_id, _) = app.customer("Alice Doe", "alice@example.com").await;
    let forged = app
        .state
        .jwt_service
        .generate_token(&customer_id, shop_server::auth::TokenKind::Admin)
        .unwrap();

    let (status, body) = app
        .call("GET", "/admin/getadmin", Some((ADMIN_TOKEN_HEADER, forged.as_str())), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);
}

#[tokio::test]
async fn registration_requires_the_mailed_code() {
    let app = spawn_app().await;

    let (status, _) = app
        .call("GET", "/customer/getmail/carol@example.com", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let code = app.mailer.last_code("carol@example.com").unwrap();

    let mut register = json!({
        "name": "Carol Smith",
        "dateOfBirth": "1992-01-30",
        "email": "carol@example.com",
        "password": "secret123",
        "code": "000000",
    });
    if code == "000000" {
        register["code"] = json!("111111");
    }
    let (status, _) = app
        .call("POST", "/customer/register", None, Some(register.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    register["code"] = json!(code);
    let (status, body) = app
        .call("POST", "/customer/register", None, Some(register.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["authToken"].as_str().unwrap().to_string();

    let (status, body) = app
        .call(
            "GET",
            "/customer/getcustomer",
            Some((AUTH_TOKEN_HEADER, token.as_str())),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["name"], "Carol Smith");
    assert_eq!(body["customer"]["isAdmin"], false);

    // The address is taken now
    let (status, body) = app
        .call("GET", "/customer/getmail/carol@example.com", None, None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3002);
}

#[tokio::test]
async fn login_paths() {
    let app = spawn_app().await;
    app.customer("Alice Doe", "alice@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            "/customer/login",
            None,
            Some(json!({"email": "alice@example.com", "password": "wrong-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let wrong_password = body["message"].clone();

    let (_, body) = app
        .call(
            "POST",
            "/customer/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "wrong-pass"})),
        )
        .await;
    assert_eq!(body["message"], wrong_password);

    let (status, body) = app
        .call(
            "POST",
            "/customer/login",
            None,
            Some(json!({"email": "alice@example.com", "password": CUSTOMER_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["authToken"].is_string());
    assert!(body.get("adminToken").is_none());

    let (status, body) = app
        .call(
            "POST",
            "/customer/login",
            None,
            Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let admin_token = body["adminToken"].as_str().unwrap().to_string();

    let (status, body) = app
        .call(
            "GET",
            "/admin/getadmin",
            Some((ADMIN_TOKEN_HEADER, admin_token.as_str())),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["isAdmin"], true);
}

#[tokio::test]
async fn two_step_login_issues_token_after_code() {
    let app = spawn_app().await;
    let (_, token) = app.customer("Alice Doe", "alice@example.com").await;

    let (status, body) = app
        .call(
            "PUT",
            "/customer/twostep",
            Some((AUTH_TOKEN_HEADER, token.as_str())),
            Some(json!({"enabled": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["twoStepAuth"], true);

    let credentials = json!({"email": "alice@example.com", "password": CUSTOMER_PASSWORD});
    let (status, body) = app
        .call("POST", "/customer/login", None, Some(credentials))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["twoStep"], true);
    assert!(body.get("authToken").is_none());

    let code = app.mailer.last_code("alice@example.com").unwrap();
    let verify = json!({
        "email": "alice@example.com",
        "password": CUSTOMER_PASSWORD,
        "code": code,
    });
    let (status, body) = app
        .call("POST", "/customer/verifylogin", None, Some(verify.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["authToken"].is_string());

    // Codes are single use
    let (status, _) = app
        .call("POST", "/customer/verifylogin", None, Some(verify))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn order_routes_round_trip() {
    let app = spawn_app().await;
    let product = app.product("Walnut Desk", 120.0, 10).await;
    let (_, token) = app.customer("Alice Doe", "alice@example.com").await;
    let auth = Some((AUTH_TOKEN_HEADER, token.as_str()));

    let (status, body) = app
        .call(
            "POST",
            "/orders/make",
            auth,
            Some(json!({"products": [{"product_id": product, "product_quantity": 3}]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["cost"], 360.0);
    let order_id = body["orderId"].as_str().unwrap().to_string();
    assert_eq!(app.stock(&product).await, (7, 3));

    let (status, body) = app.call("GET", "/orders/get?page=1", auth, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalOrders"], 1);
    assert_eq!(body["orders"][0]["status"], "placed");
    assert_eq!(body["orders"][0]["products"][0]["quantity"], 3);

    let (status, body) = app
        .call(
            "POST",
            "/orders/make",
            auth,
            Some(json!({"products": [{"product_id": product, "product_quantity": 8}]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5001);
    assert_eq!(body["details"]["available"], 7);

    let (status, body) = app
        .call("POST", "/orders/make", auth, Some(json!({"products": []})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    let (status, _) = app
        .call("DELETE", &format!("/orders/delete/{order_id}"), auth, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stock(&product).await, (10, 0));

    let (status, body) = app
        .call("DELETE", &format!("/orders/delete/{order_id}"), auth, None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn admin_receives_and_lists_orders() {
    let app = spawn_app().await;
    let product = app.product("Walnut Desk", 120.0, 10).await;
    let (customer_id, token) = app.customer("Alice Doe", "alice@example.com").await;
    let admin = app.admin_token().await;

    let (_, body) = app
        .call(
            "POST",
            "/orders/make",
            Some((AUTH_TOKEN_HEADER, token.as_str())),
            Some(json!({"products": [{"product_id": product, "product_quantity": 2}]})),
        )
        .await;
    let order_id = body["orderId"].as_str().unwrap().to_string();

    // Customers cannot confirm delivery
    let (status, _) = app
        .call(
            "POST",
            "/orders/received",
            Some((AUTH_TOKEN_HEADER, token.as_str())),
            Some(json!({"id": order_id})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            "POST",
            "/orders/received",
            Some((ADMIN_TOKEN_HEADER, admin.as_str())),
            Some(json!({"id": order_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stock(&product).await, (8, 0));

    let (status, body) = app
        .call(
            "POST",
            "/admin/getorders",
            Some((ADMIN_TOKEN_HEADER, admin.as_str())),
            Some(json!({"id": customer_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"][0]["status"], "received");

    let (status, body) = app
        .call(
            "GET",
            "/admin/customers",
            Some((ADMIN_TOKEN_HEADER, admin.as_str())),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn product_delete_conflicts_while_orders_are_placed() {
    let app = spawn_app().await;
    let product = app.product("Walnut Desk", 120.0, 10).await;
    let (_, token) = app.customer("Alice Doe", "alice@example.com").await;
    let admin = app.admin_token().await;

    let (_, body) = app
        .call(
            "POST",
            "/orders/make",
            Some((AUTH_TOKEN_HEADER, token.as_str())),
            Some(json!({"products": [{"product_id": product, "product_quantity": 1}]})),
        )
        .await;
    let order_id = body["orderId"].as_str().unwrap().to_string();

    let uri = format!("/products/delete/{product}");
    let (status, body) = app
        .call("DELETE", &uri, Some((ADMIN_TOKEN_HEADER, admin.as_str())), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6004);

    app.call(
        "DELETE",
        &format!("/orders/delete/{order_id}"),
        Some((ADMIN_TOKEN_HEADER, admin.as_str())),
        None,
    )
    .await;

    let (status, _) = app
        .call("DELETE", &uri, Some((ADMIN_TOKEN_HEADER, admin.as_str())), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn reviews_are_owned_by_their_author() {
    let app = spawn_app().await;
    let product = app.product("Walnut Desk", 120.0, 10).await;
    let (_, alice) = app.customer("Alice Doe", "alice@example.com").await;
    let (_, bob) = app.customer("Bob Stone", "bob@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            &format!("/reviews/review/{product}"),
            Some((AUTH_TOKEN_HEADER, alice.as_str())),
            Some(json!({"comment": "Sturdy and warm"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let review_id = body["review"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call("GET", &format!("/reviews/reviews/{product}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalReviews"], 1);
    assert_eq!(body["reviews"][0]["customerName"], "Alice Doe");
    assert_eq!(body["reviews"][0]["productName"], "Walnut Desk");

    let (status, _) = app
        .call("GET", "/reviews/reviews/missing", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call(
            "DELETE",
            &format!("/reviews/review/{review_id}"),
            Some((AUTH_TOKEN_HEADER, bob.as_str())),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, _) = app
        .call(
            "DELETE",
            &format!("/reviews/review/{review_id}"),
            Some((AUTH_TOKEN_HEADER, alice.as_str())),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call("GET", "/reviews/myreviews", Some((AUTH_TOKEN_HEADER, alice.as_str())), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalReviews"], 0);
}

#[tokio::test]
async fn reports_flow_through_the_admin() {
    let app = spawn_app().await;
    let (_, alice) = app.customer("Alice Doe", "alice@example.com").await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .call(
            "POST",
            "/reports/report",
            Some((AUTH_TOKEN_HEADER, alice.as_str())),
            Some(json!({"text": "Parcel arrived damaged"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call("GET", "/reports/reports", Some((AUTH_TOKEN_HEADER, alice.as_str())), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .call("GET", "/reports/reports?page=1", Some((ADMIN_TOKEN_HEADER, admin.as_str())), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalReports"], 1);
    assert_eq!(body["reports"][0]["customerName"], "Alice Doe");
    assert_eq!(body["reports"][0]["isSeen"], false);
    let report_id = body["reports"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(
            "PUT",
            &format!("/reports/seen/{report_id}"),
            Some((ADMIN_TOKEN_HEADER, admin.as_str())),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/reports/delete/{report_id}");
    let (status, _) = app
        .call("DELETE", &uri, Some((ADMIN_TOKEN_HEADER, admin.as_str())), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .call("DELETE", &uri, Some((ADMIN_TOKEN_HEADER, admin.as_str())), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7101);
}

#[tokio::test]
async fn account_delete_waits_for_open_orders() {
    let app = spawn_app().await;
    let product = app.product("Walnut Desk", 120.0, 10).await;
    let (_, token) = app.customer("Alice Doe", "alice@example.com").await;
    let auth = Some((AUTH_TOKEN_HEADER, token.as_str()));
    let credentials = json!({"email": "alice@example.com", "password": CUSTOMER_PASSWORD});

    let (_, body) = app
        .call(
            "POST",
            "/orders/make",
            auth,
            Some(json!({"products": [{"product_id": product, "product_quantity": 1}]})),
        )
        .await;
    let order_id = body["orderId"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(
            "DELETE",
            "/customer/delete",
            auth,
            Some(json!({"email": "alice@example.com", "password": "wrong-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .call("DELETE", "/customer/delete", auth, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3003);

    app.call("DELETE", &format!("/orders/delete/{order_id}"), auth, None)
        .await;
    let (status, _) = app
        .call("DELETE", "/customer/delete", auth, Some(credentials))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call("GET", "/customer/getcustomer", auth, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = spawn_app().await;
    let response = tower::ServiceExt::oneshot(
        shop_server::routes::build_app(&app.state).with_state(app.state.clone()),
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await
    .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
