use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use server::routes;
use server::state::ServerState;
use service::auth::service::AuthConfig;

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    let state = ServerState::new(
        db,
        AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 12 },
    );
    Ok(routes::build_router(state))
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn with_bearer(mut req: Request<Body>, token: &str) -> Request<Body> {
    let value = format!("Bearer {token}").parse().unwrap();
    req.headers_mut().insert("authorization", value);
    req
}

async fn json_body(resp: Response<Body>) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn register_and_login(
    app: &Router,
    role: &str,
    email: &str,
) -> anyhow::Result<(Uuid, String)> {
    let resp = app
        .clone()
        .call(post(
            "/auth/register",
            &json!({
                "first_name": "Test", "last_name": "User", "email": email,
                "password": "S3curePass!", "role": role,
                "city": "Tunis", "phone": "21612345"
            }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .call(post("/auth/login", &json!({"email": email, "password": "S3curePass!"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let session = json_body(resp).await?;
    let id = Uuid::parse_str(session["user"]["id"].as_str().unwrap())?;
    let token = session["token"].as_str().unwrap().to_string();
    Ok((id, token))
}

#[tokio::test]
async fn booking_flow_end_to_end() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let (provider_id, provider_token) = register_and_login(
        &app,
        "provider",
        &format!("prov_{}@example.com", Uuid::new_v4()),
    )
    .await?;
    let (client_id, client_token) = register_and_login(
        &app,
        "client",
        &format!("cli_{}@example.com", Uuid::new_v4()),
    )
    .await?;

    // Catalog: a service the provider can propose
    let resp = app
        .clone()
        .call(post("/services", &json!({"name": format!("cleaning_{}", Uuid::new_v4())})))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let service_id = json_body(resp).await?["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .call(with_bearer(
            post(
                "/proposals",
                &json!({
                    "title": "Deep cleaning", "service_id": service_id,
                    "price": 90.0, "description": "Whole apartment"
                }),
            ),
            &provider_token,
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let proposal_id = json_body(resp).await?["id"].as_str().unwrap().to_string();

    // A fresh day is fully open
    let day = "2031-03-03";
    let resp = app
        .clone()
        .call(get(&format!("/reservations/{provider_id}/availability?date={day}")))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let grid = json_body(resp).await?;
    assert_eq!(grid["slots"].as_array().unwrap().len(), 9);
    assert!(grid["slots"].as_array().unwrap().iter().all(|s| s["isAvailable"] == true));

    // Book and confirm 10:00
    let booking = json!({
        "date": day, "time": "10:00", "proposal_id": proposal_id,
        "provider_id": provider_id, "client_id": client_id
    });
    let resp = app.clone().call(post("/reservations", &booking)).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reservation = json_body(resp).await?;
    assert_eq!(reservation["status"], "pending");
    let reservation_id = reservation["id"].as_str().unwrap().to_string();

    // Only the owning provider may decide
    let req = |token: &str| {
        Request::builder()
            .method("PUT")
            .uri(format!("/reservations/{reservation_id}/status"))
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(serde_json::to_vec(&json!({"status": "confirmed"})).unwrap()))
            .unwrap()
    };
    let resp = app.clone().call(req(&client_token)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = app.clone().call(req(&provider_token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // The confirmed slot is closed and a second booking conflicts
    let resp = app
        .clone()
        .call(get(&format!("/reservations/{provider_id}/availability?date={day}")))
        .await?;
    let grid = json_body(resp).await?;
    for slot in grid["slots"].as_array().unwrap() {
        assert_eq!(slot["isAvailable"], slot["time"] != "10:00");
    }
    let resp = app.clone().call(post("/reservations", &booking)).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["title"], "Conflict");

    // Cancellation needs a token; the provider may remove a confirmed booking
    let delete = |token: Option<&str>| {
        let mut b = Request::builder()
            .method("DELETE")
            .uri(format!("/reservations/{reservation_id}"));
        if let Some(token) = token {
            b = b.header("authorization", format!("Bearer {token}"));
        }
        b.body(Body::empty()).unwrap()
    };
    let resp = app.clone().call(delete(None)).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = app.clone().call(delete(Some(&client_token))).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = app.clone().call(delete(Some(&provider_token))).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn provider_directory_lists_registered_providers() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("prov_{}@example.com", Uuid::new_v4());
    register_and_login(&app, "provider", &email).await?;

    let resp = app.clone().call(get("/users/providers")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let providers = json_body(resp).await?;
    let listed = providers.as_array().unwrap();
    assert!(listed.iter().any(|u| u["email"] == email.as_str()));
    assert!(listed.iter().all(|u| u["role"] == "provider"));
    // The hash must never serialize
    assert!(listed.iter().all(|u| u.get("password_hash").is_none()));
    Ok(())
}

#[tokio::test]
async fn category_update_replaces_membership() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let resp = app
        .clone()
        .call(post("/services", &json!({"name": format!("tiling_{}", Uuid::new_v4())})))
        .await?;
    let first = json_body(resp).await?["id"].as_str().unwrap().to_string();
    let resp = app
        .clone()
        .call(post("/services", &json!({"name": format!("roofing_{}", Uuid::new_v4())})))
        .await?;
    let second = json_body(resp).await?["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .call(post(
            "/categories",
            &json!({"name": format!("building_{}", Uuid::new_v4()), "services": [first]}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let category_id = json_body(resp).await?["id"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("PUT")
        .uri(format!("/categories/{category_id}"))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(
            &json!({"name": "structural work", "services": [second]}),
        )?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await?["name"], "structural work");

    let resp = app
        .clone()
        .call(get(&format!("/categories/{category_id}/services")))
        .await?;
    let members = json_body(resp).await?;
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["id"], second.as_str());
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_token() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    for uri in ["/auth/me", "/reservations/client", "/reservations/provider"] {
        let resp = app.clone().call(get(uri)).await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "route {uri}");
        let body = json_body(resp).await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "not authorized, no token");
    }
    Ok(())
}
