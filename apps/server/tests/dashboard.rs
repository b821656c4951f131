use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use diesel::RunQueryDsl;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use issuer_console_core::offerings::{NewOffering, NewSubscription, OfferingRepositoryTrait};
use issuer_console_core::projects::{NewProject, ProjectRepositoryTrait};
use issuer_console_server::{api::app_router, build_state, config::Config};
use issuer_console_storage_sqlite::{
    create_pool, get_connection, spawn_writer, OfferingRepository, ProjectRepository,
};

struct TestApp {
    router: Router,
    db_path: String,
    _tmp: TempDir,
}

async fn build_test_app(demo_fallback: bool) -> TestApp {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    build_app_at(db_path, demo_fallback, tmp).await
}

async fn build_app_at(db_path: String, demo_fallback: bool, tmp: TempDir) -> TestApp {
    let fallback = if demo_fallback { "true" } else { "false" };
    let path = db_path.clone();
    let config = Config::from_lookup(move |key| match key {
        "ISSUER_DB_PATH" => Some(path.clone()),
        "ISSUER_DEMO_FALLBACK" => Some(fallback.to_string()),
        _ => None,
    })
    .unwrap();
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        db_path,
        _tmp: tmp,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

/// Sends the request and returns the `name=value` pair of its `Set-Cookie`.
async fn send_for_cookie(router: &Router, request: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap(), cookie)
}

/// Registers an account and returns its session cookie.
async fn register(router: &Router, email: &str, enterprise: &str) -> String {
    let (status, body, cookie) = send_for_cookie(
        router,
        json_request(
            Method::POST,
            "/api/v1/auth/register",
            json!({
                "email": email,
                "password": "s3cret!",
                "name": "Grace",
                "enterpriseName": enterprise
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    cookie.expect("session cookie")
}

fn num(value: &Value) -> f64 {
    value.as_f64().unwrap_or_else(|| panic!("not a number: {value}"))
}

async fn seed_portfolio(app: &TestApp, enterprise_id: &str) {
    let pool = create_pool(&app.db_path).unwrap();
    let writer = spawn_writer((*pool).clone());
    let projects = ProjectRepository::new(Arc::clone(&pool), writer.clone());
    let offerings = OfferingRepository::new(pool, writer);

    let mut ids = Vec::new();
    for (name, value, date) in [
        ("Harbor Tower", 1000, (2024, 1, 10)),
        ("Solar Farm", 500, (2024, 3, 5)),
        ("Old Mill", 400, (2023, 12, 20)),
        ("Future Wharf", 50, (2024, 4, 2)),
    ] {
        let created_at = NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let project = projects
            .create(NewProject {
                id: None,
                enterprise_id: enterprise_id.to_string(),
                name: name.to_string(),
                asset_type: "REAL_ESTATE".to_string(),
                description: None,
                asset_value: Some(Decimal::from(value)),
                current_step: 4,
                created_by: None,
                created_at: Some(created_at),
            })
            .await
            .unwrap();
        ids.push(project.id);
    }

    let live = offerings
        .create_offering(NewOffering {
            id: None,
            project_id: ids[0].clone(),
            status: "live".to_string(),
            cap_amount_usd: Decimal::from(1000),
        })
        .await
        .unwrap();
    let closed = offerings
        .create_offering(NewOffering {
            id: None,
            project_id: ids[1].clone(),
            status: "Closed".to_string(),
            cap_amount_usd: Decimal::from(500),
        })
        .await
        .unwrap();
    for (offering_id, amount, status) in [
        (&live.id, 300, "CONFIRMED"),
        (&live.id, 200, "PENDING"),
        (&closed.id, 250, "settled"),
    ] {
        offerings
            .create_subscription(NewSubscription {
                id: None,
                offering_id: offering_id.clone(),
                amount_usd: Decimal::from(amount),
                status: status.to_string(),
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn overview_aggregates_demo_portfolio() {
    let app = build_test_app(true).await;

    // Resolving the session provisions the demo enterprise.
    let (status, session) = send(&app.router, get("/api/v1/session")).await;
    assert_eq!(status, StatusCode::OK);
    let enterprise_id = session["user"]["enterpriseId"].as_str().unwrap().to_string();
    assert_eq!(enterprise_id, "demo-enterprise");

    seed_portfolio(&app, &enterprise_id).await;

    let (status, body) = send(
        &app.router,
        get("/api/v1/dashboard/overview?interval=month&startDate=2024-01-15&endDate=2024-03-15"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let metrics = &body["metrics"];
    assert_eq!(num(&metrics["totalCreated"]), 1950.0);
    assert_eq!(num(&metrics["activeRemaining"]), 700.0);
    assert_eq!(num(&metrics["activeSubscribed"]), 300.0);
    assert_eq!(num(&metrics["closedRaised"]), 250.0);
    assert_eq!(num(&metrics["notYetOffered"]), 700.0);

    let series = &body["newAssets"];
    assert_eq!(series["interval"], "month");
    assert_eq!(series["startDate"], "2024-01");
    assert_eq!(series["endDate"], "2024-03");
    let points: Vec<(String, f64)> = series["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["date"].as_str().unwrap().to_string(), num(&p["value"])))
        .collect();
    assert_eq!(
        points,
        vec![
            ("2024-01".to_string(), 1000.0),
            ("2024-02".to_string(), 0.0),
            ("2024-03".to_string(), 500.0),
        ]
    );
    assert_eq!(num(&series["total"]), 1500.0);
    assert_eq!(num(&series["previousTotal"]), 400.0);
    assert_eq!(num(&series["changePct"]), 2.75);
}

#[tokio::test]
async fn overview_rejects_inverted_range() {
    let app = build_test_app(true).await;
    let (status, body) = send(
        &app.router,
        get("/api/v1/dashboard/overview?interval=day&startDate=2024-05-10&endDate=2024-05-01"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date range");
}

#[tokio::test]
async fn overview_for_empty_enterprise_has_zero_buckets() {
    let app = build_test_app(true).await;
    let (status, body) = send(
        &app.router,
        get("/api/v1/dashboard/overview?interval=week&startDate=2024-05-01&endDate=2024-05-20"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let series = &body["newAssets"];
    assert_eq!(series["startDate"], "2024-04-29");
    assert_eq!(series["endDate"], "2024-05-20");
    assert_eq!(series["points"].as_array().unwrap().len(), 4);
    assert_eq!(num(&series["total"]), 0.0);
    assert_eq!(num(&series["changePct"]), 0.0);
    assert_eq!(num(&body["metrics"]["notYetOffered"]), 0.0);
}

#[tokio::test]
async fn session_cookie_is_required_without_demo_fallback() {
    let first = build_test_app(true).await;
    let (status, _) = send(&first.router, get("/api/v1/session")).await;
    assert_eq!(status, StatusCode::OK);

    let TestApp { db_path, _tmp, .. } = first;
    let app = build_app_at(db_path, false, _tmp).await;

    let (status, body) = send(&app.router, get("/api/v1/dashboard/overview")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authenticated");

    let request = Request::builder()
        .uri("/api/v1/session")
        .header(header::COOKIE, "ferion_user_id=demo-user")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["userId"], "demo-user");

    let request = Request::builder()
        .uri("/api/v1/session")
        .header(header::COOKIE, "ferion_user_id=ghost")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn project_wizard_round_trip() {
    let app = build_test_app(true).await;

    let (status, created) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/projects",
            json!({
                "name": "  Harbor Tower ",
                "assetType": "REAL_ESTATE",
                "assetValue": 1250000
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let project_id = created["project"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["project"]["name"], "Harbor Tower");
    assert_eq!(created["project"]["currentStep"], 4);

    let (status, listed) = send(&app.router, get("/api/v1/projects")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["projects"][0]["badge"], "HT");

    let (status, saved) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/v1/projects/{project_id}/step5"),
            json!({
                "revenueMode": "RENTAL",
                "capitalProfile": "INCOME",
                "distributionPolicy": "PRO_RATA",
                "payoutFrequency": "QUARTERLY",
                "annualReturn": 7.5,
                "distributionNotes": ""
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["project"]["currentStep"], 6);
    assert_eq!(saved["project"]["updatedBy"], "demo-user");
    assert!(saved["project"]["distributionNotes"].is_null());

    let (status, body) = send(&app.router, get("/api/v1/projects/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/projects",
            json!({ "name": "   ", "assetType": "REAL_ESTATE" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn logout_expires_session_cookie() {
    let app = build_test_app(true).await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("ferion_user_id=;"));
    assert!(cookie.contains("Max-Age=0"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn overview_store_failure_reports_metrics_failure() {
    let app = build_test_app(true).await;
    let pool = create_pool(&app.db_path).unwrap();
    let mut conn = get_connection(&pool).unwrap();
    diesel::sql_query("DROP TABLE user_projects")
        .execute(&mut conn)
        .unwrap();
    diesel::sql_query("DROP TABLE users").execute(&mut conn).unwrap();

    let (status, body) = send(&app.router, get("/api/v1/dashboard/overview")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch overview metrics");
}

#[tokio::test]
async fn overview_repeated_param_uses_first_value() {
    let app = build_test_app(true).await;
    let (status, body) = send(
        &app.router,
        get("/api/v1/dashboard/overview?interval=day&interval=week&startDate=2024-05-01&endDate=2024-05-03"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["newAssets"]["interval"], "day");
    assert_eq!(body["newAssets"]["points"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn register_and_login_start_a_session() {
    let app = build_test_app(false).await;

    let cookie = register(&app.router, "Grace@Hopper.test", "Hopper Holdings").await;
    let (status, session) = send(&app.router, with_cookie(get("/api/v1/session"), &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"]["email"], "grace@hopper.test");
    assert_eq!(session["user"]["enterpriseName"], "Hopper Holdings");
    assert_eq!(session["user"]["role"], "OWNER");
    assert_eq!(session["user"]["isCreator"], true);

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/auth/register",
            json!({
                "email": "grace@hopper.test",
                "password": "another",
                "name": "Grace",
                "enterpriseName": "Second"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");

    let (status, body, login_cookie) = send_for_cookie(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": "GRACE@hopper.test", "password": "s3cret!" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(login_cookie.as_deref(), Some(cookie.as_str()));
    assert_eq!(body["user"]["userId"], session["user"]["userId"]);

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": "grace@hopper.test", "password": "wrong!" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/auth/register",
            json!({
                "email": "ada@lovelace.test",
                "password": "short",
                "name": "Ada",
                "enterpriseName": "Engines"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app.router,
        json_request(Method::POST, "/api/v1/auth/login", json!({ "email": "x@y.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn wizard_steps_fill_in_blockchain_asset_and_token_settings() {
    let app = build_test_app(true).await;
    let (status, created) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/projects",
            json!({ "name": "Harbor Tower", "assetType": "REAL_ESTATE" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["project"]["currentStep"], 1);
    let id = created["project"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/v1/projects/{id}/step2"),
            json!({ "walletAddress": "0xabc", "network": "polygon" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/v1/projects/{id}/step2"),
            json!({
                "walletAddress": "0x52908400098527886E0F7030069857D2E4169EE7",
                "network": "polygon"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["project"]["currentStep"], 3);
    assert_eq!(body["project"]["network"], "polygon");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/v1/projects/{id}/step3"),
            json!({
                "assetLocation": "Lisbon",
                "assetDescription": "Waterfront offices",
                "assetValue": 1000
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["project"]["currentStep"], 4);

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/api/v1/projects/{id}/step4"),
            json!({ "tokenName": "Harbor Token", "tokenSymbol": "HRB", "initialPrice": 2.5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["project"]["currentStep"], 5);
    assert_eq!(body["project"]["totalSupply"], 400);
    assert_eq!(body["project"]["tokenDecimals"], 18);

    let (_, listed) = send(&app.router, get("/api/v1/projects")).await;
    assert_eq!(listed["projects"][0]["badge"], "HRB");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            "/api/v1/projects/missing/step2",
            json!({
                "walletAddress": "0x52908400098527886E0F7030069857D2E4169EE7",
                "network": "polygon"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test]
async fn project_members_are_scoped_to_the_enterprise() {
    let app = build_test_app(false).await;
    let owner = register(&app.router, "grace@hopper.test", "Hopper Holdings").await;
    let outsider = register(&app.router, "ada@lovelace.test", "Engines").await;

    let (_, outsider_session) =
        send(&app.router, with_cookie(get("/api/v1/session"), &outsider)).await;
    let outsider_id = outsider_session["user"]["userId"].as_str().unwrap().to_string();
    let (_, owner_session) = send(&app.router, with_cookie(get("/api/v1/session"), &owner)).await;
    let owner_id = owner_session["user"]["userId"].as_str().unwrap().to_string();

    let (status, created) = send(
        &app.router,
        with_cookie(
            json_request(
                Method::POST,
                "/api/v1/projects",
                json!({ "name": "Harbor Tower", "assetType": "REAL_ESTATE" }),
            ),
            &owner,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let members_uri = format!(
        "/api/v1/accounts/projects/{}/members",
        created["project"]["id"].as_str().unwrap()
    );

    let add = |user_id: &str| {
        with_cookie(
            json_request(
                Method::POST,
                &members_uri,
                json!({ "userId": user_id, "role": "ADMIN" }),
            ),
            &owner,
        )
    };

    let (status, body) = send(&app.router, add(&owner_id)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["membership"]["role"], "ADMIN");
    let (status, _) = send(&app.router, add(&owner_id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app.router, add(&outsider_id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "User does not belong to this enterprise");

    let (status, body) = send(&app.router, add("ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, body) = send(&app.router, with_cookie(get(&members_uri), &owner)).await;
    assert_eq!(status, StatusCode::OK);
    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["email"], "grace@hopper.test");
    assert_eq!(members[0]["isCreator"], true);

    // Another enterprise cannot see the project.
    let (status, body) = send(&app.router, with_cookie(get(&members_uri), &outsider)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");
}
