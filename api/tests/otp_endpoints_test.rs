mod common;

use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    test,
};
use chrono::Duration;
use serde_json::json;

use pv_api::app::create_app;
use pv_api::dto::OtpResponse;
use pv_core::services::otp::DEV_FALLBACK_CODE;
use pv_infra::cache::InMemoryOtpStore;
use pv_infra::sms::LogOnlyDispatcher;

use common::{app_config, log_only_state, state_with, BrokenStore, FailingDispatcher, TestClock};

fn post_json(uri: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

#[actix_web::test]
async fn test_health_on_root_and_api_prefix() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    for uri in ["/health", "/api/health"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], json!(true));
        assert!(body["timestamp"].is_string());
    }
}

#[actix_web::test]
async fn test_send_in_log_only_mode() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    let resp = test::call_service(&app, post_json("/otp/send", json!({ "phone": "555-123-4567" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");

    let body: OtpResponse = test::read_body_json(resp).await;
    assert!(body.ok);
    assert_eq!(body.note.as_deref(), Some("log-only"));
    assert_eq!(body.ttl_ms, Some(300_000));
    assert_eq!(body.sid, None);

    let token = body.otp_token.expect("code exposed outside production");
    assert_eq!(token.len(), 6);
    assert!(token.chars().all(|c| c.is_ascii_digit()));
}

#[actix_web::test]
async fn test_verify_consumes_code() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    let sent: OtpResponse =
        test::call_and_read_body_json(&app, post_json("/otp/send", json!({ "phone": "555-123-4567" })).to_request())
            .await;
    let token = sent.otp_token.unwrap();

    // Same number in a different format
    let resp = test::call_service(
        &app,
        post_json("/otp/verify", json!({ "phone": "(555) 123 4567", "code": token })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body, OtpResponse::success());

    let resp = test::call_service(
        &app,
        post_json("/otp/verify", json!({ "phone": "5551234567", "code": token })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.error.as_deref(), Some("Code not found"));
}

#[actix_web::test]
async fn test_numeric_phone_and_code() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    let sent: OtpResponse =
        test::call_and_read_body_json(&app, post_json("/otp/send", json!({ "phone": 5551234567u64 })).to_request())
            .await;
    let code: u64 = sent.otp_token.unwrap().parse().unwrap();

    let resp = test::call_service(
        &app,
        post_json("/otp/verify", json!({ "phone": 5551234567u64, "code": code })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_sixth_attempt_is_rejected() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    let sent: OtpResponse =
        test::call_and_read_body_json(&app, post_json("/otp/send", json!({ "phone": "5551234567" })).to_request())
            .await;
    let token = sent.otp_token.unwrap();

    for _ in 0..5 {
        let resp = test::call_service(
            &app,
            post_json("/otp/verify", json!({ "phone": "5551234567", "code": "000000" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: OtpResponse = test::read_body_json(resp).await;
        assert_eq!(body.error.as_deref(), Some("Invalid code"));
    }

    let resp = test::call_service(
        &app,
        post_json("/otp/verify", json!({ "phone": "5551234567", "code": token })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.error.as_deref(), Some("Too many attempts"));

    let resp = test::call_service(
        &app,
        post_json("/otp/verify", json!({ "phone": "5551234567", "code": token })).to_request(),
    )
    .await;
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.error.as_deref(), Some("Code not found"));
}

#[actix_web::test]
async fn test_expired_code() {
    let clock = Arc::new(TestClock::new());
    let app = test::init_service(create_app(
        log_only_state(clock.clone()),
        &app_config("development"),
    ))
    .await;

    let sent: OtpResponse =
        test::call_and_read_body_json(&app, post_json("/otp/send", json!({ "phone": "5551234567" })).to_request())
            .await;
    let token = sent.otp_token.unwrap();

    clock.advance(Duration::seconds(301));

    let resp = test::call_service(
        &app,
        post_json("/otp/verify", json!({ "phone": "5551234567", "code": token })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.error.as_deref(), Some("Code expired"));

    let resp = test::call_service(
        &app,
        post_json("/otp/verify", json!({ "phone": "5551234567", "code": token })).to_request(),
    )
    .await;
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.error.as_deref(), Some("Code not found"));
}

#[actix_web::test]
async fn test_send_validation_errors() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    let cases = [
        (json!({}), "Missing phone"),
        (json!({ "phone": "" }), "Missing phone"),
        (json!({ "phone": "   " }), "Missing phone"),
        (json!({ "phone": "call me" }), "Invalid phone"),
        (json!({ "phone": true }), "Invalid phone"),
        (json!({ "phone": "1".repeat(33) }), "Invalid phone"),
    ];

    for (body, expected) in cases {
        let resp = test::call_service(&app, post_json("/otp/send", body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: OtpResponse = test::read_body_json(resp).await;
        assert!(!body.ok);
        assert_eq!(body.error.as_deref(), Some(expected));
        assert_eq!(body.otp_token, None);
    }
}

#[actix_web::test]
async fn test_verify_missing_fields() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    for body in [
        json!({}),
        json!({ "phone": "5551234567" }),
        json!({ "code": "123456" }),
        json!({ "phone": "5551234567", "code": "" }),
    ] {
        let resp = test::call_service(&app, post_json("/otp/verify", body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: OtpResponse = test::read_body_json(resp).await;
        assert_eq!(body.error.as_deref(), Some("Missing phone/code"));
    }
}

#[actix_web::test]
async fn test_malformed_body() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/otp/send")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"phone\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body, OtpResponse::failure("Invalid request body"));
}

#[actix_web::test]
async fn test_api_prefix_alias() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    let sent: OtpResponse = test::call_and_read_body_json(
        &app,
        post_json("/api/otp/send", json!({ "phone": "5551234567" })).to_request(),
    )
    .await;

    // Codes issued under one prefix verify under the other
    let resp = test::call_service(
        &app,
        post_json(
            "/otp/verify",
            json!({ "phone": "5551234567", "code": sent.otp_token.unwrap() }),
        ).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_production_provider_failure() {
    let state = state_with(
        Arc::new(FailingDispatcher),
        Arc::new(InMemoryOtpStore::default()),
        Arc::new(TestClock::new()),
        true,
    );
    let app = test::init_service(create_app(state, &app_config("production"))).await;

    let resp = test::call_service(&app, post_json("/otp/send", json!({ "phone": "5551234567" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body, OtpResponse::failure("OTP send failed"));
}

#[actix_web::test]
async fn test_development_provider_failure_falls_back() {
    let state = state_with(
        Arc::new(FailingDispatcher),
        Arc::new(InMemoryOtpStore::default()),
        Arc::new(TestClock::new()),
        false,
    );
    let app = test::init_service(create_app(state, &app_config("development"))).await;

    let resp = test::call_service(&app, post_json("/otp/send", json!({ "phone": "5551234567" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.note.as_deref(), Some("dev_fallback"));
    assert!(body.otp_token.is_some());
}

#[actix_web::test]
async fn test_production_hides_code() {
    let state = state_with(
        Arc::new(LogOnlyDispatcher::new()),
        Arc::new(InMemoryOtpStore::default()),
        Arc::new(TestClock::new()),
        true,
    );
    let app = test::init_service(create_app(state, &app_config("production"))).await;

    let resp = test::call_service(&app, post_json("/otp/send", json!({ "phone": "5551234567" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.note.as_deref(), Some("log-only"));
    assert_eq!(body.otp_token, None);
}

#[actix_web::test]
async fn test_store_failure() {
    let dev_state = state_with(
        Arc::new(LogOnlyDispatcher::new()),
        Arc::new(BrokenStore),
        Arc::new(TestClock::new()),
        false,
    );
    let app = test::init_service(create_app(dev_state, &app_config("development"))).await;

    let resp = test::call_service(&app, post_json("/otp/send", json!({ "phone": "5551234567" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.note.as_deref(), Some("dev_fallback"));
    assert_eq!(body.otp_token.as_deref(), Some(DEV_FALLBACK_CODE));

    let resp = test::call_service(
        &app,
        post_json("/otp/verify", json!({ "phone": "5551234567", "code": DEV_FALLBACK_CODE })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body.error.as_deref(), Some("OTP verify failed"));

    let prod_state = state_with(
        Arc::new(LogOnlyDispatcher::new()),
        Arc::new(BrokenStore),
        Arc::new(TestClock::new()),
        true,
    );
    let app = test::init_service(create_app(prod_state, &app_config("production"))).await;

    let resp = test::call_service(&app, post_json("/otp/send", json!({ "phone": "5551234567" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: OtpResponse = test::read_body_json(resp).await;
    assert_eq!(body, OtpResponse::failure("OTP send failed"));
}

#[actix_web::test]
async fn test_index_and_not_found() {
    let app = test::init_service(create_app(
        log_only_state(Arc::new(TestClock::new())),
        &app_config("development"),
    ))
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["endpoints"]["send"]["path"], json!("/otp/send"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/otp/unknown").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
