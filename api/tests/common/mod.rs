//! Shared fixtures for endpoint tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use pv_api::routes::AppState;
use pv_core::domain::entities::otp_record::{AttemptOutcome, OtpRecord};
use pv_core::services::otp::{
    Clock, DispatchOutcome, OtpService, OtpServiceConfig, OtpStore, SmsDispatcher,
};
use pv_infra::cache::InMemoryOtpStore;
use pv_infra::sms::LogOnlyDispatcher;
use pv_shared::config::AppConfig;

/// Clock that only moves when told to
pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub fn new() -> Self {
        Self(Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Dispatcher that always fails with a provider error
pub struct FailingDispatcher;

#[async_trait]
impl SmsDispatcher for FailingDispatcher {
    async fn dispatch(&self, _phone: &str, _body: &str) -> DispatchOutcome {
        DispatchOutcome::Failed {
            reason: "Twilio error 20003: Authenticate".to_string(),
        }
    }

    fn provider_name(&self) -> &str {
        "Failing"
    }
}

/// Store whose every operation fails
pub struct BrokenStore;

#[async_trait]
impl OtpStore for BrokenStore {
    async fn put(&self, _record: OtpRecord) -> Result<(), String> {
        Err("store unavailable".to_string())
    }

    async fn attempt(
        &self,
        _phone: &str,
        _submitted: &str,
        _now: DateTime<Utc>,
        _max_attempts: u32,
    ) -> Result<AttemptOutcome, String> {
        Err("store unavailable".to_string())
    }

    async fn get(&self, _phone: &str) -> Result<Option<OtpRecord>, String> {
        Err("store unavailable".to_string())
    }

    async fn remove(&self, _phone: &str) -> Result<bool, String> {
        Err("store unavailable".to_string())
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, String> {
        Err("store unavailable".to_string())
    }

    async fn len(&self) -> Result<usize, String> {
        Err("store unavailable".to_string())
    }
}

pub fn app_config(environment: &'static str) -> AppConfig {
    AppConfig::from_source(move |key| match key {
        "ENVIRONMENT" => Some(environment.to_string()),
        _ => None,
    })
}

pub fn service_config(is_production: bool) -> OtpServiceConfig {
    OtpServiceConfig {
        is_production,
        expose_code: !is_production,
        ..OtpServiceConfig::default()
    }
}

pub fn state_with(
    dispatcher: Arc<dyn SmsDispatcher>,
    store: Arc<dyn OtpStore>,
    clock: Arc<dyn Clock>,
    is_production: bool,
) -> web::Data<AppState> {
    let service = OtpService::new(dispatcher, store, clock, service_config(is_production));
    web::Data::new(AppState::new(Arc::new(service)))
}

/// Development state with the log-only dispatcher and an in-memory store
pub fn log_only_state(clock: Arc<TestClock>) -> web::Data<AppState> {
    state_with(
        Arc::new(LogOnlyDispatcher::new()),
        Arc::new(InMemoryOtpStore::default()),
        clock,
        false,
    )
}
