//! Log-only SMS dispatcher
//!
//! Used when no SMS provider is configured. Nothing is sent; the service
//! logs the code itself when it sees [`DispatchOutcome::NotConfigured`].

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use pv_core::services::otp::{DispatchOutcome, SmsDispatcher};
use pv_shared::phone::mask_phone_number;

/// Dispatcher for deployments without SMS credentials
#[derive(Clone, Default)]
pub struct LogOnlyDispatcher {
    /// Counter for tracking number of messages that would have been sent
    message_count: Arc<AtomicU64>,
}

impl LogOnlyDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of dispatch requests seen
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsDispatcher for LogOnlyDispatcher {
    async fn dispatch(&self, phone: &str, _body: &str) -> DispatchOutcome {
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "No SMS provider configured, skipping message #{} to {}",
            count,
            mask_phone_number(phone)
        );
        DispatchOutcome::NotConfigured
    }

    fn provider_name(&self) -> &str {
        "LogOnly"
    }
}
