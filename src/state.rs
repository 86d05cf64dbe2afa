//! Presentation state.
//!
//! One explicit container for what a front end renders: the connected
//! account, balances, contract overviews, a loading flag and a queue of
//! transient notifications. Every user action runs through [`StateStore::track`]
//! so failures become notifications and never leave the store stuck loading.

use alloy::primitives::Address;
use serde::Serialize;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::{
    error::Result,
    services::DashboardSnapshot,
    types::{NativeTokenSnapshot, TokenHolder, TokenSaleSnapshot},
};

/// Notifications kept before the oldest are dropped.
const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
}

/// Derived UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DappState {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    /// Native currency balance, in ether.
    pub native_balance: Option<String>,
    pub native_token: Option<NativeTokenSnapshot>,
    pub token_sale: Option<TokenSaleSnapshot>,
    pub current_holder: Option<TokenHolder>,
    pub token_holders: Vec<Address>,
    pub loading: bool,
}

#[derive(Default)]
struct Inner {
    state: DappState,
    notifications: VecDeque<Notification>,
}

/// Shared presentation state.
#[derive(Default)]
pub struct StateStore {
    inner: Mutex<Inner>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State stays consistent across a panicking writer; every update is a
        // plain field assignment.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> DappState {
        self.lock().state.clone()
    }

    pub fn set_loading(&self, loading: bool) {
        self.lock().state.loading = loading;
    }

    /// Record the connected account.
    pub fn set_connection(&self, account: Option<Address>, chain_id: u64) {
        let mut inner = self.lock();
        inner.state.account = account;
        inner.state.chain_id = Some(chain_id);
    }

    /// Replace the overview with freshly fetched data.
    pub fn apply_dashboard(&self, snapshot: DashboardSnapshot) {
        let mut inner = self.lock();
        let state = &mut inner.state;
        state.account = snapshot.account.or(state.account);
        state.chain_id = Some(snapshot.chain_id);
        state.native_balance = Some(snapshot.native_balance);
        state.native_token = Some(snapshot.native_token);
        state.token_holders = snapshot.token_holders;
        state.current_holder = snapshot.current_holder;
        state.token_sale = Some(snapshot.token_sale);
    }

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let mut inner = self.lock();
        if inner.notifications.len() == MAX_NOTIFICATIONS {
            inner.notifications.pop_front();
        }
        inner.notifications.push_back(Notification { level, message: message.into(), timestamp });
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message);
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Take all pending notifications, oldest first.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.lock().notifications.drain(..).collect()
    }

    /// Run a user action with the loading flag set.
    ///
    /// On success `success_message` is queued when given; on failure the error
    /// text is queued. The loading flag is cleared either way and the result is
    /// passed through unchanged.
    pub async fn track<T, F>(&self, success_message: Option<&str>, action: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.set_loading(true);
        let result = action.await;
        self.set_loading(false);

        match &result {
            Ok(_) => {
                if let Some(message) = success_message {
                    self.notify_success(message);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Action failed");
                self.notify_error(e.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use alloy::primitives::address;

    #[tokio::test]
    async fn test_track_success_queues_message_and_clears_loading() {
        let store = StateStore::new();

        let value = store
            .track(Some("Successfully Completed"), async {
                Ok::<_, AppError>(42)
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert!(!store.snapshot().loading);

        let notifications = store.drain_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Success);
        assert_eq!(notifications[0].message, "Successfully Completed");
        assert!(store.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_track_failure_queues_error() {
        let store = StateStore::new();

        let result = store
            .track(Some("never shown"), async { Err::<(), _>(AppError::WalletUnavailable) })
            .await;

        assert!(matches!(result, Err(AppError::WalletUnavailable)));
        assert!(!store.snapshot().loading);

        let notifications = store.drain_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Error);
        assert_eq!(notifications[0].message, AppError::WalletUnavailable.to_string());
    }

    #[test]
    fn test_loading_flag_is_visible_while_set() {
        let store = StateStore::new();
        store.set_loading(true);
        assert!(store.snapshot().loading);
        store.set_loading(false);
        assert!(!store.snapshot().loading);
    }

    #[test]
    fn test_notification_queue_is_bounded() {
        let store = StateStore::new();
        for i in 0..(MAX_NOTIFICATIONS + 5) {
            store.notify_success(format!("message {i}"));
        }

        let notifications = store.drain_notifications();
        assert_eq!(notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(notifications[0].message, "message 5");
    }

    #[test]
    fn test_set_connection() {
        let store = StateStore::new();
        let account = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        store.set_connection(Some(account), 11155111);

        let state = store.snapshot();
        assert_eq!(state.account, Some(account));
        assert_eq!(state.chain_id, Some(11155111));
        assert!(state.native_token.is_none());
    }
}
