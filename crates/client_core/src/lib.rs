use std::sync::{PoisonError, RwLock};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{ConsumerGroupId, Supplier, SupplierId},
    protocol::SupplierPayload,
};

pub mod controller;
pub mod error;
pub mod filter;
pub mod messages;
pub mod store;
pub mod transport;
pub mod validation;

pub use controller::{ActionOutcome, SaveOutcome, SupplierListController, PERIODS_ROUTE};
pub use error::{StoreError, SupplierAction};
pub use filter::SupplierFilter;
pub use store::{StoreEvent, StoreOptions, SupplierStore};
pub use transport::HttpSupplierService;
pub use validation::{FieldError, SupplierField, SupplierForm};

/// Remote persistence for supplier records. Implementations report failures
/// without classifying them; callers only distinguish success from failure.
#[async_trait]
pub trait SupplierService: Send + Sync {
    async fn list(&self, group: ConsumerGroupId) -> Result<Vec<Supplier>>;
    async fn create(&self, payload: &SupplierPayload) -> Result<Supplier>;
    async fn update(&self, id: SupplierId, payload: &SupplierPayload) -> Result<Supplier>;
    async fn toggle_active(&self, id: SupplierId) -> Result<Supplier>;
    async fn delete(&self, id: SupplierId) -> Result<()>;
}

pub struct MissingSupplierService;

#[async_trait]
impl SupplierService for MissingSupplierService {
    async fn list(&self, group: ConsumerGroupId) -> Result<Vec<Supplier>> {
        Err(anyhow!("supplier service unavailable for group {group}"))
    }

    async fn create(&self, _payload: &SupplierPayload) -> Result<Supplier> {
        Err(anyhow!("supplier service is unavailable"))
    }

    async fn update(&self, id: SupplierId, _payload: &SupplierPayload) -> Result<Supplier> {
        Err(anyhow!("supplier service unavailable for supplier {id}"))
    }

    async fn toggle_active(&self, id: SupplierId) -> Result<Supplier> {
        Err(anyhow!("supplier service unavailable for supplier {id}"))
    }

    async fn delete(&self, id: SupplierId) -> Result<()> {
        Err(anyhow!("supplier service unavailable for supplier {id}"))
    }
}

/// The buying group the operator is currently working in.
pub trait GroupContext: Send + Sync {
    fn active_group(&self) -> Option<ConsumerGroupId>;
}

pub struct NoActiveGroup;

impl GroupContext for NoActiveGroup {
    fn active_group(&self) -> Option<ConsumerGroupId> {
        None
    }
}

#[derive(Debug, Default)]
pub struct FixedGroupContext {
    group: RwLock<Option<ConsumerGroupId>>,
}

impl FixedGroupContext {
    pub fn new(group: Option<ConsumerGroupId>) -> Self {
        Self {
            group: RwLock::new(group),
        }
    }

    pub fn set(&self, group: Option<ConsumerGroupId>) {
        *self.group.write().unwrap_or_else(PoisonError::into_inner) = group;
    }
}

impl GroupContext for FixedGroupContext {
    fn active_group(&self) -> Option<ConsumerGroupId> {
        *self.group.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _severity: Severity, _message: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub header: String,
    pub message: String,
    pub destructive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

/// Asks the operator to approve an action. Anything other than an explicit
/// approval must resolve to [`Decision::Reject`].
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn confirm(&self, request: &ConfirmationRequest) -> Decision;
}

pub struct RejectAll;

#[async_trait]
impl ConfirmationGate for RejectAll {
    async fn confirm(&self, _request: &ConfirmationRequest) -> Decision {
        Decision::Reject
    }
}

pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str, params: &[(&str, String)]);
}

pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn go_to(&self, _path: &str, _params: &[(&str, String)]) {}
}

#[cfg(test)]
mod tests;
