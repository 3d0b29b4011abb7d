//! In-memory mirror of the active buying group's suppliers.
//!
//! The store applies a mutation locally only after the remote service has
//! confirmed it, so a failed call always leaves the collection as it was.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{ConsumerGroupId, Supplier, SupplierId},
    protocol::SupplierPayload,
};
use tokio::{
    sync::{broadcast, RwLock},
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::{
    error::{StoreError, SupplierAction},
    GroupContext, SupplierService,
};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a successful load satisfies a non-forced reload.
    pub cache_ttl: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    LoadingChanged(bool),
    Loaded {
        group: ConsumerGroupId,
        count: usize,
    },
    Created(SupplierId),
    Updated(SupplierId),
    Toggled {
        id: SupplierId,
        is_active: bool,
    },
    Deleted(SupplierId),
}

struct LoadStamp {
    group: ConsumerGroupId,
    at: Instant,
}

#[derive(Default)]
struct StoreState {
    suppliers: Vec<Supplier>,
    loads_in_flight: usize,
    last_load: Option<LoadStamp>,
}

pub struct SupplierStore {
    service: Arc<dyn SupplierService>,
    groups: Arc<dyn GroupContext>,
    options: StoreOptions,
    state: RwLock<StoreState>,
    events: broadcast::Sender<StoreEvent>,
}

impl SupplierStore {
    pub fn new(service: Arc<dyn SupplierService>, groups: Arc<dyn GroupContext>) -> Arc<Self> {
        Self::with_options(service, groups, StoreOptions::default())
    }

    pub fn with_options(
        service: Arc<dyn SupplierService>,
        groups: Arc<dyn GroupContext>,
        options: StoreOptions,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            service,
            groups,
            options,
            state: RwLock::new(StoreState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.state.read().await.suppliers.clone()
    }

    /// Runs `f` against the current collection without cloning it.
    pub async fn select<T>(&self, f: impl FnOnce(&[Supplier]) -> T) -> T {
        f(&self.state.read().await.suppliers)
    }

    pub async fn get(&self, id: SupplierId) -> Option<Supplier> {
        self.state
            .read()
            .await
            .suppliers
            .iter()
            .find(|supplier| supplier.id == id)
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loads_in_flight > 0
    }

    /// Replaces the collection with the active group's suppliers. Without
    /// `force_refresh` a recent load for the same group is reused. A result
    /// that arrives after the active group has changed is dropped.
    pub async fn load_suppliers(&self, force_refresh: bool) -> Result<(), StoreError> {
        let group = self.groups.active_group().ok_or(StoreError::MissingGroup)?;

        {
            let mut state = self.state.write().await;
            if !force_refresh && self.is_fresh(&state, group) {
                debug!(group = group.0, "supplier cache is fresh; skipping load");
                return Ok(());
            }
            state.loads_in_flight += 1;
            if state.loads_in_flight == 1 {
                self.emit(StoreEvent::LoadingChanged(true));
            }
        }

        let result = self.service.list(group).await;
        let current = self.groups.active_group();

        let mut state = self.state.write().await;
        state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
        let finished = state.loads_in_flight == 0;
        let outcome = match result {
            Ok(_) if current != Some(group) => {
                debug!(
                    group = group.0,
                    active = ?current.map(|g| g.0),
                    "active group changed during load; discarding result"
                );
                Ok(None)
            }
            Ok(suppliers) => {
                let count = suppliers.len();
                state.suppliers = suppliers;
                state.last_load = Some(LoadStamp {
                    group,
                    at: Instant::now(),
                });
                info!(group = group.0, count, "loaded suppliers");
                Ok(Some(count))
            }
            Err(reason) => {
                warn!(group = group.0, "supplier load failed: {reason:#}");
                Err(StoreError::remote(SupplierAction::Load, reason))
            }
        };
        drop(state);

        if finished {
            self.emit(StoreEvent::LoadingChanged(false));
        }
        if let Some(count) = outcome? {
            self.emit(StoreEvent::Loaded { group, count });
        }
        Ok(())
    }

    pub async fn create_supplier(&self, payload: &SupplierPayload) -> Result<Supplier, StoreError> {
        let created = self
            .service
            .create(payload)
            .await
            .map_err(|reason| remote_failure(SupplierAction::Create, None, reason))?;

        self.state.write().await.suppliers.push(created.clone());
        info!(
            supplier_id = created.id.0,
            group = created.consumer_group_id.0,
            "created supplier"
        );
        self.emit(StoreEvent::Created(created.id));
        Ok(created)
    }

    pub async fn update_supplier(
        &self,
        id: SupplierId,
        payload: &SupplierPayload,
    ) -> Result<Supplier, StoreError> {
        let updated = self
            .service
            .update(id, payload)
            .await
            .map_err(|reason| remote_failure(SupplierAction::Update, Some(id), reason))?;

        {
            let mut state = self.state.write().await;
            match state.suppliers.iter_mut().find(|supplier| supplier.id == id) {
                Some(slot) => *slot = updated.clone(),
                None => {
                    debug!(supplier_id = id.0, "updated supplier was not cached; appending");
                    state.suppliers.push(updated.clone());
                }
            }
        }
        info!(supplier_id = id.0, "updated supplier");
        self.emit(StoreEvent::Updated(id));
        Ok(updated)
    }

    /// Flips `is_active` on the server and mirrors the new flag locally.
    pub async fn toggle_active(&self, id: SupplierId) -> Result<Supplier, StoreError> {
        let toggled = self
            .service
            .toggle_active(id)
            .await
            .map_err(|reason| remote_failure(SupplierAction::ToggleActive, Some(id), reason))?;

        {
            let mut state = self.state.write().await;
            if let Some(slot) = state.suppliers.iter_mut().find(|supplier| supplier.id == id) {
                slot.is_active = toggled.is_active;
                slot.updated_at = toggled.updated_at;
            }
        }
        info!(
            supplier_id = id.0,
            is_active = toggled.is_active,
            "toggled supplier"
        );
        self.emit(StoreEvent::Toggled {
            id,
            is_active: toggled.is_active,
        });
        Ok(toggled)
    }

    pub async fn delete_supplier(&self, id: SupplierId) -> Result<(), StoreError> {
        self.service
            .delete(id)
            .await
            .map_err(|reason| remote_failure(SupplierAction::Delete, Some(id), reason))?;

        self.state
            .write()
            .await
            .suppliers
            .retain(|supplier| supplier.id != id);
        info!(supplier_id = id.0, "deleted supplier");
        self.emit(StoreEvent::Deleted(id));
        Ok(())
    }

    fn is_fresh(&self, state: &StoreState, group: ConsumerGroupId) -> bool {
        state
            .last_load
            .as_ref()
            .is_some_and(|stamp| stamp.group == group && stamp.at.elapsed() < self.options.cache_ttl)
    }

    fn emit(&self, event: StoreEvent) {
        let _ = self.events.send(event);
    }
}

fn remote_failure(
    action: SupplierAction,
    id: Option<SupplierId>,
    reason: anyhow::Error,
) -> StoreError {
    match id {
        Some(id) => warn!(supplier_id = id.0, %action, "supplier mutation failed: {reason:#}"),
        None => warn!(%action, "supplier mutation failed: {reason:#}"),
    }
    StoreError::remote(action, reason)
}
