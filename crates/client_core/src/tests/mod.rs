use std::sync::{Arc, Mutex as StdMutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::{
    domain::{ConsumerGroupId, Supplier, SupplierFields, SupplierId},
    protocol::SupplierPayload,
};
use tokio::sync::{Mutex, Semaphore};

use crate::{
    ConfirmationGate, ConfirmationRequest, Decision, Navigator, Notifier, Severity,
    SupplierService,
};


pub(crate) const GROUP: ConsumerGroupId = ConsumerGroupId(7);

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("timestamp")
}

pub(crate) fn supplier(id: i64, name: &str, is_active: bool) -> Supplier {
    Supplier {
        id: SupplierId(id),
        fields: SupplierFields {
            name: name.to_string(),
            ..SupplierFields::default()
        },
        consumer_group_id: GROUP,
        is_active,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List(ConsumerGroupId),
    Create(SupplierPayload),
    Update(SupplierId, SupplierPayload),
    ToggleActive(SupplierId),
    Delete(SupplierId),
}

#[derive(Default)]
struct FakeState {
    records: Vec<Supplier>,
    next_id: i64,
    clock: i64,
    fail_with: Option<String>,
    calls: Vec<Call>,
}

/// In-memory supplier service that records every call. `fail_with` makes all
/// operations fail; `list_gate` holds each `list` call until a permit is added.
#[derive(Clone, Default)]
pub(crate) struct FakeSupplierService {
    state: Arc<Mutex<FakeState>>,
    list_gate: Option<Arc<Semaphore>>,
}

impl FakeSupplierService {
    pub(crate) fn with_records(records: Vec<Supplier>) -> Self {
        let next_id = records.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(FakeState {
                records,
                next_id,
                ..FakeState::default()
            })),
            list_gate: None,
        }
    }

    pub(crate) fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.list_gate = Some(gate);
        self
    }

    pub(crate) async fn fail_with(&self, err: impl Into<String>) {
        self.state.lock().await.fail_with = Some(err.into());
    }

    pub(crate) async fn recover(&self) {
        self.state.lock().await.fail_with = None;
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    pub(crate) async fn records(&self) -> Vec<Supplier> {
        self.state.lock().await.records.clone()
    }

    async fn record(&self, call: Call) -> Result<tokio::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().await;
        state.calls.push(call);
        if let Some(err) = &state.fail_with {
            return Err(anyhow!(err.clone()));
        }
        state.clock += 1;
        Ok(state)
    }
}

#[async_trait]
impl SupplierService for FakeSupplierService {
    async fn list(&self, group: ConsumerGroupId) -> Result<Vec<Supplier>> {
        if let Some(gate) = &self.list_gate {
            gate.acquire().await?.forget();
        }
        let state = self.record(Call::List(group)).await?;
        Ok(state
            .records
            .iter()
            .filter(|s| s.consumer_group_id == group)
            .cloned()
            .collect())
    }

    async fn create(&self, payload: &SupplierPayload) -> Result<Supplier> {
        let mut state = self.record(Call::Create(payload.clone())).await?;
        let now = epoch() + Duration::seconds(state.clock);
        let created = Supplier {
            id: SupplierId(state.next_id),
            fields: payload.fields.clone(),
            consumer_group_id: payload.consumer_group_id,
            is_active: payload.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        state.next_id += 1;
        state.records.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: SupplierId, payload: &SupplierPayload) -> Result<Supplier> {
        let mut state = self.record(Call::Update(id, payload.clone())).await?;
        let now = epoch() + Duration::seconds(state.clock);
        let record = state
            .records
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow!("supplier {id} not found"))?;
        record.fields = payload.fields.clone();
        record.consumer_group_id = payload.consumer_group_id;
        if let Some(is_active) = payload.is_active {
            record.is_active = is_active;
        }
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn toggle_active(&self, id: SupplierId) -> Result<Supplier> {
        let mut state = self.record(Call::ToggleActive(id)).await?;
        let now = epoch() + Duration::seconds(state.clock);
        let record = state
            .records
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow!("supplier {id} not found"))?;
        record.is_active = !record.is_active;
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn delete(&self, id: SupplierId) -> Result<()> {
        let mut state = self.record(Call::Delete(id)).await?;
        let before = state.records.len();
        state.records.retain(|s| s.id != id);
        if state.records.len() == before {
            return Err(anyhow!("supplier {id} not found"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    messages: StdMutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.lock().expect("notifier lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock")
            .push((severity, message.to_string()));
    }
}

pub(crate) struct ScriptedConfirmation {
    decision: Decision,
    requests: StdMutex<Vec<ConfirmationRequest>>,
}

impl ScriptedConfirmation {
    pub(crate) fn new(decision: Decision) -> Self {
        Self {
            decision,
            requests: StdMutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ConfirmationRequest> {
        self.requests.lock().expect("confirmation lock").clone()
    }
}

#[async_trait]
impl ConfirmationGate for ScriptedConfirmation {
    async fn confirm(&self, request: &ConfirmationRequest) -> Decision {
        self.requests
            .lock()
            .expect("confirmation lock")
            .push(request.clone());
        self.decision
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    visits: StdMutex<Vec<(String, Vec<(String, String)>)>>,
}

impl RecordingNavigator {
    pub(crate) fn visits(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.visits.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, path: &str, params: &[(&str, String)]) {
        self.visits.lock().expect("navigator lock").push((
            path.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
    }
}
