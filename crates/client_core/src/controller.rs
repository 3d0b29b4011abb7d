//! Supplier list screen state: search/filter inputs, the edit dialog, and the
//! confirm-then-mutate flows driven through [`SupplierStore`].

use std::sync::Arc;

use shared::{
    domain::{Supplier, SupplierFields},
    protocol::SupplierPayload,
};
use tracing::{debug, info, warn};

use crate::{
    filter::SupplierFilter,
    messages,
    store::SupplierStore,
    validation::{FieldErrors, SupplierForm},
    ConfirmationGate, Decision, GroupContext, Navigator, Notifier, Severity,
};

pub const PERIODS_ROUTE: &str = "/suppliers/periods";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Supplier),
    /// The form did not validate; nothing was sent.
    Invalid(FieldErrors),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Cancelled,
    Failed,
}

/// Open edit dialog. `selected` is `None` in create mode.
#[derive(Debug, Clone)]
struct EditDialog {
    selected: Option<Supplier>,
    form: SupplierForm,
}

pub struct SupplierListController {
    store: Arc<SupplierStore>,
    groups: Arc<dyn GroupContext>,
    notifier: Arc<dyn Notifier>,
    confirmation: Arc<dyn ConfirmationGate>,
    navigator: Arc<dyn Navigator>,
    search_term: String,
    show_inactive: bool,
    dialog: Option<EditDialog>,
}

impl SupplierListController {
    pub fn new(
        store: Arc<SupplierStore>,
        groups: Arc<dyn GroupContext>,
        notifier: Arc<dyn Notifier>,
        confirmation: Arc<dyn ConfirmationGate>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            groups,
            notifier,
            confirmation,
            navigator,
            search_term: String::new(),
            show_inactive: false,
            dialog: None,
        }
    }

    pub fn store(&self) -> &Arc<SupplierStore> {
        &self.store
    }

    /// Populates the store before the list is first shown. Failures are
    /// reported to the operator and never returned.
    pub async fn initialize(&self) {
        self.load(false).await;
    }

    pub async fn refresh(&self) {
        self.load(true).await;
    }

    async fn load(&self, force_refresh: bool) {
        if let Err(err) = self.store.load_suppliers(force_refresh).await {
            self.notifier
                .notify(Severity::Error, &messages::load_failed(&err));
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn show_inactive(&self) -> bool {
        self.show_inactive
    }

    pub fn dialog_visible(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn selected_supplier(&self) -> Option<&Supplier> {
        self.dialog.as_ref().and_then(|dialog| dialog.selected.as_ref())
    }

    pub fn form(&self) -> Option<&SupplierForm> {
        self.dialog.as_ref().map(|dialog| &dialog.form)
    }

    pub fn form_mut(&mut self) -> Option<&mut SupplierForm> {
        self.dialog.as_mut().map(|dialog| &mut dialog.form)
    }

    pub fn filter(&self) -> SupplierFilter {
        SupplierFilter::new(&self.search_term, self.show_inactive)
    }

    /// Recomputed from the store's current collection on every call.
    pub async fn filtered_suppliers(&self) -> Vec<Supplier> {
        let filter = self.filter();
        self.store.select(|suppliers| filter.apply(suppliers)).await
    }

    pub fn on_search(&mut self, text: impl Into<String>) {
        self.search_term = text.into();
    }

    pub fn toggle_show_inactive(&mut self) {
        self.show_inactive = !self.show_inactive;
    }

    pub fn open_create_dialog(&mut self) {
        self.dialog = Some(EditDialog {
            selected: None,
            form: SupplierForm::for_create(),
        });
    }

    pub fn open_edit_dialog(&mut self, supplier: &Supplier) {
        self.dialog = Some(EditDialog {
            selected: Some(supplier.clone()),
            form: SupplierForm::for_edit(supplier),
        });
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Validates the open dialog's form and saves it when valid.
    pub async fn submit_form(&mut self) -> SaveOutcome {
        let Some(dialog) = self.dialog.as_mut() else {
            warn!("submit requested with no open supplier dialog");
            return SaveOutcome::Failed;
        };
        match dialog.form.submit() {
            Ok(fields) => self.on_save(fields).await,
            Err(errors) => {
                debug!(invalid_fields = errors.len(), "supplier form rejected");
                SaveOutcome::Invalid(errors)
            }
        }
    }

    /// Creates or updates depending on whether a supplier is selected. The
    /// dialog stays open on failure so the operator can retry.
    pub async fn on_save(&mut self, fields: SupplierFields) -> SaveOutcome {
        let Some(group) = self.groups.active_group() else {
            warn!("supplier save refused: no active buying group");
            self.notifier
                .notify(Severity::Error, &messages::missing_group());
            return SaveOutcome::Failed;
        };

        let selected = self.selected_supplier().cloned();
        let editing = selected.is_some();
        let result = match selected {
            Some(current) => {
                let payload = SupplierPayload::for_update(group, fields);
                self.store.update_supplier(current.id, &payload).await
            }
            None => {
                let payload = SupplierPayload::for_create(group, fields);
                self.store.create_supplier(&payload).await
            }
        };

        match result {
            Ok(saved) => {
                self.close_dialog();
                let message = if editing {
                    messages::updated()
                } else {
                    messages::created()
                };
                self.notifier.notify(Severity::Success, &message);
                SaveOutcome::Saved(saved)
            }
            Err(err) => {
                self.notifier
                    .notify(Severity::Error, &messages::save_failed(editing, &err));
                SaveOutcome::Failed
            }
        }
    }

    pub async fn confirm_toggle_active(&self, supplier: &Supplier) -> ActionOutcome {
        let request = messages::confirm_toggle(supplier);
        if self.confirmation.confirm(&request).await == Decision::Reject {
            debug!(supplier_id = supplier.id.0, "toggle cancelled");
            return ActionOutcome::Cancelled;
        }

        match self.store.toggle_active(supplier.id).await {
            Ok(toggled) => {
                self.notifier.notify(
                    Severity::Success,
                    &messages::toggled(supplier, toggled.is_active),
                );
                ActionOutcome::Done
            }
            Err(err) => {
                self.notifier.notify(
                    Severity::Error,
                    &messages::toggle_failed(supplier.is_active, &err),
                );
                ActionOutcome::Failed
            }
        }
    }

    pub async fn confirm_delete(&self, supplier: &Supplier) -> ActionOutcome {
        let request = messages::confirm_delete(supplier);
        if self.confirmation.confirm(&request).await == Decision::Reject {
            debug!(supplier_id = supplier.id.0, "delete cancelled");
            return ActionOutcome::Cancelled;
        }

        match self.store.delete_supplier(supplier.id).await {
            Ok(()) => {
                self.notifier
                    .notify(Severity::Success, &messages::deleted(supplier));
                ActionOutcome::Done
            }
            Err(err) => {
                self.notifier
                    .notify(Severity::Error, &messages::delete_failed(&err));
                ActionOutcome::Failed
            }
        }
    }

    pub fn open_periods(&self, supplier: &Supplier) {
        info!(supplier_id = supplier.id.0, "opening supplier periods");
        self.navigator
            .go_to(PERIODS_ROUTE, &[("supplierId", supplier.id.to_string())]);
    }
}
