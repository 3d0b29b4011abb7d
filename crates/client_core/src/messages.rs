//! Operator-facing notification and confirmation texts.

use shared::domain::Supplier;

use crate::{error::StoreError, ConfirmationRequest};

pub fn created() -> String {
    "Supplier created successfully".to_string()
}

pub fn updated() -> String {
    "Supplier updated successfully".to_string()
}

pub fn toggled(supplier: &Supplier, now_active: bool) -> String {
    if now_active {
        format!("Supplier \"{}\" activated", supplier.name())
    } else {
        format!("Supplier \"{}\" deactivated", supplier.name())
    }
}

pub fn deleted(supplier: &Supplier) -> String {
    format!("Supplier \"{}\" deleted", supplier.name())
}

pub fn missing_group() -> String {
    "Select a buying group before saving suppliers".to_string()
}

pub fn load_failed(err: &StoreError) -> String {
    format!("Error loading suppliers: {}", err.reason())
}

pub fn save_failed(editing: bool, err: &StoreError) -> String {
    let verb = if editing { "updating" } else { "creating" };
    format!("Error {verb} supplier: {}", err.reason())
}

pub fn toggle_failed(was_active: bool, err: &StoreError) -> String {
    let verb = if was_active { "deactivating" } else { "activating" };
    format!("Error {verb} supplier: {}", err.reason())
}

pub fn delete_failed(err: &StoreError) -> String {
    format!("Error deleting supplier: {}", err.reason())
}

pub fn confirm_toggle(supplier: &Supplier) -> ConfirmationRequest {
    let action = if supplier.is_active {
        "deactivate"
    } else {
        "activate"
    };
    ConfirmationRequest {
        header: "Confirm".to_string(),
        message: format!(
            "Are you sure you want to {action} the supplier \"{}\"?",
            supplier.name()
        ),
        destructive: supplier.is_active,
    }
}

pub fn confirm_delete(supplier: &Supplier) -> ConfirmationRequest {
    ConfirmationRequest {
        header: "Delete supplier".to_string(),
        message: format!(
            "Are you sure you want to delete the supplier \"{}\"? This cannot be undone.",
            supplier.name()
        ),
        destructive: true,
    }
}
