use std::fmt;

use thiserror::Error;

/// Remote operation the store was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierAction {
    Load,
    Create,
    Update,
    ToggleActive,
    Delete,
}

impl SupplierAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::ToggleActive => "toggle_active",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SupplierAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no buying group is selected")]
    MissingGroup,
    #[error("supplier {action} failed: {reason:#}")]
    Remote {
        action: SupplierAction,
        reason: anyhow::Error,
    },
}

impl StoreError {
    pub fn remote(action: SupplierAction, reason: anyhow::Error) -> Self {
        Self::Remote { action, reason }
    }

    pub fn action(&self) -> Option<SupplierAction> {
        match self {
            Self::MissingGroup => None,
            Self::Remote { action, .. } => Some(*action),
        }
    }

    /// Human-readable cause without the action prefix, for notifications.
    pub fn reason(&self) -> String {
        match self {
            Self::MissingGroup => self.to_string(),
            Self::Remote { reason, .. } => format!("{reason:#}"),
        }
    }
}
