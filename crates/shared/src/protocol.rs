use serde::{Deserialize, Serialize};

use crate::domain::{ConsumerGroupId, SupplierFields};

/// Body sent on create and update. The group id is resolved by the client from
/// the active group context and never comes from the form.
///
/// `is_active` is only set on create; an update leaves the server's flag alone
/// so the toggle endpoint stays the one way to change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    pub consumer_group_id: ConsumerGroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub fields: SupplierFields,
}

impl SupplierPayload {
    pub fn for_create(consumer_group_id: ConsumerGroupId, fields: SupplierFields) -> Self {
        Self {
            consumer_group_id,
            is_active: Some(true),
            fields,
        }
    }

    pub fn for_update(consumer_group_id: ConsumerGroupId, fields: SupplierFields) -> Self {
        Self {
            consumer_group_id,
            is_active: None,
            fields,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSuppliersQuery {
    pub consumer_group_id: ConsumerGroupId,
}
