//! Storage

use crate::payload::arm_enum;
use crate::resourceids::typed_resource_id;

pub const API_VERSION: &str = "2023-01-01";

typed_resource_id! {
    /// A blob container, addressed through the management plane
    pub struct StorageContainerId(
        "Storage Container",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Storage/storageAccounts/{storageAccountName}/blobServices/default/containers/{containerName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        storage_account_name => "storageAccountName",
        container_name => "containerName",
    }
}

arm_enum! {
    pub enum PublicAccess {
        None => "None",
        Blob => "Blob",
        Container => "Container",
    }
}
