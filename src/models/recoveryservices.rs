//! Site Recovery
//!
//! Enabling protection of a machine sends provider-specific input selected
//! by `instanceType`.

use crate::payload::{arm_enum, optional, payload_family};
use crate::resourceids::typed_resource_id;
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "2024-04-01";

typed_resource_id! {
    /// A protected item within a vault's replication protection container
    pub struct ReplicationProtectedItemId(
        "Replication Protected Item",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.RecoveryServices/vaults/{vaultName}/replicationFabrics/{replicationFabricName}/replicationProtectionContainers/{replicationProtectionContainerName}/replicationProtectedItems/{replicationProtectedItemName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        vault_name => "vaultName",
        replication_fabric_name => "replicationFabricName",
        replication_protection_container_name => "replicationProtectionContainerName",
        replication_protected_item_name => "replicationProtectedItemName",
    }
}

arm_enum! {
    pub enum DiskAccountType {
        StandardLrs => "Standard_LRS",
        PremiumLrs => "Premium_LRS",
        StandardSsdLrs => "StandardSSD_LRS",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2AVmManagedDiskInputDetails {
    pub disk_id: String,
    pub primary_staging_azure_storage_account_id: String,
    pub recovery_resource_group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_replica_disk_account_type: Option<DiskAccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_target_disk_account_type: Option<DiskAccountType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2AEnableProtectionInput {
    pub fabric_object_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_resource_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_availability_set_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_azure_network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vm_managed_disks: Vec<A2AVmManagedDiskInputDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperVReplicaAzureEnableProtectionInput {
    pub hv_host_vm_id: String,
    pub vm_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vhd_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_storage_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_azure_network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_azure_subnet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_azure_vm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_storage_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disks_to_include: Vec<String>,
}

payload_family! {
    /// Replication provider settings used when enabling protection
    pub enum EnableProtectionProviderSpecificInput("SiteRecoveryEnableProtectionInput", "instanceType") {
        A2A(A2AEnableProtectionInput) = "A2A",
        HyperVReplicaAzure(HyperVReplicaAzureEnableProtectionInput) = "HyperVReplicaAzure",
    }
}

/// Request body creating a replication protected item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableProtectionInput {
    pub properties: EnableProtectionInputProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableProtectionInputProperties {
    pub policy_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protectable_item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional")]
    pub provider_specific_details: Option<EnableProtectionProviderSpecificInput>,
}
