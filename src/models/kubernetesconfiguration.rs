//! Kubernetes configuration
//!
//! Flux configurations are extension resources: their ID is scoped to the
//! cluster they are installed on.

use crate::payload::arm_enum;
use crate::resourceids::{typed_resource_id, TypedResourceId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_VERSION: &str = "2023-05-01";
pub const CONNECTED_CLUSTER_API_VERSION: &str = "2024-01-01";

typed_resource_id! {
    /// An Azure Arc connected Kubernetes cluster
    pub struct ConnectedClusterId(
        "Connected Cluster",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Kubernetes/connectedClusters/{connectedClusterName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        connected_cluster_name => "connectedClusterName",
    }
}

typed_resource_id! {
    /// A Flux configuration installed on a cluster
    pub struct FluxConfigurationId(
        "Flux Configuration",
        "/{scope}/providers/Microsoft.KubernetesConfiguration/fluxConfigurations/{fluxConfigurationName}"
    ) {
        scope => "scope",
        flux_configuration_name => "fluxConfigurationName",
    }
}

impl FluxConfigurationId {
    /// A Flux configuration on a connected cluster
    pub fn for_cluster(cluster: &ConnectedClusterId, name: impl Into<String>) -> Self {
        Self::new(cluster.id(), name)
    }
}

arm_enum! {
    pub enum SourceKind {
        GitRepository => "GitRepository",
        Bucket => "Bucket",
        AzureBlob => "AzureBlob",
    }
}

arm_enum! {
    pub enum ScopeType {
        Cluster => "cluster",
        Namespace => "namespace",
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepositoryDefinition {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_ref: Option<RepositoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_interval_in_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_in_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KustomizationDefinition {
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prune: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_interval_in_seconds: Option<i64>,
}

/// A Flux configuration resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FluxConfiguration {
    pub properties: FluxConfigurationProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FluxConfigurationProperties {
    pub scope: ScopeType,
    pub namespace: String,
    pub source_kind: SourceKind,
    #[serde(default)]
    pub suspend: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repository: Option<GitRepositoryDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kustomizations: BTreeMap<String, KustomizationDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}
