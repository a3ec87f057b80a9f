//! Time Series Insights
//!
//! Environments and event sources carry their shape in the top-level `kind`
//! field.

use crate::payload::{arm_enum, payload_family};
use crate::resourceids::typed_resource_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_VERSION: &str = "2020-05-15";

typed_resource_id! {
    /// A Time Series Insights environment
    pub struct EnvironmentId(
        "Environment",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.TimeSeriesInsights/environments/{environmentName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        environment_name => "environmentName",
    }
}

typed_resource_id! {
    /// An event source feeding an environment
    pub struct EventSourceId(
        "Event Source",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.TimeSeriesInsights/environments/{environmentName}/eventSources/{eventSourceName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        environment_name => "environmentName",
        event_source_name => "eventSourceName",
    }
}

impl EventSourceId {
    pub fn environment(&self) -> EnvironmentId {
        EnvironmentId::new(
            self.subscription_id.clone(),
            self.resource_group_name.clone(),
            self.environment_name.clone(),
        )
    }
}

arm_enum! {
    pub enum SkuName {
        S1 => "S1",
        S2 => "S2",
        P1 => "P1",
        L1 => "L1",
    }
}

arm_enum! {
    pub enum StorageLimitExceededBehavior {
        PurgeOldData => "PurgeOldData",
        PauseIngress => "PauseIngress",
    }
}

arm_enum! {
    pub enum PropertyType {
        String => "String",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    pub name: SkuName,
    pub capacity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesIdProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

// ============================================================================
// Environments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gen1Environment {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub sku: Sku,
    pub properties: Gen1EnvironmentProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gen1EnvironmentProperties {
    /// ISO 8601 duration, e.g. `P30D`
    pub data_retention_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_limit_exceeded_behavior: Option<StorageLimitExceededBehavior>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partition_key_properties: Vec<TimeSeriesIdProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gen2Environment {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub sku: Sku,
    pub properties: Gen2EnvironmentProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gen2EnvironmentProperties {
    pub time_series_id_properties: Vec<TimeSeriesIdProperty>,
    pub storage_configuration: Gen2StorageConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_store_configuration: Option<WarmStoreConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gen2StorageConfiguration {
    pub account_name: String,
    /// Write-only; never returned by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmStoreConfiguration {
    /// ISO 8601 duration, e.g. `P7D`
    pub data_retention: String,
}

payload_family! {
    /// A Time Series Insights environment resource
    pub enum Environment("TimeSeriesInsightsEnvironment", "kind") {
        Gen1(Gen1Environment) = "Gen1",
        Gen2(Gen2Environment) = "Gen2",
    }
}

// ============================================================================
// Event sources
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHubEventSource {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub properties: EventHubEventSourceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHubEventSourceProperties {
    pub event_source_resource_id: String,
    pub service_bus_namespace: String,
    pub event_hub_name: String,
    pub consumer_group_name: String,
    pub key_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_property_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoTHubEventSource {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub properties: IoTHubEventSourceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoTHubEventSourceProperties {
    pub event_source_resource_id: String,
    pub iot_hub_name: String,
    pub consumer_group_name: String,
    pub key_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_property_name: Option<String>,
}

payload_family! {
    /// An event source resource
    pub enum EventSource("TimeSeriesInsightsEventSource", "kind") {
        EventHub(EventHubEventSource) = "Microsoft.EventHub",
        IoTHub(IoTHubEventSource) = "Microsoft.IoTHub",
    }
}
