//! Stream Analytics
//!
//! Inputs nest three families: the input itself (`type`: `Stream` or
//! `Reference`), its data source and its serialization.

use crate::payload::{arm_enum, optional, payload_family};
use crate::resourceids::typed_resource_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const API_VERSION: &str = "2020-03-01";

typed_resource_id! {
    /// A Stream Analytics streaming job
    pub struct StreamingJobId(
        "Streaming Job",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.StreamAnalytics/streamingJobs/{streamingJobName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        streaming_job_name => "streamingJobName",
    }
}

typed_resource_id! {
    /// An input of a streaming job
    pub struct InputId(
        "Input",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.StreamAnalytics/streamingJobs/{streamingJobName}/inputs/{inputName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        streaming_job_name => "streamingJobName",
        input_name => "inputName",
    }
}

arm_enum! {
    pub enum Encoding {
        Utf8 => "UTF8",
    }
}

arm_enum! {
    pub enum JsonOutputSerializationFormat {
        LineSeparated => "LineSeparated",
        Array => "Array",
    }
}

arm_enum! {
    pub enum AuthenticationMode {
        ConnectionString => "ConnectionString",
        Msi => "Msi",
        UserToken => "UserToken",
    }
}

// ============================================================================
// Serializations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSerialization {
    pub properties: JsonSerializationProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSerializationProperties {
    pub encoding: Encoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<JsonOutputSerializationFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvSerialization {
    pub properties: CsvSerializationProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvSerializationProperties {
    pub field_delimiter: String,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvroSerialization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

payload_family! {
    /// How events of an input are encoded
    pub enum Serialization("StreamAnalyticsSerialization", "type") {
        Json(JsonSerialization) = "Json",
        Csv(CsvSerialization) = "Csv",
        Avro(AvroSerialization) = "Avro",
    }
}

// ============================================================================
// Stream data sources
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHubStreamInputDataSource {
    pub properties: EventHubDataSourceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHubDataSourceProperties {
    pub service_bus_namespace: String,
    pub event_hub_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_access_policy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_access_policy_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_mode: Option<AuthenticationMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoTHubStreamInputDataSource {
    pub properties: IoTHubDataSourceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoTHubDataSourceProperties {
    pub iot_hub_namespace: String,
    pub shared_access_policy_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_access_policy_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobStreamInputDataSource {
    pub properties: BlobDataSourceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobDataSourceProperties {
    pub storage_accounts: Vec<StorageAccount>,
    pub container: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_partition_count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    pub account_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_key: Option<String>,
}

payload_family! {
    /// Where a stream input reads from
    pub enum StreamInputDataSource("StreamAnalyticsStreamInputDataSource", "type") {
        EventHub(EventHubStreamInputDataSource) = "Microsoft.ServiceBus/EventHub",
        IoTHub(IoTHubStreamInputDataSource) = "Microsoft.Devices/IotHubs",
        Blob(BlobStreamInputDataSource) = "Microsoft.Storage/Blob",
    }
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInputProperties {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional")]
    pub datasource: Option<StreamInputDataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional")]
    pub serialization: Option<Serialization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceInputProperties {
    /// Reference data sources are passed through untyped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional")]
    pub serialization: Option<Serialization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

payload_family! {
    /// The `properties` of a streaming job input
    pub enum InputProperties("StreamAnalyticsInput", "type") {
        Stream(StreamInputProperties) = "Stream",
        Reference(ReferenceInputProperties) = "Reference",
    }
}

/// A streaming job input resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional")]
    pub properties: Option<InputProperties>,
}
