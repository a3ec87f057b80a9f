//! Data Migration
//!
//! Projects describe their source and target databases with a
//! `ConnectionInfo` discriminated on `type`.

use crate::payload::{arm_enum, optional, payload_family};
use crate::resourceids::typed_resource_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_VERSION: &str = "2021-06-30";

typed_resource_id! {
    /// A Database Migration Service instance
    pub struct ServiceId(
        "Service",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.DataMigration/services/{serviceName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        service_name => "serviceName",
    }
}

typed_resource_id! {
    /// A migration project within a service
    pub struct ProjectId(
        "Project",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.DataMigration/services/{serviceName}/projects/{projectName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        service_name => "serviceName",
        project_name => "projectName",
    }
}

impl ProjectId {
    pub fn service(&self) -> ServiceId {
        ServiceId::new(
            self.subscription_id.clone(),
            self.resource_group_name.clone(),
            self.service_name.clone(),
        )
    }
}

arm_enum! {
    pub enum ProjectSourcePlatform {
        Sql => "SQL",
        MySql => "MySQL",
        PostgreSql => "PostgreSql",
        MongoDb => "MongoDb",
        Unknown => "Unknown",
    }
}

arm_enum! {
    pub enum ProjectTargetPlatform {
        SqlDb => "SQLDB",
        SqlMi => "SQLMI",
        AzureDbForMySql => "AzureDbForMySql",
        AzureDbForPostgreSql => "AzureDbForPostgreSql",
        MongoDb => "MongoDb",
        Unknown => "Unknown",
    }
}

arm_enum! {
    pub enum AuthenticationType {
        None => "None",
        WindowsAuthentication => "WindowsAuthentication",
        SqlAuthentication => "SqlAuthentication",
        ActiveDirectoryIntegrated => "ActiveDirectoryIntegrated",
        ActiveDirectoryPassword => "ActiveDirectoryPassword",
    }
}

// ============================================================================
// Connection infos
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlConnectionInfo {
    pub data_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthenticationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypt_connection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_server_certificate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MySqlConnectionInfo {
    pub server_name: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostgreSqlConnectionInfo {
    pub server_name: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

payload_family! {
    /// Database connection details of a migration source or target
    pub enum ConnectionInfo("DataMigrationConnectionInfo", "type") {
        Sql(SqlConnectionInfo) = "SqlConnectionInfo",
        MySql(MySqlConnectionInfo) = "MySqlConnectionInfo",
        PostgreSql(PostgreSqlConnectionInfo) = "PostgreSqlConnectionInfo",
    }
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub properties: ProjectProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProperties {
    pub source_platform: ProjectSourcePlatform,
    pub target_platform: ProjectTargetPlatform,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional")]
    pub source_connection_info: Option<ConnectionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional")]
    pub target_connection_info: Option<ConnectionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}
