//! Resource Registry - Load resource definitions from JSON
//!
//! Every resource type this tool manages is described by an embedded JSON
//! definition: its API version, ID template and how it is updated. The
//! [`ServiceRegistry`] is built once at startup and passed by reference.

use crate::models;
use crate::resourceids::{ParseError, ResourceId, ResourceIdType, TemplateError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[(&str, &str)] = &[
    ("cache.json", include_str!("../resources/cache.json")),
    ("datamigration.json", include_str!("../resources/datamigration.json")),
    ("insights.json", include_str!("../resources/insights.json")),
    ("kubernetes.json", include_str!("../resources/kubernetes.json")),
    ("network.json", include_str!("../resources/network.json")),
    ("recoveryservices.json", include_str!("../resources/recoveryservices.json")),
    ("signalr.json", include_str!("../resources/signalr.json")),
    ("storage.json", include_str!("../resources/storage.json")),
    ("streamanalytics.json", include_str!("../resources/streamanalytics.json")),
    ("timeseriesinsights.json", include_str!("../resources/timeseriesinsights.json")),
];

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("parsing resource definitions in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resource {key:?}: {source}")]
    Template {
        key: String,
        #[source]
        source: TemplateError,
    },

    #[error("resource {key:?} is defined in both {first} and {second}")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },

    #[error("resource {key:?} refers to unknown payload family {family:?}")]
    UnknownFamily { key: String, family: String },
}

/// HTTP method used to update an existing resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateMethod {
    #[default]
    Put,
    Patch,
}

impl UpdateMethod {
    pub fn as_method(&self) -> reqwest::Method {
        match self {
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Where a resource body carries a discriminated payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayloadDef {
    pub family: String,
    /// JSON pointer to the payload within the resource body; empty for the root
    #[serde(default)]
    pub pointer: String,
}

/// Resource definition as written in resources/*.json
#[derive(Debug, Clone, Deserialize)]
struct ResourceDefFile {
    display_name: String,
    api_version: String,
    id_template: String,
    #[serde(default)]
    update_method: UpdateMethod,
    #[serde(default)]
    long_running: bool,
    #[serde(default)]
    payload: Option<PayloadDef>,
}

/// Root structure of resources/*.json
#[derive(Debug, Deserialize)]
struct ResourceConfig {
    #[serde(default)]
    resources: BTreeMap<String, ResourceDefFile>,
}

/// A validated resource definition
#[derive(Debug, Clone)]
pub struct ResourceDef {
    pub key: String,
    pub display_name: String,
    pub api_version: String,
    pub id_type: Arc<ResourceIdType>,
    pub update_method: UpdateMethod,
    pub long_running: bool,
    pub payload: Option<PayloadDef>,
}

impl ResourceDef {
    /// Parse an ID of this resource type strictly
    pub fn parse_id(&self, input: &str) -> Result<ResourceId, ParseError> {
        ResourceId::parse(&self.id_type, input)
    }

    /// Path of the collection that lists resources of this type under the
    /// given parent values. Every value segment but the last must be set.
    pub fn collection_path(&self, parents: &HashMap<&str, &str>) -> Result<String, ParseError> {
        // Fill the leaf with a placeholder so the strict parser reports any
        // missing parent by name
        let leaf = self
            .id_type
            .value_segment_names()
            .last()
            .map(|name| name.to_string())
            .unwrap_or_default();
        let mut values = parents.clone();
        values.insert(leaf.as_str(), "_");

        let candidate = ResourceId::from_values(Arc::clone(&self.id_type), &values);
        let parsed = ResourceId::parse(&self.id_type, &candidate.id())?;
        Ok(parsed.collection_path())
    }
}

/// Registry of resource definitions keyed by name
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    resources: BTreeMap<String, ResourceDef>,
}

impl ServiceRegistry {
    /// Build the registry from the definitions compiled into the binary
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_sources(RESOURCE_FILES)
    }

    /// Build a registry from `(file name, JSON)` pairs
    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self, RegistryError> {
        let mut resources: BTreeMap<String, ResourceDef> = BTreeMap::new();
        let mut origins: HashMap<String, String> = HashMap::new();

        for (file, content) in sources {
            let partial: ResourceConfig =
                serde_json::from_str(content).map_err(|source| RegistryError::Json {
                    file: file.to_string(),
                    source,
                })?;

            for (key, def) in partial.resources {
                if let Some(first) = origins.get(&key) {
                    return Err(RegistryError::DuplicateKey {
                        key,
                        first: first.clone(),
                        second: file.to_string(),
                    });
                }

                let id_type = ResourceIdType::from_template(&def.display_name, &def.id_template)
                    .map_err(|source| RegistryError::Template {
                        key: key.clone(),
                        source,
                    })?;

                if let Some(payload) = &def.payload {
                    if !models::is_family(&payload.family) {
                        return Err(RegistryError::UnknownFamily {
                            key,
                            family: payload.family.clone(),
                        });
                    }
                }

                origins.insert(key.clone(), file.to_string());
                resources.insert(
                    key.clone(),
                    ResourceDef {
                        key,
                        display_name: def.display_name,
                        api_version: def.api_version,
                        id_type: Arc::new(id_type),
                        update_method: def.update_method,
                        long_running: def.long_running,
                        payload: def.payload,
                    },
                );
            }
        }

        tracing::debug!("Loaded {} resource definitions", resources.len());
        Ok(Self { resources })
    }

    /// Get a resource definition by key
    pub fn get(&self, key: &str) -> Option<&ResourceDef> {
        self.resources.get(key)
    }

    /// All resource keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        self.resources.keys().map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDef> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Find the definition an ID string belongs to by parsing it strictly
    /// against each template
    pub fn resolve(&self, input: &str) -> Option<(&ResourceDef, ResourceId)> {
        self.resources
            .values()
            .find_map(|def| def.parse_id(input).ok().map(|id| (def, id)))
    }

    /// Collection path for `key` under the given parent values
    pub fn collection_path(
        &self,
        key: &str,
        parents: &HashMap<&str, &str>,
    ) -> Option<Result<String, ParseError>> {
        self.get(key).map(|def| def.collection_path(parents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        cache, datamigration, insights, kubernetesconfiguration, network, recoveryservices,
        signalr, storage, streamanalytics, timeseriesinsights,
    };
    use crate::resourceids::TypedResourceId;

    fn registry() -> ServiceRegistry {
        ServiceRegistry::embedded().unwrap()
    }

    #[test]
    fn test_registry_loads_successfully() {
        let registry = registry();
        assert!(!registry.is_empty(), "Registry should have resources");
        for key in [
            "data-migration-services",
            "data-migration-projects",
            "application-insights-web-tests",
            "monitor-action-groups",
            "arc-kubernetes-clusters",
            "arc-kubernetes-flux-configurations",
            "virtual-wans",
            "redis-caches",
            "signalr-services",
            "storage-containers",
            "stream-analytics-inputs",
            "iot-time-series-insights-environments",
            "iot-time-series-insights-event-sources",
        ] {
            assert!(registry.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_templates_match_typed_ids() {
        let registry = registry();
        let typed = [
            ("redis-caches", cache::RedisId::id_type()),
            ("data-migration-services", datamigration::ServiceId::id_type()),
            ("data-migration-projects", datamigration::ProjectId::id_type()),
            ("application-insights-web-tests", insights::WebTestId::id_type()),
            ("monitor-action-groups", insights::ActionGroupId::id_type()),
            ("arc-kubernetes-clusters", kubernetesconfiguration::ConnectedClusterId::id_type()),
            (
                "arc-kubernetes-flux-configurations",
                kubernetesconfiguration::FluxConfigurationId::id_type(),
            ),
            ("virtual-wans", network::VirtualWanId::id_type()),
            (
                "site-recovery-replicated-vms",
                recoveryservices::ReplicationProtectedItemId::id_type(),
            ),
            ("signalr-services", signalr::SignalRId::id_type()),
            ("storage-containers", storage::StorageContainerId::id_type()),
            ("stream-analytics-inputs", streamanalytics::InputId::id_type()),
            (
                "iot-time-series-insights-environments",
                timeseriesinsights::EnvironmentId::id_type(),
            ),
            (
                "iot-time-series-insights-event-sources",
                timeseriesinsights::EventSourceId::id_type(),
            ),
        ];

        for (key, id_type) in typed {
            let def = registry.get(key).unwrap();
            assert_eq!(def.id_type.template(), id_type.template(), "{}", key);
            assert_eq!(def.id_type.name(), id_type.name(), "{}", key);
        }
    }

    #[test]
    fn test_api_versions_match_models() {
        let registry = registry();
        assert_eq!(registry.get("redis-caches").unwrap().api_version, cache::API_VERSION);
        assert_eq!(
            registry.get("stream-analytics-inputs").unwrap().api_version,
            streamanalytics::API_VERSION
        );
        assert_eq!(
            registry.get("arc-kubernetes-flux-configurations").unwrap().api_version,
            kubernetesconfiguration::API_VERSION
        );
    }

    #[test]
    fn test_resolve_picks_matching_definition() {
        let registry = registry();
        let (def, id) = registry
            .resolve(
                "/subscriptions/s/resourceGroups/rg/providers/Microsoft.DataMigration/services/dms/projects/p1",
            )
            .unwrap();
        assert_eq!(def.key, "data-migration-projects");
        assert_eq!(id.get("projectName"), Some("p1"));

        let cluster = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Kubernetes/connectedClusters/arc1";
        let flux = format!(
            "{}/providers/Microsoft.KubernetesConfiguration/fluxConfigurations/f1",
            cluster
        );
        let (def, _) = registry.resolve(&flux).unwrap();
        assert_eq!(def.key, "arc-kubernetes-flux-configurations");

        assert!(registry.resolve("/subscriptions/s/resourceGroups/rg").is_none());
    }

    #[test]
    fn test_collection_path() {
        let registry = registry();
        let parents = HashMap::from([
            ("subscriptionId", "s"),
            ("resourceGroupName", "rg"),
            ("streamingJobName", "job"),
        ]);
        assert_eq!(
            registry
                .collection_path("stream-analytics-inputs", &parents)
                .unwrap()
                .unwrap(),
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.StreamAnalytics/streamingJobs/job/inputs"
        );
    }

    #[test]
    fn test_collection_path_names_missing_parent() {
        let registry = registry();
        let parents = HashMap::from([("subscriptionId", "s"), ("resourceGroupName", "rg")]);
        let err = registry
            .collection_path("stream-analytics-inputs", &parents)
            .unwrap()
            .unwrap_err();
        assert_eq!(err.segment(), Some("streamingJobName"));
    }

    #[test]
    fn test_update_methods() {
        let registry = registry();
        assert_eq!(registry.get("redis-caches").unwrap().update_method, UpdateMethod::Patch);
        assert_eq!(registry.get("virtual-wans").unwrap().update_method, UpdateMethod::Put);
    }

    #[test]
    fn test_invalid_definitions_are_rejected() {
        let bad_template = r#"{"resources": {"x": {"display_name": "X", "api_version": "1", "id_template": "no-slash"}}}"#;
        assert!(matches!(
            ServiceRegistry::from_sources(&[("bad.json", bad_template)]),
            Err(RegistryError::Template { .. })
        ));

        let bad_family = r#"{"resources": {"x": {"display_name": "X", "api_version": "1", "id_template": "/x/{xName}", "payload": {"family": "Nope"}}}}"#;
        assert!(matches!(
            ServiceRegistry::from_sources(&[("bad.json", bad_family)]),
            Err(RegistryError::UnknownFamily { .. })
        ));

        let one = r#"{"resources": {"x": {"display_name": "X", "api_version": "1", "id_template": "/x/{xName}"}}}"#;
        assert!(matches!(
            ServiceRegistry::from_sources(&[("a.json", one), ("b.json", one)]),
            Err(RegistryError::DuplicateKey { .. })
        ));

        assert!(matches!(
            ServiceRegistry::from_sources(&[("broken.json", "{")]),
            Err(RegistryError::Json { .. })
        ));
    }
}
