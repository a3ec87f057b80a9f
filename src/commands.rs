//! Command Handlers
//!
//! One function per subcommand. Offline commands (`types`, `id`, `payload`)
//! never build a client; the rest resolve settings and credentials first.

use crate::{Command, ConfigCommand, IdCommand, OutputFormat, PayloadCommand};
use anyhow::{anyhow, bail, Context, Result};
use armctl::config::{validate_subscription, Config, Overrides, Settings};
use armctl::models::{self, DecodedPayload};
use armctl::resource::schema::{
    expand_tags, flatten_tags, normalize_location, parse_tag_pairs, validate_tags,
};
use armctl::resource::{ResourceDef, ResourceHandler, ServiceRegistry};
use armctl::resourceids::{validate_resource_id, ResourceId};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const SUBSCRIPTION_SEGMENT: &str = "subscriptionId";

pub async fn run(
    command: Command,
    output: OutputFormat,
    config: &Config,
    overrides: &Overrides,
    cancel: &CancellationToken,
) -> Result<()> {
    let registry = ServiceRegistry::embedded().context("Failed to load resource definitions")?;

    match command {
        Command::Types => print_output(output, &describe_types(&registry)),
        Command::Id(id) => run_id(id, output, &registry, config, overrides),
        Command::Payload(PayloadCommand::Decode {
            family,
            file,
            pointer,
        }) => {
            let document = read_json(&file)?;
            let decoded = decode_at(&family, &document, &pointer)?;
            print_output(output, &decoded)
        }
        Command::Payload(PayloadCommand::Families) => print_output(output, &models::FAMILIES),
        Command::Get {
            id,
            resource_type,
            decode,
        } => {
            let settings = config.resolve(overrides)?;
            let def = resolve_def(&registry, resource_type.as_deref(), &id)?;
            let client = settings.client()?;
            let handler = ResourceHandler::new(def, &client);

            let Some(body) = handler.read(&id, cancel).await? else {
                bail!("{} {} was not found", def.display_name, id);
            };

            if decode {
                print_output(output, &with_payload(def, body)?)
            } else {
                print_output(output, &body)
            }
        }
        Command::List {
            resource_type,
            parents,
        } => {
            let settings = config.resolve(overrides)?;
            let def = registry
                .get(&resource_type)
                .ok_or_else(|| unknown_type(&registry, &resource_type))?;
            let parents = collection_parents(def, &parents, &settings)?;
            let client = settings.client()?;

            let parents: HashMap<&str, &str> = parents
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let items = ResourceHandler::new(def, &client).list(&parents, cancel).await?;
            tracing::info!("Listed {} {} resources", items.len(), def.display_name);
            print_output(output, &items)
        }
        Command::Create {
            id,
            body,
            resource_type,
            location,
            tags,
        } => {
            let settings = config.resolve(overrides)?;
            let def = resolve_def(&registry, resource_type.as_deref(), &id)?;
            let mut request = read_json(&body)?;
            prepare_body(&mut request, location.as_deref(), &tags)?;
            check_payload(def, &request)?;

            let client = settings.client()?;
            let created = ResourceHandler::new(def, &client)
                .create(&id, &request, cancel)
                .await?;
            print_output(output, &created.unwrap_or(Value::Null))
        }
        Command::Update {
            id,
            body,
            resource_type,
            tags,
        } => {
            let settings = config.resolve(overrides)?;
            let def = resolve_def(&registry, resource_type.as_deref(), &id)?;
            let mut request = read_json(&body)?;
            prepare_body(&mut request, None, &tags)?;
            check_payload(def, &request)?;

            let client = settings.client()?;
            let updated = ResourceHandler::new(def, &client)
                .update(&id, &request, cancel)
                .await?;
            print_output(output, &updated.unwrap_or(Value::Null))
        }
        Command::Delete { id, resource_type } => {
            let settings = config.resolve(overrides)?;
            let def = resolve_def(&registry, resource_type.as_deref(), &id)?;
            let client = settings.client()?;
            ResourceHandler::new(def, &client).delete(&id, cancel).await?;
            eprintln!("Deleted {} {}", def.display_name, id);
            Ok(())
        }
        Command::Config(command) => run_config(command, output, config),
    }
}

// =============================================================================
// Resource IDs
// =============================================================================

#[derive(Debug, Serialize)]
struct TypeRow<'a> {
    key: &'a str,
    display_name: &'a str,
    api_version: &'a str,
    template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_family: Option<&'a str>,
}

fn describe_types(registry: &ServiceRegistry) -> Vec<TypeRow<'_>> {
    registry
        .iter()
        .map(|def| TypeRow {
            key: &def.key,
            display_name: &def.display_name,
            api_version: &def.api_version,
            template: def.id_type.template(),
            payload_family: def.payload.as_ref().map(|p| p.family.as_str()),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct ParsedId {
    resource_type: String,
    display_name: String,
    id: String,
    values: BTreeMap<String, String>,
}

impl ParsedId {
    fn new(def: &ResourceDef, id: &ResourceId) -> Self {
        Self {
            resource_type: def.key.clone(),
            display_name: def.display_name.clone(),
            id: id.id(),
            values: id
                .named_values()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

fn run_id(
    command: IdCommand,
    output: OutputFormat,
    registry: &ServiceRegistry,
    config: &Config,
    overrides: &Overrides,
) -> Result<()> {
    match command {
        IdCommand::Format {
            resource_type,
            values,
        } => {
            let def = registry
                .get(&resource_type)
                .ok_or_else(|| unknown_type(registry, &resource_type))?;
            let mut values = parse_assignments(&values)?;
            if wants_subscription(def) && !values.contains_key(SUBSCRIPTION_SEGMENT) {
                if let Some(subscription) = config.resolve(overrides)?.subscription_id {
                    values.insert(SUBSCRIPTION_SEGMENT.to_string(), subscription);
                }
            }

            let values: HashMap<&str, &str> = values
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let candidate = ResourceId::from_values(Arc::clone(&def.id_type), &values);
            let id = def.parse_id(&candidate.id())?;
            print_output(output, &ParsedId::new(def, &id))
        }
        IdCommand::Parse {
            id,
            resource_type,
            insensitive,
        } => {
            let (def, parsed) = match resource_type {
                Some(key) => {
                    let def = registry.get(&key).ok_or_else(|| unknown_type(registry, &key))?;
                    let parsed = if insensitive {
                        ResourceId::parse_insensitively(&def.id_type, &id)?
                    } else {
                        def.parse_id(&id)?
                    };
                    (def, parsed)
                }
                None => registry
                    .resolve(&id)
                    .ok_or_else(|| anyhow!("{:?} does not match any known resource type", id))?,
            };
            print_output(output, &ParsedId::new(def, &parsed))
        }
        IdCommand::Validate { resource_type, id } => {
            let def = registry
                .get(&resource_type)
                .ok_or_else(|| unknown_type(registry, &resource_type))?;
            let (warnings, errors) = validate_resource_id(&def.id_type, &Value::String(id), "id");
            for warning in &warnings {
                eprintln!("warning: {}", warning);
            }
            if let Some(first) = errors.into_iter().next() {
                return Err(first.into());
            }
            eprintln!("valid {} ID", def.display_name);
            Ok(())
        }
    }
}

fn resolve_def<'r>(
    registry: &'r ServiceRegistry,
    resource_type: Option<&str>,
    id: &str,
) -> Result<&'r ResourceDef> {
    match resource_type {
        Some(key) => registry.get(key).ok_or_else(|| unknown_type(registry, key)),
        None => registry
            .resolve(id)
            .map(|(def, _)| def)
            .ok_or_else(|| anyhow!("{:?} does not match any known resource type; pass --type", id)),
    }
}

fn unknown_type(registry: &ServiceRegistry, key: &str) -> anyhow::Error {
    anyhow!(
        "Unknown resource type {:?}. Known types: {}",
        key,
        registry.keys().join(", ")
    )
}

fn wants_subscription(def: &ResourceDef) -> bool {
    def.id_type.segment(SUBSCRIPTION_SEGMENT).is_some()
}

/// Parent values for a list call, defaulting the subscription
fn collection_parents(
    def: &ResourceDef,
    parents: &[String],
    settings: &Settings,
) -> Result<BTreeMap<String, String>> {
    let mut values = parse_assignments(parents)?;
    if wants_subscription(def) && !values.contains_key(SUBSCRIPTION_SEGMENT) {
        values.insert(
            SUBSCRIPTION_SEGMENT.to_string(),
            settings.require_subscription()?.to_string(),
        );
    }
    Ok(values)
}

/// Parse `name=value` arguments
fn parse_assignments(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
            _ => Err(anyhow!("{:?} must be written as name=value", pair)),
        })
        .collect()
}

// =============================================================================
// Payloads and request bodies
// =============================================================================

fn decode_at(family: &str, document: &Value, pointer: &str) -> Result<DecodedPayload> {
    let value = document
        .pointer(pointer)
        .cloned()
        .ok_or_else(|| anyhow!("Nothing found at JSON pointer {:?}", pointer))?;
    models::decode_payload(family, value)?
        .ok_or_else(|| anyhow!("The payload has no discriminator for family {}", family))
}

#[derive(Debug, Serialize)]
struct ResourceWithPayload {
    resource: Value,
    payload: Option<DecodedPayload>,
}

fn with_payload(def: &ResourceDef, resource: Value) -> Result<ResourceWithPayload> {
    let payload = match &def.payload {
        Some(payload) => match resource.pointer(&payload.pointer) {
            Some(value) => models::decode_payload(&payload.family, value.clone())?,
            None => None,
        },
        None => None,
    };
    Ok(ResourceWithPayload { resource, payload })
}

/// Fail early on a request whose payload would not survive encoding
fn check_payload(def: &ResourceDef, request: &Value) -> Result<()> {
    let Some(payload) = &def.payload else {
        return Ok(());
    };
    let Some(value) = request.pointer(&payload.pointer) else {
        return Ok(());
    };

    match models::decode_payload(&payload.family, value.clone())
        .with_context(|| format!("Invalid {} payload", payload.family))?
    {
        Some(decoded) if decoded.known && !decoded.sendable => {
            bail!(
                "{} {:?} holds a nested payload that is not modelled and cannot be sent",
                payload.family,
                decoded.tag
            );
        }
        Some(decoded) if !decoded.known => {
            tracing::warn!(
                "{} {:?} is not a modelled variant, sending as-is",
                decoded.discriminator,
                decoded.tag
            );
        }
        Some(decoded) => tracing::debug!("Request payload is a {}", decoded.tag),
        None => tracing::debug!("Request carries no {} discriminator", payload.family),
    }
    Ok(())
}

/// Apply `--location` and `--tag` to a request body
fn prepare_body(body: &mut Value, location: Option<&str>, tags: &[String]) -> Result<()> {
    let Value::Object(map) = body else {
        bail!("The request body must be a JSON object");
    };

    if let Some(location) = location {
        map.insert("location".to_string(), Value::String(normalize_location(location)));
    }

    if !tags.is_empty() {
        let mut merged = flatten_tags(map.get("tags"));
        merged.extend(parse_tag_pairs(tags.iter().map(String::as_str)).map_err(|e| anyhow!(e))?);
        map.insert("tags".to_string(), expand_tags(&merged));
    }

    let errors = validate_tags(&flatten_tags(map.get("tags")));
    if !errors.is_empty() {
        bail!("Invalid tags: {}", errors.join("; "));
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read standard input")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
    };

    serde_json::from_str(&content).with_context(|| format!("{:?} is not valid JSON", path))
}

// =============================================================================
// Configuration and output
// =============================================================================

fn run_config(command: ConfigCommand, output: OutputFormat, config: &Config) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let mut shown = Map::new();
            shown.insert(
                "path".to_string(),
                Config::config_path()
                    .map(|p| Value::String(p.display().to_string()))
                    .unwrap_or(Value::Null),
            );
            shown.insert("config".to_string(), serde_json::to_value(config)?);
            print_output(output, &Value::Object(shown))
        }
        ConfigCommand::Set {
            subscription,
            tenant,
            client_id,
            endpoint,
            poll_interval,
        } => {
            let mut updated = config.clone();
            if let Some(subscription) = subscription {
                updated.subscription_id = Some(validate_subscription(&subscription)?);
            }
            if tenant.is_some() {
                updated.tenant_id = tenant;
            }
            if client_id.is_some() {
                updated.client_id = client_id;
            }
            if let Some(endpoint) = endpoint {
                url::Url::parse(&endpoint)
                    .with_context(|| format!("Invalid endpoint {:?}", endpoint))?;
                updated.endpoint = Some(endpoint);
            }
            if poll_interval.is_some() {
                updated.poll_interval_secs = poll_interval;
            }
            updated.save()
        }
    }
}

fn render<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

fn print_output<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> Result<()> {
    let rendered = render(format, value)?;
    println!("{}", rendered.trim_end());
    Ok(())
}
