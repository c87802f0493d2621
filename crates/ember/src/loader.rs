//! # Data Files — Schemas and Entity Definitions
//!
//! Two JSON formats feed the world at startup.
//!
//! ## Schema files
//!
//! One component type per file. Field order follows the file.
//!
//! ```json
//! {
//!   "name": "Health",
//!   "fields": {
//!     "current": "int",
//!     "max": { "kind": "int", "default": 100 }
//!   }
//! }
//! ```
//!
//! An optional `seed_from` block gives the type a
//! [`ConstructionHook::SeedFrom`]:
//!
//! ```json
//! "seed_from": { "component": "Position", "fields": { "x": "x", "y": "y" } }
//! ```
//!
//! ## Entity definition files
//!
//! ```json
//! {
//!   "name": "Player",
//!   "components": {
//!     "Position": { "x": 640, "y": 360 },
//!     "Renderable": { "shape_type": "Rectangle", "width": 100, "height": 100 }
//!   }
//! }
//! ```
//!
//! ## Failure isolation
//!
//! Directory loaders never stop at a bad file. Each file either loads fully or
//! is reported as a [`LoadError`] in the returned report, and nothing it
//! contained reaches the registry or the world.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::ecs::schema::json_type_name;
use crate::ecs::{ComponentType, ConstructionHook, FieldKind, SpawnReport, Value};
use crate::error::LoadError;

// ── Schema files ────────────────────────────────────────────────────────

/// The on-disk form of one component type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    pub name: String,
    /// Field name → kind, or → `{ "kind": ..., "default": ... }`.
    #[serde(default)]
    pub fields: Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_from: Option<SeedSpec>,
}

/// The on-disk form of a [`ConstructionHook::SeedFrom`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSpec {
    pub component: String,
    /// Target field → source field.
    pub fields: Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSpec {
    Kind(FieldKind),
    Full {
        kind: FieldKind,
        #[serde(default)]
        default: Option<serde_json::Value>,
    },
}

impl SchemaFile {
    /// Validate and convert into a [`ComponentType`]. `path` is only used for
    /// error reporting.
    pub fn into_component_type(self, path: &Path) -> Result<ComponentType, LoadError> {
        let invalid = |message: String| LoadError::InvalidSchema {
            path: path.to_path_buf(),
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("component name is empty".to_string()));
        }

        let mut ty = ComponentType::new(self.name.clone());
        for (field, spec) in self.fields {
            let spec: FieldSpec = serde_json::from_value(spec).map_err(|_| {
                invalid(format!(
                    "field `{field}` has an unknown kind (expected int, float, string or bool)"
                ))
            })?;
            ty = match spec {
                FieldSpec::Kind(kind) | FieldSpec::Full { kind, default: None } => {
                    ty.field(field, kind)
                }
                FieldSpec::Full {
                    kind,
                    default: Some(json),
                } => {
                    let default = Value::from_json(kind, &json).ok_or_else(|| {
                        invalid(format!(
                            "default for `{field}` must be {kind}, got {}",
                            json_type_name(&json)
                        ))
                    })?;
                    ty.field_with_default(field, default)
                }
            };
        }

        if let Some(seed) = self.seed_from {
            let mut pairs = Vec::with_capacity(seed.fields.len());
            for (target, source) in seed.fields {
                let Some(source) = source.as_str() else {
                    return Err(invalid(format!(
                        "seed_from source for `{target}` must be a field name"
                    )));
                };
                if ty.field_index(&target).is_none() {
                    return Err(invalid(format!("seed_from targets unknown field `{target}`")));
                }
                pairs.push((target, source.to_string()));
            }
            ty = ty.with_hook(ConstructionHook::SeedFrom {
                source: seed.component,
                fields: pairs,
            });
        }

        Ok(ty)
    }
}

/// Read and validate one schema file.
pub fn read_schema_file(path: impl AsRef<Path>) -> Result<ComponentType, LoadError> {
    let path = path.as_ref();
    let file: SchemaFile = read_json(path)?;
    file.into_component_type(path)
}

/// Read every `*.json` schema in a directory.
///
/// Returns the types that loaded and the per-file failures. Only an
/// unreadable directory is an error. Files are read in path order, but
/// callers shouldn't depend on it.
pub fn read_schema_dir(
    dir: impl AsRef<Path>,
) -> Result<(Vec<ComponentType>, Vec<LoadError>), LoadError> {
    let mut types = Vec::new();
    let mut failures = Vec::new();
    for path in json_files_in(dir.as_ref())? {
        match read_schema_file(&path) {
            Ok(ty) => types.push(ty),
            Err(e) => {
                log::warn!("Skipping schema file: {e}");
                failures.push(e);
            }
        }
    }
    Ok((types, failures))
}

/// Read a schema directory and hand every loaded type to `register`.
pub(crate) fn register_schema_dir(
    dir: impl AsRef<Path>,
    mut register: impl FnMut(ComponentType),
) -> Result<SchemaLoadReport, LoadError> {
    let (types, failures) = read_schema_dir(dir)?;
    let mut report = SchemaLoadReport {
        registered: Vec::with_capacity(types.len()),
        failures,
    };
    for ty in types {
        report.registered.push(ty.name().to_string());
        register(ty);
    }
    log::info!(
        "Registered {} component schema(s), {} failed",
        report.registered.len(),
        report.failures.len()
    );
    Ok(report)
}

/// Outcome of loading a schema directory into a registry.
#[derive(Debug, Default)]
pub struct SchemaLoadReport {
    /// Names of the types registered, in load order.
    pub registered: Vec<String>,
    /// Files that could not be loaded.
    pub failures: Vec<LoadError>,
}

// ── Entity definitions ──────────────────────────────────────────────────

/// A named list of components to build one entity from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    #[serde(default = "unnamed")]
    pub name: String,
    /// Component type name → field values, in file order.
    #[serde(default)]
    pub components: Map<String, serde_json::Value>,
}

fn unnamed() -> String {
    "Unnamed".to_string()
}

impl EntityDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Map::new(),
        }
    }

    /// Append a component entry (builder style).
    pub fn with(mut self, component: impl Into<String>, data: serde_json::Value) -> Self {
        self.components.insert(component.into(), data);
        self
    }
}

/// Read one entity definition file.
pub fn read_entity_definition(path: impl AsRef<Path>) -> Result<EntityDefinition, LoadError> {
    read_json(path.as_ref())
}

/// Outcome of loading an entity directory into a world.
#[derive(Debug, Default)]
pub struct EntityLoadReport {
    pub spawned: Vec<SpawnReport>,
    pub failures: Vec<LoadError>,
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read a JSON file into `T`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// All `*.json` files directly inside `dir`, sorted by path so entity ids
/// come out the same on every run.
pub(crate) fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
