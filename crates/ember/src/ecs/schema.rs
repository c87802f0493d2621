//! # Component Types — Schemas as Data
//!
//! A [`ComponentType`] describes the shape of a component: its name, its
//! fields in declaration order, and an optional [`ConstructionHook`]. It plays
//! the role a Rust struct definition plays in a compile-time ECS, except that
//! it can be built at runtime from a schema file.
//!
//! ```text
//! ComponentType "Health"
//!   fields: [ current: int = 0, max: int = 100 ]
//!   hook:   None
//! ```
//!
//! Instances are built with [`ComponentType::instantiate`], which validates
//! supplied JSON data against the field list.

use serde_json::Map;

use super::component::Component;
use super::value::{FieldKind, Value};
use crate::error::ComponentError;

/// One field of a component type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    /// Used when the data for an instance omits this field.
    pub default: Value,
    /// Values the field may take. Empty means any value of `kind`.
    pub allowed: Vec<Value>,
}

/// A post-construction step applied when a component is built as part of an
/// entity definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConstructionHook {
    #[default]
    None,
    /// Copy fields from another component in the *same* definition into this
    /// one, once, at construction time. Fields given explicitly in the
    /// definition are left alone.
    SeedFrom {
        /// Name of the component type to read from.
        source: String,
        /// `(target field, source field)` pairs.
        fields: Vec<(String, String)>,
    },
}

/// The named, ordered shape that component instances conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentType {
    name: String,
    fields: Vec<FieldDef>,
    hook: ConstructionHook,
}

impl ComponentType {
    /// A type with no fields (a tag). Add fields with [`field`](Self::field).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            hook: ConstructionHook::None,
        }
    }

    /// Append a field that defaults to its kind's zero value.
    pub fn field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.field_with_default(name, kind.zero())
    }

    /// Append a field with an explicit default. The field's kind is the
    /// default's kind.
    pub fn field_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        let default = default.into();
        let name = name.into();
        let def = FieldDef {
            kind: default.kind(),
            name,
            default,
            allowed: Vec::new(),
        };
        match self.fields.iter_mut().find(|f| f.name == def.name) {
            Some(existing) => *existing = def,
            None => self.fields.push(def),
        }
        self
    }

    /// Restrict an already declared field to a fixed set of values.
    pub fn one_of<V: Into<Value>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        if let Some(def) = self.fields.iter_mut().find(|f| f.name == name) {
            def.allowed = values.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn with_hook(mut self, hook: ConstructionHook) -> Self {
        self.hook = hook;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn hook(&self) -> &ConstructionHook {
        &self.hook
    }

    /// Position of a field in declaration order.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `component` has exactly this type's field names and kinds, in
    /// order. Defaults and allowed values don't take part.
    pub fn conforms(&self, component: &Component) -> bool {
        component.type_name() == self.name
            && component.len() == self.fields.len()
            && component
                .fields()
                .zip(&self.fields)
                .all(|((name, value), def)| name == def.name && value.kind() == def.kind)
    }

    /// An instance holding every field's default.
    pub fn default_instance(&self) -> Component {
        Component::from_parts(
            self.name.clone(),
            self.fields
                .iter()
                .map(|f| (f.name.clone(), f.default.clone()))
                .collect(),
        )
    }

    /// Build an instance from a JSON object of field values.
    ///
    /// Missing fields take their defaults. Unknown fields are ignored with a
    /// warning. A value of the wrong kind fails the whole component. `null`
    /// is accepted as "no data" and yields the default instance.
    pub fn instantiate(&self, data: &serde_json::Value) -> Result<Component, ComponentError> {
        let empty = Map::new();
        let object = match data {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => &empty,
            other => {
                return Err(ComponentError::NotAnObject {
                    component: self.name.clone(),
                    found: json_type_name(other).to_string(),
                });
            }
        };

        for key in object.keys() {
            if self.field_index(key).is_none() {
                log::warn!("Component '{}' has no field '{}'; ignoring it.", self.name, key);
            }
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for def in &self.fields {
            let value = match object.get(&def.name) {
                None => def.default.clone(),
                Some(json) => Value::from_json(def.kind, json).ok_or_else(|| {
                    ComponentError::TypeMismatch {
                        component: self.name.clone(),
                        field: def.name.clone(),
                        expected: def.kind,
                        found: json_type_name(json).to_string(),
                    }
                })?,
            };
            if !def.allowed.is_empty() && !def.allowed.contains(&value) {
                return Err(ComponentError::UnknownValue {
                    component: self.name.clone(),
                    field: def.name.clone(),
                    value: value.to_string(),
                    allowed: def
                        .allowed
                        .iter()
                        .map(Value::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
            values.push((def.name.clone(), value));
        }

        Ok(Component::from_parts(self.name.clone(), values))
    }
}

pub(crate) fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "float",
        serde_json::Value::Number(_) => "int",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
