//! # Component Instances
//!
//! A [`Component`] is a record: the name of its type plus one [`Value`] per
//! schema field, in schema order. It is what stores hold and what queries
//! hand out.
//!
//! ## Static components
//!
//! Compiled-in types implement [`StaticComponent`]. They describe their own
//! schema and convert to and from the record form through `serde_json`, the
//! same trick a scene registry uses to push typed components through a
//! type-erased path. After conversion a static component is just another
//! record, so storage and queries treat both sources identically.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::schema::ComponentType;
use super::value::{FieldKind, Value};
use crate::error::ComponentError;

/// A component instance: a typed record conforming to a [`ComponentType`].
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl Component {
    /// Assemble an instance from already-validated parts. Use
    /// [`ComponentType::instantiate`] to build one from untrusted data.
    pub(crate) fn from_parts(type_name: String, fields: Vec<(String, Value)>) -> Self {
        Self { type_name, fields }
    }

    /// Name of the component type this instance belongs to. This is the key
    /// of the store it lands in.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == field).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.iter_mut().find(|(n, _)| n == field).map(|(_, v)| v)
    }

    /// Numeric field read; ints widen to `f64`.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Overwrite a field, keeping its kind.
    ///
    /// Returns `false` (and changes nothing) if the field doesn't exist or the
    /// value's kind doesn't fit. An int may be written to a float field.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> bool {
        let Some(slot) = self.get_mut(field) else {
            return false;
        };
        let value = match (slot.kind(), value.into()) {
            (FieldKind::Float, Value::Int(i)) => Value::Float(i as f64),
            (kind, v) if v.kind() == kind => v,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Iterate `(field name, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The record as a JSON object, fields in schema order.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(n, v)| (n.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Convert a typed value into its record form.
    pub fn from_static<T: StaticComponent>(value: &T) -> Result<Self, ComponentError> {
        let json = serde_json::to_value(value).map_err(|e| ComponentError::Conversion {
            component: T::NAME.to_string(),
            message: e.to_string(),
        })?;
        T::component_type().instantiate(&json)
    }

    /// Convert the record back into a typed value.
    pub fn to_static<T: StaticComponent>(&self) -> Result<T, ComponentError> {
        if self.type_name != T::NAME {
            return Err(ComponentError::Conversion {
                component: T::NAME.to_string(),
                message: format!("instance belongs to `{}`", self.type_name),
            });
        }
        // Field-less records are unit structs on the Rust side.
        let json = if self.fields.is_empty() {
            serde_json::Value::Null
        } else {
            self.to_json()
        };
        serde_json::from_value(json).map_err(|e| ComponentError::Conversion {
            component: T::NAME.to_string(),
            message: e.to_string(),
        })
    }
}

/// A component type whose shape is fixed at compile time.
///
/// # Example
///
/// ```
/// use ember::ecs::{ComponentType, FieldKind, StaticComponent};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Score {
///     points: i64,
/// }
///
/// impl StaticComponent for Score {
///     const NAME: &'static str = "Score";
///
///     fn component_type() -> ComponentType {
///         ComponentType::new(Self::NAME).field("points", FieldKind::Int)
///     }
/// }
/// ```
pub trait StaticComponent: Serialize + DeserializeOwned + 'static {
    /// Registry name of the type.
    const NAME: &'static str;

    /// The schema instances of this type conform to. Field names must match
    /// the serde field names.
    fn component_type() -> ComponentType;
}
