//! Core entities: variables, values, collections and modes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive kind of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedType {
    Boolean,
    Float,
    String,
    Color,
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolvedType::Boolean => "BOOLEAN",
            ResolvedType::Float => "FLOAT",
            ResolvedType::String => "STRING",
            ResolvedType::Color => "COLOR",
        };
        f.write_str(s)
    }
}

/// RGBA colour, every channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

/// Marker carried by alias values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}

/// Reference to another variable instead of a literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAlias {
    #[serde(rename = "type")]
    pub kind: AliasKind,
    pub id: String,
}

/// Value of a variable under one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Alias(VariableAlias),
    Color(Rgba),
    Boolean(bool),
    Float(f64),
    String(String),
}

impl VariableValue {
    pub fn alias(id: impl Into<String>) -> Self {
        VariableValue::Alias(VariableAlias {
            kind: AliasKind::VariableAlias,
            id: id.into(),
        })
    }

    /// Whether the value may be stored on a variable of the given type.
    /// Aliases are accepted for every type.
    pub fn fits(&self, resolved_type: ResolvedType) -> bool {
        matches!(
            (self, resolved_type),
            (VariableValue::Alias(_), _)
                | (VariableValue::Boolean(_), ResolvedType::Boolean)
                | (VariableValue::Float(_), ResolvedType::Float)
                | (VariableValue::String(_), ResolvedType::String)
                | (VariableValue::Color(_), ResolvedType::Color)
        )
    }
}

/// A design variable as read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRecord {
    pub id: String,
    pub name: String,
    pub resolved_type: ResolvedType,
    #[serde(alias = "variableCollectionId")]
    pub collection_id: String,
    #[serde(default)]
    pub values_by_mode: BTreeMap<String, VariableValue>,
}

/// One mode of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeDescriptor {
    pub mode_id: String,
    pub name: String,
}

impl ModeDescriptor {
    pub fn new(mode_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            mode_id: mode_id.into(),
            name: name.into(),
        }
    }
}

/// A named container of variables with an ordered set of modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub modes: Vec<ModeDescriptor>,
    /// Member references, in store order
    #[serde(default)]
    pub variable_ids: Vec<String>,
}

impl Collection {
    pub fn summary(&self) -> CollectionSummary {
        CollectionSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            modes: self.modes.clone(),
            variable_count: self.variable_ids.len(),
        }
    }

    pub fn has_mode(&self, mode_id: &str) -> bool {
        self.modes.iter().any(|m| m.mode_id == mode_id)
    }
}

/// What the presentation layer sees of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
    pub modes: Vec<ModeDescriptor>,
    pub variable_count: usize,
}
