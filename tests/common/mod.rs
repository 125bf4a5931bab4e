//! Shared fixtures: a small store with three collections.
//!
//! - Primitives (`c1`): modes Light/Dark, five variables
//! - Semantic (`c2`): modes Light/Dark, one variable named `color/fg`
//! - Brand (`c3`): single mode Default, empty
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use vartree::domain::{
    Collection, ModeDescriptor, ResolvedType, Rgba, VariableRecord, VariableValue,
};
use vartree::infrastructure::traits::{InMemoryStore, StoreSnapshot, VariableStore};

pub const PRIMITIVES: &str = "c1";
pub const SEMANTIC: &str = "c2";
pub const BRAND: &str = "c3";

pub fn rgb(r: f64, g: f64, b: f64) -> VariableValue {
    VariableValue::Color(Rgba { r, g, b, a: 1.0 })
}

pub fn variable(
    id: &str,
    name: &str,
    collection_id: &str,
    resolved_type: ResolvedType,
    values: &[(&str, VariableValue)],
) -> VariableRecord {
    VariableRecord {
        id: id.to_string(),
        name: name.to_string(),
        resolved_type,
        collection_id: collection_id.to_string(),
        values_by_mode: values
            .iter()
            .map(|(mode, value)| (mode.to_string(), value.clone()))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// Bare variable for tree tests; only id and name matter.
pub fn named(id: &str, name: &str) -> VariableRecord {
    variable(id, name, PRIMITIVES, ResolvedType::Float, &[])
}

pub fn collection(id: &str, name: &str, modes: &[(&str, &str)], members: &[&str]) -> Collection {
    Collection {
        id: id.to_string(),
        name: name.to_string(),
        modes: modes
            .iter()
            .map(|(mode_id, name)| ModeDescriptor::new(*mode_id, *name))
            .collect(),
        variable_ids: members.iter().map(|m| m.to_string()).collect(),
    }
}

pub fn sample_snapshot() -> StoreSnapshot {
    let light_dark_1 = [("1:0", "Light"), ("1:1", "Dark")];
    let light_dark_2 = [("2:0", "Light"), ("2:1", "Dark")];

    StoreSnapshot {
        collections: vec![
            collection(
                PRIMITIVES,
                "Primitives",
                &light_dark_1,
                &["v1", "v2", "v3", "v4", "v5"],
            ),
            collection(SEMANTIC, "Semantic", &light_dark_2, &["v6"]),
            collection(BRAND, "Brand", &[("3:0", "Default")], &[]),
        ],
        variables: vec![
            variable(
                "v1",
                "color/bg/default",
                PRIMITIVES,
                ResolvedType::Color,
                &[("1:0", rgb(1.0, 1.0, 1.0)), ("1:1", rgb(0.0, 0.0, 0.0))],
            ),
            variable(
                "v2",
                "color/bg/hover",
                PRIMITIVES,
                ResolvedType::Color,
                &[("1:0", rgb(0.9, 0.9, 0.9)), ("1:1", rgb(0.1, 0.1, 0.1))],
            ),
            variable(
                "v3",
                "color/fg",
                PRIMITIVES,
                ResolvedType::Color,
                &[
                    ("1:0", VariableValue::alias("v1")),
                    ("1:1", VariableValue::alias("v1")),
                ],
            ),
            variable(
                "v4",
                "spacing/sm",
                PRIMITIVES,
                ResolvedType::Float,
                &[("1:0", VariableValue::Float(4.0)), ("1:1", VariableValue::Float(4.0))],
            ),
            variable(
                "v5",
                "radius",
                PRIMITIVES,
                ResolvedType::Float,
                &[("1:0", VariableValue::Float(2.0)), ("1:1", VariableValue::Float(3.0))],
            ),
            variable(
                "v6",
                "color/fg",
                SEMANTIC,
                ResolvedType::Color,
                &[("2:0", rgb(0.0, 0.0, 0.0)), ("2:1", rgb(1.0, 1.0, 1.0))],
            ),
        ],
    }
}

pub fn sample_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::from_snapshot(sample_snapshot()))
}

/// Names of the current members of a collection, in member order.
pub async fn member_names(store: &dyn VariableStore, collection_id: &str) -> Vec<String> {
    let collection = store
        .collection(collection_id)
        .await
        .unwrap()
        .expect("collection exists");
    let mut names = Vec::new();
    for id in &collection.variable_ids {
        if let Some(v) = store.variable(id).await.unwrap() {
            names.push(v.name);
        }
    }
    names
}

/// The member of a collection with the given name.
pub async fn member_named(
    store: &dyn VariableStore,
    collection_id: &str,
    name: &str,
) -> Option<VariableRecord> {
    let collection = store.collection(collection_id).await.unwrap()?;
    for id in &collection.variable_ids {
        if let Some(v) = store.variable(id).await.unwrap() {
            if v.name == name {
                return Some(v);
            }
        }
    }
    None
}
