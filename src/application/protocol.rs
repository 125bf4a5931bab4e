//! Message protocol between the host, the presentation layer and the core
//!
//! Messages are JSON objects tagged by `"type"`:
//!
//! ```text
//! → {"type":"select-collection","collectionId":"VariableCollectionId:1:0"}
//! ← {"type":"tree-data","tree":[...],"variables":[...]}
//! ```

use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CollectionSummary, TreeNode, VariableRecord};

/// Inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Intent {
    Init,
    SelectCollection {
        collection_id: String,
    },
    Search {
        query: String,
    },
    ToggleGroup {
        path: String,
    },
    CheckNode {
        node_id: String,
        checked: bool,
    },
    SwapCollection {
        variable_ids: Vec<String>,
        target_collection_id: String,
    },
    /// Any message type this core does not know
    #[serde(other)]
    Unknown,
}

impl Intent {
    /// Decode one JSON message.
    pub fn from_json(raw: &str) -> ApplicationResult<Self> {
        serde_json::from_str(raw).map_err(|e| ApplicationError::UnknownIntent(e.to_string()))
    }
}

/// Outbound notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Event {
    InitData {
        collections: Vec<CollectionSummary>,
        default_collection_id: Option<String>,
    },
    TreeData {
        tree: Vec<TreeNode>,
        variables: Vec<VariableRecord>,
    },
    Error {
        message: String,
    },
    Success {
        message: String,
    },
}

impl Event {
    pub fn error(message: impl Into<String>) -> Self {
        Event::Error {
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Event::Success {
            message: message.into(),
        }
    }

    /// Encode as one JSON line (no trailing newline).
    pub fn to_json(&self) -> ApplicationResult<String> {
        serde_json::to_string(self).map_err(|e| ApplicationError::OperationFailed {
            context: "encode event".to_string(),
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_kebab_case_tag_when_decoding_then_fields_are_camel_case() {
        let intent = Intent::from_json(
            r#"{"type":"swap-collection","variableIds":["a","b"],"targetCollectionId":"c2"}"#,
        )
        .unwrap();

        assert_eq!(
            intent,
            Intent::SwapCollection {
                variable_ids: vec!["a".into(), "b".into()],
                target_collection_id: "c2".into(),
            }
        );
    }

    #[test]
    fn given_unrecognised_type_when_decoding_then_unknown() {
        let intent = Intent::from_json(r#"{"type":"resize","width":300}"#).unwrap();
        assert_eq!(intent, Intent::Unknown);
    }

    #[test]
    fn given_garbage_when_decoding_then_unknown_intent_error() {
        let result = Intent::from_json("not json");
        assert!(matches!(result, Err(ApplicationError::UnknownIntent(_))));
    }

    #[test]
    fn given_error_event_when_encoding_then_tagged() {
        let json = Event::error("boom").to_json().unwrap();
        assert_eq!(json, r#"{"type":"error","message":"boom"}"#);
    }
}
