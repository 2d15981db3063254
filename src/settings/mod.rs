//! Declarative settings tree shared by both configuration variants
//!
//! A settings tree is what the host renders in its settings sidebar: nodes
//! with a label, an ordered list of editable fields, node-level actions
//! (buttons such as "Add signal") and child nodes. The tree is always derived
//! from a config and never edited directly; edits come back as typed actions.
//!
//! The node types are generic over:
//!
//! - `K`: the variant's field address type, carried on every field so the
//!   host can turn an edit into a typed update without string paths
//! - `A`: the variant's node-action type
//!
//! Nodes are held behind `Arc` so that memoized subtrees can be shared
//! between successive trees (see [`memo`]).

pub mod memo;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::types::{TimeBound, Topic, UNBOUNDED_KEYWORD};

pub use memo::IdentityCache;

/// One node of the settings tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsNode<K, A> {
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field<K>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionDescriptor<A>>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_children"
    )]
    pub children: Vec<(String, Arc<SettingsNode<K, A>>)>,
}

/// Children are written as an ordered map keyed by child key
fn serialize_children<S, K, A>(
    children: &[(String, Arc<SettingsNode<K, A>>)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    K: Serialize,
    A: Serialize,
{
    let mut map = serializer.serialize_map(Some(children.len()))?;
    for (key, child) in children {
        map.serialize_entry(key, child.as_ref())?;
    }
    map.end()
}

impl<K, A> SettingsNode<K, A> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fields: Vec::new(),
            actions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field<K>>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_actions(mut self, actions: Vec<ActionDescriptor<A>>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_children(mut self, children: Vec<(String, Arc<SettingsNode<K, A>>)>) -> Self {
        self.children = children;
        self
    }

    /// Look up a field by its display key (e.g. `"slope"`)
    pub fn field(&self, name: &str) -> Option<&Field<K>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a child node by key
    pub fn child(&self, key: &str) -> Option<&Arc<SettingsNode<K, A>>> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// Iterate over the addresses of every field in this node and its children
    pub fn field_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys: Vec<K> = self.fields.iter().map(|f| f.key.clone()).collect();
        for (_, child) in &self.children {
            keys.extend(child.field_keys());
        }
        keys
    }
}

/// An editable field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field<K> {
    /// Typed address of the value this field edits
    pub key: K,
    /// Key of the field within its node, e.g. `initialValue`
    #[serde(skip)]
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub input: FieldInput,
}

/// Input widget description for a field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "input", rename_all = "camelCase")]
pub enum FieldInput {
    /// Plain numeric input
    Number {
        value: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
    },
    /// Numeric input that may be cleared to mean "no limit"
    #[serde(rename = "number")]
    Bound {
        value: TimeBound,
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        placeholder: &'static str,
    },
    /// Dropdown
    Select {
        value: String,
        options: Vec<SelectOption>,
    },
}

impl FieldInput {
    pub fn number(value: f64, min: Option<f64>) -> Self {
        FieldInput::Number { value, min }
    }

    /// Time-bound input, always non-negative with an `inf` placeholder
    pub fn bound(value: TimeBound) -> Self {
        FieldInput::Bound {
            value,
            min: Some(0.0),
            placeholder: UNBOUNDED_KEYWORD,
        }
    }
}

/// One option of a select input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// How a node action is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionDisplay {
    Inline,
}

/// A node-level action button
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDescriptor<A> {
    /// Action dispatched back to the reducer when invoked
    #[serde(flatten)]
    pub id: A,
    pub label: &'static str,
    pub display: ActionDisplay,
    pub icon: &'static str,
}

impl<A> ActionDescriptor<A> {
    pub fn inline(id: A, label: &'static str, icon: &'static str) -> Self {
        Self {
            id,
            label,
            display: ActionDisplay::Inline,
            icon,
        }
    }
}

/// Topic select options: topics whose schema matches exactly, in source order
pub fn topic_options(topics: &[Topic], schema_name: &str) -> Vec<SelectOption> {
    topics
        .iter()
        .filter(|topic| topic.schema_name == schema_name)
        .map(|topic| SelectOption::new(topic.name.clone(), topic.name.clone()))
        .collect()
}
