//! Settings tree projection for the single-signal variant.
//!
//! ```text
//! general   topicName, publishRate, totalTime
//! signal    signalType + fields applicable to that type
//! ```

use serde::Serialize;
use std::sync::Arc;

use super::address::{FieldKey, NoNodeAction, SignalField};
use super::config::{Config, SignalParameters, SignalType, TOPIC_SCHEMA};
use crate::settings::{topic_options, Field, FieldInput, IdentityCache, SelectOption, SettingsNode};
use crate::types::Topic;

pub type Node = SettingsNode<FieldKey, NoNodeAction>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsTree {
    pub general: Arc<Node>,
    pub signal: Arc<Node>,
}

impl SettingsTree {
    pub fn field_keys(&self) -> Vec<FieldKey> {
        let mut keys = self.general.field_keys();
        keys.extend(self.signal.field_keys());
        keys
    }
}

/// Memoizing tree builder; the signal node is reused while the signal `Arc`
/// is unchanged
#[derive(Default)]
pub struct TreeBuilder {
    signal_nodes: IdentityCache<(), SignalParameters, Arc<Node>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&mut self, config: &Config, topics: &[Topic]) -> SettingsTree {
        let signal = &config.signal;
        let tree = SettingsTree {
            general: Arc::new(general_node(config, topics)),
            signal: self
                .signal_nodes
                .get_or_insert_with((), signal, || Arc::new(signal_node(signal))),
        };
        self.signal_nodes.prune();

        let (hits, misses) = self.signal_nodes.stats();
        tracing::trace!(
            "Built single-signal tree, node cache {} hits / {} misses",
            hits,
            misses
        );
        tree
    }
}

pub fn build_tree(config: &Config, topics: &[Topic]) -> SettingsTree {
    TreeBuilder::new().build(config, topics)
}

fn general_node(config: &Config, topics: &[Topic]) -> Node {
    Node::new("General").with_fields(vec![
        Field {
            key: FieldKey::TopicName,
            name: "topicName",
            label: "Topic",
            input: FieldInput::Select {
                value: config.topic_name.clone(),
                options: topic_options(topics, TOPIC_SCHEMA),
            },
        },
        Field {
            key: FieldKey::PublishRate,
            name: "publishRate",
            label: "Publish rate (Hz)",
            input: FieldInput::number(config.publish_rate, Some(0.0)),
        },
        Field {
            key: FieldKey::TotalTime,
            name: "totalTime",
            label: "Total time (s)",
            input: FieldInput::bound(config.total_time),
        },
    ])
}

fn signal_node(signal: &SignalParameters) -> Node {
    let fields = SignalField::ALL
        .into_iter()
        .filter(|field| field.applies_to(signal.signal_type))
        .map(|field| signal_field(field, signal))
        .collect();
    Node::new("Signal").with_fields(fields)
}

fn signal_field(field: SignalField, signal: &SignalParameters) -> Field<FieldKey> {
    let (label, input) = match field {
        SignalField::SignalType => (
            "Signal type",
            FieldInput::Select {
                value: signal.signal_type.as_str().to_string(),
                options: SignalType::ALL
                    .into_iter()
                    .map(|t| SelectOption::new(t.label(), t.as_str()))
                    .collect(),
            },
        ),
        SignalField::InitialValue => (
            "Initial value",
            FieldInput::number(signal.initial_value, None),
        ),
        SignalField::FinalValue => ("Final value", FieldInput::number(signal.final_value, None)),
        SignalField::StepTime => ("Step time (s)", FieldInput::number(signal.step_time, Some(0.0))),
        SignalField::StartTime => (
            "Start time (s)",
            FieldInput::number(signal.start_time, Some(0.0)),
        ),
        SignalField::Slope => ("Slope", FieldInput::number(signal.slope, None)),
        SignalField::Offset => ("Offset", FieldInput::number(signal.offset, None)),
        SignalField::Amplitude => ("Amplitude", FieldInput::number(signal.amplitude, None)),
        SignalField::Frequency => (
            "Frequency (Hz)",
            FieldInput::number(signal.frequency, Some(0.0)),
        ),
        SignalField::InitialFrequency => (
            "Initial frequency (Hz)",
            FieldInput::number(signal.initial_frequency, Some(0.0)),
        ),
        SignalField::TargetFrequency => (
            "Target frequency (Hz)",
            FieldInput::number(signal.target_frequency, Some(0.0)),
        ),
        SignalField::TargetTime => ("Target time (s)", FieldInput::bound(signal.target_time)),
    };

    Field {
        key: FieldKey::Signal(field),
        name: field.name(),
        label,
        input,
    }
}
