//! Settings tree projection for the multi-signal variant.
//!
//! ```text
//! general                 topicName, publishRate, totalTime
//! paths   [add-signal]
//! +-- 0   "Signal 1"      signalType + fields applicable to that type
//! +-- 1   "Signal 2"      [delete-signal]
//! ```
//!
//! Signal nodes are memoized on the identity of their `Arc<SignalParameters>`
//! (plus index and deletability), and the whole `paths` node on the identity
//! of the signal list, so an edit to one signal rebuilds one child node.

use serde::Serialize;
use std::sync::Arc;

use super::address::{FieldKey, NodeAction, SignalField};
use super::config::{default_signal, Config, SignalList, SignalParameters, SignalType, TOPIC_SCHEMA};
use crate::settings::{
    topic_options, ActionDescriptor, Field, FieldInput, IdentityCache, SelectOption, SettingsNode,
};
use crate::types::Topic;

/// Settings node of the multi-signal variant
pub type Node = SettingsNode<FieldKey, NodeAction>;

/// Root of the projected settings tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsTree {
    pub general: Arc<Node>,
    pub paths: Arc<Node>,
}

impl SettingsTree {
    /// Signal node at `index`
    pub fn signal(&self, index: usize) -> Option<&Arc<Node>> {
        self.paths.child(&index.to_string())
    }

    /// Every field address present in the tree
    pub fn field_keys(&self) -> Vec<FieldKey> {
        let mut keys = self.general.field_keys();
        keys.extend(self.paths.field_keys());
        keys
    }
}

/// Memoizing tree builder
///
/// Keep one builder per panel and call [`TreeBuilder::build`] as often as the
/// host asks; output is identical to [`build_tree`].
pub struct TreeBuilder {
    signal_nodes: IdentityCache<(usize, bool), SignalParameters, Arc<Node>>,
    list_nodes: IdentityCache<(), [Arc<SignalParameters>], Arc<Node>>,
    /// Shown in place of an empty signal list
    implicit_signal: Arc<SignalParameters>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            signal_nodes: IdentityCache::new(),
            list_nodes: IdentityCache::new(),
            implicit_signal: Arc::new(default_signal()),
        }
    }

    pub fn build(&mut self, config: &Config, topics: &[Topic]) -> SettingsTree {
        let tree = SettingsTree {
            general: Arc::new(general_node(config, topics)),
            paths: self.signal_list_node(&config.paths),
        };

        self.signal_nodes.prune();
        self.list_nodes.prune();

        let (hits, misses) = self.signal_nodes.stats();
        tracing::trace!(
            "Built settings tree for {} signal(s), node cache {} hits / {} misses",
            config.paths.len(),
            hits,
            misses
        );

        tree
    }

    fn signal_list_node(&mut self, paths: &SignalList) -> Arc<Node> {
        let Self {
            signal_nodes,
            list_nodes,
            implicit_signal,
        } = self;
        let implicit_signal: &Arc<SignalParameters> = implicit_signal;

        list_nodes.get_or_insert_with((), paths, || {
            let children = if paths.is_empty() {
                // Nothing stored yet: show one default signal that cannot be deleted
                let node = signal_nodes.get_or_insert_with((0, false), implicit_signal, || {
                    Arc::new(signal_node(0, implicit_signal, false))
                });
                vec![("0".to_string(), node)]
            } else {
                let can_delete = paths.len() > 1;
                paths
                    .iter()
                    .enumerate()
                    .map(|(index, signal)| {
                        let node = signal_nodes.get_or_insert_with((index, can_delete), signal, || {
                            Arc::new(signal_node(index, signal, can_delete))
                        });
                        (index.to_string(), node)
                    })
                    .collect()
            };

            Arc::new(
                Node::new("Signals")
                    .with_children(children)
                    .with_actions(vec![ActionDescriptor::inline(
                        NodeAction::AddSignal,
                        "Add signal",
                        "Add",
                    )]),
            )
        })
    }
}

/// Build the settings tree without memoization
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

fn signal_node(index: usize, signal: &SignalParameters, can_delete: bool) -> Node {
    let fields = SignalField::ALL
        .into_iter()
        .filter(|field| field.applies_to(signal.signal_type))
        .map(|field| signal_field(index, field, signal))
        .collect();

    let actions = if can_delete {
        vec![ActionDescriptor::inline(
            NodeAction::DeleteSignal { index },
            "Delete signal",
            "Clear",
        )]
    } else {
        Vec::new()
    };

    Node::new(format!("Signal {}", index + 1))
        .with_fields(fields)
        .with_actions(actions)
}

fn signal_field(index: usize, field: SignalField, signal: &SignalParameters) -> Field<FieldKey> {
    let (label, input) = match field {
        SignalField::SignalType => (
            "Signal type",
            FieldInput::Select {
                value: signal.signal_type.as_str().to_string(),
                options: signal_type_options(),
            },
        ),
        SignalField::InitialValue => (
            "Initial value",
            FieldInput::number(signal.initial_value, None),
        ),
        SignalField::FinalValue => ("Final value", FieldInput::number(signal.final_value, None)),
        SignalField::StartTime => (
            "Start time (s)",
            FieldInput::number(signal.start_time, Some(0.0)),
        ),
        SignalField::EndTime => ("End time (s)", FieldInput::bound(signal.end_time)),
        SignalField::Slope => ("Slope", FieldInput::number(signal.slope, None)),
        SignalField::Offset => ("Offset", FieldInput::number(signal.offset, None)),
        SignalField::Amplitude => ("Amplitude", FieldInput::number(signal.amplitude, None)),
        SignalField::Frequency => (
            "Frequency (Hz)",
            FieldInput::number(signal.frequency, Some(0.0)),
        ),
        SignalField::Phase => ("Phase (deg)", FieldInput::number(signal.phase, None)),
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
        key: FieldKey::Signal { index, field },
        name: field.name(),
        label,
        input,
    }
}

fn signal_type_options() -> Vec<SelectOption> {
    SignalType::ALL
        .into_iter()
        .map(|t| SelectOption::new(t.label(), t.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multi::config::hydrate;
    use crate::multi::PartialConfig;
    use crate::types::TimeBound;

    fn config_with(signals: Vec<SignalParameters>) -> Config {
        hydrate(PartialConfig {
            paths: Some(signals),
            ..Default::default()
        })
    }

    fn field_names(node: &Node) -> Vec<&'static str> {
        node.fields.iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_step_signal_fields() {
        let tree = build_tree(&config_with(vec![default_signal()]), &[]);
        let node = tree.signal(0).unwrap();
        assert_eq!(
            field_names(node),
            vec!["signalType", "initialValue", "finalValue", "startTime", "endTime"]
        );
    }

    #[test]
    fn test_chirp_signal_fields() {
        let mut chirp = default_signal();
        chirp.signal_type = SignalType::Chirp;
        let tree = build_tree(&config_with(vec![chirp]), &[]);
        assert_eq!(
            field_names(tree.signal(0).unwrap()),
            vec![
                "signalType",
                "startTime",
                "endTime",
                "offset",
                "amplitude",
                "phase",
                "initialFrequency",
                "targetFrequency",
                "targetTime"
            ]
        );
    }

    #[test]
    fn test_empty_list_shows_one_undeletable_default() {
        let tree = build_tree(&config_with(Vec::new()), &[]);
        assert_eq!(tree.paths.children.len(), 1);

        let node = tree.signal(0).unwrap();
        assert_eq!(node.label, "Signal 1");
        assert!(node.actions.is_empty());
        assert_eq!(node.field("finalValue").unwrap().input, FieldInput::number(1.0, None));
    }

    #[test]
    fn test_single_entry_is_not_deletable() {
        let tree = build_tree(&config_with(vec![default_signal()]), &[]);
        assert!(tree.signal(0).unwrap().actions.is_empty());
    }

    #[test]
    fn test_every_entry_deletable_when_several() {
        let tree = build_tree(&config_with(vec![default_signal(); 3]), &[]);
        for index in 0..3 {
            let node = tree.signal(index).unwrap();
            assert_eq!(node.label, format!("Signal {}", index + 1));
            assert_eq!(node.actions.len(), 1);
            assert_eq!(node.actions[0].id, NodeAction::DeleteSignal { index });
        }
    }

    #[test]
    fn test_add_action_always_present() {
        for count in 0..3 {
            let tree = build_tree(&config_with(vec![default_signal(); count]), &[]);
            assert_eq!(tree.paths.actions.len(), 1);
            assert_eq!(tree.paths.actions[0].id, NodeAction::AddSignal);
            assert_eq!(tree.paths.actions[0].label, "Add signal");
        }
    }

    #[test]
    fn test_topic_options_filtered() {
        let topics = vec![
            Topic::new("/multi", TOPIC_SCHEMA),
            Topic::new("/single", "std_msgs/msg/Float64"),
        ];
        let tree = build_tree(&Config::default(), &topics);
        match &tree.general.field("topicName").unwrap().input {
            FieldInput::Select { options, .. } => {
                assert_eq!(options, &vec![SelectOption::new("/multi", "/multi")]);
            }
            other => panic!("unexpected input {:?}", other),
        }
    }

    #[test]
    fn test_total_time_is_bound_input() {
        let tree = build_tree(&Config::default(), &[]);
        assert_eq!(
            tree.general.field("totalTime").unwrap().input,
            FieldInput::bound(TimeBound::Unbounded)
        );
    }

    #[test]
    fn test_unchanged_entries_reuse_nodes() {
        let mut builder = TreeBuilder::new();
        let config = config_with(vec![default_signal(), default_signal()]);
        let first = builder.build(&config, &[]);

        // Replace entry 1 only, sharing entry 0
        let mut edited = (*config.paths[1]).clone();
        edited.slope = 4.0;
        let mut next = config.clone();
        next.paths = Arc::from(vec![config.paths[0].clone(), Arc::new(edited)]);
        let second = builder.build(&next, &[]);

        assert!(Arc::ptr_eq(first.signal(0).unwrap(), second.signal(0).unwrap()));
        assert!(!Arc::ptr_eq(first.signal(1).unwrap(), second.signal(1).unwrap()));
        assert!(!Arc::ptr_eq(&first.paths, &second.paths));
    }

    #[test]
    fn test_same_list_reuses_paths_node() {
        let mut builder = TreeBuilder::new();
        let config = config_with(vec![default_signal()]);
        let first = builder.build(&config, &[]);

        let mut renamed = config.clone();
        renamed.topic_name = "/other".to_string();
        let second = builder.build(&renamed, &[]);

        assert!(Arc::ptr_eq(&first.paths, &second.paths));
    }

    #[test]
    fn test_memoized_output_matches_fresh_build() {
        let mut builder = TreeBuilder::new();
        let config = config_with(vec![default_signal(); 2]);
        builder.build(&config, &[]);
        assert_eq!(builder.build(&config, &[]), build_tree(&config, &[]));
    }

    #[test]
    fn test_index_change_rebuilds_node() {
        // Same entry Arc at a different index must not reuse the old label
        let mut builder = TreeBuilder::new();
        let shared = Arc::new(default_signal());
        let mut config = config_with(Vec::new());
        config.paths = Arc::from(vec![Arc::new(default_signal()), shared.clone()]);
        builder.build(&config, &[]);

        config.paths = Arc::from(vec![shared]);
        let tree = builder.build(&config, &[]);
        assert_eq!(tree.signal(0).unwrap().label, "Signal 1");
        assert!(tree.signal(0).unwrap().actions.is_empty());
    }

    #[test]
    fn test_tree_serializes_host_shape() {
        let tree = build_tree(&config_with(vec![default_signal(); 2]), &[]);
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["general"]["label"], "General");
        assert_eq!(json["paths"]["actions"][0]["id"], "add-signal");
        assert_eq!(json["paths"]["children"]["1"]["label"], "Signal 2");
        assert_eq!(
            json["paths"]["children"]["1"]["actions"][0]["id"],
            "delete-signal"
        );
        assert_eq!(json["paths"]["children"]["1"]["actions"][0]["index"], 1);
        assert_eq!(
            json["paths"]["children"]["0"]["fields"][0]["key"],
            serde_json::json!(["paths", "0", "signalType"])
        );
    }
}
