//! Action reducer for the multi-signal variant.
//!
//! `reduce` never mutates its input: it returns a new [`Config`] that shares
//! every signal entry it did not touch, which keeps the tree builder's
//! identity caches warm.

use std::sync::Arc;

use super::address::{Action, FieldUpdate, NodeAction, SignalUpdate};
use super::config::{default_signal, Config, SignalParameters};

/// Apply one settings action
pub fn reduce(config: &Config, action: Action) -> Config {
    match action {
        Action::Update(update) => apply_update(config, update),
        Action::Node(NodeAction::AddSignal) => add_signal(config),
        Action::Node(NodeAction::DeleteSignal { index }) => delete_signal(config, index),
    }
}

fn apply_update(config: &Config, update: FieldUpdate) -> Config {
    let mut next = config.clone();
    match update {
        FieldUpdate::TopicName(name) => next.topic_name = name,
        FieldUpdate::PublishRate(rate) => next.publish_rate = rate,
        FieldUpdate::TotalTime(total) => next.total_time = total,
        FieldUpdate::Signal { index, update } => match update_signal(config, index, update) {
            Some(paths) => next.paths = paths.into(),
            None => {
                tracing::warn!(
                    "Ignoring update of {} on signal {} (only {} signal(s))",
                    update.field().name(),
                    index,
                    config.paths.len()
                );
            }
        },
    }
    next
}

fn update_signal(
    config: &Config,
    index: usize,
    update: SignalUpdate,
) -> Option<Vec<Arc<SignalParameters>>> {
    let mut paths = config.paths.to_vec();
    if paths.is_empty() && index == 0 {
        // Editing the implicit default signal makes it a stored one
        paths.push(Arc::new(default_signal()));
    }

    let entry = paths.get_mut(index)?;
    // Shared with the previous config, so this copies the entry
    update.apply(Arc::make_mut(entry));
    Some(paths)
}

fn add_signal(config: &Config) -> Config {
    let mut paths = config.paths.to_vec();
    if paths.is_empty() {
        // An empty list is shown as one implicit signal; keep that one too
        paths.push(Arc::new(default_signal()));
    }
    paths.push(Arc::new(default_signal()));
    tracing::debug!("Added signal, now {} signal(s)", paths.len());

    Config {
        paths: paths.into(),
        ..config.clone()
    }
}

fn delete_signal(config: &Config, index: usize) -> Config {
    if index >= config.paths.len() {
        tracing::warn!(
            "Ignoring delete of signal {} (only {} signal(s))",
            index,
            config.paths.len()
        );
        return config.clone();
    }

    let mut paths = config.paths.to_vec();
    paths.remove(index);
    tracing::debug!("Deleted signal {}, now {} signal(s)", index, paths.len());

    Config {
        paths: paths.into(),
        ..config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multi::config::{hydrate, PartialConfig, SignalType};
    use crate::types::TimeBound;

    fn config_with(signals: Vec<SignalParameters>) -> Config {
        hydrate(PartialConfig {
            paths: Some(signals),
            ..Default::default()
        })
    }

    fn signal_update(index: usize, update: SignalUpdate) -> Action {
        Action::Update(FieldUpdate::Signal { index, update })
    }

    #[test]
    fn test_hidden_field_survives_type_switch() {
        let mut sine = default_signal();
        sine.signal_type = SignalType::Sine;
        sine.slope = 7.0;
        let config = config_with(vec![sine]);

        let ramp = reduce(&config, signal_update(0, SignalUpdate::SignalType(SignalType::Ramp)));
        let back = reduce(&ramp, signal_update(0, SignalUpdate::SignalType(SignalType::Sine)));

        assert_eq!(back.signal(0).unwrap().slope, 7.0);
        assert_eq!(back.signal(0).unwrap().signal_type, SignalType::Sine);
    }

    #[test]
    fn test_add_on_empty_list_yields_two() {
        let config = config_with(Vec::new());
        let next = reduce(&config, Action::Node(NodeAction::AddSignal));

        assert_eq!(next.signal_count(), 2);
        assert!(next.paths.iter().all(|p| **p == default_signal()));
    }

    #[test]
    fn test_add_appends_default() {
        let mut ramp = default_signal();
        ramp.signal_type = SignalType::Ramp;
        let config = config_with(vec![ramp.clone()]);
        let next = reduce(&config, Action::Node(NodeAction::AddSignal));

        assert_eq!(next.signal_count(), 2);
        assert_eq!(next.signal(0), Some(&ramp));
        assert_eq!(next.signal(1), Some(&default_signal()));
        assert!(Arc::ptr_eq(&config.paths[0], &next.paths[0]));
    }

    #[test]
    fn test_delete_preserves_order() {
        let signals: Vec<_> = (0..3)
            .map(|i| {
                let mut s = default_signal();
                s.initial_value = i as f64;
                s
            })
            .collect();
        let config = config_with(signals.clone());

        let next = reduce(&config, Action::Node(NodeAction::DeleteSignal { index: 1 }));
        let values: Vec<f64> = next.paths.iter().map(|p| p.initial_value).collect();
        assert_eq!(values, vec![0.0, 2.0]);
    }

    #[test]
    fn test_delete_last_signal_allowed() {
        let config = config_with(vec![default_signal()]);
        let next = reduce(&config, Action::Node(NodeAction::DeleteSignal { index: 0 }));
        assert_eq!(next.signal_count(), 0);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let config = config_with(vec![default_signal()]);
        let next = reduce(&config, Action::Node(NodeAction::DeleteSignal { index: 5 }));
        assert_eq!(next, config);
        assert!(Arc::ptr_eq(&next.paths, &config.paths));
    }

    #[test]
    fn test_update_leaves_previous_config_untouched() {
        let config = config_with(vec![default_signal(), default_signal()]);
        let next = reduce(&config, signal_update(1, SignalUpdate::Amplitude(9.0)));

        assert_eq!(config.signal(1).unwrap().amplitude, 1.0);
        assert_eq!(next.signal(1).unwrap().amplitude, 9.0);
        assert!(Arc::ptr_eq(&config.paths[0], &next.paths[0]));
        assert!(!Arc::ptr_eq(&config.paths[1], &next.paths[1]));
    }

    #[test]
    fn test_update_implicit_default_materializes_it() {
        let config = config_with(Vec::new());
        let next = reduce(&config, signal_update(0, SignalUpdate::EndTime(TimeBound::Finite(3.0))));

        assert_eq!(next.signal_count(), 1);
        assert_eq!(next.signal(0).unwrap().end_time, TimeBound::Finite(3.0));
        assert_eq!(next.signal(0).unwrap().final_value, 1.0);
    }

    #[test]
    fn test_update_out_of_range_is_noop() {
        let config = config_with(vec![default_signal()]);
        let next = reduce(&config, signal_update(3, SignalUpdate::Slope(2.0)));
        assert_eq!(next, config);
    }

    #[test]
    fn test_general_updates() {
        let config = Config::default();
        let next = reduce(&config, Action::Update(FieldUpdate::TopicName("/ref".into())));
        let next = reduce(&next, Action::Update(FieldUpdate::PublishRate(20.0)));
        let next = reduce(&next, Action::Update(FieldUpdate::TotalTime(TimeBound::Finite(5.0))));

        assert_eq!(next.topic_name, "/ref");
        assert_eq!(next.publish_rate, 20.0);
        assert_eq!(next.total_time, TimeBound::Finite(5.0));
        assert!(Arc::ptr_eq(&next.paths, &config.paths));
    }
}
