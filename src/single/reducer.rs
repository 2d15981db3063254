//! Action reducer for the single-signal variant.

use std::sync::Arc;

use super::address::{Action, FieldUpdate};
use super::config::Config;

/// Apply one settings action, returning a new config
pub fn reduce(config: &Config, action: Action) -> Config {
    let Action::Update(update) = action;
    let mut next = config.clone();
    match update {
        FieldUpdate::TopicName(name) => next.topic_name = name,
        FieldUpdate::PublishRate(rate) => next.publish_rate = rate,
        FieldUpdate::TotalTime(total) => next.total_time = total,
        FieldUpdate::Signal(update) => update.apply(Arc::make_mut(&mut next.signal)),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::single::address::SignalUpdate;
    use crate::single::config::SignalType;
    use crate::types::TimeBound;

    fn signal_update(update: SignalUpdate) -> Action {
        Action::Update(FieldUpdate::Signal(update))
    }

    #[test]
    fn test_signal_update_copies_on_write() {
        let config = Config::default();
        let next = reduce(&config, signal_update(SignalUpdate::StepTime(2.5)));

        assert_eq!(config.signal.step_time, 0.0);
        assert_eq!(next.signal.step_time, 2.5);
        assert!(!Arc::ptr_eq(&config.signal, &next.signal));
    }

    #[test]
    fn test_general_update_shares_signal() {
        let config = Config::default();
        let next = reduce(&config, Action::Update(FieldUpdate::TotalTime(TimeBound::Finite(9.0))));

        assert_eq!(next.total_time, TimeBound::Finite(9.0));
        assert!(Arc::ptr_eq(&config.signal, &next.signal));
    }

    #[test]
    fn test_hidden_field_survives_type_switch() {
        let config = reduce(
            &Config::default(),
            signal_update(SignalUpdate::SignalType(SignalType::Ramp)),
        );
        let config = reduce(&config, signal_update(SignalUpdate::Slope(7.0)));
        let config = reduce(&config, signal_update(SignalUpdate::SignalType(SignalType::Sine)));
        let config = reduce(&config, signal_update(SignalUpdate::SignalType(SignalType::Ramp)));

        assert_eq!(config.signal.slope, 7.0);
    }
}
