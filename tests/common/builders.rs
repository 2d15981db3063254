//! Test data builders for creating configs

use refsig::multi::{self, SignalParameters, SignalType};
use refsig::TimeBound;

/// Builder for a multi-signal entry
pub struct SignalBuilder {
    signal: SignalParameters,
}

impl SignalBuilder {
    pub fn new(signal_type: SignalType) -> Self {
        let mut signal = multi::default_signal();
        signal.signal_type = signal_type;
        Self { signal }
    }

    pub fn step(initial_value: f64, final_value: f64, start_time: f64) -> Self {
        let mut builder = Self::new(SignalType::Step);
        builder.signal.initial_value = initial_value;
        builder.signal.final_value = final_value;
        builder.signal.start_time = start_time;
        builder
    }

    pub fn slope(mut self, slope: f64) -> Self {
        self.signal.slope = slope;
        self
    }

    pub fn amplitude(mut self, amplitude: f64) -> Self {
        self.signal.amplitude = amplitude;
        self
    }

    pub fn end_time(mut self, end_time: TimeBound) -> Self {
        self.signal.end_time = end_time;
        self
    }

    pub fn build(self) -> SignalParameters {
        self.signal
    }
}

/// Builder for a multi-signal config
pub struct ConfigBuilder {
    partial: multi::PartialConfig,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            partial: multi::PartialConfig::default(),
        }
    }

    pub fn topic(mut self, topic_name: &str) -> Self {
        self.partial.topic_name = Some(topic_name.to_string());
        self
    }

    pub fn publish_rate(mut self, publish_rate: f64) -> Self {
        self.partial.publish_rate = Some(publish_rate);
        self
    }

    pub fn total_time(mut self, total_time: TimeBound) -> Self {
        self.partial.total_time = Some(total_time);
        self
    }

    /// Start from an explicitly empty signal list
    pub fn no_signals(mut self) -> Self {
        self.partial.paths = Some(Vec::new());
        self
    }

    pub fn signal(mut self, signal: SignalParameters) -> Self {
        self.partial.paths.get_or_insert_with(Vec::new).push(signal);
        self
    }

    pub fn build(self) -> multi::Config {
        multi::hydrate(self.partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .topic("/ref")
            .signal(SignalBuilder::new(SignalType::Ramp).slope(2.0).build())
            .build();

        assert_eq!(config.topic_name, "/ref");
        assert_eq!(config.signal_count(), 1);
        assert_eq!(config.signal(0).unwrap().slope, 2.0);
    }

    #[test]
    fn test_no_signals_keeps_list_empty() {
        assert_eq!(ConfigBuilder::new().no_signals().build().signal_count(), 0);
    }
}
