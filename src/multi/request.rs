//! Start/stop requests for the multi-signal variant.
//!
//! The start payload is the columnar transpose of `paths`: one array per
//! signal parameter, all of the same length and aligned by index.

use serde::Serialize;

use super::config::{Config, SignalParameters, SignalType};
use crate::service::{ServiceCall, ServiceRequest, StopRequest, START_SERVICE, STOP_SERVICE};

/// Payload of `<topic>/start`
///
/// Unbounded times are sent as `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartRequest {
    pub signal_type: Vec<SignalType>,
    pub initial_value: Vec<f64>,
    pub final_value: Vec<f64>,
    pub start_time: Vec<f64>,
    pub end_time: Vec<f64>,
    pub slope: Vec<f64>,
    pub offset: Vec<f64>,
    pub amplitude: Vec<f64>,
    pub frequency: Vec<f64>,
    pub phase: Vec<f64>,
    pub initial_frequency: Vec<f64>,
    pub target_frequency: Vec<f64>,
    pub target_time: Vec<f64>,
    pub publish_rate: f64,
    pub total_time: f64,
}

impl StartRequest {
    pub fn from_config(config: &Config) -> Self {
        let column = |get: fn(&SignalParameters) -> f64| -> Vec<f64> {
            config.paths.iter().map(|p| get(p)).collect()
        };

        Self {
            signal_type: config.paths.iter().map(|p| p.signal_type).collect(),
            initial_value: column(|p| p.initial_value),
            final_value: column(|p| p.final_value),
            start_time: column(|p| p.start_time),
            end_time: column(|p| p.end_time.to_f64()),
            slope: column(|p| p.slope),
            offset: column(|p| p.offset),
            amplitude: column(|p| p.amplitude),
            frequency: column(|p| p.frequency),
            phase: column(|p| p.phase),
            initial_frequency: column(|p| p.initial_frequency),
            target_frequency: column(|p| p.target_frequency),
            target_time: column(|p| p.target_time.to_f64()),
            publish_rate: config.publish_rate,
            total_time: config.total_time.to_f64(),
        }
    }

    /// Number of signals described
    pub fn len(&self) -> usize {
        self.signal_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal_type.is_empty()
    }
}

/// `<topic>/start` call for the current config
pub fn start_request(config: &Config) -> ServiceCall {
    ServiceCall::new(
        &config.topic_name,
        START_SERVICE,
        ServiceRequest::StartMulti(StartRequest::from_config(config)),
    )
}

/// `<topic>/stop` call
pub fn stop_request(config: &Config) -> ServiceCall {
    ServiceCall::new(
        &config.topic_name,
        STOP_SERVICE,
        ServiceRequest::Stop(StopRequest::default()),
    )
}
