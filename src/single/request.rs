//! Start/stop requests for the single-signal variant.

use serde::Serialize;

use super::config::{Config, SignalType};
use crate::service::{ServiceCall, ServiceRequest, StopRequest, START_SERVICE, STOP_SERVICE};

/// Payload of `<topic>/start`; unbounded times are sent as `f64::INFINITY`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartRequest {
    pub signal_type: SignalType,
    pub initial_value: f64,
    pub final_value: f64,
    pub step_time: f64,
    pub start_time: f64,
    pub slope: f64,
    pub offset: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub initial_frequency: f64,
    pub target_frequency: f64,
    pub target_time: f64,
    pub publish_rate: f64,
    pub total_time: f64,
}

impl StartRequest {
    pub fn from_config(config: &Config) -> Self {
        let signal = &config.signal;
        Self {
            signal_type: signal.signal_type,
            initial_value: signal.initial_value,
            final_value: signal.final_value,
            step_time: signal.step_time,
            start_time: signal.start_time,
            slope: signal.slope,
            offset: signal.offset,
            amplitude: signal.amplitude,
            frequency: signal.frequency,
            initial_frequency: signal.initial_frequency,
            target_frequency: signal.target_frequency,
            target_time: signal.target_time.to_f64(),
            publish_rate: config.publish_rate,
            total_time: config.total_time.to_f64(),
        }
    }
}

pub fn start_request(config: &Config) -> ServiceCall {
    ServiceCall::new(
        &config.topic_name,
        START_SERVICE,
        ServiceRequest::StartSingle(StartRequest::from_config(config)),
    )
}

pub fn stop_request(config: &Config) -> ServiceCall {
    ServiceCall::new(
        &config.topic_name,
        STOP_SERVICE,
        ServiceRequest::Stop(StopRequest::default()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::single::config::{hydrate, PartialConfig};

    #[test]
    fn test_start_request_is_flat() {
        let partial: PartialConfig = serde_json::from_value(serde_json::json!({
            "topicName": "/ref",
            "publishRate": 20,
            "totalTime": 15,
            "signalType": "chirp",
            "targetTime": "inf"
        }))
        .unwrap();
        let call = start_request(&hydrate(partial));
        assert_eq!(call.service, "/ref/start");

        match call.request {
            ServiceRequest::StartSingle(request) => {
                assert_eq!(request.signal_type, SignalType::Chirp);
                assert_eq!(request.publish_rate, 20.0);
                assert_eq!(request.total_time, 15.0);
                assert_eq!(request.target_time, f64::INFINITY);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_stop_request() {
        let mut config = Config::default();
        config.topic_name = "/ref".to_string();
        let call = stop_request(&config);
        assert_eq!(call.service, "/ref/stop");
        assert_eq!(call.request, ServiceRequest::Stop(StopRequest {}));
    }
}
