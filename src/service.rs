//! Service calls handed to the host transport.
//!
//! The generator node exposes two services under its topic:
//! `<topic>/start` (payload built from the config) and `<topic>/stop` (empty
//! payload). How they are sent is up to the host; the engine only builds them.

use serde::Serialize;

use crate::{multi, single};

/// Suffix of the start service
pub const START_SERVICE: &str = "start";
/// Suffix of the stop service
pub const STOP_SERVICE: &str = "stop";

/// A service name plus its request payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    pub service: String,
    pub request: ServiceRequest,
}

impl ServiceCall {
    pub fn new(topic_name: &str, suffix: &str, request: ServiceRequest) -> Self {
        Self {
            service: service_name(topic_name, suffix),
            request,
        }
    }

    pub fn is_start(&self) -> bool {
        !matches!(self.request, ServiceRequest::Stop(_))
    }
}

/// Request payloads, serialized without a tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServiceRequest {
    StartMulti(multi::StartRequest),
    StartSingle(single::StartRequest),
    Stop(StopRequest),
}

/// Empty payload of the stop service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StopRequest {}

/// `<topic>/<suffix>`
pub fn service_name(topic_name: &str, suffix: &str) -> String {
    format!("{}/{}", topic_name, suffix)
}
