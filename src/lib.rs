//! # refsig: Reference Signal Generator Settings
//!
//! Configuration engine for a reference-signal generator panel. The panel
//! lets an operator describe one or more waveforms (step, ramp, spline, sine,
//! square, triangle, sawtooth, chirp), browse them in a settings sidebar, and
//! start/stop a generator node through two services under its topic.
//!
//! ## Architecture
//!
//! Two variants live side by side and never share a config type:
//!
//! - **multi** ([`multi`]): a list of signals published as one
//!   `Float64MultiArray`
//! - **single** ([`single`]): one flat signal published as a `Float64`
//!
//! Each variant has the same four pieces:
//!
//! - **Config model**: `hydrate(partial) -> Config`
//! - **Tree builder**: `(Config, topics) -> SettingsTree`, memoized on `Arc`
//!   identity
//! - **Reducer**: `(Config, Action) -> Config`, never mutating its input
//! - **Requests**: `Config -> ServiceCall` for start and stop
//!
//! Around them:
//!
//! - **Settings**: the declarative tree shared by both variants ([`settings`])
//! - **Panel**: the host adapter, persistence and service channel ([`panel`])
//! - **Config**: state files, stores and topic lists ([`config`])
//!
//! ## Example
//!
//! ```ignore
//! use refsig::multi::{self, FieldKey, SignalField};
//!
//! let config = multi::hydrate(serde_json::from_str(r#"{"topicName":"/ref"}"#)?);
//! let tree = multi::build_tree(&config, &topics);
//!
//! let key = FieldKey::Signal { index: 0, field: SignalField::FinalValue };
//! let config = multi::reduce(&config, key.with_value(5.0.into())?.into());
//!
//! let call = multi::start_request(&config);
//! assert_eq!(call.service, "/ref/start");
//! ```

pub mod config;
pub mod error;
pub mod multi;
pub mod panel;
pub mod service;
pub mod settings;
pub mod single;
pub mod types;

// Re-export commonly used types
pub use config::{JsonFileStore, MemoryStore, PanelStateFile, StateStore, VariantKind};
pub use error::{RefSigError, Result, ResultExt, SettingsError};
pub use panel::{service_channel, Multi, PanelSession, ServiceReceiver, Single, Variant};
pub use service::{ServiceCall, ServiceRequest, StopRequest};
pub use types::{FieldValue, TimeBound, Topic};
