//! Host adapter for the settings engine
//!
//! A [`PanelSession`] is the glue between the host panel and one variant of
//! the engine. It owns the current config, a memoizing tree builder, the
//! persistence port and the sending end of the service-call channel.
//!
//! # Architecture
//!
//! - [`Variant`] - Ties a variant's config, actions, tree and requests together
//! - [`Multi`] / [`Single`] - The two variants
//! - [`PanelSession`] - Drives one variant: dispatch, persist, start/stop
//! - [`ServiceReceiver`] - Transport-side handle for pending service calls
//!
//! # Example
//!
//! ```ignore
//! use refsig::config::MemoryStore;
//! use refsig::panel::{service_channel, Multi, PanelSession};
//!
//! let (calls, transport) = service_channel(16);
//! let mut session = PanelSession::<Multi, _>::new(host_state, MemoryStore::new(), calls);
//!
//! session.set_topics(topics);
//! let tree = session.tree();
//! session.apply_edit(&["general", "publishRate"], 10.0.into())?;
//! session.start()?;
//!
//! for call in transport.drain() {
//!     // Hand the call to the middleware
//! }
//! ```

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use crate::config::{StateStore, VariantKind};
use crate::error::{RefSigError, Result, SettingsError};
use crate::service::ServiceCall;
use crate::types::{FieldValue, Topic};
use crate::{multi, single};

/// One configuration schema with its engine operations
pub trait Variant {
    const KIND: VariantKind;

    type Config: Clone + PartialEq + fmt::Debug + Serialize;
    type PartialConfig: Default + DeserializeOwned;
    type Action: fmt::Debug;
    type Tree: Serialize;
    type Builder: Default;

    fn hydrate(partial: Self::PartialConfig) -> Self::Config;

    fn build_tree(
        builder: &mut Self::Builder,
        config: &Self::Config,
        topics: &[Topic],
    ) -> Self::Tree;

    fn reduce(config: &Self::Config, action: Self::Action) -> Self::Config;

    fn start_request(config: &Self::Config) -> ServiceCall;

    fn stop_request(config: &Self::Config) -> ServiceCall;

    /// Turn a host path and raw value into a field update
    fn parse_update(
        path: &[&str],
        value: FieldValue,
    ) -> std::result::Result<Self::Action, SettingsError>;

    /// Whether the field at a host path is edited through a select
    fn takes_text(path: &[&str]) -> std::result::Result<bool, SettingsError>;

    /// Turn a host action id into a node action
    fn parse_node_action(
        id: &str,
        index: Option<usize>,
    ) -> std::result::Result<Self::Action, SettingsError>;
}

/// Multi-signal variant marker
#[derive(Debug, Clone, Copy, Default)]
pub struct Multi;

/// Single-signal variant marker
#[derive(Debug, Clone, Copy, Default)]
pub struct Single;

impl Variant for Multi {
    const KIND: VariantKind = VariantKind::Multi;

    type Config = multi::Config;
    type PartialConfig = multi::PartialConfig;
    type Action = multi::Action;
    type Tree = multi::SettingsTree;
    type Builder = multi::TreeBuilder;

    fn hydrate(partial: Self::PartialConfig) -> Self::Config {
        multi::hydrate(partial)
    }

    fn build_tree(
        builder: &mut Self::Builder,
        config: &Self::Config,
        topics: &[Topic],
    ) -> Self::Tree {
        builder.build(config, topics)
    }

    fn reduce(config: &Self::Config, action: Self::Action) -> Self::Config {
        multi::reduce(config, action)
    }

    fn start_request(config: &Self::Config) -> ServiceCall {
        multi::start_request(config)
    }

    fn stop_request(config: &Self::Config) -> ServiceCall {
        multi::stop_request(config)
    }

    fn parse_update(
        path: &[&str],
        value: FieldValue,
    ) -> std::result::Result<Self::Action, SettingsError> {
        Ok(multi::FieldKey::from_path(path)?.with_value(value)?.into())
    }

    fn takes_text(path: &[&str]) -> std::result::Result<bool, SettingsError> {
        Ok(multi::FieldKey::from_path(path)?.takes_text())
    }

    fn parse_node_action(
        id: &str,
        index: Option<usize>,
    ) -> std::result::Result<Self::Action, SettingsError> {
        Ok(multi::NodeAction::from_id(id, index)?.into())
    }
}

impl Variant for Single {
    const KIND: VariantKind = VariantKind::Single;

    type Config = single::Config;
    type PartialConfig = single::PartialConfig;
    type Action = single::Action;
    type Tree = single::SettingsTree;
    type Builder = single::TreeBuilder;

    fn hydrate(partial: Self::PartialConfig) -> Self::Config {
        single::hydrate(partial)
    }

    fn build_tree(
        builder: &mut Self::Builder,
        config: &Self::Config,
        topics: &[Topic],
    ) -> Self::Tree {
        builder.build(config, topics)
    }

    fn reduce(config: &Self::Config, action: Self::Action) -> Self::Config {
        single::reduce(config, action)
    }

    fn start_request(config: &Self::Config) -> ServiceCall {
        single::start_request(config)
    }

    fn stop_request(config: &Self::Config) -> ServiceCall {
        single::stop_request(config)
    }

    fn parse_update(
        path: &[&str],
        value: FieldValue,
    ) -> std::result::Result<Self::Action, SettingsError> {
        Ok(single::FieldKey::from_path(path)?.with_value(value)?.into())
    }

    fn takes_text(path: &[&str]) -> std::result::Result<bool, SettingsError> {
        Ok(single::FieldKey::from_path(path)?.takes_text())
    }

    fn parse_node_action(
        id: &str,
        _index: Option<usize>,
    ) -> std::result::Result<Self::Action, SettingsError> {
        Err(SettingsError::UnknownAction(id.to_string()))
    }
}

/// Create the service-call channel shared by a session and the transport
pub fn service_channel(capacity: usize) -> (Sender<ServiceCall>, ServiceReceiver) {
    let (tx, rx) = bounded(capacity);
    (tx, ServiceReceiver { receiver: rx })
}

/// Transport-side end of the service-call channel
pub struct ServiceReceiver {
    pub receiver: Receiver<ServiceCall>,
}

impl ServiceReceiver {
    /// Try to receive a call without blocking
    pub fn try_recv(&self) -> Option<ServiceCall> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending calls
    pub fn drain(&self) -> Vec<ServiceCall> {
        let mut calls = Vec::new();
        while let Ok(call) = self.receiver.try_recv() {
            calls.push(call);
        }
        calls
    }
}

/// Settings session for one panel
pub struct PanelSession<V: Variant, S: StateStore> {
    config: V::Config,
    topics: Vec<Topic>,
    builder: V::Builder,
    store: S,
    calls: Sender<ServiceCall>,
}

impl<V: Variant, S: StateStore> PanelSession<V, S> {
    /// Start a session from the host's initial state
    ///
    /// A missing (`null`) state hydrates to defaults. A malformed one is
    /// logged and also replaced by defaults.
    pub fn new(initial_state: serde_json::Value, store: S, calls: Sender<ServiceCall>) -> Self {
        let partial = if initial_state.is_null() {
            V::PartialConfig::default()
        } else {
            serde_json::from_value(initial_state).unwrap_or_else(|e| {
                tracing::warn!("Malformed {} panel state, using defaults: {}", V::KIND, e);
                V::PartialConfig::default()
            })
        };

        let config = V::hydrate(partial);
        tracing::debug!("Hydrated {} config: {:?}", V::KIND, config);

        Self {
            config,
            topics: Vec::new(),
            builder: V::Builder::default(),
            store,
            calls,
        }
    }

    /// Start a session from whatever the store holds
    pub fn from_store(store: S, calls: Sender<ServiceCall>) -> Result<Self> {
        let state = store.load()?.unwrap_or(serde_json::Value::Null);
        Ok(Self::new(state, store, calls))
    }

    pub fn config(&self) -> &V::Config {
        &self.config
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the advertised topic list
    pub fn set_topics(&mut self, topics: Vec<Topic>) {
        tracing::debug!("Topic list updated: {} topic(s)", topics.len());
        self.topics = topics;
    }

    /// Project the current config onto a settings tree
    pub fn tree(&mut self) -> V::Tree {
        V::build_tree(&mut self.builder, &self.config, &self.topics)
    }

    /// Reduce an action into the config, persisting the result
    ///
    /// Returns whether the config changed.
    pub fn dispatch(&mut self, action: V::Action) -> bool {
        tracing::debug!("Dispatching {:?}", action);
        let next = V::reduce(&self.config, action);
        if next == self.config {
            return false;
        }

        self.config = next;
        self.persist();
        true
    }

    /// Apply a field edit addressed by host path
    pub fn apply_edit(&mut self, path: &[&str], value: FieldValue) -> Result<bool> {
        let action = V::parse_update(path, value)?;
        Ok(self.dispatch(action))
    }

    /// Invoke a node action by host action id
    pub fn invoke_action(&mut self, id: &str, index: Option<usize>) -> Result<bool> {
        let action = V::parse_node_action(id, index)?;
        Ok(self.dispatch(action))
    }

    /// Queue the start call for the current config
    pub fn start(&self) -> Result<()> {
        let call = V::start_request(&self.config);
        tracing::info!("Starting signal generator via {}", call.service);
        self.send(call)
    }

    /// Queue the stop call
    pub fn stop(&self) -> Result<()> {
        let call = V::stop_request(&self.config);
        tracing::info!("Stopping signal generator via {}", call.service);
        self.send(call)
    }

    fn send(&self, call: ServiceCall) -> Result<()> {
        self.calls.try_send(call).map_err(|e| match e {
            TrySendError::Full(call) => {
                RefSigError::Channel(format!("Service queue full, dropped {}", call.service))
            }
            TrySendError::Disconnected(call) => {
                RefSigError::Channel(format!("Transport gone, dropped {}", call.service))
            }
        })
    }

    fn persist(&mut self) {
        let state = match serde_json::to_value(&self.config) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Failed to serialize panel state: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.save(&state) {
            tracing::warn!("Failed to persist panel state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryStore, MockStateStore};
    use crate::service::ServiceRequest;
    use serde_json::json;

    fn multi_session(
        state: serde_json::Value,
    ) -> (PanelSession<Multi, MemoryStore>, ServiceReceiver) {
        let (tx, rx) = service_channel(4);
        (PanelSession::new(state, MemoryStore::new(), tx), rx)
    }

    #[test]
    fn test_null_state_hydrates_defaults() {
        let (session, _rx) = multi_session(serde_json::Value::Null);
        assert_eq!(session.config(), &multi::Config::default());
    }

    #[test]
    fn test_malformed_state_falls_back_to_defaults() {
        let (session, _rx) = multi_session(json!({"publishRate": "fast"}));
        assert_eq!(session.config(), &multi::Config::default());
    }

    #[test]
    fn test_dispatch_persists_changes() {
        let (mut session, _rx) = multi_session(json!({}));

        assert!(session.apply_edit(&["general", "publishRate"], 10.0.into()).unwrap());
        assert_eq!(session.store().saves(), 1);
        assert_eq!(session.store().state().unwrap()["publishRate"], 10.0);
    }

    #[test]
    fn test_noop_dispatch_does_not_persist() {
        let (mut session, _rx) = multi_session(json!({}));

        let changed = session.dispatch(multi::NodeAction::DeleteSignal { index: 9 }.into());
        assert!(!changed);
        assert_eq!(session.store().saves(), 0);
    }

    #[test]
    fn test_store_failure_is_not_propagated() {
        let mut store = MockStateStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(RefSigError::Config("disk full".to_string())));

        let (tx, _rx) = service_channel(1);
        let mut session = PanelSession::<Multi, _>::new(json!({}), store, tx);

        assert!(session.invoke_action("add-signal", None).unwrap());
        assert_eq!(session.config().signal_count(), 2);
    }

    #[test]
    fn test_from_store_loads_saved_state() {
        let mut store = MockStateStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Ok(Some(json!({"topicName": "/cmd", "signalType": "sine"}))));

        let (tx, _rx) = service_channel(1);
        let session = PanelSession::<Single, _>::from_store(store, tx).unwrap();
        assert_eq!(session.config().topic_name, "/cmd");
        assert_eq!(session.config().signal.signal_type, single::SignalType::Sine);
    }

    #[test]
    fn test_invalid_edit_is_rejected_before_reduce() {
        let (mut session, _rx) = multi_session(json!({}));

        let err = session
            .apply_edit(&["paths", "0", "signalType"], FieldValue::Number(3.0))
            .unwrap_err();
        assert!(matches!(err, RefSigError::Settings(SettingsError::TypeMismatch { .. })));
        assert_eq!(session.store().saves(), 0);
    }

    #[test]
    fn test_single_variant_has_no_node_actions() {
        let (tx, _rx) = service_channel(1);
        let mut session = PanelSession::<Single, _>::new(json!({}), MemoryStore::new(), tx);
        assert!(session.invoke_action("add-signal", None).is_err());
    }

    #[test]
    fn test_start_and_stop_reach_transport() {
        let (session, rx) = multi_session(json!({"topicName": "/ref"}));

        session.start().unwrap();
        session.stop().unwrap();

        let calls = rx.drain();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].service, "/ref/start");
        assert!(matches!(calls[0].request, ServiceRequest::StartMulti(_)));
        assert_eq!(calls[1].service, "/ref/stop");
    }

    #[test]
    fn test_full_channel_reports_error() {
        let (tx, _rx) = service_channel(1);
        let session = PanelSession::<Multi, _>::new(json!({}), MemoryStore::new(), tx);

        session.start().unwrap();
        assert!(matches!(session.start(), Err(RefSigError::Channel(_))));
    }

    #[test]
    fn test_disconnected_channel_reports_error() {
        let (tx, rx) = service_channel(1);
        drop(rx);
        let session = PanelSession::<Multi, _>::new(json!({}), MemoryStore::new(), tx);
        assert!(matches!(session.stop(), Err(RefSigError::Channel(_))));
    }
}
