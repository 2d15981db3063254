//! Multi-signal variant
//!
//! One topic of type `Float64MultiArray`, with one independent signal
//! descriptor per array element.
//!
//! - [`config`]: the stored model and its hydration
//! - [`address`]: typed field addresses and updates
//! - [`tree`]: projection of a config onto a settings tree
//! - [`reducer`]: pure action reducer
//! - [`request`]: start/stop service calls

pub mod address;
pub mod config;
pub mod reducer;
pub mod request;
pub mod tree;

pub use address::{Action, FieldKey, FieldUpdate, NodeAction, SignalField, SignalUpdate};
pub use config::{
    default_signal, hydrate, Config, PartialConfig, SignalList, SignalParameters, SignalType,
    TOPIC_SCHEMA,
};
pub use reducer::reduce;
pub use request::{start_request, stop_request, StartRequest};
pub use tree::{build_tree, Node, SettingsTree, TreeBuilder};
