//! Single-signal variant
//!
//! One `Float64` topic driven by one signal descriptor, stored flat next to
//! the publish parameters. Kept separate from [`crate::multi`]: the two
//! schemas differ in fields (`stepTime` here, `phase`/`endTime` there) and
//! in the set of signal types.

pub mod address;
pub mod config;
pub mod reducer;
pub mod request;
pub mod tree;

pub use address::{Action, FieldKey, FieldUpdate, NoNodeAction, SignalField, SignalUpdate};
pub use config::{
    default_signal, hydrate, Config, PartialConfig, SignalParameters, SignalType, TOPIC_SCHEMA,
};
pub use reducer::reduce;
pub use request::{start_request, stop_request, StartRequest};
pub use tree::{build_tree, Node, SettingsTree, TreeBuilder};
