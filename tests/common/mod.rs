//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use refsig::Topic;

/// Schema of multi-signal topics
pub const MULTI_SCHEMA: &str = "std_msgs/msg/Float64MultiArray";

/// Schema of single-signal topics
pub const SINGLE_SCHEMA: &str = "std_msgs/msg/Float64";

/// A mixed topic list as a middleware would advertise it
pub fn sample_topics() -> Vec<Topic> {
    vec![
        Topic::new("/ref", MULTI_SCHEMA),
        Topic::new("/cmd", SINGLE_SCHEMA),
        Topic::new("/diagnostics", "diagnostic_msgs/msg/DiagnosticArray"),
        Topic::new("/ref_b", MULTI_SCHEMA),
    ]
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
