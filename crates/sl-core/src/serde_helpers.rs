//! Serde default helpers shared by the config types.

/// Serde default that returns `true`, for switches that are on unless disabled.
pub fn default_true() -> bool {
    true
}
