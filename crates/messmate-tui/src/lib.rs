//! messmate-tui: terminal surface for the messmate companion.

pub mod render;

/// Stable crate label used by bootstrap smoke tests.
#[must_use]
pub fn crate_label() -> &'static str {
    "messmate-tui"
}
