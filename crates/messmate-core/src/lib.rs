//! Core engine of the messmate companion: the name-to-identifier codec,
//! cached remote datasets, session persistence, and the navigation state
//! machine that turns all of it into renderable frames.
//!
//! The crate is UI-agnostic. Frontends implement [`nav::RenderSink`] and
//! feed navigation targets in; everything else stays in here.

pub mod cache;
pub mod fetch;
pub mod http;
pub mod ident;
pub mod login;
pub mod mock;
pub mod nav;
pub mod page;
pub mod record;
pub mod store;
pub mod view;

/// Crate name for diagnostics.
#[must_use]
pub fn crate_label() -> &'static str {
    "messmate-core"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "messmate-core");
    }
}
