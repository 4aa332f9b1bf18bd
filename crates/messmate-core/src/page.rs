//! The fixed set of pages the shell can show and their chrome metadata.

use std::fmt;

// ---------------------------------------------------------------------------
// PageId
// ---------------------------------------------------------------------------

/// One of the four navigable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Home,
    Notice,
    Report,
    Account,
}

impl PageId {
    /// Every page, in the order the navigation bar lists them.
    pub const ORDER: [PageId; 4] = [
        PageId::Home,
        PageId::Notice,
        PageId::Report,
        PageId::Account,
    ];

    /// Human-readable label shown in headers and the navigation bar.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PageId::Home => "Home",
            PageId::Notice => "Notice",
            PageId::Report => "Report",
            PageId::Account => "Account",
        }
    }

    /// Stable lowercase id used in commands and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Home => "home",
            PageId::Notice => "notice",
            PageId::Report => "report",
            PageId::Account => "account",
        }
    }

    /// Glyph drawn next to the label in the navigation bar.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            PageId::Home => "⌂",
            PageId::Notice => "◆",
            PageId::Report => "▦",
            PageId::Account => "●",
        }
    }

    /// Whether the page's content is reserved for signed-in members.
    ///
    /// Account stays open so signed-out users can reach the sign-in form.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        !matches!(self, PageId::Account)
    }

    /// Parse a lowercase page id. Anything else is not a page.
    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "home" => Some(PageId::Home),
            "notice" => Some(PageId::Notice),
            "report" => Some(PageId::Report),
            "account" => Some(PageId::Account),
            _ => None,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
