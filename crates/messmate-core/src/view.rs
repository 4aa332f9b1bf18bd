//! Render model: plain data describing one full frame of the shell.
//!
//! Frames are cheap to clone and compare, which is what the sinks and the
//! navigation tests lean on.

use crate::page::PageId;
use crate::record::{NoticeRecord, ReportRecord};

/// Product name, used as the fallback header and window title.
pub const APP_NAME: &str = "Messmate";

/// Identity badge label shown while signed out.
pub const GUEST_LABEL: &str = "Guest";

/// Identity badge initial shown while signed out.
pub const GUEST_INITIAL: char = '?';

// ---------------------------------------------------------------------------
// Frame pieces
// ---------------------------------------------------------------------------

/// Placeholder layout drawn while a transition settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonKind {
    /// Title bar over stacked list items.
    List,
    /// Title bar over a five-column table.
    Table,
    /// Title bar over a text block.
    Simple,
    /// Lock badge over an access message placeholder.
    Lock,
}

/// Header chrome: page title, window title, identity badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub title: String,
    pub window_title: String,
    pub user_label: String,
    pub user_initial: char,
}

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItemView {
    pub id: PageId,
    pub label: &'static str,
    pub glyph: &'static str,
    pub active: bool,
}

/// Everything below the navigation bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Skeleton(SkeletonKind),
    Home,
    Notices(Vec<NoticeRecord>),
    Report(Vec<ReportRecord>),
    AccountSignIn,
    AccountDetails { username: String, identifier: String },
    Locked { page_label: String },
    NotFound,
}

/// One complete frame: header, navigation bar, body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub header: HeaderView,
    pub nav: Vec<NavItemView>,
    pub body: Body,
}

/// Skeleton shown for a page's real content while it loads.
#[must_use]
pub fn content_skeleton(page: PageId) -> SkeletonKind {
    match page {
        PageId::Notice => SkeletonKind::List,
        PageId::Report => SkeletonKind::Table,
        PageId::Home | PageId::Account => SkeletonKind::Simple,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
