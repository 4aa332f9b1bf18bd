//! Navigation: the transition state machine and frame assembly.
//!
//! Every navigation runs the same cycle. Chrome and a skeleton for the new
//! target render immediately, the minimum delay keeps the skeleton from
//! flashing, then the resolved content replaces it. A generation counter
//! makes the newest navigation the only one allowed to land its content.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, DatasetCache};
use crate::fetch::DatasetFetcher;
use crate::ident::display_initial;
use crate::page::PageId;
use crate::record::{DatasetKind, NoticeRecord, ReportRecord};
use crate::store::{KeyValueStore, Session, SessionStore, StoreError};
use crate::view::{
    content_skeleton, Body, Frame, HeaderView, NavItemView, SkeletonKind, APP_NAME, GUEST_INITIAL,
    GUEST_LABEL,
};

// ---------------------------------------------------------------------------
// Target and phase
// ---------------------------------------------------------------------------

/// Where a navigation is headed: a known page or an unknown raw id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Page(PageId),
    Unknown(String),
}

impl Target {
    /// Interpret a raw id. Anything that is not a page id still navigates,
    /// into the not-found view.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match PageId::from_str(raw) {
            Some(page) => Target::Page(page),
            None => Target::Unknown(raw.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Target::Page(page) => page.as_str(),
            Target::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the navigator currently is in the transition cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavPhase {
    Idle(Target),
    Transitioning { from: Target, to: Target },
}

// ---------------------------------------------------------------------------
// NavigatorConfig
// ---------------------------------------------------------------------------

/// Timing and cache knobs, with the production values as defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Floor on how long a skeleton stays visible.
    pub min_transition_delay: Duration,
    /// Pause between a successful sign-in and the jump home.
    pub redirect_delay: Duration,
    /// Invalidation policy applied to both dataset caches.
    pub cache: CacheConfig,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            min_transition_delay: Duration::from_millis(500),
            redirect_delay: Duration::from_millis(1000),
            cache: CacheConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// RenderSink
// ---------------------------------------------------------------------------

/// Wherever frames end up: a terminal, a test recorder.
pub trait RenderSink: Send + Sync {
    fn render(&self, frame: &Frame);
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Owns the session, both dataset caches, and the transition cycle.
pub struct Navigator {
    session: SessionStore,
    notices: DatasetCache<NoticeRecord>,
    reports: DatasetCache<ReportRecord>,
    sink: Arc<dyn RenderSink>,
    config: NavigatorConfig,
    phase: Mutex<NavPhase>,
    generation: AtomicU64,
}

impl Navigator {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn DatasetFetcher>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        Self::with_config(fetcher, store, sink, NavigatorConfig::default())
    }

    #[must_use]
    pub fn with_config(
        fetcher: Arc<dyn DatasetFetcher>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn RenderSink>,
        config: NavigatorConfig,
    ) -> Self {
        Self {
            session: SessionStore::new(store),
            notices: DatasetCache::with_config(
                DatasetKind::Notice,
                Arc::clone(&fetcher),
                config.cache.clone(),
            ),
            reports: DatasetCache::with_config(DatasetKind::Report, fetcher, config.cache.clone()),
            sink,
            config,
            phase: Mutex::new(NavPhase::Idle(Target::Page(PageId::Home))),
            generation: AtomicU64::new(0),
        }
    }

    /// Session reader/writer shared with the sign-in flow.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Snapshot of the transition phase.
    #[must_use]
    pub fn phase(&self) -> NavPhase {
        self.lock_phase().clone()
    }

    /// Run the initial transition into Home. The cycle runs even though
    /// Home is already the resting target, exactly like app start.
    pub async fn start(&self) {
        self.transition(Target::Page(PageId::Home), true).await;
    }

    /// Navigate to `target`. Navigating to the already-active target is a
    /// no-op: no skeleton, no re-render.
    pub async fn navigate_to(&self, target: Target) {
        self.transition(target, false).await;
    }

    /// Sign out: clear the session pair, drop both dataset caches, land on
    /// Home. Nothing survives except the rendered shell.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.session.logout()?;
        self.notices.reset().await;
        self.reports.reset().await;
        info!("signed out; session and caches cleared");
        self.transition(Target::Page(PageId::Home), true).await;
        Ok(())
    }

    async fn transition(&self, target: Target, force: bool) {
        {
            let mut phase = self.lock_phase();
            let active = match &*phase {
                NavPhase::Idle(current) => current.clone(),
                NavPhase::Transitioning { to, .. } => to.clone(),
            };
            if !force && active == target {
                return;
            }
            *phase = NavPhase::Transitioning {
                from: active,
                to: target.clone(),
            };
        }

        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(to = %target, "navigating");

        // Chrome already belongs to the new target while the skeleton is up.
        let session = self.current_session();
        let skeleton = skeleton_for(&target, session.as_ref());
        self.sink
            .render(&frame_for(&target, session.as_ref(), Body::Skeleton(skeleton)));

        sleep(self.config.min_transition_delay).await;

        let session = self.current_session();
        let body = self.resolve_body(&target, session.as_ref()).await;
        if self.generation.load(Ordering::SeqCst) != token {
            debug!(to = %target, "transition superseded; dropping stale frame");
            return;
        }

        self.sink.render(&frame_for(&target, session.as_ref(), body));
        *self.lock_phase() = NavPhase::Idle(target);
    }

    /// Resolve the content body for `target`. The locked view never
    /// touches the caches, so signed-out navigation stays free of fetches.
    async fn resolve_body(&self, target: &Target, session: Option<&Session>) -> Body {
        let page = match target {
            Target::Page(page) => *page,
            Target::Unknown(_) => return Body::NotFound,
        };

        if page.requires_auth() && session.is_none() {
            return Body::Locked {
                page_label: page.label().to_string(),
            };
        }

        match page {
            PageId::Home => Body::Home,
            PageId::Notice => Body::Notices(self.notices.get().await.as_ref().clone()),
            PageId::Report => Body::Report(self.reports.get().await.as_ref().clone()),
            PageId::Account => match session {
                Some(session) => Body::AccountDetails {
                    username: session.username.clone(),
                    identifier: session.identifier.clone(),
                },
                None => Body::AccountSignIn,
            },
        }
    }

    fn current_session(&self) -> Option<Session> {
        match self.session.current() {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "could not read session state; treating as signed out");
                None
            }
        }
    }

    fn lock_phase(&self) -> MutexGuard<'_, NavPhase> {
        match self.phase.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

// ---------------------------------------------------------------------------
// Frame assembly
// ---------------------------------------------------------------------------

fn frame_for(target: &Target, session: Option<&Session>, body: Body) -> Frame {
    Frame {
        header: header_for(target, session),
        nav: nav_for(target),
        body,
    }
}

fn header_for(target: &Target, session: Option<&Session>) -> HeaderView {
    let (title, window_title) = match target {
        Target::Page(page) => (
            page.label().to_string(),
            format!("{} - {APP_NAME}", page.label()),
        ),
        Target::Unknown(_) => (APP_NAME.to_string(), APP_NAME.to_string()),
    };
    let (user_label, user_initial) = match session {
        Some(session) => (
            session.username.clone(),
            display_initial(&session.username),
        ),
        None => (GUEST_LABEL.to_string(), GUEST_INITIAL),
    };
    HeaderView {
        title,
        window_title,
        user_label,
        user_initial,
    }
}

fn nav_for(target: &Target) -> Vec<NavItemView> {
    PageId::ORDER
        .iter()
        .map(|page| NavItemView {
            id: *page,
            label: page.label(),
            glyph: page.glyph(),
            active: matches!(target, Target::Page(active) if active == page),
        })
        .collect()
}

fn skeleton_for(target: &Target, session: Option<&Session>) -> SkeletonKind {
    match target {
        Target::Page(page) => {
            if page.requires_auth() && session.is_none() {
                SkeletonKind::Lock
            } else {
                content_skeleton(*page)
            }
        }
        Target::Unknown(_) => SkeletonKind::Simple,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
