#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Tests for the sign-in flow and sign-out reset.
//!
//! Covers:
//! - the three rejection messages, in validation order
//! - rejected attempts leaving no session and rendering nothing
//! - the happy path: stored proper-cased session, wording of the
//!   feedback, and the delayed redirect home
//! - logout clearing the session pair and both dataset caches

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use messmate_core::cache::CacheConfig;
use messmate_core::login::sign_in;
use messmate_core::mock::{MockDatasetFetcher, RecordingSink};
use messmate_core::nav::{Navigator, NavigatorConfig, RenderSink, Target};
use messmate_core::page::PageId;
use messmate_core::record::DatasetKind;
use messmate_core::store::{MemoryKeyValueStore, Session};
use messmate_core::view::{Body, SkeletonKind};

// ── Helpers ──

fn fast_config() -> NavigatorConfig {
    NavigatorConfig {
        min_transition_delay: Duration::from_millis(10),
        redirect_delay: Duration::from_millis(20),
        cache: CacheConfig::default(),
    }
}

fn navigator_with(fetcher: Arc<MockDatasetFetcher>) -> (Arc<Navigator>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let nav = Arc::new(Navigator::with_config(
        fetcher,
        Arc::new(MemoryKeyValueStore::new()),
        Arc::clone(&sink) as Arc<dyn RenderSink>,
        fast_config(),
    ));
    (nav, sink)
}

// ── Rejections ──

#[tokio::test]
async fn sign_in_rejects_names_without_enough_letters() {
    let (nav, sink) = navigator_with(Arc::new(MockDatasetFetcher::new()));

    let feedback = sign_in(&nav, "a", "00000").await;

    assert!(feedback.is_error());
    assert_eq!(feedback.text, "Invalid Username or ID.");
    assert_eq!(nav.session().current().unwrap(), None);
    assert_eq!(sink.frame_count(), 0);
}

#[tokio::test]
async fn sign_in_rejects_malformed_identifiers() {
    let (nav, sink) = navigator_with(Arc::new(MockDatasetFetcher::new()));

    for supplied in ["123", "123456", "12a45", ""] {
        let feedback = sign_in(&nav, "bob", supplied).await;
        assert!(feedback.is_error());
        assert_eq!(
            feedback.text,
            "ID must be exactly 5 digits and contain only numbers."
        );
    }
    assert_eq!(nav.session().current().unwrap(), None);
    assert_eq!(sink.frame_count(), 0);
}

#[tokio::test]
async fn sign_in_rejects_a_mismatched_identifier_and_names_the_expected_one() {
    let (nav, _sink) = navigator_with(Arc::new(MockDatasetFetcher::new()));

    let feedback = sign_in(&nav, "bob", "11111").await;

    assert!(feedback.is_error());
    assert_eq!(
        feedback.text,
        "Login failed. The entered ID does not match the ID calculated for this name. \
         (Calculated ID for your name: 26870)"
    );
    assert_eq!(nav.session().current().unwrap(), None);
}

// ── Happy path ──

#[tokio::test]
async fn sign_in_persists_the_session_and_redirects_home_after_the_delay() {
    let (nav, sink) = navigator_with(Arc::new(MockDatasetFetcher::new()));
    nav.start().await;
    nav.navigate_to(Target::Page(PageId::Account)).await;
    sink.clear();

    let feedback = sign_in(&nav, "abid ahmed", "26870").await;

    assert!(!feedback.is_error());
    assert_eq!(
        feedback.text,
        "Login successful! Welcome, Abid Ahmed. Your ID 26870 has been verified. Redirecting..."
    );
    assert_eq!(
        nav.session().current().unwrap(),
        Some(Session {
            username: "Abid Ahmed".to_string(),
            identifier: "26870".to_string(),
        })
    );
    // The redirect has not fired yet.
    assert_eq!(sink.frame_count(), 0);

    tokio::time::sleep(Duration::from_millis(80)).await;

    let frames = sink.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].body, Body::Skeleton(SkeletonKind::Simple));
    assert_eq!(frames[0].header.title, "Home");
    assert_eq!(frames[1].body, Body::Home);
    assert_eq!(frames[1].header.user_label, "Abid Ahmed");
    assert_eq!(frames[1].header.user_initial, 'A');
}

// ── Sign-out ──

#[tokio::test]
async fn logout_clears_the_session_and_both_caches_and_lands_home_locked() {
    let fetcher = Arc::new(
        MockDatasetFetcher::new()
            .with_response(DatasetKind::Notice, json!([{ "title": "Before" }]))
            .with_response(DatasetKind::Notice, json!([{ "title": "After" }])),
    );
    let (nav, sink) = navigator_with(Arc::clone(&fetcher));
    nav.session().login("bob", "26870").unwrap();
    nav.start().await;
    nav.navigate_to(Target::Page(PageId::Notice)).await;
    assert_eq!(fetcher.call_count(), 1);
    sink.clear();

    nav.logout().await.unwrap();

    assert_eq!(nav.session().current().unwrap(), None);
    let frames = sink.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].body, Body::Skeleton(SkeletonKind::Lock));
    assert_eq!(frames[0].header.user_label, "Guest");
    assert_eq!(
        frames[1].body,
        Body::Locked {
            page_label: "Home".to_string()
        }
    );

    // The notice cache went with the session: a fresh sign-in refetches.
    nav.session().login("bob", "26870").unwrap();
    nav.navigate_to(Target::Page(PageId::Notice)).await;
    assert_eq!(fetcher.call_count(), 2);
    match sink.last_frame().map(|frame| frame.body) {
        Some(Body::Notices(records)) => assert_eq!(records[0].title, "After"),
        other => panic!("expected notices body, got {other:?}"),
    }
}
