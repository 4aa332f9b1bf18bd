//! Turning a [`Frame`] into fixed-width terminal lines.
//!
//! The header sits on top and the navigation bar on the bottom, keeping
//! the "menu below" wording of the pages honest. Numbers render the way
//! the endpoints emit them, with no trailing fraction on whole amounts.

use messmate_core::record::{NoticeRecord, ReportRecord, StatusRole};
use messmate_core::view::{Body, Frame, HeaderView, NavItemView, SkeletonKind};

const FRAME_WIDTH: usize = 78;
const BADGE_WIDTH: usize = 20;

/// Render one frame as plain text lines, top to bottom.
#[must_use]
pub fn render_frame_lines(frame: &Frame) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(header_line(&frame.header));
    lines.push(rule());
    lines.extend(body_lines(&frame.body));
    lines.push(rule());
    lines.push(nav_line(&frame.nav));
    lines.push("help for commands  exit: quit".to_string());
    lines
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn header_line(header: &HeaderView) -> String {
    let badge = trim(
        &format!("({}) {}", header.user_initial, header.user_label),
        BADGE_WIDTH,
    );
    let title = trim(&header.title, FRAME_WIDTH - BADGE_WIDTH);
    format!(
        "{title:<left$}{badge:>right$}",
        left = FRAME_WIDTH - BADGE_WIDTH,
        right = BADGE_WIDTH
    )
}

fn nav_line(items: &[NavItemView]) -> String {
    items
        .iter()
        .map(|item| {
            if item.active {
                format!("[{} {}]", item.glyph, item.label)
            } else {
                format!(" {} {} ", item.glyph, item.label)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn rule() -> String {
    "─".repeat(FRAME_WIDTH)
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

fn body_lines(body: &Body) -> Vec<String> {
    match body {
        Body::Skeleton(kind) => skeleton_lines(*kind),
        Body::Home => vec![
            "Welcome Home!".to_string(),
            String::new(),
            "This is the main dashboard content. Your current status is up-to-date.".to_string(),
            "Feel free to navigate using the menu below.".to_string(),
        ],
        Body::Notices(records) => notice_lines(records),
        Body::Report(records) => report_lines(records),
        Body::AccountSignIn => vec![
            "Sign in".to_string(),
            String::new(),
            "login <your name> <five-digit id>".to_string(),
            "[Make sure to have a proper internet connection.]".to_string(),
            String::new(),
            "Forgot ID? Try to recover it.".to_string(),
            "recover <admin key> <your registered name>".to_string(),
        ],
        Body::AccountDetails {
            username,
            identifier,
        } => account_lines(username, identifier),
        Body::Locked { page_label } => vec![
            "Access Restricted".to_string(),
            String::new(),
            format!("Please log in to view the {page_label} section."),
            String::new(),
            format!("[ Create an Account to Access {page_label} ]  (go: account)"),
        ],
        Body::NotFound => vec![
            "404 Not Found".to_string(),
            String::new(),
            "The requested page does not exist.".to_string(),
        ],
    }
}

fn notice_lines(records: &[NoticeRecord]) -> Vec<String> {
    let mut lines = vec!["Latest Notices".to_string(), String::new()];
    if records.is_empty() {
        lines.push("No notices available or failed to load notices.".to_string());
        return lines;
    }
    for record in records {
        if record.date.trim().is_empty() {
            lines.push(format!("◆ {}", record.title));
        } else {
            lines.push(format!("◆ {}  ({})", record.title, record.date));
        }
        if !record.text.trim().is_empty() {
            lines.push(format!("  {}", record.text));
        }
        lines.push(String::new());
    }
    let _ = lines.pop();
    lines
}

fn report_lines(records: &[ReportRecord]) -> Vec<String> {
    let mut lines = vec!["Monthly Report Summary".to_string(), String::new()];
    if records.is_empty() {
        lines.push("No report data available or failed to load reports.".to_string());
        return lines;
    }
    lines.push(format!(
        "{:<16} {:>10} {:>10} {:>8} {:>8}",
        "Name", "Total Meal", "Total Days", "Pay", "Due"
    ));
    for record in records {
        let due = format!(
            "{} {}",
            status_marker(record.status_role()),
            trim(&record.status, 6)
        );
        lines.push(format!(
            "{:<16} {:>10} {:>10} {:>8} {:>8}",
            trim(&record.name, 16),
            record.total_meal,
            record.total_days,
            record.pay,
            due
        ));
    }
    lines
}

fn account_lines(username: &str, identifier: &str) -> Vec<String> {
    let identifier = if identifier.is_empty() {
        "N/A"
    } else {
        identifier
    };
    vec![
        "Your Account Details".to_string(),
        String::new(),
        format!("Welcome back, {username}!"),
        String::new(),
        format!("Your Name: {username}"),
        format!("Your ID: {identifier}"),
        String::new(),
        "Your account is active and secured.".to_string(),
        "Log Out: logout".to_string(),
    ]
}

fn skeleton_lines(kind: SkeletonKind) -> Vec<String> {
    match kind {
        SkeletonKind::List => {
            let mut lines = vec!["▓".repeat(18), String::new()];
            for _ in 0..3 {
                lines.push(format!("{}   {}", "▓".repeat(8), "▓".repeat(6)));
                lines.push("░".repeat(44));
                lines.push("░".repeat(20));
                lines.push(String::new());
            }
            let _ = lines.pop();
            lines
        }
        SkeletonKind::Table => {
            let mut lines = vec!["▓".repeat(18), String::new()];
            lines.push(format!("{0} {0} {0} {0} {1}", "▓".repeat(12), "▓".repeat(8)));
            for _ in 0..5 {
                lines.push(format!("{0} {0} {0} {0} {1}", "░".repeat(12), "░".repeat(8)));
            }
            lines
        }
        SkeletonKind::Simple => vec![
            "▓".repeat(18),
            String::new(),
            "░".repeat(52),
            "░".repeat(28),
            "▒".repeat(60),
            "▒".repeat(60),
            "▒".repeat(60),
        ],
        SkeletonKind::Lock => vec![
            "▣".to_string(),
            "Access Restricted".to_string(),
            "Loading access message...".to_string(),
            "▒".repeat(44),
        ],
    }
}

fn status_marker(role: StatusRole) -> char {
    match role {
        StatusRole::Positive => '✓',
        StatusRole::Negative => '✗',
        StatusRole::Neutral => '·',
    }
}

fn trim(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    if max <= 1 {
        return value.chars().take(max).collect();
    }
    let mut out: String = value.chars().take(max - 1).collect();
    out.push('~');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
