//! Name-to-identifier codec backing the password-free sign-in scheme.
//!
//! An identifier is derived deterministically from a member's name: sum the
//! 1-based alphabet positions of its letters, expand the sum by the square
//! root of two, and keep the first five decimal digits. Anyone who knows a
//! name can recompute its identifier; the scheme verifies that a member was
//! handed the right string, nothing more.

use std::sync::OnceLock;

use regex::Regex;

/// Identifier issued for names without enough letters to derive one.
pub const SENTINEL_IDENTIFIER: &str = "00000";

/// Smallest alphabetic position sum a derivable name must reach.
pub const MIN_POSITION_SUM: u32 = 4;

/// Exact shape of every identifier: five ASCII digits.
const IDENTIFIER_PATTERN: &str = r"^\d{5}$";

/// Sum the 1-based alphabet positions (a=1 .. z=26) of the letters in
/// `name`. Case and every non-letter character are ignored, so
/// "Mary-Ann" and "maryann" sum identically.
#[must_use]
pub fn alphabetic_position_sum(name: &str) -> u32 {
    name.chars()
        .map(|ch| ch.to_ascii_lowercase())
        .filter(char::is_ascii_lowercase)
        .map(|ch| ch as u32 - 'a' as u32 + 1)
        .sum()
}

/// Derive the five-digit identifier for `name`.
///
/// Names summing below [`MIN_POSITION_SUM`] get the all-zero sentinel. The
/// expansion multiplies the sum by sqrt(2) in `f64`; identifiers already
/// issued depend on double-precision semantics, so the width is load-bearing.
#[must_use]
pub fn derive_identifier(name: &str) -> String {
    let sum = alphabetic_position_sum(name);
    if sum < MIN_POSITION_SUM {
        return SENTINEL_IDENTIFIER.to_string();
    }

    let expanded = (f64::from(sum) * std::f64::consts::SQRT_2 * 100_000.0).floor();
    let digits = format!("{expanded:.0}");
    let leading: String = digits.chars().take(5).collect();
    // Sums >= 4 always expand to at least six digits; the pad guards the
    // contract rather than a reachable case.
    format!("{leading:0>5}")
}

/// Whether `value` has the exact shape of an identifier.
#[must_use]
pub fn is_identifier_shape(value: &str) -> bool {
    match identifier_regex() {
        Some(pattern) => pattern.is_match(value),
        None => false,
    }
}

/// Check a supplied identifier against the one derived from `name`.
///
/// True only when the name is derivable, the supplied string is shaped like
/// an identifier, and the two match exactly. Malformed input is rejected
/// before any comparison happens.
#[must_use]
pub fn validate_login(name: &str, supplied: &str) -> bool {
    if alphabetic_position_sum(name) < MIN_POSITION_SUM {
        return false;
    }
    if !is_identifier_shape(supplied) {
        return false;
    }
    supplied == derive_identifier(name)
}

/// Proper-case a name for display and storage: trim, collapse whitespace
/// runs, capitalize each word ("abid ahmed" -> "Abid Ahmed").
#[must_use]
pub fn proper_case(name: &str) -> String {
    name.split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First character of a stored name, upper-cased, for the header badge.
/// Callers supply their own fallback badge for signed-out users.
#[must_use]
pub fn display_initial(name: &str) -> char {
    name.chars()
        .next()
        .map(|ch| ch.to_uppercase().next().unwrap_or(ch))
        .unwrap_or('?')
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::new();
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

fn identifier_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(IDENTIFIER_PATTERN).ok())
        .as_ref()
}
