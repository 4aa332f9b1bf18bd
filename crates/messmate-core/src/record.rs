//! Record shapes for the two remote datasets and the dataset kind tag.
//!
//! The sheet endpoints emit JSON arrays of loosely-typed objects; every
//! field defaults when absent so a sparse row still deserializes.

use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DatasetKind
// ---------------------------------------------------------------------------

/// Which remote dataset a fetch or cache refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Notice,
    Report,
}

impl DatasetKind {
    /// Every dataset kind.
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Notice, DatasetKind::Report];

    /// Stable lowercase name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Notice => "notice",
            DatasetKind::Report => "report",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One published notice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NoticeRecord {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// One member row of the monthly report.
///
/// Numeric fields are `f64` because the endpoint emits JS numbers and
/// fractional meal counts occur in practice.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ReportRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "totalMeal")]
    pub total_meal: f64,
    #[serde(default, rename = "totalDays")]
    pub total_days: f64,
    #[serde(default)]
    pub pay: f64,
    #[serde(default)]
    pub status: String,
}

/// Styling role a report status maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRole {
    Positive,
    Negative,
    Neutral,
}

impl ReportRecord {
    /// Map the free-text `status` to a styling role, case-insensitively.
    /// Anything besides "paid" and "due" is neutral.
    #[must_use]
    pub fn status_role(&self) -> StatusRole {
        match self.status.trim().to_ascii_lowercase().as_str() {
            "paid" => StatusRole::Positive,
            "due" => StatusRole::Negative,
            _ => StatusRole::Neutral,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn dataset_kinds_have_stable_names() {
        let names: Vec<&str> = DatasetKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.join("|"), "notice|report");
        assert_eq!(DatasetKind::Report.to_string(), "report");
    }

    #[test]
    fn notice_deserializes_with_all_fields() {
        let record: NoticeRecord = serde_json::from_value(json!({
            "date": "2026-08-01",
            "title": "Gas refill",
            "text": "Cylinder arrives Friday.",
        }))
        .unwrap();
        assert_eq!(record.title, "Gas refill");
        assert_eq!(record.date, "2026-08-01");
    }

    #[test]
    fn notice_defaults_missing_fields() {
        let record: NoticeRecord = serde_json::from_value(json!({ "title": "Bare" })).unwrap();
        assert_eq!(record.title, "Bare");
        assert_eq!(record.date, "");
        assert_eq!(record.text, "");
    }

    #[test]
    fn report_maps_camel_case_keys() {
        let record: ReportRecord = serde_json::from_value(json!({
            "name": "Abid Ahmed",
            "totalMeal": 42.5,
            "totalDays": 30,
            "pay": 3150,
            "status": "Paid",
        }))
        .unwrap();
        assert_eq!(record.name, "Abid Ahmed");
        assert!((record.total_meal - 42.5).abs() < f64::EPSILON);
        assert!((record.total_days - 30.0).abs() < f64::EPSILON);
        assert!((record.pay - 3150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn report_defaults_missing_fields() {
        let record: ReportRecord = serde_json::from_value(json!({ "name": "Jo" })).unwrap();
        assert_eq!(record.name, "Jo");
        assert_eq!(record.total_meal, 0.0);
        assert_eq!(record.status, "");
    }

    #[test]
    fn record_arrays_deserialize_as_vecs() {
        let records: Vec<ReportRecord> = serde_json::from_value(json!([
            { "name": "A", "pay": 1 },
            { "name": "B", "pay": 2 },
        ]))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "B");
    }

    #[test]
    fn status_role_is_case_insensitive() {
        let role = |status: &str| ReportRecord {
            status: status.to_string(),
            ..ReportRecord::default()
        }
        .status_role();

        assert_eq!(role("paid"), StatusRole::Positive);
        assert_eq!(role("PAID"), StatusRole::Positive);
        assert_eq!(role(" Due "), StatusRole::Negative);
        assert_eq!(role("overdue"), StatusRole::Neutral);
        assert_eq!(role(""), StatusRole::Neutral);
    }
}
