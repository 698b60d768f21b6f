//! # Validation Rules
//!
//! Pure checks that turn untrusted request payloads into normalized values
//! ready for persistence, or into a list of field-scoped issues.
//!
//! Payload fields arrive as raw [`serde_json::Value`]s so that a wrong type
//! (a string where a number is expected, a missing key) is reported as an
//! ordinary issue next to every other problem in the same payload, instead of
//! aborting deserialization at the first mismatch.
//!
//! ## Rules
//!
//! - **Names** (business name, service name): string, trimmed, 2 to 100
//!   characters.
//! - **Duration**: integer minutes in `[15, 480]`.
//! - **Day of week**: integer in `[0, 6]`, 0 being Sunday.
//! - **Times**: zero-padded 24-hour `HH:MM`; start strictly before end.
//!
//! Availability lists carry no cross-entry rule: overlapping windows and
//! repeated days are accepted.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    availability::{AvailabilityRequest, NewAvailability},
    profile::{NewProfile, ProfileRequest},
    service::{NewService, ServiceRequest},
};
use crate::slug::slugify;

/// Minimum length, in characters, of a trimmed name
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum length, in characters, of a trimmed name
pub const NAME_MAX_CHARS: usize = 100;
/// Shortest bookable service, in minutes
pub const DURATION_MIN_MINUTES: i64 = 15;
/// Longest bookable service, in minutes
pub const DURATION_MAX_MINUTES: i64 = 480;
/// Sunday
pub const DAY_OF_WEEK_MIN: i64 = 0;
/// Saturday
pub const DAY_OF_WEEK_MAX: i64 = 6;

// Zero-padded hours only, so that string order and clock order agree.
static TIME_OF_DAY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("Failed to compile time-of-day regex")
});

/// One step in the path to an offending field: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Field(String),
}

impl From<&str> for PathSegment {
    fn from(field: &str) -> Self {
        PathSegment::Field(field.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Location of the field, e.g. `["availabilities", 1, "day_of_week"]`
    pub path: Vec<PathSegment>,
    /// Human-readable description of the violation
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Dotted rendering of [`Self::path`], e.g. `availabilities[1].day_of_week`
    pub fn field(&self) -> String {
        let mut rendered = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    if !rendered.is_empty() {
                        rendered.push('.');
                    }
                    rendered.push_str(name);
                }
                PathSegment::Index(index) => {
                    rendered.push_str(&format!("[{index}]"));
                }
            }
        }
        rendered
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field(), self.message)
        }
    }
}

/// Every issue found in one payload. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    /// Whether any issue points at exactly this path
    pub fn has_issue_at(&self, path: &[PathSegment]) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationIssue> for ValidationErrors {
    fn from(issue: ValidationIssue) -> Self {
        ValidationErrors { issues: vec![issue] }
    }
}

/// Accumulates issues so that every field is checked before reporting.
#[derive(Default)]
struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn push(&mut self, path: Vec<PathSegment>, message: impl Into<String>) {
        self.0.push(ValidationIssue::new(path, message));
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(ValidationErrors { issues: self.0 }),
        }
    }
}

fn child(base: &[PathSegment], segment: impl Into<PathSegment>) -> Vec<PathSegment> {
    let mut path = base.to_vec();
    path.push(segment.into());
    path
}

fn name_field(value: &Value, path: Vec<PathSegment>, label: &str, issues: &mut Issues) -> Option<String> {
    let raw = match value {
        Value::String(raw) => raw,
        Value::Null => {
            issues.push(path, format!("{label} is required"));
            return None;
        }
        _ => {
            issues.push(path, format!("{label} must be a string"));
            return None;
        }
    };

    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    let problem = if length == 0 {
        format!("{label} is required")
    } else if length < NAME_MIN_CHARS {
        format!("{label} must be at least {NAME_MIN_CHARS} characters")
    } else if length > NAME_MAX_CHARS {
        format!("{label} must be at most {NAME_MAX_CHARS} characters")
    } else {
        return Some(trimmed.to_string());
    };

    issues.push(path, problem);
    None
}

fn integer_field(value: &Value, path: &[PathSegment], label: &str, issues: &mut Issues) -> Option<i64> {
    match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                return Some(integer);
            }
            match number.as_f64() {
                // 30.0 is an integer as far as JSON clients are concerned
                Some(float) if float.fract() == 0.0 => Some(float as i64),
                _ => {
                    issues.push(path.to_vec(), format!("{label} must be an integer"));
                    None
                }
            }
        }
        Value::Null => {
            issues.push(path.to_vec(), format!("{label} is required"));
            None
        }
        _ => {
            issues.push(path.to_vec(), format!("{label} must be a number"));
            None
        }
    }
}

fn time_field(value: &Value, path: Vec<PathSegment>, label: &str, issues: &mut Issues) -> Option<String> {
    match value {
        Value::String(raw) if is_valid_time_of_day(raw) => Some(raw.clone()),
        Value::Null => {
            issues.push(path, format!("{label} is required"));
            None
        }
        _ => {
            issues.push(path, "Invalid time format (HH:MM)");
            None
        }
    }
}

/// Whether `value` is a zero-padded 24-hour `HH:MM` clock time
pub fn is_valid_time_of_day(value: &str) -> bool {
    TIME_OF_DAY_REGEX.is_match(value)
}

/// Validates a business profile payload
///
/// On success the name is trimmed and the base slug derived from it.
pub fn validate_profile(request: &ProfileRequest) -> Result<NewProfile, ValidationErrors> {
    let mut issues = Issues::default();
    let business_name = name_field(
        &request.business_name,
        vec!["business_name".into()],
        "Business name",
        &mut issues,
    );

    issues.finish(business_name.map(|business_name| NewProfile {
        base_slug: slugify(&business_name),
        business_name,
    }))
}

/// Validates a service payload
///
/// `name` and `duration` are checked independently and every violation is
/// reported.
pub fn validate_service(request: &ServiceRequest) -> Result<NewService, ValidationErrors> {
    let mut issues = Issues::default();
    let name = name_field(&request.name, vec!["name".into()], "Service name", &mut issues);

    let duration_path = vec![PathSegment::from("duration")];
    let duration = integer_field(&request.duration, &duration_path, "Duration", &mut issues).and_then(
        |minutes| {
            if minutes < DURATION_MIN_MINUTES {
                issues.push(duration_path.clone(), format!("Minimum duration is {DURATION_MIN_MINUTES} minutes"));
                None
            } else if minutes > DURATION_MAX_MINUTES {
                issues.push(duration_path.clone(), "Maximum duration is 8 hours");
                None
            } else {
                i32::try_from(minutes).ok()
            }
        },
    );

    let value = match (name, duration) {
        (Some(name), Some(duration)) => Some(NewService { name, duration }),
        _ => None,
    };
    issues.finish(value)
}

fn availability_entry(entry: &Value, base: &[PathSegment], issues: &mut Issues) -> Option<NewAvailability> {
    if !entry.is_object() {
        issues.push(base.to_vec(), "Availability entry must be an object");
        return None;
    }
    let field = |name: &str| entry.get(name).unwrap_or(&Value::Null);

    let day_path = child(base, "day_of_week");
    let day_of_week = integer_field(field("day_of_week"), &day_path, "Day of week", issues).and_then(|day| {
        if (DAY_OF_WEEK_MIN..=DAY_OF_WEEK_MAX).contains(&day) {
            i16::try_from(day).ok()
        } else {
            issues.push(
                day_path.clone(),
                format!("Day of week must be between {DAY_OF_WEEK_MIN} and {DAY_OF_WEEK_MAX}"),
            );
            None
        }
    });

    let start_time = time_field(field("start_time"), child(base, "start_time"), "Start time", issues);
    let end_time = time_field(field("end_time"), child(base, "end_time"), "End time", issues);

    let (start_time, end_time) = match (start_time, end_time) {
        (Some(start), Some(end)) if start < end => (start, end),
        (Some(_), Some(_)) => {
            issues.push(child(base, "start_time"), "Start time must be before end time");
            return None;
        }
        _ => return None,
    };

    day_of_week.map(|day_of_week| NewAvailability {
        day_of_week,
        start_time,
        end_time,
    })
}

/// Validates a single availability entry
///
/// Issue paths are relative to the entry (`["day_of_week"]`, ...).
pub fn validate_availability(entry: &Value) -> Result<NewAvailability, ValidationErrors> {
    let mut issues = Issues::default();
    let value = availability_entry(entry, &[], &mut issues);
    issues.finish(value)
}

/// Validates the replacement availability list
///
/// An empty list is valid. Every entry is checked and all issues are
/// reported, each prefixed with `["availabilities", index]`.
pub fn validate_availabilities(request: &AvailabilityRequest) -> Result<Vec<NewAvailability>, ValidationErrors> {
    let mut issues = Issues::default();
    let base = vec![PathSegment::from("availabilities")];

    let Value::Array(entries) = &request.availabilities else {
        issues.push(base, "Availabilities must be a list");
        return issues.finish(None);
    };

    let mut accepted = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if let Some(availability) = availability_entry(entry, &child(&base, index), &mut issues) {
            accepted.push(availability);
        }
    }

    if issues.is_empty() {
        Ok(accepted)
    } else {
        issues.finish(None)
    }
}
