use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::grid::{Record, Value};

/// Stage of building work being inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionType {
    Foundation,
    Framing,
    Plumbing,
    Cladding,
    Final,
}

impl Default for InspectionType {
    fn default() -> Self {
        Self::Final
    }
}

impl fmt::Display for InspectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foundation => write!(f, "Foundation"),
            Self::Framing => write!(f, "Framing"),
            Self::Plumbing => write!(f, "Plumbing"),
            Self::Cladding => write!(f, "Cladding"),
            Self::Final => write!(f, "Final"),
        }
    }
}

impl From<&str> for InspectionType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "foundation" => Self::Foundation,
            "framing" => Self::Framing,
            "plumbing" => Self::Plumbing,
            "cladding" => Self::Cladding,
            _ => Self::Final,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionOutcome {
    Booked,
    Passed,
    PartialPass,
    Failed,
    Cancelled,
}

impl Default for InspectionOutcome {
    fn default() -> Self {
        Self::Booked
    }
}

impl fmt::Display for InspectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked => write!(f, "Booked"),
            Self::Passed => write!(f, "Passed"),
            Self::PartialPass => write!(f, "Partial pass"),
            Self::Failed => write!(f, "Failed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl From<&str> for InspectionOutcome {
    fn from(s: &str) -> Self {
        match s.to_lowercase().replace(' ', "_").as_str() {
            "passed" | "pass" => Self::Passed,
            "partial_pass" => Self::PartialPass,
            "failed" | "fail" => Self::Failed,
            "cancelled" => Self::Cancelled,
            _ => Self::Booked,
        }
    }
}

/// A site inspection booked against a consent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    pub consent_reference: String,
    pub inspection_type: InspectionType,
    pub scheduled: DateTime<Utc>,
    pub inspector: String,
    pub outcome: InspectionOutcome,
    #[serde(default)]
    pub notes: String,
}

impl Inspection {
    pub fn new(
        id: Uuid,
        consent_reference: &str,
        inspection_type: InspectionType,
        scheduled: DateTime<Utc>,
        inspector: &str,
    ) -> Self {
        Self {
            id,
            consent_reference: consent_reference.to_string(),
            inspection_type,
            scheduled,
            inspector: inspector.to_string(),
            outcome: InspectionOutcome::default(),
            notes: String::new(),
        }
    }

    pub fn with_outcome(mut self, outcome: InspectionOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    /// Needs a re-inspection booked
    pub fn needs_reinspection(&self) -> bool {
        matches!(
            self.outcome,
            InspectionOutcome::Failed | InspectionOutcome::PartialPass
        )
    }
}

pub const INSPECTION_FIELDS: [&str; 7] = [
    "id",
    "consent_reference",
    "inspection_type",
    "scheduled",
    "inspector",
    "outcome",
    "notes",
];

impl Record for Inspection {
    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.to_string().into(),
            "consent_reference" => self.consent_reference.as_str().into(),
            "inspection_type" => self.inspection_type.to_string().into(),
            "scheduled" => self.scheduled.into(),
            "inspector" => self.inspector.as_str().into(),
            "outcome" => self.outcome.to_string().into(),
            "notes" => self.notes.as_str().into(),
            _ => Value::Null,
        }
    }

    fn values(&self) -> Vec<Value> {
        INSPECTION_FIELDS.iter().map(|key| self.field(key)).collect()
    }
}
