use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::grid::{Record, Value};

/// Statutory processing clock, in working days.
pub const STATUTORY_WORKING_DAYS: u32 = 20;

/// Building work category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    NewDwelling,
    Alteration,
    Addition,
    Demolition,
    Commercial,
    Pool,
}

impl Default for WorkType {
    fn default() -> Self {
        Self::Alteration
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewDwelling => write!(f, "New dwelling"),
            Self::Alteration => write!(f, "Alteration"),
            Self::Addition => write!(f, "Addition"),
            Self::Demolition => write!(f, "Demolition"),
            Self::Commercial => write!(f, "Commercial"),
            Self::Pool => write!(f, "Pool"),
        }
    }
}

impl From<&str> for WorkType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().replace(' ', "_").as_str() {
            "new_dwelling" => Self::NewDwelling,
            "alteration" => Self::Alteration,
            "addition" => Self::Addition,
            "demolition" => Self::Demolition,
            "commercial" => Self::Commercial,
            "pool" => Self::Pool,
            _ => Self::Alteration,
        }
    }
}

/// Where a consent application is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    Lodged,
    Vetting,
    Processing,
    /// Clock stopped waiting on a request for information
    OnHold,
    Granted,
    Refused,
    Withdrawn,
}

impl Default for ConsentStatus {
    fn default() -> Self {
        Self::Lodged
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lodged => write!(f, "Lodged"),
            Self::Vetting => write!(f, "Vetting"),
            Self::Processing => write!(f, "Processing"),
            Self::OnHold => write!(f, "On hold"),
            Self::Granted => write!(f, "Granted"),
            Self::Refused => write!(f, "Refused"),
            Self::Withdrawn => write!(f, "Withdrawn"),
        }
    }
}

impl From<&str> for ConsentStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().replace(' ', "_").as_str() {
            "lodged" => Self::Lodged,
            "vetting" => Self::Vetting,
            "processing" => Self::Processing,
            "on_hold" => Self::OnHold,
            "granted" => Self::Granted,
            "refused" => Self::Refused,
            "withdrawn" => Self::Withdrawn,
            _ => Self::Lodged,
        }
    }
}

impl ConsentStatus {
    /// Still awaiting a decision
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            Self::Lodged | Self::Vetting | Self::Processing | Self::OnHold
        )
    }
}

/// A building consent application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentApplication {
    pub id: Uuid,
    pub reference: String,
    pub address: String,
    pub applicant: String,
    pub work_type: WorkType,
    pub status: ConsentStatus,
    pub lodged: NaiveDate,
    pub estimated_value: f64,
    #[serde(default)]
    pub officer: Option<String>,
    #[serde(default)]
    pub working_days: u32,
}

impl ConsentApplication {
    pub fn new(id: Uuid, reference: &str, address: &str, applicant: &str, lodged: NaiveDate) -> Self {
        Self {
            id,
            reference: reference.to_string(),
            address: address.to_string(),
            applicant: applicant.to_string(),
            work_type: WorkType::default(),
            status: ConsentStatus::default(),
            lodged,
            estimated_value: 0.0,
            officer: None,
            working_days: 0,
        }
    }

    pub fn with_work_type(mut self, work_type: WorkType) -> Self {
        self.work_type = work_type;
        self
    }

    pub fn with_status(mut self, status: ConsentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_value(mut self, estimated_value: f64) -> Self {
        self.estimated_value = estimated_value;
        self
    }

    pub fn with_officer(mut self, officer: &str) -> Self {
        self.officer = Some(officer.to_string());
        self
    }

    pub fn with_working_days(mut self, working_days: u32) -> Self {
        self.working_days = working_days;
        self
    }

    /// Open past the statutory clock
    pub fn is_overdue(&self) -> bool {
        self.status.is_open() && self.working_days > STATUTORY_WORKING_DAYS
    }
}

/// Keys answered by [`ConsentApplication`]'s `Record` implementation
pub const CONSENT_FIELDS: [&str; 11] = [
    "id",
    "reference",
    "address",
    "applicant",
    "work_type",
    "status",
    "lodged",
    "estimated_value",
    "officer",
    "working_days",
    "overdue",
];

impl Record for ConsentApplication {
    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.to_string().into(),
            "reference" => self.reference.as_str().into(),
            "address" => self.address.as_str().into(),
            "applicant" => self.applicant.as_str().into(),
            "work_type" => self.work_type.to_string().into(),
            "status" => self.status.to_string().into(),
            "lodged" => self.lodged.into(),
            "estimated_value" => self.estimated_value.into(),
            "officer" => self.officer.clone().into(),
            "working_days" => self.working_days.into(),
            "overdue" => self.is_overdue().into(),
            _ => Value::Null,
        }
    }

    fn values(&self) -> Vec<Value> {
        CONSENT_FIELDS.iter().map(|key| self.field(key)).collect()
    }
}
