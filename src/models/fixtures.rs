//! Built-in sample data for the dashboards

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use super::consent::{ConsentApplication, ConsentStatus, WorkType};
use super::inspection::{Inspection, InspectionOutcome, InspectionType};

const STREETS: &[&str] = &[
    "Harbour View Road",
    "Kowhai Street",
    "Station Road",
    "Te Awa Crescent",
    "Rimu Lane",
    "Marine Parade",
    "Church Street",
    "Totara Avenue",
];

const APPLICANTS: &[&str] = &[
    "Aroha Builders Ltd",
    "M. Chen",
    "Southern Homes",
    "P. Singh",
    "Coastline Pools",
    "J. Williams",
    "Kauri Developments",
    "L. Fale",
    "alpine renovations",
];

const OFFICERS: &[&str] = &["H. Parata", "S. O'Brien", "D. Kumar"];

const INSPECTORS: &[&str] = &["R. Ngata", "T. Walsh", "E. Morgan"];

const WORK_TYPES: &[WorkType] = &[
    WorkType::NewDwelling,
    WorkType::Alteration,
    WorkType::Addition,
    WorkType::Pool,
    WorkType::Commercial,
    WorkType::Demolition,
];

const STATUSES: &[ConsentStatus] = &[
    ConsentStatus::Lodged,
    ConsentStatus::Vetting,
    ConsentStatus::Processing,
    ConsentStatus::Processing,
    ConsentStatus::OnHold,
    ConsentStatus::Granted,
    ConsentStatus::Granted,
    ConsentStatus::Refused,
    ConsentStatus::Withdrawn,
];

const CONSENT_COUNT: usize = 42;

/// Deterministic consent applications, newest first.
pub fn consent_applications() -> Vec<ConsentApplication> {
    let newest = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap_or_default();

    (0..CONSENT_COUNT)
        .map(|i| {
            let lodged = newest - Duration::days(i as i64 * 3);
            let status = STATUSES[(i * 7) % STATUSES.len()];
            let work_type = WORK_TYPES[(i * 5) % WORK_TYPES.len()];
            let address = format!("{} {}", 3 + (i * 11) % 97, STREETS[i % STREETS.len()]);
            let base = match work_type {
                WorkType::NewDwelling => 520_000.0,
                WorkType::Commercial => 1_250_000.0,
                WorkType::Pool => 65_000.0,
                WorkType::Demolition => 18_000.0,
                _ => 120_000.0,
            };
            let value = base + ((i * 7_919) % 50) as f64 * 1_250.0;

            let mut app = ConsentApplication::new(
                Uuid::from_u128(0xC0_0000 + i as u128),
                &format!("BC24{:04}", 120 - i),
                &address,
                APPLICANTS[(i * 3) % APPLICANTS.len()],
                lodged,
            )
            .with_work_type(work_type)
            .with_status(status)
            .with_value(value)
            .with_working_days(((i * 13) % 31) as u32);

            // Lodged applications are not yet allocated
            if status != ConsentStatus::Lodged {
                app = app.with_officer(OFFICERS[i % OFFICERS.len()]);
            }
            app
        })
        .collect()
}

/// Inspections for granted and in-progress consents.
pub fn inspections(consents: &[ConsentApplication]) -> Vec<Inspection> {
    let stages = [
        InspectionType::Foundation,
        InspectionType::Framing,
        InspectionType::Plumbing,
        InspectionType::Cladding,
        InspectionType::Final,
    ];
    let outcomes = [
        InspectionOutcome::Passed,
        InspectionOutcome::Passed,
        InspectionOutcome::PartialPass,
        InspectionOutcome::Failed,
        InspectionOutcome::Booked,
        InspectionOutcome::Cancelled,
    ];

    let mut inspections = Vec::new();
    let mut n: u128 = 0;
    for (i, consent) in consents
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c.status, ConsentStatus::Granted | ConsentStatus::Processing))
    {
        let visits = 1 + i % 3;
        for stage in stages.iter().take(visits) {
            let scheduled = consent
                .lodged
                .and_hms_opt(8 + (n % 8) as u32, if n % 2 == 0 { 0 } else { 30 }, 0)
                .map(|dt| Utc.from_utc_datetime(&dt) + Duration::days(21 + 7 * n as i64 % 35))
                .unwrap_or_else(Utc::now);

            let outcome = outcomes[(n as usize * 5) % outcomes.len()];
            let mut inspection = Inspection::new(
                Uuid::from_u128(0x1A_0000 + n),
                &consent.reference,
                *stage,
                scheduled,
                INSPECTORS[n as usize % INSPECTORS.len()],
            )
            .with_outcome(outcome);
            if outcome == InspectionOutcome::Failed {
                inspection = inspection.with_notes("Re-inspection required");
            }
            inspections.push(inspection);
            n += 1;
        }
    }
    inspections
}
