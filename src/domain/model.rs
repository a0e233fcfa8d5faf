use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_unique_names, Validate,
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// The five-day work week the roster covers.
pub const WORKWEEK: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Resolve a weekday name (case-insensitive) to its index in the work week.
pub fn day_index(field_name: &str, day: &str) -> Result<usize> {
    WORKWEEK
        .iter()
        .position(|d| d.eq_ignore_ascii_case(day.trim()))
        .ok_or_else(|| RosterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: day.to_string(),
            reason: format!("Unknown day. Valid days: {}", WORKWEEK.join(", ")),
        })
}

/// The Monday on or after the given date.
pub fn upcoming_monday(today: NaiveDate) -> NaiveDate {
    let days_ahead = (7 - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(days_ahead as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    pub const VALID: [&'static str; 3] = ["xlsx", "csv", "json"];

    pub fn parse(field_name: &str, value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(RosterError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    Self::VALID.join(", ")
                ),
            }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Everything the solver needs to know about one week.
#[derive(Debug, Clone)]
pub struct RosterSpec {
    /// Roster members, in configuration order.
    pub people: Vec<String>,
    /// Exact number of remote days per person.
    pub quota: usize,
    /// Remote slots on a regular day.
    pub base_slots: usize,
    /// Day index that gets one extra slot, if any.
    pub extra_day: Option<usize>,
    /// Day indices with zero slots.
    pub holidays: BTreeSet<usize>,
    /// Per-person day indices that must stay on-site (e.g. vacation returns).
    pub blocked_days: HashMap<String, BTreeSet<usize>>,
    /// Longest allowed run of remote days.
    pub max_consecutive: usize,
    /// Monday of the planned week.
    pub week_start: NaiveDate,
    /// Fixed RNG seed for reproducible rosters.
    pub seed: Option<u64>,
}

impl RosterSpec {
    pub fn slots_per_day(&self) -> [usize; 5] {
        let mut slots = [self.base_slots; 5];
        if let Some(extra) = self.extra_day {
            slots[extra] = self.base_slots + 1;
        }
        for &holiday in &self.holidays {
            slots[holiday] = 0;
        }
        slots
    }

    pub fn total_slots(&self) -> usize {
        self.slots_per_day().iter().sum()
    }

    pub fn blocked_for(&self, person: &str) -> Option<&BTreeSet<usize>> {
        self.blocked_days.get(person)
    }
}

impl Validate for RosterSpec {
    fn validate(&self) -> Result<()> {
        if self.people.is_empty() {
            return Err(RosterError::MissingConfigError {
                field: "people.names".to_string(),
            });
        }
        validate_unique_names("people.names", &self.people)?;
        validate_positive_number("people.quota", self.quota, 1)?;
        validate_positive_number("people.max_consecutive", self.max_consecutive, 1)?;
        validate_range("week.base_slots", self.base_slots, 1, self.people.len())?;

        if let Some(extra) = self.extra_day {
            if self.base_slots + 1 > self.people.len() {
                return Err(RosterError::ConfigValidationError {
                    field: "week.extra_day".to_string(),
                    message: format!(
                        "{} gets {} slots but the roster only has {} people",
                        WORKWEEK[extra],
                        self.base_slots + 1,
                        self.people.len()
                    ),
                });
            }
        }

        for person in self.blocked_days.keys() {
            if !self.people.contains(person) {
                return Err(RosterError::InvalidConfigValueError {
                    field: "people.blocked".to_string(),
                    value: person.clone(),
                    reason: "Person is not in the roster".to_string(),
                });
            }
        }

        // Exact-fill check: a week is only solvable when the slot supply
        // matches the demand, so reject mismatches before searching.
        let supply = self.total_slots();
        let demand = self.people.len() * self.quota;
        if supply != demand {
            return Err(RosterError::ConfigValidationError {
                field: "people.quota".to_string(),
                message: format!(
                    "{} slots available over the week but {} people x {} remote days = {} required",
                    supply,
                    self.people.len(),
                    self.quota,
                    demand
                ),
            });
        }

        // Each person needs at least `quota` days they are allowed on.
        let slots = self.slots_per_day();
        for person in &self.people {
            let blocked = self.blocked_for(person);
            let available = (0..WORKWEEK.len())
                .filter(|d| slots[*d] > 0 && !blocked.is_some_and(|b| b.contains(d)))
                .count();
            if available < self.quota {
                return Err(RosterError::ConfigValidationError {
                    field: "people.blocked".to_string(),
                    message: format!(
                        "{} has only {} available days for a quota of {}",
                        person, available, self.quota
                    ),
                });
            }
        }

        if self.week_start.weekday() != Weekday::Mon {
            return Err(RosterError::InvalidConfigValueError {
                field: "week.start_date".to_string(),
                value: self.week_start.to_string(),
                reason: "Week must start on a Monday".to_string(),
            });
        }

        Ok(())
    }
}

/// One day of the planned week, before assignment.
#[derive(Debug, Clone, Serialize)]
pub struct DayPlan {
    pub label: String,
    pub date: NaiveDate,
    pub slots: usize,
    pub holiday: bool,
}

impl DayPlan {
    pub fn header_label(&self) -> String {
        format!("{} {}", self.label, self.date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekPlan {
    pub days: Vec<DayPlan>,
}

impl WeekPlan {
    pub fn from_spec(spec: &RosterSpec) -> Self {
        let slots = spec.slots_per_day();
        let days = WORKWEEK
            .iter()
            .enumerate()
            .map(|(d, label)| DayPlan {
                label: label.to_string(),
                date: spec.week_start + Duration::days(d as i64),
                slots: slots[d],
                holiday: spec.holidays.contains(&d),
            })
            .collect();
        Self { days }
    }

    pub fn max_slots(&self) -> usize {
        self.days.iter().map(|d| d.slots).max().unwrap_or(0)
    }
}

/// One day of the solved roster.
#[derive(Debug, Clone, Serialize)]
pub struct DayAssignment {
    pub label: String,
    pub date: NaiveDate,
    pub holiday: bool,
    pub people: Vec<String>,
}

impl DayAssignment {
    pub fn header_label(&self) -> String {
        format!("{} {}", self.label, self.date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub days: Vec<DayAssignment>,
}

impl Schedule {
    /// Number of remote days assigned to a person over the week.
    pub fn remote_days_for(&self, person: &str) -> usize {
        self.days
            .iter()
            .filter(|d| d.people.iter().any(|p| p == person))
            .count()
    }

    /// Plain-text rendering for the console.
    pub fn display_table(&self) -> String {
        let mut lines = Vec::with_capacity(self.days.len());
        for day in &self.days {
            if day.holiday {
                lines.push(format!(" {}: (holiday)", day.label));
            } else {
                lines.push(format!(" {}: {}", day.label, day.people.join(", ")));
            }
        }
        lines.join("\n")
    }
}

/// All rendered output forms of one schedule.
#[derive(Debug, Clone)]
pub struct RenderedRoster {
    pub schedule: Schedule,
    pub csv_output: String,
    pub json_output: String,
    pub xlsx_bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_spec() -> RosterSpec {
        RosterSpec {
            people: vec![
                "Oussama".to_string(),
                "Outman".to_string(),
                "Ayoub".to_string(),
                "Omar".to_string(),
                "Yamin".to_string(),
                "Sara".to_string(),
                "Hamza".to_string(),
            ],
            quota: 3,
            base_slots: 4,
            extra_day: Some(2),
            holidays: BTreeSet::new(),
            blocked_days: HashMap::new(),
            max_consecutive: 2,
            week_start: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            seed: None,
        }
    }

    #[test]
    fn test_day_index_is_case_insensitive() {
        assert_eq!(day_index("week.holidays", "wednesday").unwrap(), 2);
        assert_eq!(day_index("week.holidays", "Monday").unwrap(), 0);
        assert!(day_index("week.holidays", "Sunday").is_err());
    }

    #[test]
    fn test_upcoming_monday() {
        // 2026-08-28 is a Friday.
        let friday = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();
        assert_eq!(
            upcoming_monday(friday),
            NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()
        );
        // A Monday maps to itself.
        let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert_eq!(upcoming_monday(monday), monday);
    }

    #[test]
    fn test_slots_per_day_with_extra_and_holiday() {
        let mut spec = base_spec();
        spec.holidays.insert(0);
        assert_eq!(spec.slots_per_day(), [0, 4, 5, 4, 4]);
    }

    #[test]
    fn test_exact_fill_accepted() {
        // 4+4+5+4+4 = 21 = 7 people x 3 days.
        assert!(base_spec().validate().is_ok());
    }

    #[test]
    fn test_exact_fill_rejected_with_holiday() {
        let mut spec = base_spec();
        spec.holidays.insert(0);
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("17 slots"));
    }

    #[test]
    fn test_blocked_person_must_exist() {
        let mut spec = base_spec();
        spec.blocked_days
            .insert("Nadia".to_string(), BTreeSet::from([0]));
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_overblocked_person_rejected() {
        let mut spec = base_spec();
        spec.blocked_days
            .insert("Sara".to_string(), BTreeSet::from([0, 1, 2]));
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("Sara"));
    }

    #[test]
    fn test_week_must_start_on_monday() {
        let mut spec = base_spec();
        spec.week_start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_week_plan_from_spec() {
        let plan = WeekPlan::from_spec(&base_spec());
        assert_eq!(plan.days.len(), 5);
        assert_eq!(plan.days[2].slots, 5);
        assert_eq!(plan.days[0].header_label(), "Monday 2026-08-31");
        assert_eq!(plan.max_slots(), 5);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(
            OutputFormat::parse("load.output_formats", "XLSX").unwrap(),
            OutputFormat::Xlsx
        );
        assert!(OutputFormat::parse("load.output_formats", "pdf").is_err());
    }
}
