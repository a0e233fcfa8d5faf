//! CSV and JSON renderings of a solved schedule.

use crate::domain::model::Schedule;
use crate::utils::error::{Result, RosterError};

/// One column per day, one assigned person per row; shorter days are
/// padded with empty cells.
pub fn render_csv(schedule: &Schedule) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    let header: Vec<String> = schedule
        .days
        .iter()
        .map(|day| {
            if day.holiday {
                format!("{} (holiday)", day.header_label())
            } else {
                day.header_label()
            }
        })
        .collect();
    writer.write_record(&header)?;

    let body_rows = schedule
        .days
        .iter()
        .map(|d| d.people.len())
        .max()
        .unwrap_or(0);

    for row in 0..body_rows {
        let record: Vec<&str> = schedule
            .days
            .iter()
            .map(|day| day.people.get(row).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RosterError::ProcessingError {
            message: format!("CSV buffer error: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| RosterError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub fn render_json(schedule: &Schedule) -> Result<String> {
    Ok(serde_json::to_string_pretty(schedule)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DayAssignment;
    use chrono::NaiveDate;

    fn sample_schedule() -> Schedule {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        Schedule {
            days: vec![
                DayAssignment {
                    label: "Monday".to_string(),
                    date: monday,
                    holiday: false,
                    people: vec!["Sara".to_string(), "Hamza".to_string()],
                },
                DayAssignment {
                    label: "Tuesday".to_string(),
                    date: monday + chrono::Duration::days(1),
                    holiday: true,
                    people: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_csv_pads_ragged_columns() {
        let csv = render_csv(&sample_schedule()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Monday 2026-08-31,Tuesday 2026-09-01 (holiday)");
        assert_eq!(lines[1], "Sara,");
        assert_eq!(lines[2], "Hamza,");
    }

    #[test]
    fn test_json_serializes_days() {
        let json = render_json(&sample_schedule()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["days"].as_array().unwrap().len(), 2);
        assert_eq!(value["days"][0]["people"][0], "Sara");
        assert_eq!(value["days"][1]["holiday"], true);
    }
}
