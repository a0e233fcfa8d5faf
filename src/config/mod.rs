pub mod cli;
pub mod toml_config;

use crate::domain::model::day_index;
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::validate_non_empty_string;
use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{upcoming_monday, OutputFormat, RosterSpec};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::Parser;

/// Parse repeatable `Name=Day` pairs into per-person blocked day sets.
pub fn parse_blocked_pairs(pairs: &[String]) -> Result<HashMap<String, BTreeSet<usize>>> {
    let mut blocked: HashMap<String, BTreeSet<usize>> = HashMap::new();
    for pair in pairs {
        let (name, day) = pair
            .split_once('=')
            .ok_or_else(|| RosterError::InvalidConfigValueError {
                field: "blocked".to_string(),
                value: pair.clone(),
                reason: "Expected Name=Day (e.g. Sara=Thursday)".to_string(),
            })?;
        validate_non_empty_string("blocked", name)?;
        let idx = day_index("blocked", day)?;
        blocked.entry(name.trim().to_string()).or_default().insert(idx);
    }
    Ok(blocked)
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "remote-roster")]
#[command(about = "Generates a weekly remote-work roster and exports it as a spreadsheet")]
pub struct CliConfig {
    /// TOML configuration file; takes precedence over the flags below
    #[arg(short, long)]
    pub config: Option<String>,

    /// Roster members, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub people: Vec<String>,

    /// Remote days per person
    #[arg(long, default_value = "3")]
    pub quota: usize,

    /// Remote slots on a regular day
    #[arg(long, default_value = "4")]
    pub base_slots: usize,

    /// Day with one extra remote slot (e.g. Wednesday)
    #[arg(long)]
    pub extra_day: Option<String>,

    /// Holidays with no remote slots, comma-separated day names
    #[arg(long, value_delimiter = ',')]
    pub holidays: Vec<String>,

    /// Days a person must stay on-site, as repeatable Name=Day pairs
    #[arg(long)]
    pub blocked: Vec<String>,

    /// Longest allowed run of remote days
    #[arg(long, default_value = "2")]
    pub max_consecutive: usize,

    /// Monday the week starts on (defaults to the upcoming Monday)
    #[arg(long)]
    pub week_start: Option<NaiveDate>,

    /// Fixed RNG seed for a reproducible roster
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Output formats, comma-separated (xlsx, csv, json)
    #[arg(long, value_delimiter = ',', default_value = "xlsx")]
    pub formats: Vec<String>,

    /// Also bundle all outputs into one zip archive
    #[arg(long)]
    pub bundle: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn roster_spec(&self) -> Result<RosterSpec> {
        let extra_day = self
            .extra_day
            .as_deref()
            .map(|d| day_index("extra-day", d))
            .transpose()?;

        let holidays = self
            .holidays
            .iter()
            .map(|d| day_index("holidays", d))
            .collect::<Result<BTreeSet<usize>>>()?;

        let week_start = self
            .week_start
            .unwrap_or_else(|| upcoming_monday(chrono::Local::now().date_naive()));

        Ok(RosterSpec {
            people: self.people.iter().map(|p| p.trim().to_string()).collect(),
            quota: self.quota,
            base_slots: self.base_slots,
            extra_day,
            holidays,
            blocked_days: parse_blocked_pairs(&self.blocked)?,
            max_consecutive: self.max_consecutive,
            week_start,
            seed: self.seed,
        })
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> Result<Vec<OutputFormat>> {
        let mut formats = Vec::new();
        for raw in &self.formats {
            let format = OutputFormat::parse("formats", raw)?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }

    fn bundle_filename(&self) -> Option<String> {
        self.bundle.then(|| "remote_roster.zip".to_string())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output-path", &self.output_path)?;
        self.output_formats()?;
        self.roster_spec()?.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocked_pairs() {
        let pairs = vec!["Sara=Thursday".to_string(), "Sara=friday".to_string()];
        let blocked = parse_blocked_pairs(&pairs).unwrap();
        assert_eq!(blocked["Sara"], BTreeSet::from([3, 4]));
    }

    #[test]
    fn test_parse_blocked_pairs_rejects_bad_shape() {
        assert!(parse_blocked_pairs(&["Sara".to_string()]).is_err());
        assert!(parse_blocked_pairs(&["Sara=Sunday".to_string()]).is_err());
        assert!(parse_blocked_pairs(&["=Monday".to_string()]).is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_config_validates_formats() {
        let config = CliConfig::parse_from([
            "remote-roster",
            "--people",
            "Oussama,Outman,Ayoub,Omar,Yamin,Sara,Hamza",
            "--extra-day",
            "Wednesday",
            "--formats",
            "xlsx,pdf",
        ]);
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_config_builds_spec() {
        let config = CliConfig::parse_from([
            "remote-roster",
            "--people",
            "Oussama, Outman,Ayoub,Omar,Yamin,Sara,Hamza",
            "--extra-day",
            "wednesday",
            "--week-start",
            "2026-08-31",
            "--seed",
            "7",
        ]);
        let spec = config.roster_spec().unwrap();
        assert_eq!(spec.people.len(), 7);
        assert_eq!(spec.people[1], "Outman");
        assert_eq!(spec.extra_day, Some(2));
        assert_eq!(spec.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_config_requires_people() {
        let config = CliConfig::parse_from(["remote-roster"]);
        assert!(config.validate().is_err());
    }
}
