use crate::core::ConfigProvider;
use crate::domain::model::{day_index, upcoming_monday, OutputFormat, RosterSpec};
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{validate_path, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub roster: RosterMetaConfig,
    pub week: WeekConfig,
    pub people: PeopleConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub solver: Option<SolverConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMetaConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekConfig {
    /// ISO date of the Monday the week starts on.
    pub start_date: Option<String>,
    pub base_slots: Option<usize>,
    pub extra_day: Option<String>,
    pub holidays: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeopleConfig {
    pub names: Vec<String>,
    pub quota: Option<usize>,
    pub max_consecutive: Option<usize>,
    pub blocked: Option<Vec<BlockedConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedConfig {
    pub person: String,
    pub days: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub xlsx: Option<String>,
    pub csv: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub seed: Option<u64>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RosterError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RosterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values;
    /// unresolved placeholders are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("load.output_path", &self.load.output_path)?;

        for format in &self.load.output_formats {
            OutputFormat::parse("load.output_formats", format)?;
        }
        if self.load.output_formats.is_empty() {
            return Err(RosterError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }

        self.roster_spec()?.validate()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    fn week_start(&self) -> Result<NaiveDate> {
        match self.week.start_date.as_deref() {
            Some(raw) => {
                raw.parse()
                    .map_err(|_| RosterError::InvalidConfigValueError {
                        field: "week.start_date".to_string(),
                        value: raw.to_string(),
                        reason: "Expected an ISO date (e.g. 2026-08-31)".to_string(),
                    })
            }
            None => Ok(upcoming_monday(chrono::Local::now().date_naive())),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn roster_spec(&self) -> Result<RosterSpec> {
        let extra_day = self
            .week
            .extra_day
            .as_deref()
            .map(|d| day_index("week.extra_day", d))
            .transpose()?;

        let holidays = self
            .week
            .holidays
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|d| day_index("week.holidays", d))
            .collect::<Result<BTreeSet<usize>>>()?;

        let mut blocked_days = std::collections::HashMap::new();
        for entry in self.people.blocked.as_deref().unwrap_or_default() {
            let days: &mut BTreeSet<usize> = blocked_days
                .entry(entry.person.trim().to_string())
                .or_default();
            for day in &entry.days {
                days.insert(day_index("people.blocked.days", day)?);
            }
        }

        Ok(RosterSpec {
            people: self
                .people
                .names
                .iter()
                .map(|p| p.trim().to_string())
                .collect(),
            quota: self.people.quota.unwrap_or(3),
            base_slots: self.week.base_slots.unwrap_or(4),
            extra_day,
            holidays,
            blocked_days,
            max_consecutive: self.people.max_consecutive.unwrap_or(2),
            week_start: self.week_start()?,
            seed: self.solver.as_ref().and_then(|s| s.seed),
        })
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Result<Vec<OutputFormat>> {
        let mut formats = Vec::new();
        for raw in &self.load.output_formats {
            let format = OutputFormat::parse("load.output_formats", raw)?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }

    fn filename_for(&self, format: OutputFormat) -> String {
        let custom = self.load.filenames.as_ref().and_then(|f| match format {
            OutputFormat::Xlsx => f.xlsx.clone(),
            OutputFormat::Csv => f.csv.clone(),
            OutputFormat::Json => f.json.clone(),
        });
        custom.unwrap_or_else(|| format!("roster.{}", format.extension()))
    }

    fn bundle_filename(&self) -> Option<String> {
        let compression = self.load.compression.as_ref()?;
        if !compression.enabled {
            return None;
        }
        Some(
            compression
                .filename
                .clone()
                .unwrap_or_else(|| "remote_roster.zip".to_string()),
        )
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
