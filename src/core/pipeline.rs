use crate::adapters::{tabular, xlsx};
use crate::core::solver;
use crate::domain::model::{OutputFormat, RenderedRoster, Schedule, WeekPlan};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::FileOptions;
use zip::ZipWriter;

pub struct WeeklyPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> WeeklyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for WeeklyPipeline<S, C> {
    async fn plan(&self) -> Result<WeekPlan> {
        let spec = self.config.roster_spec()?;
        let plan = WeekPlan::from_spec(&spec);

        for day in &plan.days {
            if day.holiday {
                tracing::debug!("🚫 {}: holiday, no remote slots", day.label);
            } else {
                tracing::debug!("📅 {}: {} remote slots", day.label, day.slots);
            }
        }

        Ok(plan)
    }

    async fn solve(&self, plan: WeekPlan) -> Result<Schedule> {
        let spec = self.config.roster_spec()?;
        tracing::debug!(
            "Searching assignments for {} people, quota {} days each",
            spec.people.len(),
            spec.quota
        );
        solver::solve_week(&spec, &plan)
    }

    async fn render(&self, schedule: Schedule) -> Result<RenderedRoster> {
        let csv_output = tabular::render_csv(&schedule)?;
        let json_output = tabular::render_json(&schedule)?;
        let xlsx_bytes = xlsx::render_workbook(&schedule)?;

        Ok(RenderedRoster {
            schedule,
            csv_output,
            json_output,
            xlsx_bytes,
        })
    }

    async fn export(&self, roster: RenderedRoster) -> Result<String> {
        let formats = self.config.output_formats()?;

        let mut written: Vec<(String, Vec<u8>)> = Vec::with_capacity(formats.len());
        for format in formats {
            let filename = self.config.filename_for(format);
            let data = match format {
                OutputFormat::Xlsx => roster.xlsx_bytes.clone(),
                OutputFormat::Csv => roster.csv_output.clone().into_bytes(),
                OutputFormat::Json => roster.json_output.clone().into_bytes(),
            };
            tracing::debug!("Writing {} ({} bytes)", filename, data.len());
            self.storage.write_file(&filename, &data).await?;
            written.push((filename, data));
        }

        if let Some(bundle_name) = self.config.bundle_filename() {
            tracing::debug!("Bundling {} files into {}", written.len(), bundle_name);

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (filename, data) in &written {
                    zip.start_file::<_, ()>(filename.as_str(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            self.storage.write_file(&bundle_name, &zip_data).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
