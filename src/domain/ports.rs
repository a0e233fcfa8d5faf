use crate::domain::model::{OutputFormat, RenderedRoster, RosterSpec, Schedule, WeekPlan};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn roster_spec(&self) -> Result<RosterSpec>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Result<Vec<OutputFormat>>;
    /// Filename for one rendered format inside the output directory.
    fn filename_for(&self, format: OutputFormat) -> String {
        format!("roster.{}", format.extension())
    }
    /// Bundle archive name, when all outputs should also land in one zip.
    fn bundle_filename(&self) -> Option<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn plan(&self) -> Result<WeekPlan>;
    async fn solve(&self, plan: WeekPlan) -> Result<Schedule>;
    async fn render(&self, schedule: Schedule) -> Result<RenderedRoster>;
    async fn export(&self, roster: RenderedRoster) -> Result<String>;
}
