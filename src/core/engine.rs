use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct RosterEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> RosterEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🎲 Generating weekly remote schedule...");

        tracing::info!("Planning the week...");
        let plan = self.pipeline.plan().await?;
        let open_days = plan.days.iter().filter(|d| !d.holiday).count();
        tracing::info!(
            "Planned {} working days ({} slots total)",
            open_days,
            plan.days.iter().map(|d| d.slots).sum::<usize>()
        );
        self.monitor.log_stats("Plan");

        tracing::info!("Solving the assignment...");
        let schedule = self.pipeline.solve(plan).await?;
        tracing::info!("Found a valid schedule");
        self.monitor.log_stats("Solve");

        println!("\n📋 Weekly Schedule:");
        println!("{}", schedule.display_table());

        tracing::info!("Rendering outputs...");
        let roster = self.pipeline.render(schedule).await?;
        self.monitor.log_stats("Render");

        tracing::info!("Exporting...");
        let output_path = self.pipeline.export(roster).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Export");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
