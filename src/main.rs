use clap::Parser;
use remote_roster::core::ConfigProvider;
use remote_roster::utils::error::ErrorSeverity;
use remote_roster::utils::{logger, validation::Validate};
use remote_roster::{CliConfig, LocalStorage, RosterEngine, TomlConfig, WeeklyPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting remote-roster CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let exit_code = if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);

        let toml_config = match TomlConfig::from_file(&path) {
            Ok(toml_config) => toml_config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        };

        if let Err(e) = toml_config.validate() {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }

        // CLI --monitor wins over the file setting.
        let monitor_enabled = config.monitor || toml_config.monitoring_enabled();
        run_with(toml_config, monitor_enabled).await
    } else {
        if let Err(e) = config.validate() {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }

        let monitor_enabled = config.monitor;
        run_with(config, monitor_enabled).await
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run_with<C: ConfigProvider>(config: C, monitor_enabled: bool) -> i32 {
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = WeeklyPipeline::new(storage, config);
    let engine = RosterEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Roster generated successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Roster generated successfully!");
            println!("📁 Output saved to: {}", output_path);
            0
        }
        Err(e) => {
            tracing::error!(
                "❌ Roster generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            }
        }
    }
}
