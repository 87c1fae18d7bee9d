use clap::Parser;
use roadmap_etl::config::toml_config::StorageKind;
use roadmap_etl::core::pipeline::PipelineSettings;
use roadmap_etl::core::RecordStore;
use roadmap_etl::utils::error::ErrorSeverity;
use roadmap_etl::utils::{logger, validation::Validate};
use roadmap_etl::{
    CliConfig, FileRecordStore, GoogleSearchGateway, LocalStorage, RoadmapEngine, RoadmapPipeline,
    RoadmapStep, SupabaseRecordStore, TomlConfig,
};

async fn generate<R: RecordStore>(
    config: &TomlConfig,
    cli: &CliConfig,
    store: R,
) -> roadmap_etl::Result<Vec<RoadmapStep>> {
    let gateway = GoogleSearchGateway::from_config(config);
    let pipeline =
        RoadmapPipeline::with_settings(gateway, store, PipelineSettings::from_config(config));
    let engine = RoadmapEngine::new(pipeline);
    engine.submit("cli", cli.profile()).await
}

fn print_roadmap(steps: &[RoadmapStep]) {
    println!("Your Personalized Roadmap");
    for step in steps {
        let weeks = step.weeks_to_complete();
        println!();
        println!("{}: {}", step.display_title(), step.description());
        println!("  {}", step.link());
        println!(
            "  Estimated Time: {} week{}",
            weeks,
            if weeks != 1 { "s" } else { "" }
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting roadmap-etl");
    if cli.verbose {
        tracing::debug!("Profile: {:?}", cli.profile());
    }

    let mut config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::from_env()?,
    };
    if let Some(output_path) = &cli.output_path {
        config.storage.path = Some(output_path.clone());
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(3);
    }

    let result = match config.storage.r#type {
        StorageKind::Local => {
            let storage = LocalStorage::new(config.output_path());
            generate(&config, &cli, FileRecordStore::new(storage)).await
        }
        StorageKind::Supabase => {
            // Both fields are checked by validate().
            let url = config.storage.url.clone().unwrap_or_default();
            let key = config.storage.api_key.clone().unwrap_or_default();
            let store = SupabaseRecordStore::new(url, key, config.table());
            generate(&config, &cli, store).await
        }
    };

    match result {
        Ok(steps) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                print_roadmap(&steps);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Roadmap generation failed: {} (kind: {:?}, severity: {:?})",
                e,
                e.kind(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
