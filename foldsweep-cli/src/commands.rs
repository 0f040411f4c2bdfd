//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use foldsweep_core::config::CONFIG_FILE_NAME;
use foldsweep_core::{SweepConfig, SweepController, SweepPlan};
use std::path::Path;

/// Handle a CLI subcommand against the resolved configuration.
pub fn handle_command(command: Commands, config: SweepConfig, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Run { .. } => handle_run(&config),
        Commands::Plan { .. } => handle_plan(&config),
        Commands::Config { action } => handle_config(action, &config, workspace),
    }
}

fn handle_run(config: &SweepConfig) -> anyhow::Result<()> {
    let mut controller = SweepController::from_config(config);
    tracing::info!(
        run_id = controller.run_id(),
        tuples = controller.plan().len(),
        datasets = %config.dataset_dir.display(),
        output = %config.output_dir.display(),
        "Starting sweep"
    );
    let summary = controller.run()?;
    println!(
        "Sweep {} finished: {} models trained, {} reports written to {}",
        summary.run_id,
        summary.models_trained,
        summary.artifacts.len(),
        config.output_dir.display()
    );
    Ok(())
}

fn handle_plan(config: &SweepConfig) -> anyhow::Result<()> {
    let plan = SweepPlan::new(config);
    if plan.is_empty() {
        println!("Nothing enabled. Switch on at least one technique and one classifier.");
        return Ok(());
    }
    for tuple in plan.iter() {
        println!("  {tuple}  <- {}", tuple.train_partition());
    }
    println!(
        "{} training tuples, {} reports",
        plan.len(),
        plan.len() * (foldsweep_core::sweep::FOLDS - 1)
    );
    Ok(())
}

fn handle_config(action: ConfigAction, config: &SweepConfig, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = workspace.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            let toml_str = toml::to_string_pretty(&SweepConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}
