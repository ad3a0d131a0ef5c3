//! Check command - validate an mlpub configuration file

use std::path::Path;

use console::style;
use miette::{IntoDiagnostic, Result};
use mlpub_core::{DeployConfig, PlatformConfig};

use crate::exit_codes;
use crate::util::format_size;

pub fn run(config_path: &Path, json: bool) -> Result<()> {
    if !config_path.exists() {
        eprintln!(
            "{} Config file does not exist: {}",
            style("Error:").red().bold(),
            config_path.display()
        );
        std::process::exit(exit_codes::CONFIG_ERROR);
    }

    let config = match DeployConfig::load_from(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {}", style("Error:").red().bold(), err);
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&config).into_diagnostic()?
        );
        return Ok(());
    }

    println!("{} {}", style("Config OK:").green().bold(), config.name);

    let project_root = config_path.parent().unwrap_or_else(|| Path::new("."));
    let model = project_root.join(&config.model_path);
    match std::fs::metadata(&model) {
        Ok(meta) => println!(
            "  {} {} ({})",
            style("Model").dim(),
            config.model_path,
            format_size(meta.len())
        ),
        Err(_) => println!(
            "  {} {} ({})",
            style("Model").dim(),
            config.model_path,
            style("missing").yellow()
        ),
    }

    match &config.pre_processor {
        Some(script) => println!("  {} {}", style("Pre-processor").dim(), script),
        None => println!("  {} (default)", style("Pre-processor").dim()),
    }

    println!("  {} {}", style("Platform").dim(), config.platform.label());
    println!("  {} {}", style("Region").dim(), config.platform.region());

    if let PlatformConfig::AwsLambda(extras) = &config.platform {
        println!("  {} {}", style("Runtime").dim(), extras.runtime);
        if let Some(bucket) = config.bucket() {
            println!("  {} {}", style("Bucket").dim(), bucket);
        }
    }

    Ok(())
}
