//! Deploy command - run the deployment pipeline for a project

use std::path::Path;

use console::style;
use miette::Result;
use mlpub_cloud::{LambdaService, S3Storage};
use mlpub_core::DeployConfig;
use mlpub_deploy::{DeployError, DeployOutcome, Deployment};

use crate::exit_codes;

pub async fn run(path: &Path) -> Result<()> {
    match execute(path).await {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("{} {}", style("Error:").red().bold(), err);
            std::process::exit(exit_code(&err));
        }
    }
}

async fn execute(path: &Path) -> std::result::Result<(), DeployError> {
    let config = DeployConfig::load(path)?;
    let region = config.platform.region().to_string();

    println!(
        "{} {} ({})",
        style("Deploying").cyan().bold(),
        config.name,
        config.platform.label()
    );

    let storage = S3Storage::new(&region).await;
    let functions = LambdaService::new(&region).await;
    let mut deployment = Deployment::new(path, config, storage, functions);
    let outcome = deployment.run().await?;

    match outcome {
        DeployOutcome::Function {
            name,
            arn,
            bucket,
            key,
        } => {
            println!("  {} {}", style("Function").green().bold(), name);
            if let Some(arn) = arn {
                println!("  {} {}", style("Arn").dim(), arn);
            }
            println!("  {} s3://{}/{}", style("Artifact").dim(), bucket, key);
        }
        DeployOutcome::Image { image } => {
            println!("  {} {}", style("Image").green().bold(), image);
        }
    }

    println!();
    println!("{}", style("Deployment complete.").green());
    Ok(())
}

fn exit_code(err: &DeployError) -> i32 {
    match err {
        DeployError::Config(_) => exit_codes::CONFIG_ERROR,
        DeployError::Package(_) => exit_codes::PACKAGE_ERROR,
        DeployError::Cloud(_) => exit_codes::CLOUD_ERROR,
    }
}
