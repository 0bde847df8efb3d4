/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When CleanlineConfig schema changes
*/

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use rust_decimal::Decimal;

use cleanline_cli::config::{ApiConfig, CleanlineConfig, JobConfig};

pub fn run_init(output: &Path) -> Result<()> {
    println!("{}", style("Welcome to Cleanline Init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a new client configuration.").dim()
    );

    let theme = ColorfulTheme::default();
    let defaults = ApiConfig::default();

    println!("\n{}", style("--- Backend ---").bold());
    let base_url: String = Input::with_theme(&theme)
        .with_prompt("API base URL")
        .default(defaults.base_url.clone())
        .interact_text()?;

    let realtime_url: String = Input::with_theme(&theme)
        .with_prompt("Realtime URL")
        .default(defaults.realtime_url.clone())
        .interact_text()?;

    println!("\n{}", style("--- First job ---").bold());
    let id: String = Input::with_theme(&theme)
        .with_prompt("Job ID")
        .default("job-1".to_string())
        .interact_text()?;

    let title: String = Input::with_theme(&theme)
        .with_prompt("Title")
        .default("Standard clean".to_string())
        .interact_text()?;

    let hourly_rate: String = Input::with_theme(&theme)
        .with_prompt("Hourly rate")
        .default("25.00".to_string())
        .validate_with(|value: &String| {
            Decimal::from_str(value.trim())
                .map(|_| ())
                .map_err(|_| "enter a decimal amount")
        })
        .interact_text()?;

    let property_code: String = Input::with_theme(&theme)
        .with_prompt("Property code")
        .interact_text()?;

    let access_pin: String = Input::with_theme(&theme)
        .with_prompt("Access PIN")
        .interact_text()?;

    let tasks: String = Input::with_theme(&theme)
        .with_prompt("Tasks (comma separated)")
        .default("Kitchen, Bathroom, Bedrooms, Floors".to_string())
        .interact_text()?;

    let config = CleanlineConfig {
        api: ApiConfig {
            base_url,
            realtime_url,
            ..defaults
        },
        jobs: vec![JobConfig {
            id,
            title,
            hourly_rate: Decimal::from_str(hourly_rate.trim()).context("parse hourly rate")?,
            property_code,
            access_pin,
            tasks: split_tasks(&tasks),
        }],
        ..CleanlineConfig::default()
    };
    config.validate().context("validate generated config")?;

    let yaml = serde_yaml::to_string(&config).context("failed to serialize config to YAML")?;

    std::fs::write(output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}

fn split_tasks(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|task| !task.is_empty())
        .map(str::to_string)
        .collect()
}
