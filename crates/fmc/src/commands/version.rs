//! `fmc version`: server version and the capability table.

use std::io::IsTerminal;

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use fmc_core::Provider;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct FeatureStatus {
    feature: String,
    min_version: String,
    supported: bool,
}

#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Requires")]
    min_version: String,
    #[tabled(rename = "Available")]
    supported: String,
}

#[derive(Serialize)]
struct VersionReport {
    server_version: String,
    features: Vec<FeatureStatus>,
}

fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

pub fn handle(provider: &Provider, global: &GlobalOpts) -> Result<(), CliError> {
    let caps = provider.capabilities();
    let features: Vec<FeatureStatus> = caps
        .table()
        .into_iter()
        .map(|(feature, min, supported)| FeatureStatus {
            feature: feature.to_string(),
            min_version: min.to_string(),
            supported,
        })
        .collect();

    if matches!(global.output, OutputFormat::Table) {
        let color = use_color();
        let table = output::render_list(&global.output, &features, |f| FeatureRow {
            feature: f.feature.clone(),
            min_version: f.min_version.clone(),
            supported: match (f.supported, color) {
                (true, true) => "yes".green().to_string(),
                (false, true) => "no".red().to_string(),
                (true, false) => "yes".into(),
                (false, false) => "no".into(),
            },
        })?;
        output::print_output(&format!("FMC {}\n{table}", caps.version()), global.quiet);
        return Ok(());
    }

    let report = VersionReport {
        server_version: caps.version().to_string(),
        features,
    };
    let out = output::render_state(&global.output, &report)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
