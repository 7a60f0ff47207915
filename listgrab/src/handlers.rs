use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use clap::ArgMatches;
use colored::Colorize;
use listgrab_core::export::{self, ExportFormat, default_filename, export_to_path};
use listgrab_core::presets::{PRESETS, preset};
use listgrab_core::run::{ScrapeJob, execute_scrape, generate_run_summary};
use listgrab_scanner::config::{PaginationSpec, ValueSource};
use listgrab_scanner::{RunOptions, SiteConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Install the fmt subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// Helper functions for scrape handler

/// Load a site definition from a JSON file or a built-in preset
pub fn load_site(config: Option<&PathBuf>, preset_name: Option<&str>) -> Result<SiteConfig> {
    if let Some(config_path) = config {
        let expanded = shellexpand::tilde(&config_path.to_string_lossy()).into_owned();
        let path = Path::new(&expanded);
        SiteConfig::from_path(path)
            .with_context(|| format!("invalid site configuration {}", path.display()))
    } else if let Some(name) = preset_name {
        let definition = preset(name).ok_or_else(|| {
            let known: Vec<&str> = PRESETS.iter().map(|(n, _)| *n).collect();
            anyhow!("unknown preset '{}' (available: {})", name, known.join(", "))
        })?;
        SiteConfig::new(definition).with_context(|| format!("preset '{}' is invalid", name))
    } else {
        bail!("Either --config or --preset must be provided")
    }
}

/// Split a comma-separated field list, dropping blanks
pub fn parse_field_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Where to write the export. A directory gets a generated filename inside it.
pub fn resolve_output_path(
    output: Option<&PathBuf>,
    site_name: &str,
    format: ExportFormat,
) -> PathBuf {
    let generated = default_filename(site_name, format, Local::now());
    match output {
        None => PathBuf::from(generated),
        Some(path) => {
            let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
            if expanded.is_dir() {
                expanded.join(generated)
            } else {
                expanded
            }
        }
    }
}

fn parse_delay(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| anyhow!("delay must be a non-negative number of seconds, got {}", seconds))
}

pub async fn handle_scrape(sub_matches: &ArgMatches) {
    if let Err(e) = run_scrape(sub_matches).await {
        eprintln!("{} Scrape failed: {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run_scrape(sub_matches: &ArgMatches) -> Result<()> {
    let quiet = sub_matches.get_flag("quiet");
    let site = load_site(
        sub_matches.get_one::<PathBuf>("config"),
        sub_matches.get_one::<String>("preset").map(String::as_str),
    )?;
    let url = sub_matches
        .get_one::<Url>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let pages = *sub_matches.get_one::<usize>("pages").unwrap_or(&1);
    let delay = parse_delay(*sub_matches.get_one::<f64>("delay").unwrap_or(&1.0))?;
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ExportFormat::from_str(f))
        .unwrap_or(ExportFormat::Csv);
    let output = sub_matches.get_one::<PathBuf>("output");

    let mut options = RunOptions::new(url.as_str())
        .with_max_pages(pages)
        .with_delay(delay);
    if let Some(fields) = sub_matches.get_one::<String>("fields") {
        options = options.with_fields(parse_field_list(fields));
    }

    // Ctrl-C stops the run between pages; what was collected is still exported.
    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!(
                "\n{} Interrupted, stopping after the current page...",
                "!".yellow().bold()
            );
            ctrl_c_token.cancel();
        }
    });
    options = options.with_cancellation(cancel);

    if !quiet {
        println!(
            "\n{} Scraping {} with {}",
            "→".blue(),
            url.as_str().bright_white(),
            site.site_name().bright_cyan()
        );
        println!("Pages: {}  Delay: {:?}\n", pages, delay);
    }
    info!("Running {} against {}", site.site_name(), url);

    let site_name = site.site_name().to_string();
    let job = ScrapeJob::new(site, options).with_progress_bars(!quiet);
    let result = execute_scrape(job, None).await?;

    if !quiet {
        println!("\n{} Scrape complete!\n", "✓".green().bold());
        print!("{}", generate_run_summary(&result));
    }

    if result.is_empty() {
        eprintln!("{} No data to export", "⚠".yellow().bold());
        return Ok(());
    }

    if output.is_none() && format == ExportFormat::Text {
        print!("{}", export::render(&result, format)?);
        return Ok(());
    }

    let path = resolve_output_path(output, &site_name, format);
    export_to_path(&result, format, &path)?;
    debug!("Wrote {} export to {}", format.extension(), path.display());
    println!(
        "{} Exported {} records to {}",
        "✓".green().bold(),
        result.records.len(),
        path.display().to_string().bright_white()
    );
    Ok(())
}

pub fn handle_validate(sub_matches: &ArgMatches) {
    let config = sub_matches.get_one::<PathBuf>("config");
    match load_site(config, None) {
        Ok(site) => {
            println!("{} {} is valid", "✓".green().bold(), site.site_name().bright_white());
            print!("{}", describe_site(&site));
        }
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub fn handle_presets() {
    println!("{}", "Built-in presets:".bright_white().bold());
    for (name, description) in PRESETS {
        println!("  {:20} {}", name.bright_cyan(), description);
    }
}

/// Plain-text outline of a validated site, as printed by `validate`
pub fn describe_site(site: &SiteConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Container: {}\n", site.container_selector()));
    let pagination = match site.pagination() {
        None => "none (single page)".to_string(),
        Some(PaginationSpec::Parameter { name, base_url }) => match base_url {
            Some(base) => format!("parameter '{}' on {}", name, base),
            None => format!("parameter '{}'", name),
        },
        Some(PaginationSpec::NextLink { selector_text, .. }) => {
            format!("next link '{}'", selector_text)
        }
    };
    out.push_str(&format!("  Pagination: {}\n", pagination));
    out.push_str(&format!("  Timeout: {}s\n", site.timeout().as_secs()));
    out.push_str("  Fields:\n");
    for field in site.fields() {
        let source = match field.source() {
            ValueSource::Text => "text".to_string(),
            ValueSource::Attribute(name) => format!("@{}", name),
        };
        let selector = if field.selector().is_empty() {
            "<container>"
        } else {
            field.selector()
        };
        out.push_str(&format!(
            "    {} {} {}{}\n",
            field.name(),
            selector,
            source,
            if field.is_multiple() { " (multiple)" } else { "" }
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delay() {
        assert_eq!(parse_delay(1.5).unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_delay(0.0).unwrap(), Duration::ZERO);
        assert!(parse_delay(-1.0).is_err());
        assert!(parse_delay(f64::NAN).is_err());
    }
}
