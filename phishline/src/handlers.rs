use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use phishline_core::report::{self, ExtractionRow, ReportFormat};
use phishline_core::{ExtractorConfig, Feature, FeatureExtractor};
use phishline_probe::Probe;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Load URLs from a newline-delimited file. Blank lines and `#` comments
/// are skipped; every other line is kept, even if it will not parse, so the
/// output has one row per input URL.
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hosts file {}", path.display()))?;

    let urls: Vec<String> = content.lines().filter_map(parse_url_line).collect();

    if urls.is_empty() {
        bail!("No URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Trim a line and drop it if it is blank or a comment
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let parses = Url::parse(line).is_ok() || Url::parse(&format!("http://{}", line)).is_ok();
    if !parses {
        warn!("'{}' is not a valid URL; it will score -1 everywhere", line);
    }

    Some(line.to_string())
}

/// Build the extractor settings from the global flags
pub fn build_config(matches: &ArgMatches) -> ExtractorConfig {
    let mut config = ExtractorConfig::default();

    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.budget_secs = *timeout;
        config.probe.timeout_secs = *timeout;
    }
    if let Some(user_agent) = matches.get_one::<String>("user-agent") {
        config.probe.user_agent = user_agent.clone();
    }
    if matches.get_flag("verify-certs") {
        config.probe.accept_invalid_certs = false;
    }
    if let Some(server) = matches.get_one::<String>("whois-server") {
        config.probe = config.probe.with_whois_server(server.clone());
    }
    config.cache_ttl_secs = matches.get_one::<u64>("cache-ttl").copied();

    config
}

fn parse_format(matches: &ArgMatches) -> Result<ReportFormat> {
    let name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    ReportFormat::from_str(name).with_context(|| format!("Unknown report format '{}'", name))
}

/// Run every URL through the extractor, at most `threads` at a time.
/// Rows come back in input order.
pub async fn run_extraction<P: Probe>(
    extractor: &FeatureExtractor<P>,
    urls: Vec<String>,
    threads: usize,
    show_progress: bool,
) -> Vec<ExtractionRow> {
    let total = urls.len();
    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Extracting features for {} URLs...", total));
        Some(pb)
    } else {
        None
    };

    let rows: Vec<ExtractionRow> = stream::iter(urls)
        .map(|url| {
            let progress_bar = progress_bar.as_ref();
            async move {
                let features = extractor.extract(&url).await;
                if let Some(pb) = progress_bar {
                    pb.set_message(format!("Extracted {}", url));
                }
                ExtractionRow::new(url, features)
            }
        })
        .buffered(threads.max(1))
        .collect()
        .await;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    rows
}

/// Pick the plain or cached network extractor and run the batch
pub async fn extract_all(
    config: &ExtractorConfig,
    urls: Vec<String>,
    threads: usize,
    show_progress: bool,
) -> Result<Vec<ExtractionRow>> {
    match config.cache_ttl_secs {
        Some(ttl) => {
            let extractor = FeatureExtractor::cached(config, Duration::from_secs(ttl))
                .context("Failed to build network probe")?;
            Ok(run_extraction(&extractor, urls, threads, show_progress).await)
        }
        None => {
            let extractor =
                FeatureExtractor::network(config).context("Failed to build network probe")?;
            Ok(run_extraction(&extractor, urls, threads, show_progress).await)
        }
    }
}

/// Print the report, or save it when an output path was given
pub fn emit_report(content: &str, output: Option<&String>, quiet: bool) -> Result<()> {
    match output {
        Some(path) => {
            let expanded = shellexpand::tilde(path);
            let path = PathBuf::from(expanded.as_ref());
            report::save_report(content, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                println!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}

pub async fn handle_extract(sub_matches: &ArgMatches, config: &ExtractorConfig, quiet: bool) -> Result<()> {
    let url = sub_matches
        .get_one::<String>("url")
        .context("--url is required")?;
    let format = parse_format(sub_matches)?;

    info!("Extracting features for {}", url);
    let rows = extract_all(config, vec![url.clone()], 1, false).await?;
    let content = report::render(&rows, format)?;

    emit_report(&content, sub_matches.get_one::<String>("output"), quiet)
}

pub async fn handle_batch(sub_matches: &ArgMatches, config: &ExtractorConfig, quiet: bool) -> Result<()> {
    let hosts_file = sub_matches
        .get_one::<PathBuf>("hosts-file")
        .context("--hosts-file is required")?;
    let threads = sub_matches.get_one::<usize>("threads").copied().unwrap_or(10);
    let format = parse_format(sub_matches)?;

    let urls = load_urls_from_file(hosts_file)?;
    if !quiet {
        eprintln!(
            "{} {} URLs from {} ({} workers)",
            "→".blue(),
            urls.len(),
            hosts_file.display().to_string().bright_white(),
            threads
        );
    }

    let rows = extract_all(config, urls, threads, !quiet).await?;
    let content = report::render(&rows, format)?;

    emit_report(&content, sub_matches.get_one::<String>("output"), quiet)
}

pub fn handle_features() {
    for feature in Feature::ALL {
        println!("{:02}  {}", feature.index() + 1, feature.name());
    }
}
