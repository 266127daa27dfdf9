//! Command-line surface and interactive prompt layer
//!
//! Every run parameter can come from a flag; anything missing is prompted
//! for. The merged result is validated into a [`CycleConfig`] before the
//! first iteration — a bad answer aborts the run with a message instead of
//! re-prompting.

use std::path::{Path, PathBuf};

use clap::Parser;
use dialoguer::console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use crate::config::{
    parse_strict_integer, CycleConfig, DEFAULT_MAX_DELAY_SECS, DEFAULT_MIN_DELAY_SECS,
};
use crate::error::{ChurnError, Result};
use crate::models::{parse_package_name, PackageSpec, RunReport};

#[derive(Parser, Debug)]
#[command(
    name = "churn",
    version,
    about = "Automated npm install/uninstall cycles with rotating proxy support"
)]
pub struct CliArgs {
    /// Package to cycle; accepts pasted commands like "npm i lodash"
    #[arg(long)]
    pub package: Option<String>,

    /// Number of install/uninstall iterations to run
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Minimum delay between iterations, in seconds
    #[arg(long)]
    pub min_delay: Option<u64>,

    /// Maximum delay between iterations, in seconds
    #[arg(long)]
    pub max_delay: Option<u64>,

    /// Proxy list file, one URL per line
    #[arg(long, default_value = "proxies.txt")]
    pub proxy_file: PathBuf,

    /// Route traffic through the proxy pool without asking
    #[arg(long, conflicts_with = "no_proxies")]
    pub proxies: bool,

    /// Never use proxies, even when a pool is loaded
    #[arg(long)]
    pub no_proxies: bool,
}

/// Merge flags and prompts into a validated run configuration
pub fn collect_config(args: &CliArgs, pool_len: usize) -> Result<CycleConfig> {
    let theme = ColorfulTheme::default();

    let package = match &args.package {
        Some(raw) => PackageSpec::parse(raw)?,
        None => prompt_package(&theme)?,
    };

    let iterations = match args.iterations {
        Some(n) => n,
        None => prompt_iterations(&theme)?,
    };

    let min_delay = match args.min_delay {
        Some(n) => n,
        None => prompt_delay(
            &theme,
            "Minimum delay between iterations (seconds)",
            DEFAULT_MIN_DELAY_SECS,
        )?,
    };

    let max_delay = match args.max_delay {
        Some(n) => n,
        None => prompt_delay(
            &theme,
            "Maximum delay between iterations (seconds)",
            DEFAULT_MAX_DELAY_SECS,
        )?,
    };

    let use_proxies = resolve_proxy_usage(args, pool_len, &theme)?;

    CycleConfig::new(package, iterations, min_delay, max_delay, use_proxies)
}

fn prompt_package(theme: &ColorfulTheme) -> Result<PackageSpec> {
    let raw: String = Input::with_theme(theme)
        .with_prompt("Package (e.g. lodash, npm i express, @scope/pkg)")
        .allow_empty(true)
        .interact_text()?;

    let cleaned = parse_package_name(&raw);
    if cleaned != raw.trim() {
        println!("  interpreted as: {}", style(&cleaned).cyan());
    }

    PackageSpec::parse(&raw)
}

fn prompt_iterations(theme: &ColorfulTheme) -> Result<u32> {
    let raw: String = Input::with_theme(theme)
        .with_prompt("Number of iterations")
        .allow_empty(true)
        .interact_text()?;

    match parse_strict_integer(&raw) {
        Some(n) if n >= 1 => u32::try_from(n)
            .map_err(|_| ChurnError::InvalidConfig("iteration count is too large".into())),
        _ => Err(ChurnError::InvalidConfig(
            "iteration count must be a positive integer".into(),
        )),
    }
}

fn prompt_delay(theme: &ColorfulTheme, prompt: &str, default: u64) -> Result<u64> {
    let raw: String = Input::with_theme(theme)
        .with_prompt(format!("{prompt} [{default}]"))
        .allow_empty(true)
        .interact_text()?;

    delay_or_default(&raw, default).ok_or_else(|| {
        ChurnError::InvalidConfig("delays must be non-negative integers".into())
    })
}

/// Blank input means "take the default"; anything else must parse strictly
fn delay_or_default(input: &str, default: u64) -> Option<u64> {
    if input.trim().is_empty() {
        return Some(default);
    }
    parse_strict_integer(input)
}

fn resolve_proxy_usage(args: &CliArgs, pool_len: usize, theme: &ColorfulTheme) -> Result<bool> {
    if args.no_proxies {
        return Ok(false);
    }
    if pool_len == 0 {
        if args.proxies {
            return Err(ChurnError::InvalidConfig(
                "--proxies requested but the proxy list is empty".into(),
            ));
        }
        return Ok(false);
    }
    if args.proxies {
        return Ok(true);
    }

    Ok(Confirm::with_theme(theme)
        .with_prompt(format!("Use proxies? ({pool_len} loaded)"))
        .default(false)
        .interact()?)
}

pub fn print_banner() {
    println!();
    println!(
        "{}",
        style("churn - npm install/uninstall cycler").cyan().bold()
    );
    println!();
}

pub fn print_pool_status(path: &Path, count: usize) {
    if count > 0 {
        println!(
            "{} proxies loaded from {}",
            style(count).green(),
            path.display()
        );
    } else {
        println!(
            "{}",
            style(format!(
                "no proxies loaded from {} - running with a direct connection",
                path.display()
            ))
            .dim()
        );
    }
}

pub fn print_config(config: &CycleConfig, pool_len: usize) {
    println!();
    println!("  package:    {}", style(&config.package).cyan());
    println!("  iterations: {}", config.iterations);
    println!(
        "  delay:      {}s - {}s",
        config.min_delay_secs, config.max_delay_secs
    );
    if config.use_proxies {
        println!("  proxies:    yes ({pool_len} available)");
    } else {
        println!("  proxies:    no");
    }
    println!();
}

pub fn print_report(report: &RunReport) {
    println!();
    println!("{}", style("run summary").bold());
    println!("  successful: {}", style(report.successful).green());
    println!("  failed:     {}", style(report.failed).red());
    println!("  total:      {}", report.iterations);
    if report.aborted {
        println!(
            "  {}",
            style("aborted: no working proxies left").yellow()
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_or_default() {
        assert_eq!(delay_or_default("", 5), Some(5));
        assert_eq!(delay_or_default("   ", 1), Some(1));
        assert_eq!(delay_or_default("3", 5), Some(3));
        assert_eq!(delay_or_default("0", 5), Some(0));
        assert_eq!(delay_or_default("-1", 5), None);
        assert_eq!(delay_or_default("abc", 5), None);
    }

    #[test]
    fn test_resolve_proxy_usage_flag_paths() {
        let theme = ColorfulTheme::default();

        let args = CliArgs::parse_from(["churn", "--no-proxies"]);
        assert!(!resolve_proxy_usage(&args, 3, &theme).unwrap());

        let args = CliArgs::parse_from(["churn", "--proxies"]);
        assert!(resolve_proxy_usage(&args, 3, &theme).unwrap());

        // Empty pool: silently direct unless proxies were demanded
        let args = CliArgs::parse_from(["churn"]);
        assert!(!resolve_proxy_usage(&args, 0, &theme).unwrap());

        let args = CliArgs::parse_from(["churn", "--proxies"]);
        let err = resolve_proxy_usage(&args, 0, &theme).unwrap_err();
        assert!(matches!(err, ChurnError::InvalidConfig(_)));
    }

    #[test]
    fn test_collect_config_from_flags_only() {
        let args = CliArgs::parse_from([
            "churn",
            "--package",
            "npm i lodash --save",
            "--iterations",
            "2",
            "--min-delay",
            "0",
            "--max-delay",
            "3",
            "--no-proxies",
        ]);

        let config = collect_config(&args, 0).unwrap();
        assert_eq!(config.package.as_str(), "lodash");
        assert_eq!(config.iterations, 2);
        assert_eq!(config.min_delay_secs, 0);
        assert_eq!(config.max_delay_secs, 3);
        assert!(!config.use_proxies);
    }

    #[test]
    fn test_collect_config_rejects_bad_package_flag() {
        let args = CliArgs::parse_from([
            "churn",
            "--package",
            "lodash;id",
            "--iterations",
            "1",
            "--min-delay",
            "0",
            "--max-delay",
            "0",
        ]);

        let err = collect_config(&args, 0).unwrap_err();
        assert!(matches!(err, ChurnError::InvalidPackageSpec(_)));
    }
}
