mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{
    BucketArgs, ChartArgs, LabelArgs, cmd_buckets, cmd_chart, cmd_charts, cmd_config, cmd_labels,
};
use crate::config::{Config, resolve_format};
use crate::format::FormatOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON and CSV
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load_from(&config_path);
    let base_opts =
        FormatOptions::new(cli.no_color || config.no_color, cli.style).with_compact(cli.compact);
    let output = cli.output.as_ref();

    match cli.command {
        Commands::Chart {
            input,
            output: out,
            chart,
            max_points,
        } => {
            let opts = base_opts.with_no_header(out.no_header);
            cmd_chart(ChartArgs {
                input: &input.input,
                chart: &chart,
                max_points,
                since: input.since,
                until: input.until,
                offset: input.offset,
                format: resolve_format(out.format, &config),
                output,
                quiet: cli.quiet,
                config: &config,
                opts: &opts,
            })
        }
        Commands::Buckets {
            input,
            output: out,
            metrics,
            reduction,
        } => {
            let opts = base_opts.with_no_header(out.no_header);
            cmd_buckets(BucketArgs {
                input: &input.input,
                metrics: &metrics,
                reduction,
                since: input.since,
                until: input.until,
                offset: input.offset,
                format: resolve_format(out.format, &config),
                output,
                config: &config,
                opts: &opts,
            })
        }
        Commands::Labels {
            output: out,
            start,
            days,
        } => {
            let opts = base_opts.with_no_header(out.no_header);
            cmd_labels(LabelArgs {
                start,
                days,
                format: resolve_format(out.format, &config),
                output,
                opts: &opts,
            })
        }
        Commands::Charts { output: out } => {
            let opts = base_opts.with_no_header(out.no_header);
            cmd_charts(&config, resolve_format(out.format, &config), output, &opts)
        }
        Commands::Config { action } => cmd_config(action, &config_path, cli.quiet),
    }
}
