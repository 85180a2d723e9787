use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};
use crate::error::error_code_of;

/// HackerRank solution crawler: mirrors accepted submissions into a local
/// folder tree with sorted README indexes per domain and subdomain.
#[derive(Parser)]
#[command(name = "hsc", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to `./hsc.toml`, then `~/.hsc/hsc.toml`).
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Print the command report as JSON on stdout.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download accepted solutions that are newer than the last crawl.
    Crawl(CrawlArgs),
    /// Show resolved paths, tracked challenges and index size.
    Status,
}

#[derive(Args)]
struct CrawlArgs {
    /// HackerRank account username.
    #[arg(long, short = 'u')]
    username: Option<String>,

    /// HackerRank account password.
    #[arg(long, short = 'p')]
    password: Option<String>,

    /// Crawl submissions starting from this position in the listing.
    #[arg(long, short = 'o')]
    offset: Option<u64>,

    /// Number of submissions to crawl (defaults to all).
    #[arg(long, short = 'l')]
    limit: Option<u64>,

    /// Folder that receives solutions and READMEs.
    #[arg(long)]
    base_folder: Option<String>,

    /// Put each language in its own folder below the subdomain.
    #[arg(long)]
    language_folder: bool,

    /// Keep the language token in the extension, e.g. `matching.python3.py`.
    #[arg(long)]
    prepend_language: bool,

    /// Do not draw the progress bar.
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Crawl(args) => commands::crawl::run(&commands::crawl::CrawlOptions {
            config_path: cli.config.clone(),
            username: args.username,
            password: args.password,
            offset: args.offset,
            limit: args.limit,
            base_folder: args.base_folder,
            language_folder: args.language_folder,
            prepend_language: args.prepend_language,
            quiet: args.quiet || cli.json,
        }),
        Command::Status => commands::status::run(cli.config.as_deref()),
    };

    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            return Err(match error_code_of(&err) {
                Some(code) => err.context(code.as_str()),
                None => err,
            });
        }
    };

    print_report(&report, cli.json)?;
    if !report.ok {
        anyhow::bail!("{} finished with {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}
