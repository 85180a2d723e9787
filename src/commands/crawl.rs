use anyhow::{Context, Result};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::crawler::audit;
use crate::crawler::config::{HscConfig, load_config, validate};
use crate::crawler::lock::RunLock;
use crate::crawler::metadata::MetadataStore;
use crate::crawler::paths::resolve_paths;
use crate::crawler::progress::{ProgressReporter, SilentProgress, StderrProgress};
use crate::crawler::sync::{SyncSettings, Synchronizer};
use crate::error::{CrawlError, CrawlPhase};
use crate::hackerrank::client::HackerRankClient;

#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    pub config_path: Option<PathBuf>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub base_folder: Option<String>,
    pub language_folder: bool,
    pub prepend_language: bool,
    pub quiet: bool,
}

fn apply_cli_overrides(cfg: &mut HscConfig, opts: &CrawlOptions) {
    if let Some(username) = &opts.username {
        cfg.account.username = Some(username.clone());
    }
    if let Some(password) = &opts.password {
        cfg.account.password = Some(password.clone());
    }
    if let Some(offset) = opts.offset {
        cfg.crawl.offset = offset;
    }
    if let Some(limit) = opts.limit {
        cfg.crawl.limit = Some(limit);
    }
    if let Some(base_folder) = &opts.base_folder {
        cfg.layout.base_folder = base_folder.clone();
    }
    if opts.language_folder {
        cfg.layout.make_language_folder = true;
    }
    if opts.prepend_language {
        cfg.layout.prepend_language_in_extension = true;
    }
}

type Prompt<'a> = &'a dyn Fn() -> io::Result<String>;

/// Resolves one credential, asking through `prompt` when it is unset.
fn required(
    value: Option<&str>,
    what: &str,
    env_var: &str,
    prompt: Option<Prompt<'_>>,
) -> Result<String> {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(v.to_string());
    }
    if let Some(prompt) = prompt {
        let answer = prompt().with_context(|| format!("failed to read {what}"))?;
        if !answer.trim().is_empty() {
            return Ok(answer.trim().to_string());
        }
    }
    Err(CrawlError::InvalidConfig(format!(
        "{what} is required (--{what}, {env_var} or [account] {what})"
    ))
    .into())
}

fn read_username() -> io::Result<String> {
    eprint!("username: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn read_password() -> io::Result<String> {
    rpassword::prompt_password("password: ")
}

pub fn run(opts: &CrawlOptions) -> Result<CommandReport> {
    let mut cfg = load_config(opts.config_path.as_deref())
        .with_context(|| CrawlPhase::Config.context("load configuration"))?;
    apply_cli_overrides(&mut cfg, opts);
    validate(&cfg).with_context(|| CrawlPhase::Config.context("validate flags"))?;

    let paths = resolve_paths(&cfg.layout.base_folder)?;
    let mut report = CommandReport::new("crawl");

    let lock = RunLock::acquire(&paths.lock_file())
        .with_context(|| CrawlPhase::Lock.context("acquire run lock"))?;
    let mut metadata = MetadataStore::open(&paths.metadata_file).with_context(|| {
        CrawlPhase::Metadata.context(format!("open {}", paths.metadata_file.display()))
    })?;

    // Only ask when someone can answer; scripts get the config error.
    let interactive = io::stdin().is_terminal();
    let username = required(
        cfg.account.username.as_deref(),
        "username",
        "HSC_USERNAME",
        interactive.then_some(&read_username as Prompt<'_>),
    )
    .with_context(|| CrawlPhase::Config.context("resolve account"))?;
    let password = required(
        cfg.account.password.as_deref(),
        "password",
        "HSC_PASSWORD",
        interactive.then_some(&read_password as Prompt<'_>),
    )
    .with_context(|| CrawlPhase::Config.context("resolve account"))?;

    report.detail(format!("base_dir={}", paths.base_dir.display()));
    report.detail(format!("metadata_file={}", paths.metadata_file.display()));
    report.detail(format!("lock_file={}", lock.path().display()));
    report.detail(format!("tracked_challenges_before={}", metadata.tracked()));

    let client = HackerRankClient::new(
        &cfg.remote.base_url,
        &username,
        &password,
        cfg.remote.timeout_secs,
    )?;
    let total = client
        .login()
        .with_context(|| CrawlPhase::Login.context(format!("user={username}")))?;

    let offset = cfg.crawl.offset;
    let limit = match cfg.crawl.limit {
        Some(limit) if limit > 0 => limit,
        _ => total,
    };
    report.detail(format!("account_submissions={total}"));
    report.detail(format!("offset={offset} limit={limit}"));
    audit::record(
        &paths,
        "crawl",
        "started",
        &format!("user={username} offset={offset} limit={limit}"),
    );

    let submissions = client
        .list_submissions(offset, limit)
        .with_context(|| CrawlPhase::List.context(format!("offset={offset} limit={limit}")))?;

    let progress: Box<dyn ProgressReporter> = if opts.quiet {
        Box::new(SilentProgress)
    } else {
        Box::new(StderrProgress)
    };
    let settings = SyncSettings::from_config(&cfg, &paths);
    let outcome = Synchronizer::new(&client, &mut metadata, progress.as_ref(), settings)
        .with_audit(&paths)
        .synchronize(&submissions);

    let summary = match outcome {
        Ok(summary) => summary,
        Err(err) => {
            audit::record(&paths, "crawl", "failed", &format!("{err:#}"));
            return Err(err);
        }
    };
    audit::record(
        &paths,
        "crawl",
        "finished",
        &serde_json::to_string(&summary)?,
    );

    report.detail(format!("listed={}", summary.total));
    report.detail(format!("accepted={}", summary.accepted));
    report.detail(format!("skipped_rejected={}", summary.skipped_rejected));
    report.detail(format!("skipped_known={}", summary.skipped_known));
    report.detail(format!("saved={}", summary.saved));
    report.detail(format!("kept_existing={}", summary.kept_existing));
    report.detail(format!("tracked_challenges_after={}", metadata.tracked()));
    Ok(report)
}
