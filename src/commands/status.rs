use anyhow::Result;
use std::env;
use std::path::Path;

use crate::commands::CommandReport;
use crate::crawler::config::load_config;
use crate::crawler::metadata::MetadataStore;
use crate::crawler::paths::resolve_paths;
use crate::crawler::readme::{IndexTier, IndexWriter};

include!(concat!(env!("OUT_DIR"), "/hsc_env_allowlist.rs"));

pub fn run(config_path: Option<&Path>) -> Result<CommandReport> {
    let cfg = load_config(config_path)?;
    let paths = resolve_paths(&cfg.layout.base_folder)?;
    let mut report = CommandReport::new("status");

    match &cfg.source {
        Some(source) if source.exists() => {
            report.detail(format!("config_file={}", source.display()))
        }
        _ => report.detail("config_file=<defaults>"),
    }
    report.detail(format!("work_dir={}", paths.work_dir.display()));
    report.detail(format!("base_dir={}", paths.base_dir.display()));
    report.detail(format!("metadata_file={}", paths.metadata_file.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));
    report.detail(format!("lock_file={}", paths.lock_file().display()));
    report.detail(format!("extensions_known={}", cfg.extension_table().len()));
    report.detail(format!(
        "layout language_folder={} prepend_language={} fallback_extension={:?}",
        cfg.layout.make_language_folder,
        cfg.layout.prepend_language_in_extension,
        cfg.layout.fallback_extension
    ));

    match MetadataStore::open(&paths.metadata_file) {
        Ok(store) => {
            let backing = store
                .path()
                .filter(|p| p.exists())
                .map(|_| "file")
                .unwrap_or("none");
            report.detail(format!(
                "tracked_challenges={} backing={backing}",
                store.tracked()
            ));
        }
        Err(err) => report.issue(format!("metadata store unusable: {err:#}")),
    }

    let index = IndexWriter::new(&paths.base_dir);
    if index.document_path(IndexTier::Root).exists() {
        match index.rows(IndexTier::Root) {
            Ok(rows) => report.detail(format!("indexed_solutions={}", rows.len())),
            Err(err) => report.issue(format!("root index unusable: {err:#}")),
        }
    } else {
        report.detail("indexed_solutions=0 (no root README yet)");
    }

    for var in GENERATED_HSC_ENV_ALLOWLIST {
        if env::var_os(var).is_some() {
            report.detail(format!("env {var}=set"));
        }
    }

    Ok(report)
}
