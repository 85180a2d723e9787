use crate::crawler::audit;
use crate::crawler::config::HscConfig;
use crate::crawler::extensions::ExtensionTable;
use crate::crawler::layout::{LayoutOptions, SiteLinks, SolutionLocation, Topic, derive};
use crate::crawler::metadata::MetadataStore;
use crate::crawler::paths::CrawlerPaths;
use crate::crawler::progress::{ProgressEvent, ProgressReporter};
use crate::crawler::readme::{IndexTier, IndexWriter, RowEntry, format_row};
use crate::error::CrawlPhase;
use crate::hackerrank::models::{SubmissionDetail, SubmissionSummary};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Where full submission details come from.
pub trait SubmissionSource {
    fn fetch_detail(&self, challenge_slug: &str, submission_id: i64) -> Result<SubmissionDetail>;
}

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub base_dir: PathBuf,
    /// Title of the root README.
    pub base_folder_name: String,
    pub extensions: ExtensionTable,
    pub layout: LayoutOptions,
    pub links: SiteLinks,
    /// Older payloads carry literal `\n` sequences instead of newlines.
    pub unescape_newlines: bool,
}

impl SyncSettings {
    pub fn from_config(cfg: &HscConfig, paths: &CrawlerPaths) -> Self {
        Self {
            base_dir: paths.base_dir.clone(),
            base_folder_name: cfg.layout.base_folder.clone(),
            extensions: cfg.extension_table(),
            layout: cfg.layout_options(),
            links: SiteLinks::new(&cfg.remote.base_url),
            unescape_newlines: cfg.layout.unescape_newlines,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub total: usize,
    pub accepted: usize,
    pub skipped_rejected: usize,
    pub skipped_known: usize,
    pub saved: usize,
    pub kept_existing: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreOutcome {
    Written,
    KeptExisting,
}

/// Walks a submission listing in order and mirrors every accepted submission
/// newer than the recorded high-water mark of its challenge.
///
/// The mark is advanced before the detail fetch, so a crash after that point
/// drops the submission instead of ever indexing it twice.
pub struct Synchronizer<'a> {
    source: &'a dyn SubmissionSource,
    metadata: &'a mut MetadataStore,
    progress: &'a dyn ProgressReporter,
    index: IndexWriter,
    settings: SyncSettings,
    audit_paths: Option<&'a CrawlerPaths>,
    /// Solution path to the challenge whose code this run wrote there.
    written_this_run: HashMap<PathBuf, i64>,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        source: &'a dyn SubmissionSource,
        metadata: &'a mut MetadataStore,
        progress: &'a dyn ProgressReporter,
        settings: SyncSettings,
    ) -> Self {
        Self {
            source,
            metadata,
            progress,
            index: IndexWriter::new(&settings.base_dir),
            settings,
            audit_paths: None,
            written_this_run: HashMap::new(),
        }
    }

    pub fn with_audit(mut self, paths: &'a CrawlerPaths) -> Self {
        self.audit_paths = Some(paths);
        self
    }

    pub fn synchronize(&mut self, submissions: &[SubmissionSummary]) -> Result<SyncSummary> {
        let mut summary = SyncSummary {
            total: submissions.len(),
            ..SyncSummary::default()
        };

        for (n, submission) in submissions.iter().enumerate() {
            self.process(submission, &mut summary)?;
            self.progress.report(ProgressEvent::Advanced {
                n: n + 1,
                total: submissions.len(),
                challenge: submission.challenge.name.clone(),
            });
        }
        self.progress.report(ProgressEvent::Finished {
            total: submissions.len(),
        });

        Ok(summary)
    }

    fn process(&mut self, submission: &SubmissionSummary, summary: &mut SyncSummary) -> Result<()> {
        if !submission.is_accepted() {
            summary.skipped_rejected += 1;
            return Ok(());
        }
        summary.accepted += 1;

        let challenge_id = submission.challenge_id;
        if submission.id <= self.metadata.get(challenge_id) {
            summary.skipped_known += 1;
            return Ok(());
        }
        self.metadata.put(challenge_id, submission.id).with_context(|| {
            CrawlPhase::Metadata.context(format!(
                "record challenge={challenge_id} submission={}",
                submission.id
            ))
        })?;

        let slug = &submission.challenge.slug;
        let detail = self
            .source
            .fetch_detail(slug, submission.id)
            .with_context(|| {
                CrawlPhase::Detail.context(format!("challenge={slug} submission={}", submission.id))
            })?;

        let topic = Topic::from_track(detail.track.as_ref());
        let location = derive(
            &self.settings.base_dir,
            slug,
            &submission.challenge.name,
            &topic,
            &submission.language,
            &self.settings.extensions,
            &self.settings.layout,
        );

        let code = if self.settings.unescape_newlines {
            detail.code.replace("\\n", "\n")
        } else {
            detail.code
        };

        let path = location.path();
        match self
            .store(&path, challenge_id, &code)
            .with_context(|| CrawlPhase::Store.context(path.display()))?
        {
            StoreOutcome::Written => {
                summary.saved += 1;
                self.audit("store", "saved", &path.display().to_string());
            }
            StoreOutcome::KeptExisting => {
                summary.kept_existing += 1;
                self.audit("store", "kept-existing", &path.display().to_string());
            }
        }

        self.update_indexes(submission, &topic, &location)
            .with_context(|| CrawlPhase::Index.context(format!("challenge={slug}")))
    }

    /// A file already on disk wins unless this run wrote it for the same
    /// challenge: a newer submission in one listing replaces it.
    fn store(&mut self, path: &Path, challenge_id: i64, code: &str) -> Result<StoreOutcome> {
        let ours = self.written_this_run.get(path) == Some(&challenge_id);
        if path.exists() && !ours {
            return Ok(StoreOutcome::KeptExisting);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, code).with_context(|| format!("failed to write {}", path.display()))?;
        self.written_this_run.insert(path.to_path_buf(), challenge_id);
        Ok(StoreOutcome::Written)
    }

    fn update_indexes(
        &self,
        submission: &SubmissionSummary,
        topic: &Topic,
        location: &SolutionLocation,
    ) -> Result<()> {
        let links = &self.settings.links;
        let subdomain = IndexTier::Subdomain {
            domain: &topic.domain_name,
            subdomain: &topic.subdomain_name,
        };
        let domain = IndexTier::Domain {
            domain: &topic.domain_name,
        };

        self.index
            .ensure_created(subdomain, &topic.subdomain_name, &links.subdomain(topic))?;
        self.index
            .ensure_created(domain, &topic.domain_name, &links.domain(topic))?;
        self.index.ensure_created(
            IndexTier::Root,
            &self.settings.base_folder_name,
            &links.home(),
        )?;

        let problem_url = links.problem(&submission.challenge.slug);
        let entry = RowEntry {
            problem_name: &submission.challenge.name,
            problem_url: &problem_url,
            language: &submission.language,
            location,
        };
        for tier in [subdomain, domain, IndexTier::Root] {
            self.index.append_row(tier, &format_row(tier, &entry))?;
        }
        Ok(())
    }

    fn audit(&self, phase: &str, status: &str, message: &str) {
        if let Some(paths) = self.audit_paths {
            audit::record(paths, phase, status, message);
        }
    }
}
