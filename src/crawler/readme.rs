use crate::crawler::layout::SolutionLocation;
use crate::crawler::util::write_atomic;
use crate::error::CrawlError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const README_FILE_NAME: &str = "README.md";

/// Title, blank line, table header, separator.
pub const HEADER_LINES: usize = 4;

const PROBLEM_COLUMNS: &str = "Problem Name|Problem Link|Language|Solution Link|";

/// One index document in the base-folder hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTier<'a> {
    Root,
    Domain { domain: &'a str },
    Subdomain { domain: &'a str, subdomain: &'a str },
}

impl IndexTier<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Domain { .. } => "domain",
            Self::Subdomain { .. } => "subdomain",
        }
    }

    fn table_header(&self) -> String {
        match self {
            Self::Root => format!("|Domain|Subdomain|{PROBLEM_COLUMNS}"),
            Self::Domain { .. } => format!("|Subdomain|{PROBLEM_COLUMNS}"),
            Self::Subdomain { .. } => format!("|{PROBLEM_COLUMNS}"),
        }
    }

    fn separator(&self) -> &'static str {
        match self {
            Self::Root => "---|---|---|---|---|---",
            Self::Domain { .. } => "---|---|---|---|---",
            Self::Subdomain { .. } => "---|---|---|---",
        }
    }

    fn header(&self, title: &str, url: &str) -> [String; HEADER_LINES] {
        [
            format!("## [{title}]({url})"),
            String::new(),
            self.table_header(),
            self.separator().to_string(),
        ]
    }
}

/// Fields shared by the rows a single solution contributes to every tier.
#[derive(Debug, Clone)]
pub struct RowEntry<'a> {
    pub problem_name: &'a str,
    pub problem_url: &'a str,
    pub language: &'a str,
    pub location: &'a SolutionLocation,
}

/// A literal `|` would end the table cell early.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub fn format_row(tier: IndexTier<'_>, entry: &RowEntry<'_>) -> String {
    let location = entry.location;
    let domain = escape_cell(location.domain());
    let subdomain = escape_cell(location.subdomain());
    let (prefix, link) = match tier {
        IndexTier::Root => (
            format!("|[{domain}](./{domain})|[{subdomain}](./{domain}/{subdomain})"),
            location.link_from_root(),
        ),
        IndexTier::Domain { .. } => (
            format!("|[{subdomain}](./{subdomain})"),
            location.link_from_domain(),
        ),
        IndexTier::Subdomain { .. } => (String::new(), location.link_from_subdomain()),
    };
    format!(
        "{prefix}|{}|[Problem]({})|{}|[Solution]({})|",
        escape_cell(entry.problem_name),
        escape_cell(entry.problem_url),
        escape_cell(entry.language),
        escape_cell(&link)
    )
}

/// Maintains the sorted README listings under the base folder.
///
/// Each document is a fixed header followed by rows kept in plain byte order
/// of the row text. Every mutation rewrites the whole document.
#[derive(Debug, Clone)]
pub struct IndexWriter {
    base_dir: PathBuf,
}

impl IndexWriter {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
        }
    }

    pub fn document_path(&self, tier: IndexTier<'_>) -> PathBuf {
        match tier {
            IndexTier::Root => self.base_dir.join(README_FILE_NAME),
            IndexTier::Domain { domain } => self.base_dir.join(domain).join(README_FILE_NAME),
            IndexTier::Subdomain { domain, subdomain } => self
                .base_dir
                .join(domain)
                .join(subdomain)
                .join(README_FILE_NAME),
        }
    }

    /// Writes the header-only document if it does not exist yet. Returns
    /// whether a document was created.
    pub fn ensure_created(&self, tier: IndexTier<'_>, title: &str, url: &str) -> Result<bool> {
        let path = self.document_path(tier);
        if path.exists() {
            return Ok(false);
        }
        let header = tier.header(title, url);
        write_atomic(&path, &render(&header, &[]))?;
        Ok(true)
    }

    /// Inserts `row` and re-sorts the body. A row already present verbatim is
    /// not added again; returns whether the document changed.
    pub fn append_row(&self, tier: IndexTier<'_>, row: &str) -> Result<bool> {
        let path = self.document_path(tier);
        let (header, mut body) = self.load(tier, &path)?;
        if body.iter().any(|existing| existing == row) {
            return Ok(false);
        }
        body.push(row.to_string());
        body.sort();
        write_atomic(&path, &render(&header, &body))?;
        Ok(true)
    }

    pub fn rows(&self, tier: IndexTier<'_>) -> Result<Vec<String>> {
        let path = self.document_path(tier);
        let (_, body) = self.load(tier, &path)?;
        Ok(body)
    }

    fn load(&self, tier: IndexTier<'_>, path: &Path) -> Result<(Vec<String>, Vec<String>)> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut lines = raw.lines().map(ToOwned::to_owned);
        let header: Vec<String> = lines.by_ref().take(HEADER_LINES).collect();

        if header.len() < HEADER_LINES {
            return Err(CrawlError::IndexCorrupt(format!(
                "{} has {} lines, expected a {HEADER_LINES}-line {} header",
                path.display(),
                header.len(),
                tier.label()
            ))
            .into());
        }
        if header[2] != tier.table_header() {
            return Err(CrawlError::IndexCorrupt(format!(
                "{} table header `{}` does not match the {} layout",
                path.display(),
                header[2],
                tier.label()
            ))
            .into());
        }

        let body = lines.filter(|line| !line.trim().is_empty()).collect();
        Ok((header, body))
    }
}

fn render(header: &[String], body: &[String]) -> String {
    let mut out = String::new();
    for line in header.iter().chain(body) {
        out.push_str(line);
        out.push('\n');
    }
    out
}
