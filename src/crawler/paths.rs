use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const METADATA_FILE_NAME: &str = "metadata.json";
const STATE_DIR_NAME: &str = ".hsc";
const LOCK_FILE_NAME: &str = "crawl.lock";
const AUDIT_FILE_NAME: &str = "audit.log";

#[derive(Debug, Clone)]
pub struct CrawlerPaths {
    pub work_dir: PathBuf,
    pub base_dir: PathBuf,
    pub metadata_file: PathBuf,
    pub state_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl CrawlerPaths {
    /// Default layout rooted at `work_dir`, ignoring the environment.
    pub fn under(work_dir: &Path, base_folder: &str) -> Self {
        let state_dir = work_dir.join(STATE_DIR_NAME);
        Self {
            work_dir: work_dir.to_path_buf(),
            base_dir: work_dir.join(base_folder),
            metadata_file: work_dir.join(METADATA_FILE_NAME),
            logs_dir: state_dir.join("logs"),
            state_dir,
        }
    }

    pub fn lock_file(&self) -> PathBuf {
        self.state_dir.join(LOCK_FILE_NAME)
    }

    pub fn audit_log(&self) -> PathBuf {
        self.logs_dir.join(AUDIT_FILE_NAME)
    }
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths(base_folder: &str) -> Result<CrawlerPaths> {
    let cwd = env::current_dir().context("current directory could not be resolved")?;
    let work_dir = env_or_default_path("HSC_HOME", cwd);
    let defaults = CrawlerPaths::under(&work_dir, base_folder);

    let metadata_file = env_or_default_path("HSC_METADATA_FILE", defaults.metadata_file);
    let state_dir = env_or_default_path("HSC_STATE_DIR", defaults.state_dir);
    let logs_dir = env_or_default_path("HSC_LOGS_DIR", state_dir.join("logs"));

    Ok(CrawlerPaths {
        base_dir: defaults.base_dir,
        work_dir,
        metadata_file,
        state_dir,
        logs_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_keeps_metadata_beside_base_folder() {
        let paths = CrawlerPaths::under(Path::new("/work"), "Hackerrank");
        assert_eq!(paths.base_dir, PathBuf::from("/work/Hackerrank"));
        assert_eq!(paths.metadata_file, PathBuf::from("/work/metadata.json"));
        assert_eq!(paths.lock_file(), PathBuf::from("/work/.hsc/crawl.lock"));
        assert_eq!(paths.audit_log(), PathBuf::from("/work/.hsc/logs/audit.log"));
    }
}
