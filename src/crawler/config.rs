use crate::crawler::extensions::ExtensionTable;
use crate::crawler::layout::{FallbackExtension, LayoutOptions};
use crate::error::CrawlError;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_BASE_FOLDER: &str = "Hackerrank";
pub const DEFAULT_BASE_URL: &str = "https://www.hackerrank.com/";
const LOCAL_CONFIG_FILE: &str = "hsc.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub offset: u64,
    /// `None` (or 0) crawls every submission the account has.
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub base_folder: String,
    pub make_language_folder: bool,
    pub prepend_language_in_extension: bool,
    pub fallback_extension: FallbackExtension,
    pub unescape_newlines: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_folder: DEFAULT_BASE_FOLDER.to_string(),
            make_language_folder: false,
            prepend_language_in_extension: false,
            fallback_extension: FallbackExtension::Language,
            unescape_newlines: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HscConfig {
    pub account: AccountConfig,
    pub crawl: CrawlConfig,
    pub layout: LayoutConfig,
    pub remote: RemoteConfig,
    /// Extra or replacement `language = "extension"` entries.
    pub extensions: BTreeMap<String, String>,
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialHscConfig {
    account: Option<AccountConfig>,
    crawl: Option<CrawlConfig>,
    layout: Option<LayoutConfig>,
    remote: Option<RemoteConfig>,
    extensions: Option<BTreeMap<String, String>>,
}

impl HscConfig {
    pub fn extension_table(&self) -> ExtensionTable {
        ExtensionTable::builtin().with_overrides(&self.extensions)
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            make_language_folder: self.layout.make_language_folder,
            prepend_language_in_extension: self.layout.prepend_language_in_extension,
            fallback_extension: self.layout.fallback_extension,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "on" => Some(true),
        "0" | "false" | "FALSE" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Applies `HSC_*` overrides read through `lookup`. Unparseable values keep
/// the current setting.
pub fn apply_env_overrides(cfg: &mut HscConfig, lookup: &dyn Fn(&str) -> Option<String>) {
    if let Some(v) = non_empty(lookup("HSC_USERNAME")) {
        cfg.account.username = Some(v);
    }
    if let Some(v) = lookup("HSC_PASSWORD").filter(|v| !v.is_empty()) {
        cfg.account.password = Some(v);
    }
    if let Some(v) = non_empty(lookup("HSC_OFFSET")).and_then(|v| v.parse().ok()) {
        cfg.crawl.offset = v;
    }
    if let Some(v) = non_empty(lookup("HSC_LIMIT")).and_then(|v| v.parse().ok()) {
        cfg.crawl.limit = Some(v);
    }
    if let Some(v) = non_empty(lookup("HSC_BASE_FOLDER")) {
        cfg.layout.base_folder = v;
    }
    if let Some(v) = non_empty(lookup("HSC_LANGUAGE_FOLDER")).and_then(|v| parse_bool(&v)) {
        cfg.layout.make_language_folder = v;
    }
    if let Some(v) = non_empty(lookup("HSC_PREPEND_LANGUAGE")).and_then(|v| parse_bool(&v)) {
        cfg.layout.prepend_language_in_extension = v;
    }
    if let Some(v) = non_empty(lookup("HSC_FALLBACK_EXTENSION")).and_then(|v| v.parse().ok()) {
        cfg.layout.fallback_extension = v;
    }
    if let Some(v) = non_empty(lookup("HSC_UNESCAPE_NEWLINES")).and_then(|v| parse_bool(&v)) {
        cfg.layout.unescape_newlines = v;
    }
    if let Some(v) = non_empty(lookup("HSC_BASE_URL")) {
        cfg.remote.base_url = v;
    }
    if let Some(v) = non_empty(lookup("HSC_TIMEOUT_SECS")).and_then(|v| v.parse().ok()) {
        cfg.remote.timeout_secs = v;
    }
}

pub fn validate(cfg: &HscConfig) -> Result<()> {
    let folder = cfg.layout.base_folder.trim();
    if folder.is_empty() {
        return Err(anyhow!("invalid base folder: cannot be empty"));
    }
    let mut components = Path::new(folder).components();
    let single_normal = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if !single_normal {
        return Err(anyhow!(
            "invalid base folder `{folder}`: must be a single folder name"
        ));
    }
    let url = cfg.remote.base_url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(anyhow!(
            "invalid remote base url `{url}`: must start with http:// or https://"
        ));
    }
    if cfg.remote.timeout_secs == 0 {
        return Err(anyhow!("invalid remote timeout: must be >= 1 second"));
    }
    for (language, extension) in &cfg.extensions {
        if extension.trim().trim_start_matches('.').is_empty() {
            return Err(anyhow!("invalid extension for `{language}`: cannot be empty"));
        }
    }
    Ok(())
}

pub fn parse_config_str(raw: &str, origin: &Path) -> Result<HscConfig> {
    let parsed: PartialHscConfig = toml::from_str(raw)
        .map_err(|err| CrawlError::InvalidConfig(format!("{}: {err}", origin.display())))?;
    let mut cfg = HscConfig::default();
    if let Some(account) = parsed.account {
        cfg.account = account;
    }
    if let Some(crawl) = parsed.crawl {
        cfg.crawl = crawl;
    }
    if let Some(layout) = parsed.layout {
        cfg.layout = layout;
    }
    if let Some(remote) = parsed.remote {
        cfg.remote = remote;
    }
    if let Some(extensions) = parsed.extensions {
        cfg.extensions = extensions;
    }
    cfg.source = Some(origin.to_path_buf());
    Ok(cfg)
}

fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(
                CrawlError::InvalidConfig(format!("{} does not exist", path.display())).into(),
            );
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(custom) = env::var("HSC_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Ok(Some(PathBuf::from(trimmed)));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(dirs::home_dir().map(|home| home.join(".hsc").join(LOCAL_CONFIG_FILE)))
}

/// Defaults, then the config file, then `HSC_*` environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<HscConfig> {
    let mut cfg = match resolve_config_path(explicit)? {
        Some(path) if path.exists() => {
            let raw = fs::read_to_string(&path).map_err(|err| {
                CrawlError::InvalidConfig(format!("failed to read {}: {err}", path.display()))
            })?;
            parse_config_str(&raw, &path)?
        }
        _ => HscConfig::default(),
    };

    apply_env_overrides(&mut cfg, &|var: &str| env::var(var).ok());
    validate(&cfg)?;
    Ok(cfg)
}
