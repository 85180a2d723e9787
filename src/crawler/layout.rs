use crate::crawler::extensions::ExtensionTable;
use crate::hackerrank::models::Track;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const FALLBACK_DOMAIN: &str = "Others";
pub const FALLBACK_SUBDOMAIN: &str = "Miscellaneous";
const FALLBACK_STEM: &str = "solution";
const FALLBACK_LANGUAGE: &str = "unknown";

/// Two-level classification of a challenge, with folder-safe names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub domain_name: String,
    pub subdomain_name: String,
    pub domain_slug: String,
    pub subdomain_slug: String,
}

impl Topic {
    pub fn fallback() -> Self {
        Self {
            domain_name: FALLBACK_DOMAIN.to_string(),
            subdomain_name: FALLBACK_SUBDOMAIN.to_string(),
            domain_slug: String::new(),
            subdomain_slug: String::new(),
        }
    }

    pub fn from_track(track: Option<&Track>) -> Self {
        let Some(track) = track else {
            return Self::fallback();
        };
        Self {
            domain_name: normalize_name(&track.track_name, FALLBACK_DOMAIN),
            subdomain_name: normalize_name(&track.name, FALLBACK_SUBDOMAIN),
            domain_slug: track.track_slug.trim().to_string(),
            subdomain_slug: track.slug.trim().to_string(),
        }
    }
}

fn normalize_name(raw: &str, fallback: &str) -> String {
    path_segment(raw, fallback)
}

/// Turns a remote name into a single path component: spaces, separators and
/// control characters are dropped, and `.`/`..`/empty become `fallback`.
fn path_segment(raw: &str, fallback: &str) -> String {
    let name: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '/' | '\\') && !c.is_control())
        .collect();
    match name.as_str() {
        "" | "." | ".." => fallback.to_string(),
        _ => name,
    }
}

/// Builds the public links written into index rows and headers.
#[derive(Debug, Clone)]
pub struct SiteLinks {
    base_url: String,
}

impl SiteLinks {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        }
    }

    pub fn home(&self) -> String {
        self.base_url.clone()
    }

    pub fn problem(&self, challenge_slug: &str) -> String {
        format!("{}challenges/{challenge_slug}/problem", self.base_url)
    }

    pub fn domain(&self, topic: &Topic) -> String {
        if topic.domain_slug.is_empty() {
            return String::new();
        }
        format!("{}domains/{}", self.base_url, topic.domain_slug)
    }

    pub fn subdomain(&self, topic: &Topic) -> String {
        if topic.domain_slug.is_empty() || topic.subdomain_slug.is_empty() {
            return String::new();
        }
        format!(
            "{}domains/{}/{}",
            self.base_url, topic.domain_slug, topic.subdomain_slug
        )
    }
}

/// Extension used when a language has no entry in the extension table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackExtension {
    /// `.` followed by the language identifier, e.g. `.brainfuck`.
    #[default]
    Language,
    /// No extension at all.
    None,
}

impl FromStr for FallbackExtension {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "language" => Ok(Self::Language),
            "none" | "empty" => Ok(Self::None),
            other => Err(format!(
                "unknown fallback extension `{other}`; use `language` or `none`"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    /// e.g. `Hackerrank/Regex/Introduction/python3/matching.py`
    pub make_language_folder: bool,
    /// e.g. `Hackerrank/Regex/Introduction/matching.python3.py`
    pub prepend_language_in_extension: bool,
    pub fallback_extension: FallbackExtension,
}

/// Where one solution lives, relative to the base folder and as a full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionLocation {
    pub folder: PathBuf,
    pub stem: String,
    pub extension: String,
    domain: String,
    subdomain: String,
    language_dir: Option<String>,
}

impl SolutionLocation {
    pub fn file_name(&self) -> String {
        format!("{}{}", self.stem, self.extension)
    }

    pub fn path(&self) -> PathBuf {
        self.folder.join(self.file_name())
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// Link from the subdomain README, which sits in `{base}/{domain}/{subdomain}`.
    pub fn link_from_subdomain(&self) -> String {
        match &self.language_dir {
            Some(lang) => format!("./{lang}/{}", self.file_name()),
            None => format!("./{}", self.file_name()),
        }
    }

    pub fn link_from_domain(&self) -> String {
        format!(
            "./{}/{}",
            self.subdomain,
            self.link_from_subdomain().trim_start_matches("./")
        )
    }

    pub fn link_from_root(&self) -> String {
        format!(
            "./{}/{}",
            self.domain,
            self.link_from_domain().trim_start_matches("./")
        )
    }
}

/// Computes the storage folder, stem and extension for one solution.
///
/// Pure: identical inputs always produce the same location.
pub fn derive(
    base_dir: &Path,
    challenge_slug: &str,
    challenge_name: &str,
    topic: &Topic,
    language: &str,
    extensions: &ExtensionTable,
    options: &LayoutOptions,
) -> SolutionLocation {
    let mut stem = path_segment(challenge_slug, FALLBACK_STEM);
    let language_segment = path_segment(language, FALLBACK_LANGUAGE);

    let mut extension = match options.fallback_extension {
        FallbackExtension::Language => format!(".{language_segment}"),
        FallbackExtension::None => String::new(),
    };
    if let Some(known) = extensions.resolve(language) {
        extension = if options.prepend_language_in_extension {
            format!(".{language_segment}.{known}")
        } else {
            format!(".{known}")
        };
    }

    // Java submissions are public classes, so the file is named after the class.
    if extension == ".java" {
        stem = path_segment(challenge_name, &stem);
    }

    let mut folder = base_dir
        .join(&topic.domain_name)
        .join(&topic.subdomain_name);
    let language_dir = if options.make_language_folder {
        folder = folder.join(&language_segment);
        Some(language_segment)
    } else {
        None
    };

    SolutionLocation {
        folder,
        stem,
        extension,
        domain: topic.domain_name.clone(),
        subdomain: topic.subdomain_name.clone(),
        language_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn algorithms() -> Topic {
        Topic::from_track(Some(&Track {
            track_name: " Problem Solving ".to_string(),
            name: "Dynamic Programming".to_string(),
            track_slug: "algorithms".to_string(),
            slug: "dynamic-programming".to_string(),
        }))
    }

    fn derive_default(slug: &str, name: &str, language: &str) -> SolutionLocation {
        derive(
            Path::new("Hackerrank"),
            slug,
            name,
            &algorithms(),
            language,
            &ExtensionTable::builtin(),
            &LayoutOptions::default(),
        )
    }

    #[test]
    fn topic_names_are_trimmed_and_spaces_removed() {
        let topic = algorithms();
        assert_eq!(topic.domain_name, "ProblemSolving");
        assert_eq!(topic.subdomain_name, "DynamicProgramming");
        assert_eq!(topic.domain_slug, "algorithms");
    }

    #[test]
    fn missing_track_falls_back_to_others_miscellaneous() {
        let topic = Topic::from_track(None);
        assert_eq!(topic, Topic::fallback());

        let links = SiteLinks::new("https://www.hackerrank.com");
        assert_eq!(links.domain(&topic), "");
        assert_eq!(links.subdomain(&topic), "");

        let loc = derive(
            Path::new("Hackerrank"),
            "solve-me-first",
            "Solve Me First",
            &topic,
            "python3",
            &ExtensionTable::builtin(),
            &LayoutOptions::default(),
        );
        assert_eq!(
            loc.path(),
            PathBuf::from("Hackerrank/Others/Miscellaneous/solve-me-first.py")
        );
    }

    #[test]
    fn known_language_uses_table_extension_and_slug_stem() {
        let loc = derive_default("coin-change", "The Coin Change Problem", "python3");
        assert_eq!(loc.stem, "coin-change");
        assert_eq!(loc.extension, ".py");
        assert_eq!(
            loc.folder,
            PathBuf::from("Hackerrank/ProblemSolving/DynamicProgramming")
        );
    }

    #[test]
    fn unknown_language_follows_fallback_mode() {
        let loc = derive_default("coin-change", "Coin Change", "brainfuck");
        assert_eq!(loc.extension, ".brainfuck");

        let options = LayoutOptions {
            fallback_extension: FallbackExtension::None,
            ..LayoutOptions::default()
        };
        let loc = derive(
            Path::new("Hackerrank"),
            "coin-change",
            "Coin Change",
            &algorithms(),
            "brainfuck",
            &ExtensionTable::builtin(),
            &options,
        );
        assert_eq!(loc.extension, "");
        assert_eq!(loc.file_name(), "coin-change");
    }

    #[test]
    fn java_stem_is_display_name_without_spaces() {
        let loc = derive_default("two-sum-slug", "Two Sum", "java8");
        assert_eq!(loc.stem, "TwoSum");
        assert_eq!(loc.file_name(), "TwoSum.java");
    }

    #[test]
    fn prepend_language_in_extension() {
        let options = LayoutOptions {
            prepend_language_in_extension: true,
            ..LayoutOptions::default()
        };
        let loc = derive(
            Path::new("Hackerrank"),
            "matching",
            "Matching",
            &algorithms(),
            "python3",
            &ExtensionTable::builtin(),
            &options,
        );
        assert_eq!(loc.extension, ".python3.py");

        let java = derive(
            Path::new("Hackerrank"),
            "two-sum",
            "Two Sum",
            &algorithms(),
            "java8",
            &ExtensionTable::builtin(),
            &options,
        );
        assert_eq!(java.extension, ".java8.java");
        assert_eq!(java.stem, "two-sum");
    }

    #[test]
    fn language_folder_and_links() {
        let options = LayoutOptions {
            make_language_folder: true,
            ..LayoutOptions::default()
        };
        let loc = derive(
            Path::new("Hackerrank"),
            "matching",
            "Matching",
            &algorithms(),
            "python3",
            &ExtensionTable::builtin(),
            &options,
        );
        assert_eq!(
            loc.path(),
            PathBuf::from("Hackerrank/ProblemSolving/DynamicProgramming/python3/matching.py")
        );
        assert_eq!(loc.link_from_subdomain(), "./python3/matching.py");
        assert_eq!(
            loc.link_from_domain(),
            "./DynamicProgramming/python3/matching.py"
        );
        assert_eq!(
            loc.link_from_root(),
            "./ProblemSolving/DynamicProgramming/python3/matching.py"
        );
    }

    #[test]
    fn remote_names_cannot_leave_the_base_folder() {
        let topic = Topic::from_track(Some(&Track {
            track_name: "..".to_string(),
            name: " . ".to_string(),
            track_slug: "x".to_string(),
            slug: "y".to_string(),
        }));
        assert_eq!(topic.domain_name, FALLBACK_DOMAIN);
        assert_eq!(topic.subdomain_name, FALLBACK_SUBDOMAIN);

        let options = LayoutOptions {
            make_language_folder: true,
            ..LayoutOptions::default()
        };
        let java = derive(
            Path::new("Hackerrank"),
            "../../escape",
            "../../Two Sum",
            &topic,
            "java8",
            &ExtensionTable::builtin(),
            &options,
        );
        assert_eq!(
            java.path(),
            PathBuf::from("Hackerrank/Others/Miscellaneous/java8/....TwoSum.java")
        );

        let odd = derive(
            Path::new("Hackerrank"),
            "..",
            "Odd",
            &topic,
            "../..",
            &ExtensionTable::builtin(),
            &options,
        );
        assert_eq!(odd.folder, PathBuf::from("Hackerrank/Others/Miscellaneous/...."));
        assert_eq!(odd.file_name(), "solution.....");
        assert!(odd.path().starts_with("Hackerrank/Others/Miscellaneous"));
        assert_eq!(odd.path().components().count(), 5);
    }

    #[test]
    fn derive_is_deterministic() {
        let a = derive_default("x", "X Y", "java");
        let b = derive_default("x", "X Y", "java");
        assert_eq!(a, b);
    }

    #[test]
    fn site_links_point_at_domains_and_problems() {
        let links = SiteLinks::new("https://www.hackerrank.com/");
        let topic = algorithms();
        assert_eq!(links.home(), "https://www.hackerrank.com/");
        assert_eq!(
            links.subdomain(&topic),
            "https://www.hackerrank.com/domains/algorithms/dynamic-programming"
        );
        assert_eq!(links.domain(&topic), "https://www.hackerrank.com/domains/algorithms");
        assert_eq!(
            links.problem("two-sum"),
            "https://www.hackerrank.com/challenges/two-sum/problem"
        );
    }

    #[test]
    fn fallback_extension_parses_from_text() {
        assert_eq!(
            "Language".parse::<FallbackExtension>(),
            Ok(FallbackExtension::Language)
        );
        assert_eq!(
            "none".parse::<FallbackExtension>(),
            Ok(FallbackExtension::None)
        );
        assert!("dot".parse::<FallbackExtension>().is_err());
    }
}
