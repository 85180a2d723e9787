use std::collections::BTreeMap;

const BUILTIN_EXTENSIONS: &[(&str, &str)] = &[
    ("ada", "ada"),
    ("bash", "sh"),
    ("c", "c"),
    ("clojure", "clj"),
    ("coffeescript", "coffee"),
    ("cpp", "cpp"),
    ("cpp14", "cpp"),
    ("csharp", "cs"),
    ("d", "d"),
    ("db2", "sql"),
    ("elixir", "ex"),
    ("erlang", "erl"),
    ("fortran", "for"),
    ("fsharp", "fs"),
    ("go", "go"),
    ("groovy", "groovy"),
    ("haskell", "hs"),
    ("java", "java"),
    ("java8", "java"),
    ("javascript", "js"),
    ("julia", "jl"),
    ("kotlin", "kt"),
    ("lolcode", "lol"),
    ("lua", "lua"),
    ("mysql", "sql"),
    ("objectivec", "m"),
    ("ocaml", "ml"),
    ("octave", "oct"),
    ("oracle", "sql"),
    ("pascal", "pas"),
    ("perl", "pl"),
    ("php", "php"),
    ("pypy", "py"),
    ("pypy3", "py"),
    ("python", "py"),
    ("python3", "py"),
    ("racket", "rkt"),
    ("r", "r"),
    ("ruby", "rb"),
    ("rust", "rs"),
    ("sbcl", "lisp"),
    ("scala", "scala"),
    ("swift", "swift"),
    ("smalltalk", "st"),
    ("tcl", "tcl"),
    ("text", "txt"),
    ("tsql", "sql"),
    ("visualbasic", "vbs"),
    ("whitespace", "hs"),
];

/// Language identifier to file extension (stored without the leading dot).
///
/// The vocabulary is open: languages missing from the table resolve to `None`
/// and the layout falls back to its configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    entries: BTreeMap<String, String>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ExtensionTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN_EXTENSIONS
            .iter()
            .map(|(lang, ext)| ((*lang).to_string(), (*ext).to_string()))
            .collect();
        Self { entries }
    }

    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (lang, ext) in overrides {
            self.insert(lang, ext);
        }
        self
    }

    pub fn insert(&mut self, language: &str, extension: &str) {
        let language = language.trim();
        let extension = extension.trim().trim_start_matches('.');
        if language.is_empty() || extension.is_empty() {
            return;
        }
        self.entries
            .insert(language.to_string(), extension.to_string());
    }

    pub fn resolve(&self, language: &str) -> Option<&str> {
        self.entries.get(language).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
