use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(hsc_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(hsc_home) = hsc_home {
        return Some(hsc_home.join(".env"));
    }
    Some(home_dir?.join(".hsc/.env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("HSC_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_prefers_hsc_home() {
        let got = fallback_dotenv_path(
            Some(PathBuf::from("/workspace/crawl")),
            Some(PathBuf::from("/home/alice")),
        );

        let want = Some(PathBuf::from("/workspace/crawl/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn fallback_uses_dot_hsc_under_home_when_unset() {
        let got = fallback_dotenv_path(None, Some(PathBuf::from("/home/alice")));
        let want = Some(PathBuf::from("/home/alice/.hsc/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn fallback_is_none_without_any_home() {
        assert_eq!(fallback_dotenv_path(None, None), None);
    }
}
