pub mod ai;

use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "data/generated";

/// Locations of every JSON snapshot the pipeline and the web layer share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    dir: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$DATA_DIR`, falling back to `data/generated`.
    pub fn from_env() -> Self {
        let dir = std::env::var(ENV_DATA_DIR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn news(&self) -> PathBuf {
        self.dir.join("news.json")
    }

    pub fn events(&self) -> PathBuf {
        self.dir.join("events.json")
    }

    pub fn obits(&self) -> PathBuf {
        self.dir.join("obits.json")
    }

    pub fn police(&self) -> PathBuf {
        self.dir.join("police.json")
    }

    pub fn summaries(&self) -> PathBuf {
        self.dir.join("summaries.json")
    }

    pub fn ads(&self) -> PathBuf {
        self.dir.join("ads.json")
    }

    pub fn ad_metrics(&self) -> PathBuf {
        self.dir.join("ad-metrics.json")
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

/// `ADMIN_ENABLED=true` turns on the admin ad routes.
pub fn admin_enabled_from_env() -> bool {
    std::env::var("ADMIN_ENABLED")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_names_live_under_dir() {
        let p = DataPaths::new("/tmp/x");
        assert_eq!(p.news(), PathBuf::from("/tmp/x/news.json"));
        assert_eq!(p.ad_metrics(), PathBuf::from("/tmp/x/ad-metrics.json"));
    }
}
