//! Optional project configuration — the judge endpoint and similarity
//! threshold, as configuration values passed at engine construction —
//! loadable from a `noetic.toml` file next to the program being run.
//!
//! A `serde`-derived struct parsed with `toml`, every field defaulted so
//! an absent or partial file still produces a usable configuration.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use noetic_judge::JudgeConfig;

/// `noetic.toml` — currently only the `[judge]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub judge: JudgeSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for JudgeSection {
    fn default() -> Self {
        JudgeSection {
            endpoint: default_endpoint(),
            threshold: default_threshold(),
        }
    }
}

fn default_endpoint() -> String {
    noetic_judge::config::DEFAULT_ENDPOINT.to_string()
}

fn default_threshold() -> f64 {
    noetic_judge::config::DEFAULT_THRESHOLD
}

impl Manifest {
    /// Looks for `noetic.toml` in `dir`, falling back to all-default
    /// configuration if absent or unparseable. A malformed manifest is
    /// not fatal to running a program — it just means the judge falls
    /// back to its default endpoint and threshold.
    pub fn load_near(dir: &Path) -> Manifest {
        let path = dir.join("noetic.toml");
        match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                log::warn!("ignoring malformed {}: {e}", path.display());
                Manifest::default()
            }),
            Err(_) => Manifest::default(),
        }
    }

    pub fn judge_config(&self) -> JudgeConfig {
        JudgeConfig::new(self.judge.endpoint.clone(), self.judge.threshold)
    }
}
