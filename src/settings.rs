use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

use crate::{
    models::{SessionConfig, DEFAULT_SAMPLING_INTERVAL_SECS, DEFAULT_STUDY_MODE},
    window::DEFAULT_WINDOW_CAPACITY,
};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const SCORING_URL_ENV: &str = "NEUROFOCUS_SCORING_URL";
pub const DEBUG_ENV: &str = "NEUROFOCUS_DEBUG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    pub scoring_url: String,
    pub sampling_interval_secs: u64,
    pub window_capacity: usize,
    /// Per-request timeout for the scoring call. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub default_study_mode: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scoring_url: "http://localhost:5000".into(),
            sampling_interval_secs: DEFAULT_SAMPLING_INTERVAL_SECS,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            request_timeout_secs: None,
            default_study_mode: DEFAULT_STUDY_MODE.into(),
        }
    }
}

impl EngineSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Session config for `duration_minutes`, falling back to the default
    /// study mode when none is given.
    pub fn session_config(&self, duration_minutes: u32, study_mode: Option<&str>) -> SessionConfig {
        SessionConfig::new(
            duration_minutes,
            study_mode.unwrap_or(&self.default_study_mode),
        )
        .with_sampling_interval(self.sampling_interval_secs)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SCORING_URL_ENV) {
            if !url.trim().is_empty() {
                self.scoring_url = url.trim().to_string();
            }
        }
    }
}

/// Whether `NEUROFOCUS_DEBUG` asks for verbose logging.
pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    /// Load settings from `path`. A missing file gives defaults; a file that
    /// does not parse is logged and also gives defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("ignoring unreadable settings {}: {}", path.display(), err);
                EngineSettings::default()
            })
        } else {
            EngineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored settings with environment overrides applied.
    pub fn effective(&self) -> EngineSettings {
        let mut settings = self.stored();
        settings.apply_env();
        settings
    }

    pub fn stored(&self) -> EngineSettings {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn update(&self, settings: EngineSettings) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory {}", parent.display())
                })?;
            }
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
