//! Engine binary loader with an ordered fallback chain
//!
//! Each strategy names one candidate location for the ffmpeg binary; the
//! chain is tried in order and stops at the first binary that answers
//! `-version`. All failures are carried into the final error instead of being
//! retried indefinitely.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{WebpcutError, WebpcutResult};
use crate::ports::LogSink;

/// Environment variable overriding the engine binary location.
pub const ENGINE_ENV_OVERRIDE: &str = "WEBPCUT_FFMPEG";

const WELL_KNOWN_LOCATIONS: [&str; 3] = [
    "/usr/bin/ffmpeg",
    "/usr/local/bin/ffmpeg",
    "/opt/homebrew/bin/ffmpeg",
];

/// One candidate source for the engine binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderStrategy {
    /// Explicit path from the configuration file.
    ConfigPath(PathBuf),
    /// Path taken from [`ENGINE_ENV_OVERRIDE`].
    EnvOverride(PathBuf),
    /// Bare binary name resolved through `PATH`.
    PathLookup(&'static str),
    /// Conventional install location.
    WellKnown(&'static str),
}

impl LoaderStrategy {
    fn candidate(&self) -> PathBuf {
        match self {
            Self::ConfigPath(path) | Self::EnvOverride(path) => path.clone(),
            Self::PathLookup(name) => PathBuf::from(name),
            Self::WellKnown(path) => PathBuf::from(path),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::ConfigPath(path) => format!("config path {}", path.display()),
            Self::EnvOverride(path) => format!("{} override {}", ENGINE_ENV_OVERRIDE, path.display()),
            Self::PathLookup(name) => format!("PATH lookup '{name}'"),
            Self::WellKnown(path) => format!("well-known location {path}"),
        }
    }
}

/// Ordered loader chain for the ffmpeg binary.
pub struct EngineLoader {
    strategies: Vec<LoaderStrategy>,
}

impl EngineLoader {
    /// Build the chain: config path, then the environment override, then a
    /// plain `PATH` lookup, then conventional install locations.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let mut strategies = Vec::new();
        if let Some(path) = config_path {
            strategies.push(LoaderStrategy::ConfigPath(path));
        }
        if let Some(env_path) = std::env::var_os(ENGINE_ENV_OVERRIDE) {
            strategies.push(LoaderStrategy::EnvOverride(PathBuf::from(env_path)));
        }
        strategies.push(LoaderStrategy::PathLookup("ffmpeg"));
        for location in WELL_KNOWN_LOCATIONS {
            strategies.push(LoaderStrategy::WellKnown(location));
        }
        Self { strategies }
    }

    pub fn strategies(&self) -> &[LoaderStrategy] {
        &self.strategies
    }

    /// Try each strategy in order, returning the first binary that runs.
    pub async fn resolve(&self, log: &dyn LogSink) -> WebpcutResult<PathBuf> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            let candidate = strategy.candidate();
            match Self::attempt(&candidate).await {
                Ok(()) => {
                    log.line(&format!("engine loaded via {}", strategy.describe()));
                    return Ok(candidate);
                }
                Err(reason) => {
                    debug!(strategy = %strategy.describe(), %reason, "loader strategy failed");
                    failures.push(format!("{}: {}", strategy.describe(), reason));
                }
            }
        }

        Err(WebpcutError::engine(format!(
            "could not load the encode engine; attempts: {}",
            failures.join("; ")
        )))
    }

    async fn attempt(candidate: &PathBuf) -> Result<(), String> {
        let output = Command::new(candidate)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| e.to_string())?;

        if output.status.success() {
            Ok(())
        } else {
            Err(format!("exited with {}", output.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_starts_with_config_path_when_given() {
        let loader = EngineLoader::new(Some(PathBuf::from("/custom/ffmpeg")));
        assert_eq!(
            loader.strategies()[0],
            LoaderStrategy::ConfigPath(PathBuf::from("/custom/ffmpeg"))
        );
    }

    #[test]
    fn chain_always_ends_with_well_known_locations() {
        let loader = EngineLoader::new(None);
        let strategies = loader.strategies();
        assert!(strategies.contains(&LoaderStrategy::PathLookup("ffmpeg")));
        let tail = &strategies[strategies.len() - WELL_KNOWN_LOCATIONS.len()..];
        for (strategy, location) in tail.iter().zip(WELL_KNOWN_LOCATIONS) {
            assert_eq!(*strategy, LoaderStrategy::WellKnown(location));
        }
    }

    #[test]
    fn path_lookup_precedes_well_known_locations() {
        let loader = EngineLoader::new(Some(PathBuf::from("/x")));
        let strategies = loader.strategies();
        let lookup = strategies
            .iter()
            .position(|s| *s == LoaderStrategy::PathLookup("ffmpeg"))
            .unwrap();
        let first_known = strategies
            .iter()
            .position(|s| matches!(s, LoaderStrategy::WellKnown(_)))
            .unwrap();
        assert!(lookup < first_known);
        assert_eq!(
            strategies[0],
            LoaderStrategy::ConfigPath(PathBuf::from("/x"))
        );
    }
}
