//! Configuration and search profiles.
//!
//! This module provides:
//! - Configuration types for the dataset and the search
//! - Search profiles with sensible defaults
//! - Validation of parameter combinations
//! - Layered loading (profile + file + env + overrides)
//!
//! Note: File parsing is intentionally minimal and deterministic.

use crate::error::{Error, ErrorKind};
use crate::search::{EXHAUSTIVE_VARIABLE_LIMIT, SearchMode};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Prefix of environment variables read by [`ConfigLoader`].
pub const ENV_PREFIX: &str = "BESTBASIS_";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasisConfig {
    /// Where the data comes from.
    pub dataset: DatasetConfig,
    /// How the basis is searched.
    pub search: SearchConfig,
}

impl BasisConfig {
    /// Validates the configuration for basic sanity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        if let Some(variables) = self.dataset.variables {
            if variables == 0 {
                return Err(ConfigError::InvalidVariables);
            }
            if self.search.mode == SearchMode::Exhaustive && variables >= EXHAUSTIVE_VARIABLE_LIMIT
            {
                return Err(ConfigError::ExhaustiveTooWide { variables });
            }
            if self.search.mode.resolve(variables) == SearchMode::Representations
                && self.search.batch_size < variables
            {
                return Err(ConfigError::BatchTooSmall {
                    batch_size: self.search.batch_size,
                    variables,
                });
            }
        }
        Ok(())
    }
}

/// Dataset settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Path of the data file.
    pub path: Option<PathBuf>,
    /// Number of variables; inferred from the first record when `None`.
    pub variables: Option<usize>,
}

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Strategy.
    pub mode: SearchMode,
    /// Highest operator order generated by the bounded-order search.
    pub k_max: usize,
    /// Columns per elimination batch.
    pub batch_size: usize,
    /// Iteration cap of the representation loop.
    pub max_representations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::Auto,
            k_max: 3,
            batch_size: 50_000,
            max_representations: 50,
        }
    }
}

impl SearchConfig {
    /// Validates the search settings on their own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.max_representations == 0 {
            return Err(ConfigError::InvalidRepresentationCap);
        }
        if self.k_max == 0 {
            return Err(ConfigError::InvalidOrder);
        }
        Ok(())
    }
}

/// Pre-defined search profiles.
#[derive(Debug, Clone, Default)]
pub enum SearchProfile {
    /// Low orders and small batches for a first look.
    Quick,
    /// Defaults.
    #[default]
    Standard,
    /// Higher orders, larger batches and a generous iteration cap.
    Thorough,
    /// Custom: user-provided configuration.
    Custom(Box<BasisConfig>),
}

impl SearchProfile {
    /// Expands the profile into a concrete configuration.
    #[must_use]
    pub fn to_config(&self) -> BasisConfig {
        match self {
            Self::Quick => {
                let mut config = BasisConfig::default();
                config.search.k_max = 2;
                config.search.batch_size = 1_000;
                config.search.max_representations = 16;
                config
            }
            Self::Standard => BasisConfig::default(),
            Self::Thorough => {
                let mut config = BasisConfig::default();
                config.search.k_max = 4;
                config.search.batch_size = 200_000;
                config.search.max_representations = 200;
                config
            }
            Self::Custom(config) => config.as_ref().clone(),
        }
    }
}

impl FromStr for SearchProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "standard" | "default" => Ok(Self::Standard),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::Parse(format!("unknown profile: {s}"))),
        }
    }
}

/// Configuration loader with layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    profile: SearchProfile,
    file_path: Option<PathBuf>,
    overrides: BTreeMap<String, String>,
}

impl ConfigLoader {
    /// Creates a new loader with the standard profile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            profile: SearchProfile::Standard,
            file_path: None,
            overrides: BTreeMap::new(),
        }
    }

    /// Sets the base profile.
    #[must_use]
    pub fn profile(mut self, profile: SearchProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets a file path for config loading.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Adds a programmatic override (highest precedence).
    ///
    /// Keys are either dotted (`search.k_max`) or environment style
    /// (`BESTBASIS_SEARCH_K_MAX`).
    #[must_use]
    pub fn override_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(normalize_key(&key.into()), value.into());
        self
    }

    /// Loads configuration with precedence:
    /// 1. Profile defaults (lowest)
    /// 2. File config
    /// 3. Environment variables
    /// 4. Programmatic overrides (highest)
    pub fn load(&self) -> Result<BasisConfig, ConfigError> {
        let mut config = if let Some(path) = &self.file_path {
            load_from_file(path, &self.profile)?
        } else {
            self.profile.to_config()
        };

        apply_env_overrides(&mut config)?;
        apply_overrides(&mut config, &self.overrides)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error while reading configuration.
    Io(std::io::Error),
    /// Parse error.
    Parse(String),
    /// Batch size of zero.
    InvalidBatchSize,
    /// Iteration cap of zero.
    InvalidRepresentationCap,
    /// Maximum order of zero.
    InvalidOrder,
    /// Zero variables.
    InvalidVariables,
    /// Exhaustive search requested on too many variables.
    ExhaustiveTooWide {
        /// Configured variables.
        variables: usize,
    },
    /// Representation search cannot find a full basis with this batch size.
    BatchTooSmall {
        /// Configured batch size.
        batch_size: usize,
        /// Configured variables.
        variables: usize,
    },
    /// Invalid env override.
    InvalidOverride(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config I/O error: {err}"),
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::InvalidBatchSize => write!(f, "batch_size must be > 0"),
            Self::InvalidRepresentationCap => write!(f, "max_representations must be > 0"),
            Self::InvalidOrder => write!(f, "k_max must be > 0"),
            Self::InvalidVariables => write!(f, "variables must be > 0"),
            Self::ExhaustiveTooWide { variables } => write!(
                f,
                "exhaustive search needs fewer than {EXHAUSTIVE_VARIABLE_LIMIT} variables, got {variables}"
            ),
            Self::BatchTooSmall {
                batch_size,
                variables,
            } => write!(
                f,
                "batch_size {batch_size} is smaller than the {variables} variables"
            ),
            Self::InvalidOverride(key) => write!(f, "invalid override: {key}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        Self::new(ErrorKind::Config)
            .with_message(message)
            .with_source(err)
    }
}

fn normalize_key(key: &str) -> String {
    if key.starts_with(ENV_PREFIX) {
        return key.to_string();
    }
    let mut normalized = String::from(ENV_PREFIX);
    normalized.push_str(&key.replace(['.', '-'], "_").to_uppercase());
    normalized
}

fn load_from_file(path: &Path, profile: &SearchProfile) -> Result<BasisConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let base = profile.to_config();
    parse_config(&contents, base)
}

fn apply_env_overrides(config: &mut BasisConfig) -> Result<(), ConfigError> {
    let mut overrides = BTreeMap::new();
    for (key, value) in std::env::vars() {
        if key.starts_with(ENV_PREFIX) {
            overrides.insert(key, value);
        }
    }
    apply_overrides(config, &overrides)
}

fn apply_overrides(
    config: &mut BasisConfig,
    overrides: &BTreeMap<String, String>,
) -> Result<(), ConfigError> {
    for (key, value) in overrides {
        apply_env_override(config, key, value)?;
    }
    Ok(())
}

fn apply_env_override(config: &mut BasisConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "BESTBASIS_DATASET_PATH" => config.dataset.path = Some(PathBuf::from(value)),
        "BESTBASIS_DATASET_VARIABLES" => {
            config.dataset.variables = Some(parse_usize(value, key)?);
        }
        "BESTBASIS_SEARCH_MODE" => config.search.mode = parse_mode(value, key)?,
        "BESTBASIS_SEARCH_K_MAX" => config.search.k_max = parse_usize(value, key)?,
        "BESTBASIS_SEARCH_BATCH_SIZE" => config.search.batch_size = parse_usize(value, key)?,
        "BESTBASIS_SEARCH_MAX_REPRESENTATIONS" => {
            config.search.max_representations = parse_usize(value, key)?;
        }
        _ => return Err(ConfigError::InvalidOverride(key.to_string())),
    }
    Ok(())
}

fn parse_config(contents: &str, base: BasisConfig) -> Result<BasisConfig, ConfigError> {
    let mut config = base;
    let mut section = String::new();

    for (line_idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].trim().to_lowercase();
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ConfigError::Parse(format!("line {}: {}", line_idx + 1, line)))?;
        let key = key.trim();
        let value = value.trim().trim_matches('"');

        apply_section_kv(&mut config, &section, key, value)?;
    }

    Ok(config)
}

fn apply_section_kv(
    config: &mut BasisConfig,
    section: &str,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match section {
        "dataset" => apply_dataset_kv(&mut config.dataset, key, value),
        "search" => apply_search_kv(&mut config.search, key, value),
        "" => Err(ConfigError::Parse(format!(
            "missing section for key: {key}"
        ))),
        _ => Err(ConfigError::Parse(format!("unknown section: {section}"))),
    }
}

fn apply_dataset_kv(dataset: &mut DatasetConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "path" => dataset.path = Some(PathBuf::from(value)),
        "variables" => dataset.variables = Some(parse_usize(value, key)?),
        _ => return Err(ConfigError::Parse(format!("unknown key: dataset.{key}"))),
    }
    Ok(())
}

fn apply_search_kv(search: &mut SearchConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "mode" => search.mode = parse_mode(value, key)?,
        "k_max" => search.k_max = parse_usize(value, key)?,
        "batch_size" => search.batch_size = parse_usize(value, key)?,
        "max_representations" => search.max_representations = parse_usize(value, key)?,
        _ => return Err(ConfigError::Parse(format!("unknown key: search.{key}"))),
    }
    Ok(())
}

fn parse_usize(value: &str, key: &str) -> Result<usize, ConfigError> {
    value
        .replace('_', "")
        .parse::<usize>()
        .map_err(|_| ConfigError::Parse(format!("invalid usize for {key}: {value}")))
}

fn parse_mode(value: &str, key: &str) -> Result<SearchMode, ConfigError> {
    value
        .parse::<SearchMode>()
        .map_err(|err| ConfigError::Parse(format!("invalid mode for {key}: {err}")))
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn default_config_valid() {
        init_test("default_config_valid");
        let config = BasisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.mode, SearchMode::Auto);
        assert_eq!(config.search.k_max, 3);
        assert_eq!(config.search.batch_size, 50_000);
        assert_eq!(config.search.max_representations, 50);
        crate::test_complete!("default_config_valid");
    }

    #[test]
    fn profile_configs_valid() {
        init_test("profile_configs_valid");
        for profile in [
            SearchProfile::Quick,
            SearchProfile::Standard,
            SearchProfile::Thorough,
        ] {
            let config = profile.to_config();
            assert!(config.validate().is_ok(), "Profile {profile:?} invalid");
        }
        let quick = SearchProfile::Quick.to_config();
        assert_eq!(quick.search.k_max, 2);
        assert_eq!(quick.search.max_representations, 16);
        crate::test_complete!("profile_configs_valid");
    }

    #[test]
    fn profile_names_parse() {
        init_test("profile_names_parse");
        assert!(matches!("Quick".parse(), Ok(SearchProfile::Quick)));
        assert!(matches!("thorough".parse(), Ok(SearchProfile::Thorough)));
        assert!(matches!(
            "turbo".parse::<SearchProfile>(),
            Err(ConfigError::Parse(_))
        ));
        crate::test_complete!("profile_names_parse");
    }

    #[test]
    fn env_override_k_max() {
        init_test("env_override_k_max");
        let _guard = crate::test_utils::env_lock();
        // SAFETY: tests serialize env access with test_utils::env_lock.
        unsafe { std::env::set_var("BESTBASIS_SEARCH_K_MAX", "5") };
        let result = ConfigLoader::default().load();
        // SAFETY: tests serialize env access with test_utils::env_lock.
        unsafe { std::env::remove_var("BESTBASIS_SEARCH_K_MAX") };
        assert_eq!(result.unwrap().search.k_max, 5);
        crate::test_complete!("env_override_k_max");
    }

    #[test]
    fn unknown_env_key_rejected() {
        init_test("unknown_env_key_rejected");
        let _guard = crate::test_utils::env_lock();
        // SAFETY: tests serialize env access with test_utils::env_lock.
        unsafe { std::env::set_var("BESTBASIS_SEARCH_SPEED", "fast") };
        let result = ConfigLoader::default().load();
        // SAFETY: tests serialize env access with test_utils::env_lock.
        unsafe { std::env::remove_var("BESTBASIS_SEARCH_SPEED") };
        assert!(matches!(result, Err(ConfigError::InvalidOverride(_))));
        crate::test_complete!("unknown_env_key_rejected");
    }

    #[test]
    fn overrides_beat_profile() {
        init_test("overrides_beat_profile");
        let _guard = crate::test_utils::env_lock();
        let config = ConfigLoader::new()
            .profile(SearchProfile::Quick)
            .override_value("search.mode", "fixed-k")
            .override_value("BESTBASIS_SEARCH_BATCH_SIZE", "64")
            .override_value("dataset.variables", "12")
            .load()
            .unwrap();
        assert_eq!(config.search.mode, SearchMode::FixedOrder);
        assert_eq!(config.search.batch_size, 64);
        assert_eq!(config.search.k_max, 2);
        assert_eq!(config.dataset.variables, Some(12));
        crate::test_complete!("overrides_beat_profile");
    }

    #[test]
    fn file_loading_minimal() {
        init_test("file_loading_minimal");
        let input = r"
# search settings
[dataset]
variables = 9

[search]
mode = var-k
k_max = 4
batch_size = 10_000
";
        let base = SearchProfile::Quick.to_config();
        let config = parse_config(input, base).unwrap();
        assert_eq!(config.dataset.variables, Some(9));
        assert_eq!(config.search.mode, SearchMode::Representations);
        assert_eq!(config.search.k_max, 4);
        assert_eq!(config.search.batch_size, 10_000);
        assert_eq!(config.search.max_representations, 16);
        crate::test_complete!("file_loading_minimal");
    }

    #[test]
    fn file_parse_errors() {
        init_test("file_parse_errors");
        let base = BasisConfig::default();
        assert!(matches!(
            parse_config("k_max = 2", base.clone()),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_config("[network]\nport = 1", base.clone()),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_config("[search]\nk_max", base.clone()),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_config("[search]\nk_max = two", base),
            Err(ConfigError::Parse(_))
        ));
        crate::test_complete!("file_parse_errors");
    }

    #[test]
    fn file_loader_reads_disk() {
        init_test("file_loader_reads_disk");
        let _guard = crate::test_utils::env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bestbasis.conf");
        std::fs::write(&path, "[search]\nmax_representations = 7\n").unwrap();
        let config = ConfigLoader::new()
            .file(&path)
            .override_value("search.max_representations", "9")
            .load()
            .unwrap();
        assert_eq!(config.search.max_representations, 9);

        let missing = ConfigLoader::new().file(dir.path().join("absent.conf")).load();
        assert!(matches!(missing, Err(ConfigError::Io(_))));
        crate::test_complete!("file_loader_reads_disk");
    }

    /// Invariant: validation rejects zero-valued search knobs.
    #[test]
    fn zero_values_rejected() {
        init_test("zero_values_rejected");
        let mut config = BasisConfig::default();
        config.search.batch_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBatchSize)
        ));

        let mut config = BasisConfig::default();
        config.search.max_representations = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRepresentationCap)
        ));

        let mut config = BasisConfig::default();
        config.search.k_max = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidOrder)));

        let mut config = BasisConfig::default();
        config.dataset.variables = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidVariables)
        ));
        crate::test_complete!("zero_values_rejected");
    }

    /// Invariant: validation rejects combinations that cannot run.
    #[test]
    fn incompatible_combinations_rejected() {
        init_test("incompatible_combinations_rejected");
        let mut config = BasisConfig::default();
        config.search.mode = SearchMode::Exhaustive;
        config.dataset.variables = Some(25);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ExhaustiveTooWide { variables: 25 })
        ));
        config.dataset.variables = Some(24);
        assert!(config.validate().is_ok());

        let mut config = BasisConfig::default();
        config.search.batch_size = 10;
        config.dataset.variables = Some(20);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BatchTooSmall {
                batch_size: 10,
                variables: 20
            })
        ));
        // Auto resolves to exhaustive below 15 variables.
        config.dataset.variables = Some(12);
        assert!(config.validate().is_ok());
        crate::test_complete!("incompatible_combinations_rejected");
    }

    #[test]
    fn config_error_display_and_conversion() {
        init_test("config_error_display_and_conversion");
        let err = ConfigError::InvalidBatchSize;
        assert!(format!("{err}").contains("batch_size"));
        let err = ConfigError::InvalidOverride("BESTBASIS_X".into());
        assert!(format!("{err}").contains("BESTBASIS_X"));

        let err: Error = ConfigError::InvalidOrder.into();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.kind().is_user_error());
        crate::test_complete!("config_error_display_and_conversion");
    }

    #[test]
    fn dotted_keys_normalize() {
        init_test("dotted_keys_normalize");
        assert_eq!(normalize_key("search.k_max"), "BESTBASIS_SEARCH_K_MAX");
        assert_eq!(normalize_key("dataset.variables"), "BESTBASIS_DATASET_VARIABLES");
        assert_eq!(normalize_key("BESTBASIS_SEARCH_MODE"), "BESTBASIS_SEARCH_MODE");
        crate::test_complete!("dotted_keys_normalize");
    }
}
