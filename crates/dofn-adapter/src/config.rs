use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;
use validator::Validate;

use crate::error::AdapterError;

/// File name searched for when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "dofn.toml";

/// Output directory used when `out_dir` is not set.
pub const DEFAULT_OUT_DIR: &str = "build";

const DEFAULT_FRAMEWORK_OUTPUT: &str = "dist";
const DEFAULT_STAGING: &str = ".dofn";

/// Required fields in the order they are checked, with the name reported to users.
const REQUIRED_FIELDS: [(&str, &str); 3] = [
    ("app_name", "appName"),
    ("domain", "domain"),
    ("region", "region"),
];

/// Deployment parameters for one build.
#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq, Eq)]
pub struct AdapterOptions {
    #[serde(default, rename = "name")]
    #[validate(required, length(min = 1))]
    pub app_name: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub domain: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub region: Option<String>,
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

impl AdapterOptions {
    /// Fails with the first missing or empty required field.
    pub fn check(&self) -> Result<(), AdapterError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let fields = errors.field_errors();
        for (field, reported) in REQUIRED_FIELDS {
            if fields.contains_key(field) {
                return Err(AdapterError::MissingField(reported));
            }
        }
        Ok(())
    }

    /// Values set in `overrides` win over the ones in `self`.
    #[must_use]
    pub fn merge(self, overrides: AdapterOptions) -> AdapterOptions {
        AdapterOptions {
            app_name: overrides.app_name.or(self.app_name),
            domain: overrides.domain.or(self.domain),
            region: overrides.region.or(self.region),
            out_dir: overrides.out_dir.or(self.out_dir),
        }
    }

    pub fn out_dir(&self) -> &Path {
        self.out_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_OUT_DIR))
    }

    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or_default()
    }

    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or_default()
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or_default()
    }
}

/// Contents of `dofn.toml`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct Config {
    #[serde(default)]
    pub app: AdapterOptions,
    #[serde(default)]
    #[validate(nested)]
    pub framework: FrameworkConfig,
    #[serde(default)]
    #[validate(nested)]
    pub bundler: BundlerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(skip)]
    root: Option<PathBuf>,
}

impl Config {
    pub fn load_from_str(contents: &str) -> Result<Self, AdapterError> {
        Self::parse(contents, Path::new("<inline>"))
    }

    pub fn from_path(path: &Path) -> Result<Self, AdapterError> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::parse(&contents, path)?;
        let cwd = std::env::current_dir()?;
        config.root = Some(resolve_root_path(path, &cwd));
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, AdapterError> {
        let config: Config = toml::from_str(contents)
            .map_err(|err| AdapterError::config(path, err.to_string()))?;
        config
            .validate()
            .map_err(|err| AdapterError::config(path, err.to_string()))?;
        Ok(config)
    }

    /// Directory containing the config file, if it was loaded from disk.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Resolve a configured path against the config root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match self.root() {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct FrameworkConfig {
    /// Directory holding the framework's `client/`, `prerendered/` and `server/` output.
    #[serde(default = "default_framework_output")]
    pub output: PathBuf,
    /// Root under which staging directories are created.
    #[serde(default = "default_staging")]
    pub staging: PathBuf,
    #[serde(default)]
    pub entry_template: Option<PathBuf>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            output: default_framework_output(),
            staging: default_staging(),
            entry_template: None,
        }
    }
}

fn default_framework_output() -> PathBuf {
    PathBuf::from(DEFAULT_FRAMEWORK_OUTPUT)
}

fn default_staging() -> PathBuf {
    PathBuf::from(DEFAULT_STAGING)
}

#[derive(Debug, Deserialize, Validate)]
pub struct BundlerConfig {
    /// Program and leading arguments used to invoke rollup.
    #[serde(default = "default_bundler_command")]
    #[validate(length(min = 1))]
    pub command: Vec<String>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            command: default_bundler_command(),
        }
    }
}

fn default_bundler_command() -> Vec<String> {
    ["npx", "--yes", "rollup"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "off" => Ok(Self::Off),
            other => Err(serde::de::Error::custom(format!(
                "logging level must be trace, debug, info, warn, error, or off (got `{}`)",
                other
            ))),
        }
    }
}

/// Walks up from `start` looking for `dofn.toml`.
pub fn find_config_upwards(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn resolve_root_path(path: &Path, cwd: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => cwd.to_path_buf(),
        Some(parent) if parent.is_relative() => cwd.join(parent),
        Some(parent) => parent.to_path_buf(),
        None => cwd.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[app]
name = "storefront"
domain = "shop.example.com"
region = "ams"

[framework]
output = "web/dist"

[bundler]
command = ["rollup"]

[logging]
level = "debug"
"#;

    fn options(app_name: Option<&str>, domain: Option<&str>, region: Option<&str>) -> AdapterOptions {
        AdapterOptions {
            app_name: app_name.map(String::from),
            domain: domain.map(String::from),
            region: region.map(String::from),
            out_dir: None,
        }
    }

    #[test]
    fn parse_config_sample() {
        let config = Config::load_from_str(SAMPLE).expect("config");
        assert_eq!(config.app.app_name(), "storefront");
        assert_eq!(config.app.domain(), "shop.example.com");
        assert_eq!(config.app.region(), "ams");
        assert_eq!(config.framework.output, PathBuf::from("web/dist"));
        assert_eq!(config.framework.staging, PathBuf::from(".dofn"));
        assert_eq!(config.bundler.command, vec!["rollup".to_string()]);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::load_from_str("").expect("config");
        assert_eq!(config.app, AdapterOptions::default());
        assert_eq!(config.framework.output, PathBuf::from("dist"));
        assert_eq!(config.bundler.command, default_bundler_command());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn empty_bundler_command_is_rejected() {
        let err = Config::load_from_str("[bundler]\ncommand = []\n").expect_err("invalid");
        assert!(matches!(err, AdapterError::Config { .. }));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let err = Config::load_from_str("[logging]\nlevel = \"loud\"\n").expect_err("invalid");
        assert!(err.to_string().contains("logging level must be"));
    }

    #[test]
    fn check_accepts_complete_options() {
        assert!(options(Some("app"), Some("example.com"), Some("nyc"))
            .check()
            .is_ok());
    }

    #[test]
    fn check_names_first_missing_field() {
        let err = options(None, None, None).check().expect_err("missing");
        assert!(matches!(err, AdapterError::MissingField("appName")));

        let err = options(Some("app"), None, Some("nyc")).check().expect_err("missing");
        assert!(matches!(err, AdapterError::MissingField("domain")));

        let err = options(Some("app"), Some("example.com"), None)
            .check()
            .expect_err("missing");
        assert!(matches!(err, AdapterError::MissingField("region")));
    }

    #[test]
    fn check_treats_empty_strings_as_missing() {
        let err = options(Some(""), Some("example.com"), Some("nyc"))
            .check()
            .expect_err("empty");
        assert_eq!(err.to_string(), "appName must be provided");
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = options(Some("from-file"), Some("file.example.com"), Some("ams"));
        let merged = base.merge(AdapterOptions {
            app_name: Some("from-flag".to_string()),
            out_dir: Some(PathBuf::from("out")),
            ..AdapterOptions::default()
        });
        assert_eq!(merged.app_name(), "from-flag");
        assert_eq!(merged.domain(), "file.example.com");
        assert_eq!(merged.out_dir(), Path::new("out"));
    }

    #[test]
    fn out_dir_defaults_to_build() {
        assert_eq!(AdapterOptions::default().out_dir(), Path::new("build"));
    }

    #[test]
    fn from_path_records_root_and_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, SAMPLE).unwrap();

        let config = Config::from_path(&path).expect("config");
        assert_eq!(config.root(), Some(dir.path()));
        assert_eq!(
            config.resolve(&config.framework.output),
            dir.path().join("web/dist")
        );
        assert_eq!(config.resolve(Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn find_config_upwards_walks_parents() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        assert_eq!(
            find_config_upwards(&nested),
            Some(dir.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn resolve_root_path_uses_cwd_for_bare_file_names() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_root_path(Path::new("dofn.toml"), cwd), cwd);
        assert_eq!(
            resolve_root_path(Path::new("conf/dofn.toml"), cwd),
            cwd.join("conf")
        );
    }
}
