//! Configuration management for Plum.
//!
//! Parses `plum.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Renderer command strings support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `renderer.command`
//! - `renderer.epstopdf`

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "plum.toml";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("environment variable expansion failed: {0}")]
    Expand(String),
}

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the renderer command line.
    pub command: Option<String>,
    /// Override the image output directory.
    pub image_dir: Option<PathBuf>,
    /// Override the HTML image format.
    pub html_format: Option<String>,
}

/// A command line, either as one string or as an explicit argv.
///
/// `command = "plantuml"` and `command = ["java", "-jar", "plantuml.jar"]`
/// are both valid in `plum.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommandLine {
    /// Whitespace-separated command line.
    Line(String),
    /// Explicit argument vector (for arguments containing spaces).
    Argv(Vec<String>),
}

impl CommandLine {
    /// Split into an argument vector.
    #[must_use]
    pub fn to_argv(&self) -> Vec<String> {
        match self {
            Self::Line(line) => line.split_whitespace().map(str::to_owned).collect(),
            Self::Argv(argv) => argv.clone(),
        }
    }
}

/// External renderer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Command rendering diagrams in `-pipe` mode.
    pub command: CommandLine,
    /// Command converting EPS to PDF.
    pub epstopdf: CommandLine,
    /// Charset passed to the renderer.
    pub charset: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: CommandLine::Line("plantuml".to_owned()),
            epstopdf: CommandLine::Line("epstopdf".to_owned()),
            charset: "utf-8".to_owned(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving rendered images (doubles as the cache).
    pub image_dir: PathBuf,
    /// Prefix prepended to image references in markup.
    pub url_prefix: String,
    /// HTML image format (`png` or `svg`).
    pub html_format: String,
    /// LaTeX image format (`png`, `eps` or `pdf`).
    pub latex_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("_images"),
            url_prefix: "_images/".to_owned(),
            html_format: "png".to_owned(),
            latex_format: "png".to_owned(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External renderer configuration.
    pub renderer: RendererConfig,
    /// Output configuration.
    pub output: OutputConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a specific file and apply CLI overrides.
    ///
    /// A relative `output.image_dir` is resolved against the config file's
    /// directory.
    pub fn load(path: &Path, cli: &CliSettings) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.config_path = Some(path.to_owned());

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.finalize(base, cli)
    }

    /// Discover `plum.toml` by walking up from `start`.
    ///
    /// Falls back to defaults (with CLI overrides applied) when no config
    /// file exists.
    pub fn discover(start: &Path, cli: &CliSettings) -> Result<Self, ConfigError> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Self::load(&candidate, cli);
            }
        }
        Self::default().finalize(start, cli)
    }

    /// Apply CLI overrides, expand env variables and resolve paths.
    fn finalize(mut self, base: &Path, cli: &CliSettings) -> Result<Self, ConfigError> {
        if let Some(command) = &cli.command {
            self.renderer.command = CommandLine::Line(command.clone());
        }
        if let Some(format) = &cli.html_format {
            self.output.html_format = format.clone();
        }
        match &cli.image_dir {
            // A CLI path is taken as given, relative to the working directory
            Some(dir) => self.output.image_dir = dir.clone(),
            None if self.output.image_dir.is_relative() => {
                self.output.image_dir = base.join(&self.output.image_dir);
            }
            None => {}
        }

        self.renderer.command = expand_command(&self.renderer.command)?;
        self.renderer.epstopdf = expand_command(&self.renderer.epstopdf)?;
        Ok(self)
    }
}

/// Expand environment variables in every element of a command line.
fn expand_command(command: &CommandLine) -> Result<CommandLine, ConfigError> {
    let argv = command
        .to_argv()
        .iter()
        .map(|arg| {
            shellexpand::env(arg)
                .map(std::borrow::Cow::into_owned)
                .map_err(|e| ConfigError::Expand(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CommandLine::Argv(argv))
}
