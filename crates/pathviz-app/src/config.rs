//! Visualizer settings and their command-line form.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Largest accepted grid size.
pub const MAX_ROWS: i32 = 1000;

/// Largest accepted grid width in terminal columns.
pub const MAX_WIDTH: i32 = 4000;

/// Settings for one visualizer session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VizConfig {
    /// Rows (and columns) of the grid.
    pub rows: i32,
    /// Terminal columns spanned by the grid; each cell is `width / rows` wide.
    pub width: i32,
    /// Pause after each animated search step.
    pub step_delay_ms: u64,
    /// Barrier probability used by the scatter command.
    pub density: f64,
    /// Seed for scattering; random when absent.
    pub seed: Option<u64>,
    /// Where to write the log; logging is off when absent.
    pub log_file: Option<PathBuf>,
    pub log_level: log::LevelFilter,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            width: 40,
            step_delay_ms: 8,
            density: 0.3,
            seed: None,
            log_file: None,
            log_level: log::LevelFilter::Debug,
        }
    }
}

impl VizConfig {
    pub fn with_rows(mut self, rows: i32) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    pub fn with_step_delay_ms(mut self, ms: u64) -> Self {
        self.step_delay_ms = ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Parse `--flag value` pairs on top of the defaults.
    ///
    /// Accepted flags: `--rows`, `--width`, `--delay`, `--density`,
    /// `--seed`, `--log`, `--log-level`.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cfg = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(flag) = args.next() {
            let Some(value) = args.next() else {
                return Err(ConfigError::MissingValue(flag));
            };
            match flag.as_str() {
                "--rows" => cfg.rows = parse(&flag, &value)?,
                "--width" => cfg.width = parse(&flag, &value)?,
                "--delay" => cfg.step_delay_ms = parse(&flag, &value)?,
                "--density" => cfg.density = parse(&flag, &value)?,
                "--seed" => cfg.seed = Some(parse(&flag, &value)?),
                "--log" => cfg.log_file = Some(PathBuf::from(value)),
                "--log-level" => cfg.log_level = parse(&flag, &value)?,
                _ => return Err(ConfigError::UnknownFlag(flag)),
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the visualizer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_ROWS).contains(&self.rows) {
            return Err(ConfigError::Invalid {
                flag: "--rows".into(),
                reason: format!("must be between 2 and {MAX_ROWS}"),
            });
        }
        if self.width < self.rows || self.width > MAX_WIDTH {
            return Err(ConfigError::Invalid {
                flag: "--width".into(),
                reason: format!("must be between the row count ({}) and {MAX_WIDTH}", self.rows),
            });
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(ConfigError::Invalid {
                flag: "--density".into(),
                reason: "must be between 0 and 1".into(),
            });
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        flag: flag.to_string(),
        reason: format!("cannot parse \u{201c}{value}\u{201d}"),
    })
}

/// A rejected command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownFlag(String),
    MissingValue(String),
    Invalid { flag: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFlag(flag) => write!(f, "unknown flag {flag}"),
            Self::MissingValue(flag) => write!(f, "{flag} needs a value"),
            Self::Invalid { flag, reason } => write!(f, "{flag}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
