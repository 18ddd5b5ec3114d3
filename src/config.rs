use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_CHUNK_BUFFER_SIZE, DEFAULT_CHUNK_QUEUE_DEPTH, DEFAULT_DELIMITER, DEFAULT_INPUT_PATH,
    DEFAULT_LINE_TERMINATOR, DEFAULT_WORKER_COUNT, ENV_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// How the reader treats lines that straddle two chunks
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Cut chunks at exactly `chunk_buffer_size` bytes. Line fragments on
    /// either side of a cut are parsed independently, so records near chunk
    /// edges can be dropped or misattributed.
    #[default]
    Split,
    /// Carry the trailing partial line of each chunk into the next one so
    /// every chunk ends on a line terminator.
    Stitch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,

    #[validate(range(min = 1))]
    pub chunk_buffer_size: usize,

    #[validate(range(min = 1))]
    pub chunk_queue_depth: usize,

    /// Aggregator threads; 0 means one per logical CPU
    pub worker_count: usize,

    pub boundary_mode: BoundaryMode,

    pub delimiter: char,

    pub line_terminator: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            chunk_buffer_size: DEFAULT_CHUNK_BUFFER_SIZE,
            chunk_queue_depth: DEFAULT_CHUNK_QUEUE_DEPTH,
            worker_count: DEFAULT_WORKER_COUNT,
            boundary_mode: BoundaryMode::Split,
            delimiter: DEFAULT_DELIMITER as char,
            line_terminator: DEFAULT_LINE_TERMINATOR as char,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from built-in defaults, an optional config file and
    /// `BRC_*` environment variables, in increasing order of precedence
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let environment = config::Environment::with_prefix(ENV_PREFIX).try_parsing(true);
        Self::load_with_environment(config_file, environment)
    }

    pub fn load_with_environment(
        config_file: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ProcessingError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings: PipelineConfig = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate_settings()?;
        Ok(settings)
    }

    /// Range checks plus the record-format rules the derive cannot express
    pub fn validate_settings(&self) -> Result<()> {
        self.validate()?;

        if !self.delimiter.is_ascii() {
            return Err(ProcessingError::Config(format!(
                "Delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }

        if !self.line_terminator.is_ascii() {
            return Err(ProcessingError::Config(format!(
                "Line terminator must be a single ASCII character, got {:?}",
                self.line_terminator
            )));
        }

        if self.delimiter == self.line_terminator {
            return Err(ProcessingError::Config(
                "Delimiter and line terminator must differ".to_string(),
            ));
        }

        Ok(())
    }

    pub fn resolved_worker_count(&self) -> usize {
        if self.worker_count == 0 {
            num_cpus::get()
        } else {
            self.worker_count
        }
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }

    pub fn line_terminator_byte(&self) -> u8 {
        self.line_terminator as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::Builder;

    fn isolated_environment(vars: &[(&str, &str)]) -> config::Environment {
        let mut source = config::Map::new();
        for (key, value) in vars {
            source.insert(key.to_string(), value.to_string());
        }
        config::Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::load_with_environment(None, isolated_environment(&[]))
            .unwrap();

        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.chunk_buffer_size, 16 * 1024 * 1024);
        assert_eq!(config.chunk_queue_depth, 10_000);
        assert_eq!(config.worker_count, 1000);
        assert_eq!(config.boundary_mode, BoundaryMode::Split);
        assert_eq!(config.delimiter_byte(), b';');
        assert_eq!(config.line_terminator_byte(), b'\n');
    }

    #[test]
    fn test_file_then_environment_layering() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "input_path = \"/tmp/measurements.txt\"")?;
        writeln!(file, "worker_count = 4")?;
        writeln!(file, "chunk_buffer_size = 4096")?;
        writeln!(file, "boundary_mode = \"stitch\"")?;

        let environment = isolated_environment(&[("BRC_WORKER_COUNT", "12")]);
        let config = PipelineConfig::load_with_environment(Some(file.path()), environment)?;

        assert_eq!(config.input_path, PathBuf::from("/tmp/measurements.txt"));
        assert_eq!(config.chunk_buffer_size, 4096);
        assert_eq!(config.worker_count, 12);
        assert_eq!(config.boundary_mode, BoundaryMode::Stitch);
        assert_eq!(config.chunk_queue_depth, DEFAULT_CHUNK_QUEUE_DEPTH);

        Ok(())
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        let result = PipelineConfig::load_with_environment(
            Some(Path::new("/definitely/not/here.toml")),
            isolated_environment(&[]),
        );

        assert!(matches!(result, Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_zero_buffer_size_is_rejected() {
        let config = PipelineConfig {
            chunk_buffer_size: 0,
            ..PipelineConfig::default()
        };

        assert!(matches!(
            config.validate_settings(),
            Err(ProcessingError::Validation(_))
        ));
    }

    #[test]
    fn test_delimiter_rules() {
        let clash = PipelineConfig {
            delimiter: '\n',
            ..PipelineConfig::default()
        };
        assert!(matches!(
            clash.validate_settings(),
            Err(ProcessingError::Config(_))
        ));

        let non_ascii = PipelineConfig {
            delimiter: '§',
            ..PipelineConfig::default()
        };
        assert!(non_ascii.validate_settings().is_err());
    }

    #[test]
    fn test_zero_workers_means_cpu_count() {
        let config = PipelineConfig {
            worker_count: 0,
            ..PipelineConfig::default()
        };

        assert_eq!(config.resolved_worker_count(), num_cpus::get());
    }
}
