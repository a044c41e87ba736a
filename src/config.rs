use crate::error::ConfigError;
use crate::image_classifier::architecture::Architecture;
use crate::image_classifier::preprocess::Normalization;
use crate::library::line_format::{parse_colon_pairs, LineFailure};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Raw `key: value` entries of a config file.
pub type ConfigEntries = BTreeMap<String, String>;

pub fn parse_config_entries(text: &str) -> Result<ConfigEntries, LineFailure> {
    Ok(parse_colon_pairs(text)?.into_iter().collect())
}

pub fn load_config_entries(path: &Path) -> Result<ConfigEntries, ConfigError> {
    let text = read_text(path)?;
    parse_config_entries(&text).map_err(|failure| parse_error(path, failure))
}

pub(crate) fn read_text(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_error(path: &Path, failure: LineFailure) -> ConfigError {
    ConfigError::Parse {
        path: path.to_path_buf(),
        line: failure.line,
        content: failure.content,
        reason: failure.reason,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Side length of the square network input. Fixed by the trained
    /// checkpoint, see [`Architecture::check_input_size`].
    pub input_size: u32,
    pub architecture: Architecture,
    /// Expected width of the model output, checked on the first forward pass.
    pub nb_classes: Option<usize>,
    pub normalization: Normalization,
    pub class_map_path: PathBuf,
    pub price_table_path: PathBuf,
    pub tick_rate: Duration,
    pub camera_width: u32,
    pub camera_height: u32,
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_size: 100,
            architecture: Architecture::LeNet5,
            nb_classes: None,
            normalization: Normalization::Unit,
            class_map_path: PathBuf::from("cfg/classes.cfg"),
            price_table_path: PathBuf::from("cfg/prices.cfg"),
            tick_rate: Duration::from_millis(33),
            camera_width: 848,
            camera_height: 480,
            currency: "yuan".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_entries(&load_config_entries(path)?)
    }

    pub fn from_entries(entries: &ConfigEntries) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let input_size = entries
            .get("input_size")
            .ok_or(ConfigError::MissingKey("input_size"))
            .and_then(|value| positive("input_size", value))?;

        let architecture = match entries.get("architecture") {
            Some(value) => Architecture::from_str(value).map_err(|e| invalid("architecture", value, e))?,
            None => defaults.architecture,
        };

        let nb_classes = entries
            .get("nb_classes")
            .map(|value| positive::<usize>("nb_classes", value))
            .transpose()?;

        let normalization = match entries.get("normalization") {
            Some(value) => Normalization::from_str(value).map_err(|e| invalid("normalization", value, e))?,
            None => defaults.normalization,
        };

        let tick_rate = match entries.get("tick_ms") {
            Some(value) => Duration::from_millis(positive("tick_ms", value)?),
            None => defaults.tick_rate,
        };

        Ok(Self {
            input_size,
            architecture,
            nb_classes,
            normalization,
            class_map_path: entries
                .get("classes")
                .map(PathBuf::from)
                .unwrap_or(defaults.class_map_path),
            price_table_path: entries
                .get("prices")
                .map(PathBuf::from)
                .unwrap_or(defaults.price_table_path),
            tick_rate,
            camera_width: entries
                .get("cam_width")
                .map(|value| positive("cam_width", value))
                .transpose()?
                .unwrap_or(defaults.camera_width),
            camera_height: entries
                .get("cam_height")
                .map(|value| positive("cam_height", value))
                .transpose()?
                .unwrap_or(defaults.camera_height),
            currency: entries.get("currency").cloned().unwrap_or(defaults.currency),
        })
    }
}

fn invalid(key: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: ToString,
{
    let parsed = value.parse::<T>().map_err(|e| invalid(key, value, e))?;
    if parsed <= T::default() {
        return Err(invalid(key, value, "must be positive"));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(text: &str) -> ConfigEntries {
        parse_config_entries(text).unwrap()
    }

    #[test]
    fn test_input_size_parses_to_string_entry() {
        let parsed = entries("input_size: 224\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("input_size").map(String::as_str), Some("224"));
    }

    #[test]
    fn test_comment_only_file_is_empty() {
        assert!(entries("# nothing here\n\n").is_empty());
    }

    #[test]
    fn test_later_duplicate_overwrites() {
        let parsed = entries("input_size: 100\ninput_size: 224\n");
        assert_eq!(parsed.get("input_size").map(String::as_str), Some("224"));
    }

    #[test]
    fn test_typed_config_with_defaults() {
        let config = Config::from_entries(&entries("input_size: 100\n")).unwrap();
        assert_eq!(config.input_size, 100);
        assert_eq!(config.architecture, Architecture::LeNet5);
        assert_eq!(config.normalization, Normalization::Unit);
        assert_eq!(config.tick_rate, Duration::from_millis(33));
        assert_eq!(config.class_map_path, PathBuf::from("cfg/classes.cfg"));
        assert_eq!(config.nb_classes, None);
    }

    #[test]
    fn test_typed_config_reads_every_key() {
        let text = "\
# food recognition system
input_size: 100
architecture: lenet5
nb_classes: 12
normalization: symmetric
classes: data/classes.cfg
prices: data/prices.cfg
tick_ms: 50
cam_width: 640
cam_height: 360
currency: CNY
";
        let config = Config::from_entries(&entries(text)).unwrap();
        assert_eq!(config.nb_classes, Some(12));
        assert_eq!(config.normalization, Normalization::Symmetric);
        assert_eq!(config.price_table_path, PathBuf::from("data/prices.cfg"));
        assert_eq!(config.tick_rate, Duration::from_millis(50));
        assert_eq!((config.camera_width, config.camera_height), (640, 360));
        assert_eq!(config.currency, "CNY");
    }

    #[test]
    fn test_missing_input_size() {
        let err = Config::from_entries(&entries("architecture: lenet5\n")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("input_size")));
    }

    #[test]
    fn test_input_size_must_be_positive_integer() {
        for bad in ["0", "-5", "abc", "10.5"] {
            let err = Config::from_entries(&entries(&format!("input_size: {bad}\n"))).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "input_size"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_architecture() {
        let err =
            Config::from_entries(&entries("input_size: 100\narchitecture: resnet50\n")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "architecture"));
    }

    #[test]
    fn test_load_reports_path_and_line() {
        let path = std::env::temp_dir().join(format!("frs-config-{}.cfg", std::process::id()));
        std::fs::write(&path, "input_size: 100\nnot a pair\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        match err {
            ConfigError::Parse { path: p, line, .. } => {
                assert_eq!(p, path);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here/frs.cfg")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
