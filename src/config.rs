//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! The configuration is read once at startup. Every field has a default, so
//! an empty file (or no file at all) yields the stock tuning for a 1..680
//! joystick sampled every 10 ms.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::motion::accumulator::FlushMode;
use crate::motion::curve::{CurveSpec, DEFAULT_CURVE};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub errors: ErrorPolicyConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Delay after opening before the first read (boards reset on open)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

/// Raw input range and dead zone
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_src_min")]
    pub src_min: i32,

    #[serde(default = "default_src_max")]
    pub src_max: i32,

    #[serde(default = "default_dst_min")]
    pub dst_min: f64,

    #[serde(default = "default_dst_max")]
    pub dst_max: f64,

    #[serde(default = "default_deadzone")]
    pub deadzone: f64,

    /// Drive X from axis index 1 and Y from axis index 0
    #[serde(default = "default_swap_axes")]
    pub swap_axes: bool,
}

/// Response curve, speed and carry handling
#[derive(Debug, Deserialize, Clone)]
pub struct MotionConfig {
    #[serde(default = "default_curve")]
    pub curve: String,

    /// Pixels per second at full deflection
    #[serde(default = "default_speed_max")]
    pub speed_max: f64,

    /// Transmission delay between samples on the analog source
    #[serde(default = "default_sample_delay_ms")]
    pub sample_delay_ms: u64,

    #[serde(default)]
    pub flush_mode: FlushMode,

    /// Dead-zoned samples in a row before an axis drops its carry (0 = never)
    #[serde(default)]
    pub carry_idle_reset_samples: u32,
}

/// Virtual pointer configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PointerConfig {
    #[serde(default = "default_device_name")]
    pub device_name: String,

    #[serde(default = "default_pointer_enabled")]
    pub enabled: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Samples between status lines (0 disables)
    #[serde(default = "default_status_interval_samples")]
    pub status_interval_samples: u64,

    /// Log file path; empty logs to stdout
    #[serde(default)]
    pub file: String,
}

/// What the sample loop does with a malformed line
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorPolicy {
    /// Log and wait for the next line
    #[default]
    Skip,
    /// Stop the loop with the parse error
    Abort,
}

/// Error policy configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ErrorPolicyConfig {
    #[serde(default)]
    pub on_parse_error: ParseErrorPolicy,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyACM1".to_string() }
fn default_baud_rate() -> u32 { 115200 }
fn default_settle_ms() -> u64 { 1000 }

fn default_src_min() -> i32 { 1 }
fn default_src_max() -> i32 { 680 }
fn default_dst_min() -> f64 { -1.0 }
fn default_dst_max() -> f64 { 1.0 }
fn default_deadzone() -> f64 { 0.1 }
fn default_swap_axes() -> bool { true }

fn default_curve() -> String { DEFAULT_CURVE.to_string() }
fn default_speed_max() -> f64 { 4000.0 }
fn default_sample_delay_ms() -> u64 { 10 }

fn default_device_name() -> String { "Analog Mouse Bridge".to_string() }
fn default_pointer_enabled() -> bool { true }

fn default_log_level() -> String { "info".to_string() }
fn default_status_interval_samples() -> u64 { 1000 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            src_min: default_src_min(),
            src_max: default_src_max(),
            dst_min: default_dst_min(),
            dst_max: default_dst_max(),
            deadzone: default_deadzone(),
            swap_axes: default_swap_axes(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            curve: default_curve(),
            speed_max: default_speed_max(),
            sample_delay_ms: default_sample_delay_ms(),
            flush_mode: FlushMode::default(),
            carry_idle_reset_samples: 0,
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            enabled: default_pointer_enabled(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            status_interval_samples: default_status_interval_samples(),
            file: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use analog_mouse_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate serial port configuration
        if self.serial.port.is_empty() {
            return Err(invalid("serial port cannot be empty"));
        }

        if self.serial.baud_rate == 0 {
            return Err(invalid("baud_rate must be greater than 0"));
        }

        if self.serial.settle_ms > 10000 {
            return Err(invalid("settle_ms must be between 0 and 10000"));
        }

        // Validate input range
        if self.input.src_min >= self.input.src_max {
            return Err(invalid("src_min must be less than src_max"));
        }

        if self.input.src_max == 0 {
            return Err(invalid("src_max cannot be 0 (it is the mapping divisor)"));
        }

        if !self.input.dst_min.is_finite() || !self.input.dst_max.is_finite() {
            return Err(invalid("dst_min and dst_max must be finite"));
        }

        if self.input.dst_min >= self.input.dst_max {
            return Err(invalid("dst_min must be less than dst_max"));
        }

        if !(0.0..1.0).contains(&self.input.deadzone) {
            return Err(invalid("deadzone must be in [0.0, 1.0)"));
        }

        // Validate motion
        if let Err(e) = self.motion.curve.parse::<CurveSpec>() {
            return Err(invalid(format!("curve '{}': {}", self.motion.curve, e)));
        }

        if !self.motion.speed_max.is_finite() || self.motion.speed_max <= 0.0 {
            return Err(invalid("speed_max must be greater than 0"));
        }

        if self.motion.sample_delay_ms == 0 || self.motion.sample_delay_ms > 1000 {
            return Err(invalid("sample_delay_ms must be between 1 and 1000"));
        }

        // Validate pointer
        if self.pointer.device_name.is_empty() {
            return Err(invalid("pointer device_name cannot be empty"));
        }

        // Validate log level
        if !["error", "warn", "info", "debug", "trace"].contains(&self.logging.level.as_str()) {
            return Err(invalid(
                "log level must be one of: error, warn, info, debug, trace",
            ));
        }

        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> crate::error::BridgeError {
    crate::error::BridgeError::Config(toml::de::Error::custom(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    fn create_valid_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_default_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.serial.port, "/dev/ttyACM1");
        assert_eq!(config.input.src_max, 680);
        assert_eq!(config.motion.curve, "0.9x^5 + 0.1x");
        assert_eq!(config.motion.flush_mode, FlushMode::CarryRemainder);
        assert_eq!(config.errors.on_parse_error, ParseErrorPolicy::Skip);
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[serial]
port = "/dev/ttyUSB0"
baud_rate = 9600

[input]
deadzone = 0.05
swap_axes = false

[motion]
curve = "x^3"
speed_max = 2500.0
flush_mode = "reset"
carry_idle_reset_samples = 50

[pointer]

[logging]
status_interval_samples = 0

[errors]
on_parse_error = "abort"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.input.deadzone, 0.05);
        assert!(!config.input.swap_axes);
        assert_eq!(config.motion.curve, "x^3");
        assert_eq!(config.motion.flush_mode, FlushMode::Reset);
        assert_eq!(config.motion.carry_idle_reset_samples, 50);
        assert_eq!(config.logging.status_interval_samples, 0);
        assert_eq!(config.errors.on_parse_error, ParseErrorPolicy::Abort);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/analog-mouse-bridge.toml");
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }

    #[test]
    fn test_unknown_flush_mode_rejected() {
        let result = Config::from_toml("[motion]\nflush_mode = \"truncate\"\n");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_empty_serial_port() {
        let mut config = create_valid_config();
        config.serial.port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_baud_rate_zero() {
        let mut config = create_valid_config();
        config.serial.baud_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settle_too_long() {
        let mut config = create_valid_config();
        config.serial.settle_ms = 10001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_src_min_not_below_max() {
        let mut config = create_valid_config();
        config.input.src_min = 680;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_src_max_zero() {
        let mut config = create_valid_config();
        config.input.src_min = -10;
        config.input.src_max = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dst_range_inverted() {
        let mut config = create_valid_config();
        config.input.dst_min = 1.0;
        config.input.dst_max = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dst_range_not_finite() {
        let mut config = create_valid_config();
        config.input.dst_max = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_bounds() {
        let mut config = create_valid_config();
        config.input.deadzone = -0.1;
        assert!(config.validate().is_err());

        config.input.deadzone = 1.0;
        assert!(config.validate().is_err());

        config.input.deadzone = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_curve() {
        let mut config = create_valid_config();
        config.motion.curve = "0.9x^five".to_string();
        match config.validate() {
            Err(BridgeError::Config(e)) => assert!(e.to_string().contains("0.9x^five")),
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    #[test]
    fn test_speed_max_not_positive() {
        let mut config = create_valid_config();
        config.motion.speed_max = 0.0;
        assert!(config.validate().is_err());

        config.motion.speed_max = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_delay_bounds() {
        let mut config = create_valid_config();
        config.motion.sample_delay_ms = 0;
        assert!(config.validate().is_err());

        config.motion.sample_delay_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_device_name() {
        let mut config = create_valid_config();
        config.pointer.device_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = create_valid_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_serial_port(), "/dev/ttyACM1");
        assert_eq!(default_baud_rate(), 115200);
        assert_eq!(default_settle_ms(), 1000);
        assert_eq!(default_src_min(), 1);
        assert_eq!(default_src_max(), 680);
        assert_eq!(default_dst_min(), -1.0);
        assert_eq!(default_dst_max(), 1.0);
        assert_eq!(default_deadzone(), 0.1);
        assert!(default_swap_axes());
        assert_eq!(default_curve(), "0.9x^5 + 0.1x");
        assert_eq!(default_speed_max(), 4000.0);
        assert_eq!(default_sample_delay_ms(), 10);
        assert_eq!(default_device_name(), "Analog Mouse Bridge");
        assert!(default_pointer_enabled());
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_status_interval_samples(), 1000);
    }
}
