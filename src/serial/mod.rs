//! # Serial Communication Module
//!
//! Handles the serial link to the analog source (joystick board).
//!
//! This module handles:
//! - Opening the serial port (8N1, no flow control)
//! - Falling back to common USB serial device paths
//! - Handing a buffered line reader to the sample loop
//! - Decoding sample lines ([`protocol`])

pub mod protocol;

use crate::config::SerialConfig;
use crate::error::{BridgeError, Result};
use tokio::io::BufReader;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

/// Default baud rate of the analog source
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Device paths tried after the configured one (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // USB CDC devices (Arduino Leonardo/Micro, RP2040, ESP32-S3)
    "/dev/ttyACM1",
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// Serial link to the analog source
pub struct SampleSerial {
    /// Serial port handle
    port: tokio_serial::SerialStream,
    /// Device path (e.g., /dev/ttyACM1)
    device_path: String,
}

impl std::fmt::Debug for SampleSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl SampleSerial {
    /// Open the configured port, falling back to the default device paths
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SerialPortNotFound`] if no candidate could be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use analog_mouse_bridge::config::SerialConfig;
    /// use analog_mouse_bridge::serial::SampleSerial;
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() -> anyhow::Result<()> {
    ///     let serial = SampleSerial::open(&SerialConfig::default())?;
    ///     println!("Connected to: {}", serial.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let mut paths: Vec<&str> = vec![config.port.as_str()];
        paths.extend(
            DEFAULT_DEVICE_PATHS
                .iter()
                .copied()
                .filter(|path| *path != config.port),
        );

        Self::open_with_paths(&paths, config.baud_rate)
    }

    /// Open the first device path that succeeds
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyACM1"])
    /// * `baud_rate` - Line speed of the analog source
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Opened analog source at {} ({} baud)", path, baud_rate);
                    return Ok(Self {
                        port,
                        device_path: path.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(BridgeError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port (8N1, no flow control)
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        // tokio-serial requires a runtime context when opening; report that as an error
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(BridgeError::Serial(format!(
                "Failed to open {}: no async runtime",
                path
            )));
        }

        tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| BridgeError::Serial(format!("Failed to open {}: {}", path, e)))
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Consume the port into a buffered line source for the sample loop
    pub fn into_reader(self) -> BufReader<tokio_serial::SerialStream> {
        BufReader::new(self.port)
    }
}
