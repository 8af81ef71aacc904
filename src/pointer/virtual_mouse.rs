//! # Virtual Mouse Module
//!
//! Creates a uinput relative pointer device through evdev.
//!
//! ## Capabilities
//!
//! | Type | Codes | Purpose |
//! |------|-------|---------|
//! | EV_REL | REL_X, REL_Y | Pointer motion |
//! | EV_KEY | BTN_LEFT, BTN_RIGHT | Lets the host classify the device as a mouse |
//!
//! Writing to `/dev/uinput` usually needs root or membership in the `input`
//! group.

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
};
use tracing::{debug, info};

use super::PointerSink;
use crate::error::{BridgeError, Result};

/// uinput-backed relative pointer
pub struct VirtualMouse {
    device: VirtualDevice,
    name: String,
}

impl std::fmt::Debug for VirtualMouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualMouse")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl VirtualMouse {
    /// Create the virtual pointer device
    ///
    /// # Arguments
    ///
    /// * `name` - Device name (shown in `evtest` and `libinput list-devices`)
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Pointer`] if `/dev/uinput` cannot be opened or
    /// the device cannot be registered
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use analog_mouse_bridge::pointer::{virtual_mouse::VirtualMouse, PointerSink};
    ///
    /// let mut mouse = VirtualMouse::new("Analog Mouse Bridge")?;
    /// mouse.move_relative(10, 0)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(name: &str) -> Result<Self> {
        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);

        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        keys.insert(Key::BTN_RIGHT);

        let device = VirtualDeviceBuilder::new()
            .map_err(|e| BridgeError::Pointer(format!("Failed to open uinput: {}", e)))?
            .name(name)
            .with_relative_axes(&axes)
            .map_err(|e| BridgeError::Pointer(format!("Failed to add relative axes: {}", e)))?
            .with_keys(&keys)
            .map_err(|e| BridgeError::Pointer(format!("Failed to add buttons: {}", e)))?
            .build()
            .map_err(|e| BridgeError::Pointer(format!("Failed to create device: {}", e)))?;

        info!("Created virtual pointer: {}", name);

        Ok(Self {
            device,
            name: name.to_string(),
        })
    }

    /// Get the device node (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builds the EV_REL events for one move, skipping zero axes.
fn relative_events(dx: i32, dy: i32) -> Vec<InputEvent> {
    [(RelativeAxisType::REL_X, dx), (RelativeAxisType::REL_Y, dy)]
        .into_iter()
        .filter(|&(_, value)| value != 0)
        .map(|(axis, value)| InputEvent::new(EventType::RELATIVE, axis.0, value))
        .collect()
}

impl PointerSink for VirtualMouse {
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<()> {
        let events = relative_events(dx, dy);
        if events.is_empty() {
            return Ok(());
        }

        // emit() terminates the batch with SYN_REPORT
        self.device
            .emit(&events)
            .map_err(|e| BridgeError::Pointer(format!("Failed to emit motion: {}", e)))?;

        debug!("Moved pointer by ({}, {})", dx, dy);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_events_x_only() {
        let events = relative_events(5, 0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), EventType::RELATIVE);
        assert_eq!(events[0].code(), RelativeAxisType::REL_X.0);
        assert_eq!(events[0].value(), 5);
    }

    #[test]
    fn test_relative_events_y_only() {
        let events = relative_events(0, -3);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].code(), RelativeAxisType::REL_Y.0);
        assert_eq!(events[0].value(), -3);
    }

    #[test]
    fn test_relative_events_zero_is_empty() {
        assert!(relative_events(0, 0).is_empty());
    }

    #[test]
    #[ignore] // Requires uinput access (run with: cargo test -- --ignored)
    fn test_create_virtual_mouse() {
        let mut mouse = VirtualMouse::new("Analog Mouse Bridge Test").unwrap();
        assert_eq!(mouse.name(), "Analog Mouse Bridge Test");
        assert!(mouse.move_relative(1, 0).is_ok());
        assert!(mouse.move_relative(0, -1).is_ok());
    }
}
