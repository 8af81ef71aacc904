//! # Pointer Module
//!
//! Relative pointer injection into the host input system.
//!
//! The sample loop only talks to [`PointerSink`]; the production
//! implementation is [`virtual_mouse::VirtualMouse`], a uinput device.

pub mod virtual_mouse;

use crate::error::Result;

/// Destination for relative pointer motion
#[cfg_attr(test, mockall::automock)]
pub trait PointerSink {
    /// Move the pointer by `dx`, `dy` pixels relative to its current position
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<()>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::error::BridgeError;
    use std::sync::{Arc, Mutex};

    /// Recording pointer for testing
    #[derive(Clone, Default)]
    pub struct RecordingPointer {
        pub moves: Arc<Mutex<Vec<(i32, i32)>>>,
        pub fail: Arc<Mutex<bool>>,
    }

    impl RecordingPointer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn get_moves(&self) -> Vec<(i32, i32)> {
            self.moves.lock().unwrap().clone()
        }

        /// Sum of all recorded moves per axis
        pub fn total(&self) -> (i32, i32) {
            self.get_moves()
                .iter()
                .fold((0, 0), |(x, y), (dx, dy)| (x + dx, y + dy))
        }

        pub fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    impl PointerSink for RecordingPointer {
        fn move_relative(&mut self, dx: i32, dy: i32) -> Result<()> {
            if *self.fail.lock().unwrap() {
                return Err(BridgeError::Pointer("Mock emit error".to_string()));
            }
            self.moves.lock().unwrap().push((dx, dy));
            Ok(())
        }
    }
}
