//! # Analog Mouse Bridge Library
//!
//! Drive the host pointer from a two-axis analog joystick streamed over serial.
//!
//! This library provides the signal-to-motion transform (range mapping,
//! dead zone, response curve, velocity scaling, sub-pixel carry) and the
//! sample loop that feeds a relative pointer device.

pub mod bridge;
pub mod config;
pub mod error;
pub mod motion;
pub mod pointer;
pub mod serial;
