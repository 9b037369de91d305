/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/
#![no_std]

//! Control driver for raw image sensors feeding an ISP (image signal processor)
//! These sensors have multiple interfaces:
//! - Two-wire i2c / SCCB for configuration registers
//! - MIPI or DVP pixel data out
//! - reset and power-down GPIO lines
//! This driver is concerned with the i2c interface and the reset lines.
//!
//! The ISP core drives each sensor through a small control surface:
//! integration time, analog and digital gain, frame rate, stream on/off,
//! mirror/flip, and window (resolution) selection.
//! One generic [`Sensor`] driver implements that surface for every part;
//! the per-part registers, tables and timing live behind [`SensorModel`].
//!
//! Gains are exchanged with the ISP in its own fixed-point domain
//! (see [`again`]) and resolved to the nearest supported register code
//! by walking a monotonic lookup table.

#[cfg(test)]
extern crate std;

/// Diagnostic trace, only emitted with the `rttdebug` feature
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "rttdebug")]
        panic_rtt_core::rprintln!($($arg)*);
    };
}

pub mod again;
pub mod attr;
pub mod bus;
mod error;
pub mod model;
pub mod models;
pub mod ops;
pub mod power;
pub mod regs;
mod sensor;
pub mod timing;

#[cfg(test)]
mod mock;

pub use again::{AgainEntry, Allocation, GainLut};
pub use attr::{Flip, MbusCode, SensorAttr, Video, WinSetting};
pub use bus::{AddrWidth, RegisterBus, Sccb};
pub use error::Error;
pub use model::SensorModel;
pub use ops::{EventReply, IspNotify, SensorEvent};
pub use power::{NoPin, PowerPins};
pub use regs::RegValue;
pub use sensor::Sensor;
pub use timing::{Fps, Timing};
