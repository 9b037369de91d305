/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Reset and power-down line sequencing

use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

/// Placeholder for a line that is not wired
pub struct NoPin;

impl OutputPin for NoPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// The sensor's reset (active low) and power-down lines
pub struct PowerPins<RST, PWDN> {
    pub reset: Option<RST>,
    pub pwdn: Option<PWDN>,
    /// Power-down asserted by driving the line high
    pub pwdn_active_high: bool,
}

impl<RST, PWDN> PowerPins<RST, PWDN> {
    pub fn new(reset: Option<RST>, pwdn: Option<PWDN>) -> Self {
        Self {
            reset,
            pwdn,
            pwdn_active_high: true,
        }
    }
}

impl<RST> PowerPins<RST, NoPin> {
    pub fn reset_only(reset: RST) -> Self {
        Self::new(Some(reset), None)
    }
}

/// One level change followed by a settle time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub high: bool,
    pub settle_ms: u16,
}

impl Step {
    const fn new(high: bool, settle_ms: u16) -> Self {
        Self {
            high,
            settle_ms,
        }
    }
}

/// Pulse reset low, leaving the part running
pub(crate) const RESET_PULSE: [Step; 3] = [
    Step::new(true, 10),
    Step::new(false, 20),
    Step::new(true, 10),
];

/// Assert then release power-down (levels for an active-high line)
pub(crate) const PWDN_RELEASE: [Step; 2] =
    [Step::new(true, 10), Step::new(false, 10)];
