/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

/// Errors in this crate
#[derive(Debug, PartialEq)]
pub enum Error<CommE> {
    /// Sensor communication error
    Comm(CommE),

    /// A reset or power-down line could not be driven
    Pin,

    /// The chip id registers did not match the expected part
    UnknownChip { id: u32 },

    /// Requested frame rate (ISP packing, `num << 16 | den`) is not achievable
    FpsOutOfRange { fps: u32 },

    /// The sensor reported a horizontal total that cannot be used
    InvalidTiming,

    /// A gain table is empty, not strictly increasing,
    /// or has no entry at or below its max gain
    InvalidTable,

    /// No window setting at this index
    InvalidWinSetting { index: usize },

    /// The operation needs a window setting selected first
    NotInitialized,
}
