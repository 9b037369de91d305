/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Per-part description consumed by the generic driver

use crate::{
    regs, AddrWidth, Error, Flip, GainLut, RegValue, RegisterBus, Timing,
    WinSetting,
};
use embedded_hal::blocking::delay::DelayMs;

/// Everything that differs between two sensor parts:
/// identity, gain steps, timing, mode tables and register encodings.
pub trait SensorModel {
    const NAME: &'static str;
    /// Default 7-bit i2c address
    const I2C_ADDRESS: u8;
    const ADDR_WIDTH: AddrWidth;

    /// Registers holding the chip id, most significant first
    const CHIP_ID_REGS: &'static [u16];
    const CHIP_ID: u32;

    const AGAIN: GainLut<'static>;
    /// Digital gain steps, if the part has digital gain
    const DGAIN: Option<GainLut<'static>> = None;

    const TIMING: Timing;
    const MIN_INTEGRATION_TIME: u32;
    const INTEGRATION_TIME_APPLY_DELAY: u32 = 2;
    const AGAIN_APPLY_DELAY: u32 = 2;
    const DGAIN_APPLY_DELAY: u32 = 0;

    const WIN_SETTINGS: &'static [WinSetting];
    /// Played by the default `write_stream`
    const STREAM_ON: &'static [RegValue] = &[];
    const STREAM_OFF: &'static [RegValue] = &[];

    fn read_chip_id<B: RegisterBus>(
        bus: &mut B,
    ) -> Result<u32, Error<B::CommError>> {
        let mut id = 0u32;
        for &reg in Self::CHIP_ID_REGS {
            id = (id << 8) | bus.read_reg(reg)? as u32;
        }
        Ok(id)
    }

    /// Program the exposure, in lines
    fn write_integration_time<B: RegisterBus>(
        bus: &mut B,
        it: u32,
    ) -> Result<(), Error<B::CommError>>;

    /// Program an analog gain code taken from `AGAIN`
    fn write_again<B: RegisterBus>(
        bus: &mut B,
        code: u32,
    ) -> Result<(), Error<B::CommError>>;

    /// Program a digital gain code taken from `DGAIN`
    fn write_dgain<B: RegisterBus>(
        _bus: &mut B,
        _code: u32,
    ) -> Result<(), Error<B::CommError>> {
        Ok(())
    }

    /// Current horizontal total in clock periods
    fn read_hts<B: RegisterBus>(
        bus: &mut B,
    ) -> Result<u32, Error<B::CommError>> {
        let timing = Self::TIMING;
        let hts = bus.read_reg_u16(timing.hts_hi, timing.hts_lo)?;
        Ok(hts as u32 * timing.hts_mult)
    }

    /// Program the vertical total
    fn write_vts<B: RegisterBus>(
        bus: &mut B,
        vts: u32,
    ) -> Result<(), Error<B::CommError>>;

    fn write_flip<B: RegisterBus>(
        bus: &mut B,
        flip: Flip,
    ) -> Result<(), Error<B::CommError>>;

    fn write_stream<B: RegisterBus, D: DelayMs<u16>>(
        bus: &mut B,
        delay: &mut D,
        on: bool,
    ) -> Result<(), Error<B::CommError>> {
        let table = if on {
            Self::STREAM_ON
        } else {
            Self::STREAM_OFF
        };
        regs::write_array(bus, delay, table)?;
        Ok(())
    }
}

/// Set or clear `mask` in `val`
pub(crate) fn with_bits(val: u8, mask: u8, set: bool) -> u8 {
    if set {
        val | mask
    } else {
        val & !mask
    }
}
