/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! GalaxyCore GC2053, 1920x1080 raw10 over MIPI.
//! Analog gain is a set of register stages rather than a single code;
//! the lookup table hands out stage indices.

use crate::again::{AgainEntry, GainLut};
use crate::model::with_bits;
use crate::regs::rv;
use crate::{
    AddrWidth, Error, Flip, MbusCode, RegValue, RegisterBus, SensorModel,
    Timing, WinSetting,
};

const PAGE_SELECT: u16 = 0xfe;
const EXPOSURE_HI: u16 = 0x03;
const EXPOSURE_LO: u16 = 0x04;
const VTS_HI: u16 = 0x41;
const VTS_LO: u16 = 0x42;
const MIRROR_FLIP: u16 = 0x17;
const STREAM: u16 = 0x3e;
const GAIN_REGS: [u16; 4] = [0xb4, 0xb3, 0xb8, 0xb9];

/// Values for 0xb4, 0xb3, 0xb8, 0xb9 per gain stage
#[rustfmt::skip]
const GAIN_STAGES: [[u8; 4]; 17] = [
    [0x00, 0x00, 0x01, 0x00],
    [0x00, 0x10, 0x01, 0x0c],
    [0x00, 0x20, 0x01, 0x1b],
    [0x00, 0x30, 0x01, 0x2c],
    [0x00, 0x40, 0x01, 0x3f],
    [0x00, 0x50, 0x02, 0x16],
    [0x00, 0x60, 0x02, 0x35],
    [0x00, 0x70, 0x03, 0x16],
    [0x00, 0x80, 0x04, 0x02],
    [0x00, 0x90, 0x04, 0x31],
    [0x00, 0xa0, 0x05, 0x32],
    [0x00, 0xb0, 0x06, 0x35],
    [0x00, 0xc0, 0x08, 0x04],
    [0x00, 0x5a, 0x09, 0x19],
    [0x00, 0x83, 0x0b, 0x0f],
    [0x00, 0x93, 0x0d, 0x12],
    [0x00, 0x84, 0x10, 0x00],
];

/// Stage index to gain: pre-gain is `0xb8 + 0xb9 / 64`
#[rustfmt::skip]
const AGAIN_LUT: [AgainEntry; 17] = [
    AgainEntry::new(0, 0),
    AgainEntry::new(1, 16248),
    AgainEntry::new(2, 33279),
    AgainEntry::new(3, 49472),
    AgainEntry::new(4, 64794),
    AgainEntry::new(5, 80532),
    AgainEntry::new(6, 98294),
    AgainEntry::new(7, 114129),
    AgainEntry::new(8, 131808),
    AgainEntry::new(9, 147631),
    AgainEntry::new(10, 165897),
    AgainEntry::new(11, 181632),
    AgainEntry::new(12, 197344),
    AgainEntry::new(13, 211761),
    AgainEntry::new(14, 228711),
    AgainEntry::new(15, 244536),
    AgainEntry::new(16, 262144),
];

#[rustfmt::skip]
const INIT_1080P_30: [RegValue; 37] = [
    rv(0xfe, 0x80), rv(0xfe, 0x80), rv(0xfe, 0x80), rv(0xfe, 0x00),
    rv(0xf2, 0x00), rv(0xf3, 0x00), rv(0xf4, 0x36), rv(0xf5, 0xc0),
    rv(0xf6, 0x44), rv(0xf7, 0x01), rv(0xf8, 0x2c), rv(0xf9, 0x42),
    rv(0xfc, 0x8e),
    rv(0xfe, 0x00), rv(0x87, 0x18), rv(0xee, 0x30), rv(0xd0, 0xb7),
    rv(0x03, 0x04), rv(0x04, 0x60),
    rv(0x05, 0x05), rv(0x06, 0x46),
    rv(0x07, 0x00), rv(0x08, 0x11), rv(0x09, 0x00), rv(0x0a, 0x02),
    rv(0x0b, 0x00), rv(0x0c, 0x02), rv(0x0d, 0x04), rv(0x0e, 0x40),
    rv(0x12, 0xe2), rv(0x13, 0x16), rv(0x17, 0x80), rv(0x19, 0x0a),
    rv(0x41, 0x04), rv(0x42, 0x65),
    rv(0x3e, 0x00),
    RegValue::END,
];

const WIN_SETTINGS: [WinSetting; 1] = [WinSetting {
    width: 1920,
    height: 1080,
    fps: 30 << 16 | 1,
    mbus_code: MbusCode::Srggb10,
    hts: 2700,
    vts: 1125,
    regs: &INIT_1080P_30,
}];

const STREAM_ON: [RegValue; 2] = [rv(PAGE_SELECT, 0x00), rv(STREAM, 0x91)];
const STREAM_OFF: [RegValue; 2] = [rv(PAGE_SELECT, 0x00), rv(STREAM, 0x00)];

pub struct Gc2053;

impl Gc2053 {
    fn page0<B: RegisterBus>(bus: &mut B) -> Result<(), Error<B::CommError>> {
        bus.write_reg(PAGE_SELECT, 0x00)
    }
}

impl SensorModel for Gc2053 {
    const NAME: &'static str = "gc2053";
    const I2C_ADDRESS: u8 = 0x37;
    const ADDR_WIDTH: AddrWidth = AddrWidth::Eight;

    const CHIP_ID_REGS: &'static [u16] = &[0xf0, 0xf1];
    const CHIP_ID: u32 = 0x2053;

    const AGAIN: GainLut<'static> = GainLut::checked(&AGAIN_LUT, 262144);

    const TIMING: Timing = Timing {
        sclk: 91_125_000,
        hts_hi: 0x05,
        hts_lo: 0x06,
        hts_mult: 2,
        min_fps: 5,
        max_fps: 30,
        integration_margin: 8,
        max_vts: 0x3fff,
    };
    const MIN_INTEGRATION_TIME: u32 = 1;

    const WIN_SETTINGS: &'static [WinSetting] = &WIN_SETTINGS;
    const STREAM_ON: &'static [RegValue] = &STREAM_ON;
    const STREAM_OFF: &'static [RegValue] = &STREAM_OFF;

    fn write_integration_time<B: RegisterBus>(
        bus: &mut B,
        it: u32,
    ) -> Result<(), Error<B::CommError>> {
        Self::page0(bus)?;
        bus.write_reg(EXPOSURE_HI, ((it >> 8) & 0x3f) as u8)?;
        bus.write_reg(EXPOSURE_LO, (it & 0xff) as u8)
    }

    fn write_again<B: RegisterBus>(
        bus: &mut B,
        code: u32,
    ) -> Result<(), Error<B::CommError>> {
        let stage = GAIN_STAGES
            .get(code as usize)
            .ok_or(Error::<B::CommError>::InvalidTable)?;
        Self::page0(bus)?;
        for (&reg, &val) in GAIN_REGS.iter().zip(stage.iter()) {
            bus.write_reg(reg, val)?;
        }
        Ok(())
    }

    fn read_hts<B: RegisterBus>(
        bus: &mut B,
    ) -> Result<u32, Error<B::CommError>> {
        Self::page0(bus)?;
        let timing = Self::TIMING;
        let hts = bus.read_reg_u16(timing.hts_hi, timing.hts_lo)?;
        Ok(hts as u32 * timing.hts_mult)
    }

    fn write_vts<B: RegisterBus>(
        bus: &mut B,
        vts: u32,
    ) -> Result<(), Error<B::CommError>> {
        Self::page0(bus)?;
        bus.write_reg(VTS_HI, ((vts >> 8) & 0x3f) as u8)?;
        bus.write_reg(VTS_LO, (vts & 0xff) as u8)
    }

    fn write_flip<B: RegisterBus>(
        bus: &mut B,
        flip: Flip,
    ) -> Result<(), Error<B::CommError>> {
        Self::page0(bus)?;
        let val = bus.read_reg(MIRROR_FLIP)?;
        let val = with_bits(val, 0x01, flip.mirror);
        let val = with_bits(val, 0x02, flip.flip);
        bus.write_reg(MIRROR_FLIP, val)
    }
}
