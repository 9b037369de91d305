/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! SOI JX-F37, 1920x1080 raw10.
//! Streaming is the sleep bit of the system control register, which it
//! shares with mirror and flip, so both are read-modify-write.

use crate::again::{AgainEntry, GainLut};
use crate::model::with_bits;
use crate::regs::rv;
use crate::{
    AddrWidth, Error, Flip, MbusCode, RegValue, RegisterBus, SensorModel,
    Timing, WinSetting,
};
use embedded_hal::blocking::delay::DelayMs;

const AGAIN_REG: u16 = 0x00;
const EXPOSURE_LO: u16 = 0x01;
const EXPOSURE_HI: u16 = 0x02;
const SYS_CTRL: u16 = 0x12;
const VTS_LO: u16 = 0x22;
const VTS_HI: u16 = 0x23;

const SLEEP: u8 = 0x40;
const MIRROR: u8 = 0x20;
const FLIP: u8 = 0x10;

/// Code is `exponent << 4 | mantissa`: gain is `2^e * (1 + m / 16)`
#[rustfmt::skip]
const AGAIN_LUT: [AgainEntry; 80] = [
    AgainEntry::new(0x00, 0),
    AgainEntry::new(0x01, 5732),
    AgainEntry::new(0x02, 11136),
    AgainEntry::new(0x03, 16248),
    AgainEntry::new(0x04, 21098),
    AgainEntry::new(0x05, 25711),
    AgainEntry::new(0x06, 30109),
    AgainEntry::new(0x07, 34312),
    AgainEntry::new(0x08, 38336),
    AgainEntry::new(0x09, 42196),
    AgainEntry::new(0x0a, 45904),
    AgainEntry::new(0x0b, 49472),
    AgainEntry::new(0x0c, 52911),
    AgainEntry::new(0x0d, 56229),
    AgainEntry::new(0x0e, 59434),
    AgainEntry::new(0x0f, 62534),
    AgainEntry::new(0x10, 65536),
    AgainEntry::new(0x11, 71268),
    AgainEntry::new(0x12, 76672),
    AgainEntry::new(0x13, 81784),
    AgainEntry::new(0x14, 86634),
    AgainEntry::new(0x15, 91247),
    AgainEntry::new(0x16, 95645),
    AgainEntry::new(0x17, 99848),
    AgainEntry::new(0x18, 103872),
    AgainEntry::new(0x19, 107732),
    AgainEntry::new(0x1a, 111440),
    AgainEntry::new(0x1b, 115008),
    AgainEntry::new(0x1c, 118447),
    AgainEntry::new(0x1d, 121765),
    AgainEntry::new(0x1e, 124970),
    AgainEntry::new(0x1f, 128070),
    AgainEntry::new(0x20, 131072),
    AgainEntry::new(0x21, 136804),
    AgainEntry::new(0x22, 142208),
    AgainEntry::new(0x23, 147320),
    AgainEntry::new(0x24, 152170),
    AgainEntry::new(0x25, 156783),
    AgainEntry::new(0x26, 161181),
    AgainEntry::new(0x27, 165384),
    AgainEntry::new(0x28, 169408),
    AgainEntry::new(0x29, 173268),
    AgainEntry::new(0x2a, 176976),
    AgainEntry::new(0x2b, 180544),
    AgainEntry::new(0x2c, 183983),
    AgainEntry::new(0x2d, 187301),
    AgainEntry::new(0x2e, 190506),
    AgainEntry::new(0x2f, 193606),
    AgainEntry::new(0x30, 196608),
    AgainEntry::new(0x31, 202340),
    AgainEntry::new(0x32, 207744),
    AgainEntry::new(0x33, 212856),
    AgainEntry::new(0x34, 217706),
    AgainEntry::new(0x35, 222319),
    AgainEntry::new(0x36, 226717),
    AgainEntry::new(0x37, 230920),
    AgainEntry::new(0x38, 234944),
    AgainEntry::new(0x39, 238804),
    AgainEntry::new(0x3a, 242512),
    AgainEntry::new(0x3b, 246080),
    AgainEntry::new(0x3c, 249519),
    AgainEntry::new(0x3d, 252837),
    AgainEntry::new(0x3e, 256042),
    AgainEntry::new(0x3f, 259142),
    AgainEntry::new(0x40, 262144),
    AgainEntry::new(0x41, 267876),
    AgainEntry::new(0x42, 273280),
    AgainEntry::new(0x43, 278392),
    AgainEntry::new(0x44, 283242),
    AgainEntry::new(0x45, 287855),
    AgainEntry::new(0x46, 292253),
    AgainEntry::new(0x47, 296456),
    AgainEntry::new(0x48, 300480),
    AgainEntry::new(0x49, 304340),
    AgainEntry::new(0x4a, 308048),
    AgainEntry::new(0x4b, 311616),
    AgainEntry::new(0x4c, 315055),
    AgainEntry::new(0x4d, 318373),
    AgainEntry::new(0x4e, 321578),
    AgainEntry::new(0x4f, 324678),
];

#[rustfmt::skip]
const INIT_1080P_30: [RegValue; 48] = [
    rv(0x12, 0x60), rv(0x48, 0x85), rv(0x48, 0x05),
    RegValue::delay(2),
    rv(0x0e, 0x11), rv(0x0f, 0x14), rv(0x10, 0x48), rv(0x11, 0x80),
    rv(0x0d, 0xf0), rv(0x5f, 0x42), rv(0x60, 0x2b), rv(0x58, 0x12),
    rv(0x57, 0x60), rv(0x9d, 0x00),
    rv(0x20, 0x00), rv(0x21, 0x05), rv(0x22, 0x65), rv(0x23, 0x04),
    rv(0x24, 0xc0), rv(0x25, 0x38), rv(0x26, 0x43), rv(0x27, 0x1a),
    rv(0x28, 0x15), rv(0x29, 0x07), rv(0x2a, 0x0a), rv(0x2b, 0x17),
    rv(0x2c, 0x00), rv(0x2d, 0x00), rv(0x2e, 0x14), rv(0x2f, 0x44),
    rv(0x41, 0xc5), rv(0x42, 0x3b), rv(0x47, 0x42), rv(0x76, 0x60),
    rv(0x77, 0x09), rv(0x1d, 0x00), rv(0x1e, 0x04), rv(0x6c, 0x40),
    rv(0x6e, 0x2c), rv(0x70, 0xdc), rv(0x71, 0xd3), rv(0x72, 0xd4),
    rv(0x73, 0x58), rv(0x74, 0x02), rv(0x78, 0x96), rv(0x89, 0x01),
    rv(0x12, 0x40),
    RegValue::END,
];

const WIN_SETTINGS: [WinSetting; 1] = [WinSetting {
    width: 1920,
    height: 1080,
    fps: 30 << 16 | 1,
    mbus_code: MbusCode::Sbggr10,
    hts: 2560,
    vts: 1125,
    regs: &INIT_1080P_30,
}];

pub struct JxF37;

impl SensorModel for JxF37 {
    const NAME: &'static str = "jxf37";
    const I2C_ADDRESS: u8 = 0x40;
    const ADDR_WIDTH: AddrWidth = AddrWidth::Eight;

    const CHIP_ID_REGS: &'static [u16] = &[0x0a, 0x0b];
    const CHIP_ID: u32 = 0x0f37;

    const AGAIN: GainLut<'static> = GainLut::checked(&AGAIN_LUT, 324678);

    const TIMING: Timing = Timing {
        sclk: 86_400_000,
        hts_hi: 0x21,
        hts_lo: 0x20,
        hts_mult: 2,
        min_fps: 5,
        max_fps: 30,
        integration_margin: 4,
        max_vts: 0xffff,
    };
    const MIN_INTEGRATION_TIME: u32 = 2;
    const AGAIN_APPLY_DELAY: u32 = 1;

    const WIN_SETTINGS: &'static [WinSetting] = &WIN_SETTINGS;

    fn write_integration_time<B: RegisterBus>(
        bus: &mut B,
        it: u32,
    ) -> Result<(), Error<B::CommError>> {
        bus.write_reg(EXPOSURE_LO, (it & 0xff) as u8)?;
        bus.write_reg(EXPOSURE_HI, ((it >> 8) & 0xff) as u8)
    }

    fn write_again<B: RegisterBus>(
        bus: &mut B,
        code: u32,
    ) -> Result<(), Error<B::CommError>> {
        bus.write_reg(AGAIN_REG, code as u8)
    }

    fn write_vts<B: RegisterBus>(
        bus: &mut B,
        vts: u32,
    ) -> Result<(), Error<B::CommError>> {
        bus.write_reg(VTS_LO, (vts & 0xff) as u8)?;
        bus.write_reg(VTS_HI, ((vts >> 8) & 0xff) as u8)
    }

    fn write_flip<B: RegisterBus>(
        bus: &mut B,
        flip: Flip,
    ) -> Result<(), Error<B::CommError>> {
        let val = bus.read_reg(SYS_CTRL)?;
        let val = with_bits(val, MIRROR, flip.mirror);
        let val = with_bits(val, FLIP, flip.flip);
        bus.write_reg(SYS_CTRL, val)
    }

    fn write_stream<B: RegisterBus, D: DelayMs<u16>>(
        bus: &mut B,
        _delay: &mut D,
        on: bool,
    ) -> Result<(), Error<B::CommError>> {
        let val = bus.read_reg(SYS_CTRL)?;
        bus.write_reg(SYS_CTRL, with_bits(val, SLEEP, !on))
    }
}
