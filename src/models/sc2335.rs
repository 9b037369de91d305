/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! SmartSens SC2335, 1920x1080 raw10 over MIPI, 16-bit register addresses.
//! Exposure is programmed in half lines.

use crate::again::{AgainEntry, GainLut};
use crate::model::with_bits;
use crate::regs::rv;
use crate::{
    AddrWidth, Error, Flip, MbusCode, RegValue, RegisterBus, SensorModel,
    Timing, WinSetting,
};

const EXPOSURE_H: u16 = 0x3e00;
const EXPOSURE_M: u16 = 0x3e01;
const EXPOSURE_L: u16 = 0x3e02;
const DGAIN_COARSE: u16 = 0x3e06;
const DGAIN_FINE: u16 = 0x3e07;
const AGAIN_COARSE: u16 = 0x3e08;
const AGAIN_FINE: u16 = 0x3e09;
const VTS_HI: u16 = 0x320e;
const VTS_LO: u16 = 0x320f;
const MIRROR_FLIP: u16 = 0x3221;
const STREAM: u16 = 0x0100;

/// Code is `coarse << 8 | fine`: coarse doubles (0x03, 0x07, 0x0f, 0x1f),
/// fine runs 0x20..=0x3f in 1/32 steps
#[rustfmt::skip]
const AGAIN_LUT: [AgainEntry; 128] = [
    AgainEntry::new(0x0320, 0),
    AgainEntry::new(0x0321, 2909),
    AgainEntry::new(0x0322, 5732),
    AgainEntry::new(0x0323, 8473),
    AgainEntry::new(0x0324, 11136),
    AgainEntry::new(0x0325, 13727),
    AgainEntry::new(0x0326, 16248),
    AgainEntry::new(0x0327, 18704),
    AgainEntry::new(0x0328, 21098),
    AgainEntry::new(0x0329, 23433),
    AgainEntry::new(0x032a, 25711),
    AgainEntry::new(0x032b, 27936),
    AgainEntry::new(0x032c, 30109),
    AgainEntry::new(0x032d, 32234),
    AgainEntry::new(0x032e, 34312),
    AgainEntry::new(0x032f, 36346),
    AgainEntry::new(0x0330, 38336),
    AgainEntry::new(0x0331, 40286),
    AgainEntry::new(0x0332, 42196),
    AgainEntry::new(0x0333, 44068),
    AgainEntry::new(0x0334, 45904),
    AgainEntry::new(0x0335, 47705),
    AgainEntry::new(0x0336, 49472),
    AgainEntry::new(0x0337, 51207),
    AgainEntry::new(0x0338, 52911),
    AgainEntry::new(0x0339, 54584),
    AgainEntry::new(0x033a, 56229),
    AgainEntry::new(0x033b, 57845),
    AgainEntry::new(0x033c, 59434),
    AgainEntry::new(0x033d, 60997),
    AgainEntry::new(0x033e, 62534),
    AgainEntry::new(0x033f, 64047),
    AgainEntry::new(0x0720, 65536),
    AgainEntry::new(0x0721, 68445),
    AgainEntry::new(0x0722, 71268),
    AgainEntry::new(0x0723, 74009),
    AgainEntry::new(0x0724, 76672),
    AgainEntry::new(0x0725, 79263),
    AgainEntry::new(0x0726, 81784),
    AgainEntry::new(0x0727, 84240),
    AgainEntry::new(0x0728, 86634),
    AgainEntry::new(0x0729, 88969),
    AgainEntry::new(0x072a, 91247),
    AgainEntry::new(0x072b, 93472),
    AgainEntry::new(0x072c, 95645),
    AgainEntry::new(0x072d, 97770),
    AgainEntry::new(0x072e, 99848),
    AgainEntry::new(0x072f, 101882),
    AgainEntry::new(0x0730, 103872),
    AgainEntry::new(0x0731, 105822),
    AgainEntry::new(0x0732, 107732),
    AgainEntry::new(0x0733, 109604),
    AgainEntry::new(0x0734, 111440),
    AgainEntry::new(0x0735, 113241),
    AgainEntry::new(0x0736, 115008),
    AgainEntry::new(0x0737, 116743),
    AgainEntry::new(0x0738, 118447),
    AgainEntry::new(0x0739, 120120),
    AgainEntry::new(0x073a, 121765),
    AgainEntry::new(0x073b, 123381),
    AgainEntry::new(0x073c, 124970),
    AgainEntry::new(0x073d, 126533),
    AgainEntry::new(0x073e, 128070),
    AgainEntry::new(0x073f, 129583),
    AgainEntry::new(0x0f20, 131072),
    AgainEntry::new(0x0f21, 133981),
    AgainEntry::new(0x0f22, 136804),
    AgainEntry::new(0x0f23, 139545),
    AgainEntry::new(0x0f24, 142208),
    AgainEntry::new(0x0f25, 144799),
    AgainEntry::new(0x0f26, 147320),
    AgainEntry::new(0x0f27, 149776),
    AgainEntry::new(0x0f28, 152170),
    AgainEntry::new(0x0f29, 154505),
    AgainEntry::new(0x0f2a, 156783),
    AgainEntry::new(0x0f2b, 159008),
    AgainEntry::new(0x0f2c, 161181),
    AgainEntry::new(0x0f2d, 163306),
    AgainEntry::new(0x0f2e, 165384),
    AgainEntry::new(0x0f2f, 167418),
    AgainEntry::new(0x0f30, 169408),
    AgainEntry::new(0x0f31, 171358),
    AgainEntry::new(0x0f32, 173268),
    AgainEntry::new(0x0f33, 175140),
    AgainEntry::new(0x0f34, 176976),
    AgainEntry::new(0x0f35, 178777),
    AgainEntry::new(0x0f36, 180544),
    AgainEntry::new(0x0f37, 182279),
    AgainEntry::new(0x0f38, 183983),
    AgainEntry::new(0x0f39, 185656),
    AgainEntry::new(0x0f3a, 187301),
    AgainEntry::new(0x0f3b, 188917),
    AgainEntry::new(0x0f3c, 190506),
    AgainEntry::new(0x0f3d, 192069),
    AgainEntry::new(0x0f3e, 193606),
    AgainEntry::new(0x0f3f, 195119),
    AgainEntry::new(0x1f20, 196608),
    AgainEntry::new(0x1f21, 199517),
    AgainEntry::new(0x1f22, 202340),
    AgainEntry::new(0x1f23, 205081),
    AgainEntry::new(0x1f24, 207744),
    AgainEntry::new(0x1f25, 210335),
    AgainEntry::new(0x1f26, 212856),
    AgainEntry::new(0x1f27, 215312),
    AgainEntry::new(0x1f28, 217706),
    AgainEntry::new(0x1f29, 220041),
    AgainEntry::new(0x1f2a, 222319),
    AgainEntry::new(0x1f2b, 224544),
    AgainEntry::new(0x1f2c, 226717),
    AgainEntry::new(0x1f2d, 228842),
    AgainEntry::new(0x1f2e, 230920),
    AgainEntry::new(0x1f2f, 232954),
    AgainEntry::new(0x1f30, 234944),
    AgainEntry::new(0x1f31, 236894),
    AgainEntry::new(0x1f32, 238804),
    AgainEntry::new(0x1f33, 240676),
    AgainEntry::new(0x1f34, 242512),
    AgainEntry::new(0x1f35, 244313),
    AgainEntry::new(0x1f36, 246080),
    AgainEntry::new(0x1f37, 247815),
    AgainEntry::new(0x1f38, 249519),
    AgainEntry::new(0x1f39, 251192),
    AgainEntry::new(0x1f3a, 252837),
    AgainEntry::new(0x1f3b, 254453),
    AgainEntry::new(0x1f3c, 256042),
    AgainEntry::new(0x1f3d, 257605),
    AgainEntry::new(0x1f3e, 259142),
    AgainEntry::new(0x1f3f, 260655),
];

/// Code is `coarse << 8 | fine`: coarse doubles (0x00, 0x01, 0x03, 0x07),
/// fine runs 0x80..=0xf8 in 1/16 steps
#[rustfmt::skip]
const DGAIN_LUT: [AgainEntry; 64] = [
    AgainEntry::new(0x0080, 0),
    AgainEntry::new(0x0088, 5732),
    AgainEntry::new(0x0090, 11136),
    AgainEntry::new(0x0098, 16248),
    AgainEntry::new(0x00a0, 21098),
    AgainEntry::new(0x00a8, 25711),
    AgainEntry::new(0x00b0, 30109),
    AgainEntry::new(0x00b8, 34312),
    AgainEntry::new(0x00c0, 38336),
    AgainEntry::new(0x00c8, 42196),
    AgainEntry::new(0x00d0, 45904),
    AgainEntry::new(0x00d8, 49472),
    AgainEntry::new(0x00e0, 52911),
    AgainEntry::new(0x00e8, 56229),
    AgainEntry::new(0x00f0, 59434),
    AgainEntry::new(0x00f8, 62534),
    AgainEntry::new(0x0180, 65536),
    AgainEntry::new(0x0188, 71268),
    AgainEntry::new(0x0190, 76672),
    AgainEntry::new(0x0198, 81784),
    AgainEntry::new(0x01a0, 86634),
    AgainEntry::new(0x01a8, 91247),
    AgainEntry::new(0x01b0, 95645),
    AgainEntry::new(0x01b8, 99848),
    AgainEntry::new(0x01c0, 103872),
    AgainEntry::new(0x01c8, 107732),
    AgainEntry::new(0x01d0, 111440),
    AgainEntry::new(0x01d8, 115008),
    AgainEntry::new(0x01e0, 118447),
    AgainEntry::new(0x01e8, 121765),
    AgainEntry::new(0x01f0, 124970),
    AgainEntry::new(0x01f8, 128070),
    AgainEntry::new(0x0380, 131072),
    AgainEntry::new(0x0388, 136804),
    AgainEntry::new(0x0390, 142208),
    AgainEntry::new(0x0398, 147320),
    AgainEntry::new(0x03a0, 152170),
    AgainEntry::new(0x03a8, 156783),
    AgainEntry::new(0x03b0, 161181),
    AgainEntry::new(0x03b8, 165384),
    AgainEntry::new(0x03c0, 169408),
    AgainEntry::new(0x03c8, 173268),
    AgainEntry::new(0x03d0, 176976),
    AgainEntry::new(0x03d8, 180544),
    AgainEntry::new(0x03e0, 183983),
    AgainEntry::new(0x03e8, 187301),
    AgainEntry::new(0x03f0, 190506),
    AgainEntry::new(0x03f8, 193606),
    AgainEntry::new(0x0780, 196608),
    AgainEntry::new(0x0788, 202340),
    AgainEntry::new(0x0790, 207744),
    AgainEntry::new(0x0798, 212856),
    AgainEntry::new(0x07a0, 217706),
    AgainEntry::new(0x07a8, 222319),
    AgainEntry::new(0x07b0, 226717),
    AgainEntry::new(0x07b8, 230920),
    AgainEntry::new(0x07c0, 234944),
    AgainEntry::new(0x07c8, 238804),
    AgainEntry::new(0x07d0, 242512),
    AgainEntry::new(0x07d8, 246080),
    AgainEntry::new(0x07e0, 249519),
    AgainEntry::new(0x07e8, 252837),
    AgainEntry::new(0x07f0, 256042),
    AgainEntry::new(0x07f8, 259142),
];

#[rustfmt::skip]
const INIT_1080P_30: [RegValue; 24] = [
    rv(0x0103, 0x01),
    RegValue::delay(10),
    rv(0x0100, 0x00), rv(0x36e9, 0x80), rv(0x36f9, 0x80),
    rv(0x301f, 0x02), rv(0x3207, 0x3f), rv(0x3249, 0x0f),
    rv(0x320c, 0x04), rv(0x320d, 0x4c),
    rv(0x320e, 0x04), rv(0x320f, 0x65),
    rv(0x3301, 0x07), rv(0x3304, 0x50), rv(0x3306, 0x70),
    rv(0x3e01, 0x8c), rv(0x3e02, 0x20),
    rv(0x3e08, 0x03), rv(0x3e09, 0x20),
    rv(0x36e9, 0x20), rv(0x36f9, 0x27),
    rv(0x3221, 0x00), rv(0x3e06, 0x00),
    RegValue::END,
];

#[rustfmt::skip]
const INIT_1080P_25: [RegValue; 24] = [
    rv(0x0103, 0x01),
    RegValue::delay(10),
    rv(0x0100, 0x00), rv(0x36e9, 0x80), rv(0x36f9, 0x80),
    rv(0x301f, 0x03), rv(0x3207, 0x3f), rv(0x3249, 0x0f),
    rv(0x320c, 0x05), rv(0x320d, 0x28),
    rv(0x320e, 0x04), rv(0x320f, 0x65),
    rv(0x3301, 0x07), rv(0x3304, 0x50), rv(0x3306, 0x70),
    rv(0x3e01, 0x8c), rv(0x3e02, 0x20),
    rv(0x3e08, 0x03), rv(0x3e09, 0x20),
    rv(0x36e9, 0x20), rv(0x36f9, 0x27),
    rv(0x3221, 0x00), rv(0x3e06, 0x00),
    RegValue::END,
];

const WIN_SETTINGS: [WinSetting; 2] = [
    WinSetting {
        width: 1920,
        height: 1080,
        fps: 30 << 16 | 1,
        mbus_code: MbusCode::Sbggr10,
        hts: 2200,
        vts: 1125,
        regs: &INIT_1080P_30,
    },
    WinSetting {
        width: 1920,
        height: 1080,
        fps: 25 << 16 | 1,
        mbus_code: MbusCode::Sbggr10,
        hts: 2640,
        vts: 1125,
        regs: &INIT_1080P_25,
    },
];

const STREAM_ON: [RegValue; 1] = [rv(STREAM, 0x01)];
const STREAM_OFF: [RegValue; 1] = [rv(STREAM, 0x00)];

pub struct Sc2335;

impl SensorModel for Sc2335 {
    const NAME: &'static str = "sc2335";
    const I2C_ADDRESS: u8 = 0x30;
    const ADDR_WIDTH: AddrWidth = AddrWidth::Sixteen;

    const CHIP_ID_REGS: &'static [u16] = &[0x3107, 0x3108];
    const CHIP_ID: u32 = 0xcb14;

    const AGAIN: GainLut<'static> = GainLut::checked(&AGAIN_LUT, 259142);
    const DGAIN: Option<GainLut<'static>> =
        Some(GainLut::checked(&DGAIN_LUT, 259142));

    const TIMING: Timing = Timing {
        sclk: 74_250_000,
        hts_hi: 0x320c,
        hts_lo: 0x320d,
        hts_mult: 2,
        min_fps: 5,
        max_fps: 30,
        integration_margin: 4,
        max_vts: 0x7fff,
    };
    const MIN_INTEGRATION_TIME: u32 = 2;

    const WIN_SETTINGS: &'static [WinSetting] = &WIN_SETTINGS;
    const STREAM_ON: &'static [RegValue] = &STREAM_ON;
    const STREAM_OFF: &'static [RegValue] = &STREAM_OFF;

    fn write_integration_time<B: RegisterBus>(
        bus: &mut B,
        it: u32,
    ) -> Result<(), Error<B::CommError>> {
        let half_lines = it * 2;
        bus.write_reg(EXPOSURE_H, ((half_lines >> 12) & 0x0f) as u8)?;
        bus.write_reg(EXPOSURE_M, ((half_lines >> 4) & 0xff) as u8)?;
        bus.write_reg(EXPOSURE_L, ((half_lines & 0x0f) << 4) as u8)
    }

    fn write_again<B: RegisterBus>(
        bus: &mut B,
        code: u32,
    ) -> Result<(), Error<B::CommError>> {
        bus.write_reg_u16(AGAIN_COARSE, AGAIN_FINE, code as u16)
    }

    fn write_dgain<B: RegisterBus>(
        bus: &mut B,
        code: u32,
    ) -> Result<(), Error<B::CommError>> {
        bus.write_reg_u16(DGAIN_COARSE, DGAIN_FINE, code as u16)
    }

    fn write_vts<B: RegisterBus>(
        bus: &mut B,
        vts: u32,
    ) -> Result<(), Error<B::CommError>> {
        bus.write_reg_u16(VTS_HI, VTS_LO, vts as u16)
    }

    fn write_flip<B: RegisterBus>(
        bus: &mut B,
        flip: Flip,
    ) -> Result<(), Error<B::CommError>> {
        let val = bus.read_reg(MIRROR_FLIP)?;
        let val = with_bits(val, 0x06, flip.mirror);
        let val = with_bits(val, 0x60, flip.flip);
        bus.write_reg(MIRROR_FLIP, val)
    }
}
