/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! OmniVision OV2735B, 1920x1080 raw10 over MIPI.
//! Registers are banked: 0xfd selects the page, and writes to page 1
//! only take effect after a frame sync trigger (0x01 = 0x01).

use crate::again::{AgainEntry, GainLut};
use crate::model::with_bits;
use crate::regs::rv;
use crate::{
    AddrWidth, Error, Flip, MbusCode, RegValue, RegisterBus, SensorModel,
    Timing, WinSetting,
};

const PAGE_SELECT: u16 = 0xfd;
const FRAME_SYNC: u16 = 0x01;
const EXPOSURE_HI: u16 = 0x03;
const EXPOSURE_LO: u16 = 0x04;
const VTS_ENABLE: u16 = 0x0d;
const VTS_HI: u16 = 0x0e;
const VTS_LO: u16 = 0x0f;
const ANALOG_GAIN: u16 = 0x24;
const MIRROR_FLIP: u16 = 0x3f;
const MIPI_ENABLE: u16 = 0xa0;

/// Gain is linear in 1/16 steps: 0x10 is 1x, 0xf8 is 15.5x
#[rustfmt::skip]
const AGAIN_LUT: [AgainEntry; 233] = [
    AgainEntry::new(0x10, 0),
    AgainEntry::new(0x11, 5732),
    AgainEntry::new(0x12, 11136),
    AgainEntry::new(0x13, 16248),
    AgainEntry::new(0x14, 21098),
    AgainEntry::new(0x15, 25711),
    AgainEntry::new(0x16, 30109),
    AgainEntry::new(0x17, 34312),
    AgainEntry::new(0x18, 38336),
    AgainEntry::new(0x19, 42196),
    AgainEntry::new(0x1a, 45904),
    AgainEntry::new(0x1b, 49472),
    AgainEntry::new(0x1c, 52911),
    AgainEntry::new(0x1d, 56229),
    AgainEntry::new(0x1e, 59434),
    AgainEntry::new(0x1f, 62534),
    AgainEntry::new(0x20, 65536),
    AgainEntry::new(0x21, 68445),
    AgainEntry::new(0x22, 71268),
    AgainEntry::new(0x23, 74009),
    AgainEntry::new(0x24, 76672),
    AgainEntry::new(0x25, 79263),
    AgainEntry::new(0x26, 81784),
    AgainEntry::new(0x27, 84240),
    AgainEntry::new(0x28, 86634),
    AgainEntry::new(0x29, 88969),
    AgainEntry::new(0x2a, 91247),
    AgainEntry::new(0x2b, 93472),
    AgainEntry::new(0x2c, 95645),
    AgainEntry::new(0x2d, 97770),
    AgainEntry::new(0x2e, 99848),
    AgainEntry::new(0x2f, 101882),
    AgainEntry::new(0x30, 103872),
    AgainEntry::new(0x31, 105822),
    AgainEntry::new(0x32, 107732),
    AgainEntry::new(0x33, 109604),
    AgainEntry::new(0x34, 111440),
    AgainEntry::new(0x35, 113241),
    AgainEntry::new(0x36, 115008),
    AgainEntry::new(0x37, 116743),
    AgainEntry::new(0x38, 118447),
    AgainEntry::new(0x39, 120120),
    AgainEntry::new(0x3a, 121765),
    AgainEntry::new(0x3b, 123381),
    AgainEntry::new(0x3c, 124970),
    AgainEntry::new(0x3d, 126533),
    AgainEntry::new(0x3e, 128070),
    AgainEntry::new(0x3f, 129583),
    AgainEntry::new(0x40, 131072),
    AgainEntry::new(0x41, 132538),
    AgainEntry::new(0x42, 133981),
    AgainEntry::new(0x43, 135403),
    AgainEntry::new(0x44, 136804),
    AgainEntry::new(0x45, 138184),
    AgainEntry::new(0x46, 139545),
    AgainEntry::new(0x47, 140886),
    AgainEntry::new(0x48, 142208),
    AgainEntry::new(0x49, 143512),
    AgainEntry::new(0x4a, 144799),
    AgainEntry::new(0x4b, 146068),
    AgainEntry::new(0x4c, 147320),
    AgainEntry::new(0x4d, 148556),
    AgainEntry::new(0x4e, 149776),
    AgainEntry::new(0x4f, 150981),
    AgainEntry::new(0x50, 152170),
    AgainEntry::new(0x51, 153344),
    AgainEntry::new(0x52, 154505),
    AgainEntry::new(0x53, 155651),
    AgainEntry::new(0x54, 156783),
    AgainEntry::new(0x55, 157902),
    AgainEntry::new(0x56, 159008),
    AgainEntry::new(0x57, 160101),
    AgainEntry::new(0x58, 161181),
    AgainEntry::new(0x59, 162250),
    AgainEntry::new(0x5a, 163306),
    AgainEntry::new(0x5b, 164351),
    AgainEntry::new(0x5c, 165384),
    AgainEntry::new(0x5d, 166406),
    AgainEntry::new(0x5e, 167418),
    AgainEntry::new(0x5f, 168418),
    AgainEntry::new(0x60, 169408),
    AgainEntry::new(0x61, 170388),
    AgainEntry::new(0x62, 171358),
    AgainEntry::new(0x63, 172318),
    AgainEntry::new(0x64, 173268),
    AgainEntry::new(0x65, 174209),
    AgainEntry::new(0x66, 175140),
    AgainEntry::new(0x67, 176062),
    AgainEntry::new(0x68, 176976),
    AgainEntry::new(0x69, 177881),
    AgainEntry::new(0x6a, 178777),
    AgainEntry::new(0x6b, 179665),
    AgainEntry::new(0x6c, 180544),
    AgainEntry::new(0x6d, 181416),
    AgainEntry::new(0x6e, 182279),
    AgainEntry::new(0x6f, 183135),
    AgainEntry::new(0x70, 183983),
    AgainEntry::new(0x71, 184823),
    AgainEntry::new(0x72, 185656),
    AgainEntry::new(0x73, 186482),
    AgainEntry::new(0x74, 187301),
    AgainEntry::new(0x75, 188112),
    AgainEntry::new(0x76, 188917),
    AgainEntry::new(0x77, 189715),
    AgainEntry::new(0x78, 190506),
    AgainEntry::new(0x79, 191291),
    AgainEntry::new(0x7a, 192069),
    AgainEntry::new(0x7b, 192841),
    AgainEntry::new(0x7c, 193606),
    AgainEntry::new(0x7d, 194366),
    AgainEntry::new(0x7e, 195119),
    AgainEntry::new(0x7f, 195866),
    AgainEntry::new(0x80, 196608),
    AgainEntry::new(0x81, 197344),
    AgainEntry::new(0x82, 198074),
    AgainEntry::new(0x83, 198798),
    AgainEntry::new(0x84, 199517),
    AgainEntry::new(0x85, 200231),
    AgainEntry::new(0x86, 200939),
    AgainEntry::new(0x87, 201642),
    AgainEntry::new(0x88, 202340),
    AgainEntry::new(0x89, 203033),
    AgainEntry::new(0x8a, 203720),
    AgainEntry::new(0x8b, 204403),
    AgainEntry::new(0x8c, 205081),
    AgainEntry::new(0x8d, 205754),
    AgainEntry::new(0x8e, 206422),
    AgainEntry::new(0x8f, 207085),
    AgainEntry::new(0x90, 207744),
    AgainEntry::new(0x91, 208399),
    AgainEntry::new(0x92, 209048),
    AgainEntry::new(0x93, 209694),
    AgainEntry::new(0x94, 210335),
    AgainEntry::new(0x95, 210971),
    AgainEntry::new(0x96, 211604),
    AgainEntry::new(0x97, 212232),
    AgainEntry::new(0x98, 212856),
    AgainEntry::new(0x99, 213476),
    AgainEntry::new(0x9a, 214092),
    AgainEntry::new(0x9b, 214704),
    AgainEntry::new(0x9c, 215312),
    AgainEntry::new(0x9d, 215916),
    AgainEntry::new(0x9e, 216517),
    AgainEntry::new(0x9f, 217113),
    AgainEntry::new(0xa0, 217706),
    AgainEntry::new(0xa1, 218295),
    AgainEntry::new(0xa2, 218880),
    AgainEntry::new(0xa3, 219462),
    AgainEntry::new(0xa4, 220041),
    AgainEntry::new(0xa5, 220615),
    AgainEntry::new(0xa6, 221187),
    AgainEntry::new(0xa7, 221754),
    AgainEntry::new(0xa8, 222319),
    AgainEntry::new(0xa9, 222880),
    AgainEntry::new(0xaa, 223438),
    AgainEntry::new(0xab, 223992),
    AgainEntry::new(0xac, 224544),
    AgainEntry::new(0xad, 225092),
    AgainEntry::new(0xae, 225637),
    AgainEntry::new(0xaf, 226179),
    AgainEntry::new(0xb0, 226717),
    AgainEntry::new(0xb1, 227253),
    AgainEntry::new(0xb2, 227786),
    AgainEntry::new(0xb3, 228315),
    AgainEntry::new(0xb4, 228842),
    AgainEntry::new(0xb5, 229366),
    AgainEntry::new(0xb6, 229887),
    AgainEntry::new(0xb7, 230405),
    AgainEntry::new(0xb8, 230920),
    AgainEntry::new(0xb9, 231433),
    AgainEntry::new(0xba, 231942),
    AgainEntry::new(0xbb, 232449),
    AgainEntry::new(0xbc, 232954),
    AgainEntry::new(0xbd, 233455),
    AgainEntry::new(0xbe, 233954),
    AgainEntry::new(0xbf, 234450),
    AgainEntry::new(0xc0, 234944),
    AgainEntry::new(0xc1, 235435),
    AgainEntry::new(0xc2, 235924),
    AgainEntry::new(0xc3, 236410),
    AgainEntry::new(0xc4, 236894),
    AgainEntry::new(0xc5, 237375),
    AgainEntry::new(0xc6, 237854),
    AgainEntry::new(0xc7, 238330),
    AgainEntry::new(0xc8, 238804),
    AgainEntry::new(0xc9, 239275),
    AgainEntry::new(0xca, 239745),
    AgainEntry::new(0xcb, 240211),
    AgainEntry::new(0xcc, 240676),
    AgainEntry::new(0xcd, 241138),
    AgainEntry::new(0xce, 241598),
    AgainEntry::new(0xcf, 242056),
    AgainEntry::new(0xd0, 242512),
    AgainEntry::new(0xd1, 242965),
    AgainEntry::new(0xd2, 243417),
    AgainEntry::new(0xd3, 243866),
    AgainEntry::new(0xd4, 244313),
    AgainEntry::new(0xd5, 244758),
    AgainEntry::new(0xd6, 245201),
    AgainEntry::new(0xd7, 245642),
    AgainEntry::new(0xd8, 246080),
    AgainEntry::new(0xd9, 246517),
    AgainEntry::new(0xda, 246952),
    AgainEntry::new(0xdb, 247384),
    AgainEntry::new(0xdc, 247815),
    AgainEntry::new(0xdd, 248244),
    AgainEntry::new(0xde, 248671),
    AgainEntry::new(0xdf, 249096),
    AgainEntry::new(0xe0, 249519),
    AgainEntry::new(0xe1, 249940),
    AgainEntry::new(0xe2, 250359),
    AgainEntry::new(0xe3, 250777),
    AgainEntry::new(0xe4, 251192),
    AgainEntry::new(0xe5, 251606),
    AgainEntry::new(0xe6, 252018),
    AgainEntry::new(0xe7, 252428),
    AgainEntry::new(0xe8, 252837),
    AgainEntry::new(0xe9, 253243),
    AgainEntry::new(0xea, 253648),
    AgainEntry::new(0xeb, 254051),
    AgainEntry::new(0xec, 254453),
    AgainEntry::new(0xed, 254853),
    AgainEntry::new(0xee, 255251),
    AgainEntry::new(0xef, 255647),
    AgainEntry::new(0xf0, 256042),
    AgainEntry::new(0xf1, 256435),
    AgainEntry::new(0xf2, 256827),
    AgainEntry::new(0xf3, 257217),
    AgainEntry::new(0xf4, 257605),
    AgainEntry::new(0xf5, 257992),
    AgainEntry::new(0xf6, 258377),
    AgainEntry::new(0xf7, 258760),
    AgainEntry::new(0xf8, 259142),
];

#[rustfmt::skip]
const INIT_1080P_30: [RegValue; 36] = [
    rv(0xfd, 0x00), rv(0x20, 0x00),
    RegValue::delay(5),
    rv(0xfd, 0x00), rv(0x2f, 0x10), rv(0x34, 0x00), rv(0x30, 0x15),
    rv(0x33, 0x01), rv(0x35, 0x20),
    rv(0xfd, 0x01), rv(0x0d, 0x10), rv(0x30, 0x00),
    rv(0x03, 0x01), rv(0x04, 0x8f), rv(0x01, 0x01),
    rv(0x09, 0x00), rv(0x0a, 0x20), rv(0x06, 0x0a), rv(0x24, 0x10),
    rv(0x01, 0x01), rv(0xfb, 0x73), rv(0x01, 0x01),
    rv(0xfd, 0x01), rv(0x8c, 0x04), rv(0x8d, 0x60),
    rv(0x0e, 0x04), rv(0x0f, 0xe2), rv(0x01, 0x01),
    rv(0xfd, 0x02), rv(0x36, 0x08), rv(0x37, 0x07),
    rv(0xfd, 0x01), rv(0xa0, 0x00), rv(0x01, 0x01),
    rv(0xfd, 0x00),
    RegValue::END,
];

const WIN_SETTINGS: [WinSetting; 1] = [WinSetting {
    width: 1920,
    height: 1080,
    fps: 30 << 16 | 1,
    mbus_code: MbusCode::Sbggr10,
    hts: 2240,
    vts: 1250,
    regs: &INIT_1080P_30,
}];

const STREAM_ON: [RegValue; 2] =
    [rv(PAGE_SELECT, 0x01), rv(MIPI_ENABLE, 0x01)];
const STREAM_OFF: [RegValue; 2] =
    [rv(PAGE_SELECT, 0x01), rv(MIPI_ENABLE, 0x00)];

pub struct Ov2735b;

impl Ov2735b {
    fn page<B: RegisterBus>(
        bus: &mut B,
        page: u8,
    ) -> Result<(), Error<B::CommError>> {
        bus.write_reg(PAGE_SELECT, page)
    }

    fn sync<B: RegisterBus>(bus: &mut B) -> Result<(), Error<B::CommError>> {
        bus.write_reg(FRAME_SYNC, 0x01)
    }
}

impl SensorModel for Ov2735b {
    const NAME: &'static str = "ov2735b";
    const I2C_ADDRESS: u8 = 0x3c;
    const ADDR_WIDTH: AddrWidth = AddrWidth::Eight;

    const CHIP_ID_REGS: &'static [u16] = &[0x02, 0x03];
    const CHIP_ID: u32 = 0x2735;

    const AGAIN: GainLut<'static> = GainLut::checked(&AGAIN_LUT, 259142);

    const TIMING: Timing = Timing {
        sclk: 84_000_000,
        hts_hi: 0x8c,
        hts_lo: 0x8d,
        hts_mult: 2,
        min_fps: 5,
        max_fps: 30,
        integration_margin: 4,
        max_vts: 0xffff,
    };
    const MIN_INTEGRATION_TIME: u32 = 2;

    const WIN_SETTINGS: &'static [WinSetting] = &WIN_SETTINGS;
    const STREAM_ON: &'static [RegValue] = &STREAM_ON;
    const STREAM_OFF: &'static [RegValue] = &STREAM_OFF;

    fn read_chip_id<B: RegisterBus>(
        bus: &mut B,
    ) -> Result<u32, Error<B::CommError>> {
        Self::page(bus, 0x00)?;
        let mut id = 0u32;
        for &reg in Self::CHIP_ID_REGS {
            id = (id << 8) | bus.read_reg(reg)? as u32;
        }
        Ok(id)
    }

    fn write_integration_time<B: RegisterBus>(
        bus: &mut B,
        it: u32,
    ) -> Result<(), Error<B::CommError>> {
        Self::page(bus, 0x01)?;
        bus.write_reg_u16(EXPOSURE_HI, EXPOSURE_LO, it as u16)?;
        Self::sync(bus)
    }

    fn write_again<B: RegisterBus>(
        bus: &mut B,
        code: u32,
    ) -> Result<(), Error<B::CommError>> {
        Self::page(bus, 0x01)?;
        bus.write_reg(ANALOG_GAIN, code as u8)?;
        Self::sync(bus)
    }

    fn read_hts<B: RegisterBus>(
        bus: &mut B,
    ) -> Result<u32, Error<B::CommError>> {
        Self::page(bus, 0x01)?;
        let timing = Self::TIMING;
        let hts = bus.read_reg_u16(timing.hts_hi, timing.hts_lo)?;
        Ok(hts as u32 * timing.hts_mult)
    }

    fn write_vts<B: RegisterBus>(
        bus: &mut B,
        vts: u32,
    ) -> Result<(), Error<B::CommError>> {
        Self::page(bus, 0x01)?;
        bus.write_reg(VTS_ENABLE, 0x10)?;
        bus.write_reg_u16(VTS_HI, VTS_LO, vts as u16)?;
        Self::sync(bus)
    }

    fn write_flip<B: RegisterBus>(
        bus: &mut B,
        flip: Flip,
    ) -> Result<(), Error<B::CommError>> {
        Self::page(bus, 0x01)?;
        let val = bus.read_reg(MIRROR_FLIP)?;
        let val = with_bits(val, 0x01, flip.mirror);
        let val = with_bits(val, 0x02, flip.flip);
        bus.write_reg(MIRROR_FLIP, val)?;
        Self::sync(bus)
    }
}
