/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Sensor attributes shared with the ISP, and window settings

use crate::RegValue;

/// Media bus pixel codes for the raw formats these parts emit
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MbusCode {
    Sbggr10 = 0x3007,
    Sgrbg10 = 0x300a,
    Sgbrg10 = 0x300e,
    Srggb10 = 0x300f,
    Sbggr12 = 0x3008,
    Sgbrg12 = 0x3010,
    Sgrbg12 = 0x3011,
    Srggb12 = 0x3012,
}

/// A resolution/format/frame-rate bundle and the table that selects it
#[derive(Clone, Copy, Debug)]
pub struct WinSetting {
    pub width: u32,
    pub height: u32,
    /// Frame rate, packed `num << 16 | den`
    pub fps: u32,
    pub mbus_code: MbusCode,
    /// Clock periods per line once the table is applied
    pub hts: u32,
    /// Lines per frame once the table is applied
    pub vts: u32,
    pub regs: &'static [RegValue],
}

/// Mirror and flip as requested by the ISP
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flip {
    /// Horizontal mirror
    pub mirror: bool,
    /// Vertical flip
    pub flip: bool,
}

impl Flip {
    /// Decode the ISP value: bit 0 mirrors, bit 1 flips
    pub fn from_isp(value: u32) -> Self {
        Self {
            mirror: value & 0b01 != 0,
            flip: value & 0b10 != 0,
        }
    }
}

/// Attributes the ISP reads to drive its exposure loop.
/// Integration times are in lines; gains are in the ISP gain domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorAttr {
    pub name: &'static str,
    pub chip_id: u32,
    pub i2c_address: u8,
    pub max_again: u32,
    pub min_again: u32,
    pub max_dgain: u32,
    pub min_integration_time: u32,
    pub max_integration_time: u32,
    pub integration_time_limit: u32,
    pub max_integration_time_native: u32,
    pub total_width: u32,
    pub total_height: u32,
    /// Frames between writing a register and the frame it affects
    pub integration_time_apply_delay: u32,
    pub again_apply_delay: u32,
    pub dgain_apply_delay: u32,
    /// Frame rate, packed `num << 16 | den`
    pub fps: u32,
}

impl SensorAttr {
    /// Record a new frame geometry and derive the exposure limits from it
    pub(crate) fn apply_timing(
        &mut self,
        hts: u32,
        vts: u32,
        fps: u32,
        margin: u32,
    ) {
        let limit = vts.saturating_sub(margin);
        self.fps = fps;
        self.total_width = hts;
        self.total_height = vts;
        self.max_integration_time_native = limit;
        self.integration_time_limit = limit;
        self.max_integration_time = limit;
    }
}

/// Current output of the sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Video {
    /// Index of the selected window setting
    pub win: usize,
    pub width: u32,
    pub height: u32,
    pub mbus_code: MbusCode,
    pub fps: u32,
    pub streaming: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_bits() {
        assert_eq!(Flip::from_isp(0), Flip::default());
        let mirrored = Flip::from_isp(1);
        assert!(mirrored.mirror && !mirrored.flip);
        let flipped = Flip::from_isp(2);
        assert!(!flipped.mirror && flipped.flip);
        // higher bits are ignored
        let both = Flip::from_isp(7);
        assert!(both.mirror && both.flip);
    }
}
