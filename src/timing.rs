/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Frame timing
//!
//! Frame rate is set by stretching the vertical total (VTS, lines per
//! frame) against a fixed pixel clock and the horizontal total (HTS):
//! `fps = sclk / (hts * vts)`.

use crate::Error;

/// Frame rate as a fraction, packed by the ISP as `num << 16 | den`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fps {
    pub num: u16,
    pub den: u16,
}

impl Fps {
    pub const fn new(num: u16, den: u16) -> Self {
        Self { num, den }
    }

    pub const fn from_packed(packed: u32) -> Self {
        Self {
            num: (packed >> 16) as u16,
            den: (packed & 0xffff) as u16,
        }
    }

    pub const fn packed(self) -> u32 {
        (self.num as u32) << 16 | self.den as u32
    }

    /// Frames per second in Q8 fixed point, `None` for a zero denominator
    pub fn q8(self) -> Option<u32> {
        let num = self.num as u32;
        let den = self.den as u32;
        if den == 0 {
            return None;
        }
        Some(((num / den) << 8) + (((num % den) << 8) / den))
    }
}

/// Timing description of a sensor
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    /// Pixel clock driving the line counters, in Hz
    pub sclk: u32,
    /// Register holding the high byte of HTS
    pub hts_hi: u16,
    /// Register holding the low byte of HTS
    pub hts_lo: u16,
    /// Scale from the HTS register value to clock periods per line
    pub hts_mult: u32,
    pub min_fps: u32,
    pub max_fps: u32,
    /// Lines of VTS the exposure may not use
    pub integration_margin: u32,
    /// Largest VTS the frame length registers hold
    pub max_vts: u32,
}

impl Timing {
    /// Reject frame rates outside the sensor's range
    pub fn check<CommE>(&self, fps: Fps) -> Result<(), Error<CommE>> {
        let lo = self.min_fps << 8;
        let hi = self.max_fps << 8;
        match fps.q8() {
            Some(q8) if q8 >= lo && q8 <= hi => Ok(()),
            _ => Err(out_of_range(fps)),
        }
    }

    /// Vertical total that gives `fps` with the given horizontal total
    pub fn vts_for<CommE>(
        &self,
        hts: u32,
        fps: Fps,
    ) -> Result<u32, Error<CommE>> {
        if hts == 0 {
            return Err(Error::InvalidTiming);
        }
        if fps.num == 0 {
            return Err(out_of_range(fps));
        }
        let clocks = self.sclk as u64 * fps.den as u64;
        let vts = clocks / hts as u64 / fps.num as u64;
        if vts == 0
            || vts > self.max_vts as u64
            || vts <= self.integration_margin as u64
        {
            return Err(out_of_range(fps));
        }
        Ok(vts as u32)
    }
}

fn out_of_range<CommE>(fps: Fps) -> Error<CommE> {
    let fps = fps.packed();
    Error::FpsOutOfRange { fps }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::BusFault;

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

    fn check(num: u16, den: u16) -> Result<(), Error<BusFault>> {
        TIMING.check(Fps::new(num, den))
    }

    fn vts(hts: u32, fps: u16) -> Result<u32, Error<BusFault>> {
        TIMING.vts_for(hts, Fps::new(fps, 1))
    }

    #[test]
    fn packing() {
        let fps = Fps::from_packed(25 << 16 | 1);
        assert_eq!(fps, Fps::new(25, 1));
        assert_eq!(fps.packed(), 0x0019_0001);
        let ntsc = Fps::new(30000, 1001);
        assert_eq!(ntsc.q8(), Some((29 << 8) + 248));
        assert_eq!(Fps::new(30, 0).q8(), None);
    }

    #[test]
    fn range_check() {
        assert!(check(30, 1).is_ok());
        assert!(check(5, 1).is_ok());
        assert!(check(15, 2).is_ok());
        let fps = 31 << 16 | 1;
        assert_eq!(check(31, 1), Err(Error::FpsOutOfRange { fps }));
        assert!(check(4, 1).is_err());
        assert!(check(30, 0).is_err());
    }

    #[test]
    fn vts_from_pixel_clock() {
        assert_eq!(vts(2200, 30), Ok(1125));
        assert_eq!(vts(2200, 15), Ok(2250));
        assert_eq!(vts(2200, 25), Ok(1350));
    }

    #[test]
    fn vts_limits() {
        assert_eq!(vts(0, 30), Err(Error::InvalidTiming));
        // too few clocks per line: frame length overflows the registers
        assert!(vts(100, 5).is_err());
        // too many: no room left for exposure
        assert!(vts(74_250_000, 30).is_err());
    }
}
