/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

use crate::again::alloc_optional;
use crate::power::{PWDN_RELEASE, RESET_PULSE};
use crate::timing::Fps;
use crate::{
    regs, Allocation, Error, Flip, PowerPins, RegValue, RegisterBus, Sccb,
    SensorAttr, SensorModel, Video,
};
use core::marker::PhantomData;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write, WriteRead};
use embedded_hal::digital::v2::OutputPin;

/// Main driver struct
pub struct Sensor<M, I2C, D> {
    bus: Sccb<I2C>,
    delay: D,
    attr: SensorAttr,
    video: Option<Video>,
    _model: PhantomData<M>,
}

impl<M, I2C, D, CommE> Sensor<M, I2C, D>
where
    M: SensorModel,
    I2C: Write<Error = CommE> + Read<Error = CommE> + WriteRead<Error = CommE>,
    D: DelayMs<u16>,
{
    /// Create a new instance at the model's default i2c address
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, M::I2C_ADDRESS)
    }

    /// Create a new instance with an i2c address:
    /// some parts strap to an alternate address.
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        let attr = SensorAttr {
            name: M::NAME,
            chip_id: M::CHIP_ID,
            i2c_address: address,
            max_again: M::AGAIN.max_gain(),
            min_again: M::AGAIN.min_gain(),
            max_dgain: M::DGAIN.map_or(0, |lut| lut.max_gain()),
            min_integration_time: M::MIN_INTEGRATION_TIME,
            max_integration_time: 0,
            integration_time_limit: 0,
            max_integration_time_native: 0,
            total_width: 0,
            total_height: 0,
            integration_time_apply_delay: M::INTEGRATION_TIME_APPLY_DELAY,
            again_apply_delay: M::AGAIN_APPLY_DELAY,
            dgain_apply_delay: M::DGAIN_APPLY_DELAY,
            fps: 0,
        };
        let mut sensor = Self {
            bus: Sccb::new(i2c, address, M::ADDR_WIDTH),
            delay,
            attr,
            video: None,
            _model: PhantomData,
        };
        if let Some(win) = M::WIN_SETTINGS.first() {
            sensor.retime(win.hts, win.vts, win.fps);
        }
        sensor
    }

    pub fn attr(&self) -> &SensorAttr {
        &self.attr
    }

    /// Current output, `None` until a window setting is selected
    pub fn video(&self) -> Option<&Video> {
        self.video.as_ref()
    }

    /// 7-bit i2c address the sensor is addressed at
    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    /// Give back the bus and delay provider
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }

    /// Pulse reset and release power-down, whichever lines are wired
    pub fn power_on<RST, PWDN>(
        &mut self,
        pins: &mut PowerPins<RST, PWDN>,
    ) -> Result<(), Error<CommE>>
    where
        RST: OutputPin,
        PWDN: OutputPin,
    {
        if let Some(reset) = pins.reset.as_mut() {
            for step in RESET_PULSE.iter() {
                drive::<_, CommE>(reset, step.high)?;
                self.delay.delay_ms(step.settle_ms);
            }
        }
        let active_high = pins.pwdn_active_high;
        if let Some(pwdn) = pins.pwdn.as_mut() {
            for step in PWDN_RELEASE.iter() {
                drive::<_, CommE>(pwdn, step.high == active_high)?;
                self.delay.delay_ms(step.settle_ms);
            }
        }
        Ok(())
    }

    /// Check that something answers at the sensor's address
    pub fn ping(&mut self) -> Result<(), Error<CommE>> {
        self.bus.ping()
    }

    /// Read a single register
    pub fn read_reg(&mut self, reg: u16) -> Result<u8, Error<CommE>> {
        self.bus.read_reg(reg)
    }

    /// Write a single register
    pub fn write_reg(&mut self, reg: u16, val: u8) -> Result<(), Error<CommE>> {
        self.bus.write_reg(reg, val)
    }

    /// Read the chip id and check it names this part
    pub fn detect(&mut self) -> Result<u32, Error<CommE>> {
        let id = M::read_chip_id(&mut self.bus)?;
        trace!("{} chip id {:#x}", M::NAME, id);
        if id != M::CHIP_ID {
            return Err(Error::UnknownChip { id });
        }
        Ok(id)
    }

    /// Select a window setting and program it
    pub fn init(&mut self, index: usize) -> Result<(), Error<CommE>> {
        let win = M::WIN_SETTINGS
            .get(index)
            .ok_or(Error::<CommE>::InvalidWinSetting { index })?;
        trace!("{} init {}x{}", M::NAME, win.width, win.height);
        regs::write_array(&mut self.bus, &mut self.delay, win.regs)?;

        self.retime(win.hts, win.vts, win.fps);
        self.video = Some(Video {
            win: index,
            width: win.width,
            height: win.height,
            mbus_code: win.mbus_code,
            fps: win.fps,
            streaming: false,
        });
        Ok(())
    }

    /// Switch to another window setting, resuming the stream if it was on
    pub fn set_mode(&mut self, index: usize) -> Result<(), Error<CommE>> {
        if M::WIN_SETTINGS.get(index).is_none() {
            return Err(Error::InvalidWinSetting { index });
        }
        let streaming = self.video.map_or(false, |v| v.streaming);
        if streaming {
            self.set_stream(false)?;
        }
        self.init(index)?;
        if streaming {
            self.set_stream(true)?;
        }
        Ok(())
    }

    /// Set exposure in lines, clamped to the current limits.
    /// Returns the exposure programmed.
    pub fn set_integration_time(
        &mut self,
        it: u32,
    ) -> Result<u32, Error<CommE>> {
        let it = it
            .max(self.attr.min_integration_time)
            .min(self.attr.max_integration_time);
        M::write_integration_time(&mut self.bus, it)?;
        Ok(it)
    }

    /// Program the analog gain step closest to `isp_gain` without exceeding it
    pub fn set_analog_gain(
        &mut self,
        isp_gain: u32,
    ) -> Result<Allocation, Error<CommE>> {
        let alloc = M::AGAIN.alloc(isp_gain);
        M::write_again(&mut self.bus, alloc.code)?;
        Ok(alloc)
    }

    pub fn set_digital_gain(
        &mut self,
        isp_gain: u32,
    ) -> Result<Allocation, Error<CommE>> {
        let alloc = alloc_optional(M::DGAIN.as_ref(), isp_gain);
        if M::DGAIN.is_some() {
            M::write_dgain(&mut self.bus, alloc.code)?;
        }
        Ok(alloc)
    }

    /// Exposure and gain in one go: integration time in the low half,
    /// an analog gain code from a previous allocation in the high half.
    /// A code missing from the gain table is rejected before any write.
    pub fn set_expo(&mut self, packed: u32) -> Result<(), Error<CommE>> {
        let it = packed & 0xffff;
        let code = packed >> 16;
        if !M::AGAIN.contains_code(code) {
            return Err(Error::InvalidTable);
        }
        self.set_integration_time(it)?;
        M::write_again(&mut self.bus, code)
    }

    /// Retime the frame for `fps` (packed `num << 16 | den`).
    ///
    /// The horizontal total is read back from the sensor so that any
    /// mode-specific line length is honored; only the vertical total moves.
    pub fn set_fps(
        &mut self,
        packed: u32,
    ) -> Result<&SensorAttr, Error<CommE>> {
        let fps = Fps::from_packed(packed);
        M::TIMING.check::<CommE>(fps)?;
        let hts = M::read_hts(&mut self.bus)?;
        let vts = M::TIMING.vts_for::<CommE>(hts, fps)?;
        M::write_vts(&mut self.bus, vts)?;
        trace!(
            "{} fps {}/{} hts {} vts {}",
            M::NAME,
            fps.num,
            fps.den,
            hts,
            vts
        );

        self.retime(hts, vts, packed);
        if let Some(video) = self.video.as_mut() {
            video.fps = packed;
        }
        Ok(&self.attr)
    }

    pub fn set_stream(&mut self, on: bool) -> Result<(), Error<CommE>> {
        let video = match self.video.as_mut() {
            Some(video) => video,
            None => return Err(Error::NotInitialized),
        };
        M::write_stream(&mut self.bus, &mut self.delay, on)?;
        video.streaming = on;
        trace!("{} stream {}", M::NAME, on);
        Ok(())
    }

    pub fn set_hvflip(&mut self, flip: Flip) -> Result<(), Error<CommE>> {
        M::write_flip(&mut self.bus, flip)
    }

    /// Read back the registers named in `table`, e.g. to verify a mode
    pub fn dump(
        &mut self,
        table: &[RegValue],
        out: &mut [u8],
    ) -> Result<usize, Error<CommE>> {
        regs::read_array(&mut self.bus, &mut self.delay, table, out)
    }

    fn retime(&mut self, hts: u32, vts: u32, fps: u32) {
        let margin = M::TIMING.integration_margin;
        self.attr.apply_timing(hts, vts, fps, margin);
    }
}

fn drive<P: OutputPin, CommE>(
    pin: &mut P,
    high: bool,
) -> Result<(), Error<CommE>> {
    let res = if high {
        pin.set_high()
    } else {
        pin.set_low()
    };
    res.map_err(|_| Error::Pin)
}
