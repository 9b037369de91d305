/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Event surface the ISP core drives the sensor through

use crate::{Allocation, Error, Flip, Sensor, SensorAttr, SensorModel};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write, WriteRead};

/// Requests from the ISP core
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorEvent {
    /// Integration time (low 16 bits) and analog gain code (high 16 bits)
    Expo(u32),
    IntegrationTime(u32),
    /// Analog gain in the ISP gain domain
    AnalogGain(u32),
    /// Digital gain in the ISP gain domain
    DigitalGain(u32),
    /// Frame rate, packed `num << 16 | den`
    Fps(u32),
    StreamOn,
    StreamOff,
    /// Mirror in bit 0, flip in bit 1
    HvFlip(u32),
    /// Switch to the window setting at this index
    Resize(usize),
}

/// What an event did, for the ISP to feed back into its state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventReply {
    Done,
    /// Exposure actually programmed, in lines
    IntegrationTime(u32),
    Gain(Allocation),
}

/// Upstream ISP hooks
pub trait IspNotify {
    /// The sensor's timing changed: integration limits must be reloaded
    fn sync_sensor_attr(&mut self, attr: &SensorAttr);
}

/// For callers with nothing to resync
impl IspNotify for () {
    fn sync_sensor_attr(&mut self, _attr: &SensorAttr) {}
}

impl<M, I2C, D, CommE> Sensor<M, I2C, D>
where
    M: SensorModel,
    I2C: Write<Error = CommE> + Read<Error = CommE> + WriteRead<Error = CommE>,
    D: DelayMs<u16>,
{
    /// Route one ISP event to the matching operation
    pub fn handle_event<N: IspNotify>(
        &mut self,
        event: SensorEvent,
        isp: &mut N,
    ) -> Result<EventReply, Error<CommE>> {
        let reply = match event {
            SensorEvent::Expo(packed) => {
                self.set_expo(packed)?;
                EventReply::Done
            }
            SensorEvent::IntegrationTime(it) => {
                EventReply::IntegrationTime(self.set_integration_time(it)?)
            }
            SensorEvent::AnalogGain(gain) => {
                EventReply::Gain(self.set_analog_gain(gain)?)
            }
            SensorEvent::DigitalGain(gain) => {
                EventReply::Gain(self.set_digital_gain(gain)?)
            }
            SensorEvent::Fps(fps) => {
                let attr = self.set_fps(fps)?;
                isp.sync_sensor_attr(attr);
                EventReply::Done
            }
            SensorEvent::StreamOn => {
                self.set_stream(true)?;
                EventReply::Done
            }
            SensorEvent::StreamOff => {
                self.set_stream(false)?;
                EventReply::Done
            }
            SensorEvent::HvFlip(value) => {
                self.set_hvflip(Flip::from_isp(value))?;
                EventReply::Done
            }
            SensorEvent::Resize(index) => {
                self.set_mode(index)?;
                isp.sync_sensor_attr(self.attr());
                EventReply::Done
            }
        };
        Ok(reply)
    }
}
