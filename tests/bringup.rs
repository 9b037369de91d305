/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Full bring-up of a sensor the way an ISP core would drive it

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write, WriteRead};
use isp_sensor_i2c::models::{JxF37, Ov2735b};
use isp_sensor_i2c::{
    Error, EventReply, IspNotify, NoPin, PowerPins, Sensor, SensorAttr,
    SensorEvent,
};
use std::collections::HashMap;

/// 8-bit addressed register file
#[derive(Default)]
struct RegFile {
    pointer: u8,
    regs: HashMap<u8, u8>,
    log: Vec<(u8, u8)>,
}

#[derive(Debug, PartialEq)]
struct Nack;

impl Write for RegFile {
    type Error = Nack;

    fn write(&mut self, _address: u8, bytes: &[u8]) -> Result<(), Nack> {
        match bytes {
            [reg] => self.pointer = *reg,
            [reg, val] => {
                self.pointer = *reg;
                self.regs.insert(*reg, *val);
                self.log.push((*reg, *val));
            }
            _ => return Err(Nack),
        }
        Ok(())
    }
}

impl Read for RegFile {
    type Error = Nack;

    fn read(&mut self, _address: u8, buffer: &mut [u8]) -> Result<(), Nack> {
        buffer[0] = *self.regs.get(&self.pointer).unwrap_or(&0);
        Ok(())
    }
}

impl WriteRead for RegFile {
    type Error = Nack;

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Nack> {
        self.write(address, bytes)?;
        self.read(address, buffer)
    }
}

struct NoDelay;

impl DelayMs<u16> for NoDelay {
    fn delay_ms(&mut self, _ms: u16) {}
}

#[derive(Default)]
struct Isp {
    limits: Vec<u32>,
}

impl IspNotify for Isp {
    fn sync_sensor_attr(&mut self, attr: &SensorAttr) {
        self.limits.push(attr.max_integration_time);
    }
}

#[test]
fn jxf37_bringup() {
    let mut regs = RegFile::default();
    regs.regs.insert(0x0a, 0x0f);
    regs.regs.insert(0x0b, 0x37);

    let mut sensor: Sensor<JxF37, _, _> = Sensor::new(regs, NoDelay);
    let mut pins: PowerPins<NoPin, NoPin> = PowerPins::new(Some(NoPin), None);
    sensor.power_on(&mut pins).unwrap();
    assert_eq!(sensor.detect(), Ok(0x0f37));
    sensor.init(0).unwrap();

    let mut isp = Isp::default();
    sensor
        .handle_event(SensorEvent::StreamOn, &mut isp)
        .unwrap();

    // 2x gain requested: exponent 1, mantissa 0
    let reply = sensor
        .handle_event(SensorEvent::AnalogGain(1 << 16), &mut isp)
        .unwrap();
    match reply {
        EventReply::Gain(alloc) => assert_eq!(alloc.code, 0x10),
        other => panic!("unexpected reply {:?}", other),
    }

    sensor
        .handle_event(SensorEvent::Fps(10 << 16 | 1), &mut isp)
        .unwrap();
    // 86.4 MHz / 2560 clocks per line / 10 fps
    assert_eq!(sensor.attr().total_height, 3375);
    assert_eq!(isp.limits, [3371]);

    let reply = sensor
        .handle_event(SensorEvent::IntegrationTime(3000), &mut isp)
        .unwrap();
    assert_eq!(reply, EventReply::IntegrationTime(3000));

    let (regs, _) = sensor.release();
    assert_eq!(regs.regs[&0x22], 0x2f);
    assert_eq!(regs.regs[&0x23], 0x0d);
    assert_eq!(regs.regs[&0x00], 0x10);
    assert_eq!(regs.regs[&0x01], 0xb8);
    assert_eq!(regs.regs[&0x02], 0x0b);
    assert_eq!(regs.regs[&0x12] & 0x40, 0);
}

#[test]
fn wrong_part_is_rejected() {
    let mut regs = RegFile::default();
    regs.regs.insert(0x02, 0x56);
    regs.regs.insert(0x03, 0x40);

    let mut sensor: Sensor<Ov2735b, _, _> = Sensor::new(regs, NoDelay);
    assert_eq!(
        sensor.detect(),
        Err(Error::UnknownChip { id: 0x5640 })
    );
}
