/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! In-memory stand-ins for the sensor, delay and GPIO used by unit tests

use crate::AddrWidth;
use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write, WriteRead};
use embedded_hal::digital::v2::OutputPin;
use std::collections::BTreeMap;
use std::vec::Vec;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct BusFault;

/// A flat register file answering SCCB-style transactions
pub struct FakeSensor {
    width: AddrWidth,
    pointer: u16,
    pub regs: BTreeMap<u16, u8>,
    /// Every register write, in order
    pub writes: Vec<(u16, u8)>,
    /// Raw bytes of every bus write
    pub frames: Vec<Vec<u8>>,
    pub addresses: Vec<u8>,
    /// Number of transactions to allow before failing every one after
    pub fail_after: Option<usize>,
}

impl FakeSensor {
    pub fn new(width: AddrWidth) -> Self {
        Self {
            width,
            pointer: 0,
            regs: BTreeMap::new(),
            writes: Vec::new(),
            frames: Vec::new(),
            addresses: Vec::new(),
            fail_after: None,
        }
    }

    pub fn with_regs(width: AddrWidth, regs: &[(u16, u8)]) -> Self {
        let mut fake = Self::new(width);
        fake.regs.extend(regs.iter().copied());
        fake
    }

    pub fn reg(&self, reg: u16) -> u8 {
        self.regs.get(&reg).copied().unwrap_or(0)
    }

    /// Last value written to `reg`, if any
    pub fn last_write(&self, reg: u16) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
    }

    fn transact(&mut self) -> Result<(), BusFault> {
        match self.fail_after {
            Some(0) => Err(BusFault),
            Some(ref mut n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Write for FakeSensor {
    type Error = BusFault;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusFault> {
        self.transact()?;
        self.addresses.push(address);
        self.frames.push(bytes.to_vec());
        let (reg, rest) = match self.width {
            AddrWidth::Eight => (bytes[0] as u16, &bytes[1..]),
            AddrWidth::Sixteen => {
                (u16::from_be_bytes([bytes[0], bytes[1]]), &bytes[2..])
            }
        };
        self.pointer = reg;
        if let Some(&val) = rest.first() {
            self.regs.insert(reg, val);
            self.writes.push((reg, val));
        }
        Ok(())
    }
}

impl Read for FakeSensor {
    type Error = BusFault;

    fn read(
        &mut self,
        _address: u8,
        buffer: &mut [u8],
    ) -> Result<(), BusFault> {
        self.transact()?;
        buffer[0] = self.reg(self.pointer);
        Ok(())
    }
}

impl WriteRead for FakeSensor {
    type Error = BusFault;

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), BusFault> {
        self.write(address, bytes)?;
        self.read(address, buffer)
    }
}

#[derive(Default)]
pub struct FakeDelay {
    pub total_ms: u32,
    pub calls: Vec<u16>,
}

impl DelayMs<u16> for FakeDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.total_ms += ms as u32;
        self.calls.push(ms);
    }
}

#[derive(Default)]
pub struct FakePin {
    pub levels: Vec<bool>,
}

impl OutputPin for FakePin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.push(true);
        Ok(())
    }
}
