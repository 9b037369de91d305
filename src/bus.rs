/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Register access over the two-wire control bus

use crate::Error;
use embedded_hal::blocking::i2c::{Read, Write, WriteRead};

/// Width of the register address sent before each access
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddrWidth {
    /// 8-bit register addresses (OmniVision paged, GalaxyCore, SOI)
    Eight,
    /// 16-bit register addresses, sent high byte first (SmartSens)
    Sixteen,
}

impl AddrWidth {
    /// Encode `reg` into the front of `buf`, returning the number of bytes used
    fn encode(self, reg: u16, buf: &mut [u8; 3]) -> usize {
        match self {
            AddrWidth::Eight => {
                buf[0] = reg as u8;
                1
            }
            AddrWidth::Sixteen => {
                let [hi, lo] = reg.to_be_bytes();
                buf[0] = hi;
                buf[1] = lo;
                2
            }
        }
    }
}

/// Byte-wide register file of a sensor.
/// Sensor models program the part exclusively through this trait.
pub trait RegisterBus {
    type CommError;

    /// Read a u8 from a register
    fn read_reg(&mut self, reg: u16) -> Result<u8, Error<Self::CommError>>;

    /// Write a u8 to a register
    fn write_reg(
        &mut self,
        reg: u16,
        val: u8,
    ) -> Result<(), Error<Self::CommError>>;

    /// Read a u16 split across a high and a low register
    fn read_reg_u16(
        &mut self,
        hi: u16,
        lo: u16,
    ) -> Result<u16, Error<Self::CommError>> {
        let upper = (self.read_reg(hi)? as u16) << 8;
        let lower = self.read_reg(lo)? as u16;
        Ok(upper | lower)
    }

    /// Write a u16 split across a high and a low register, high first
    fn write_reg_u16(
        &mut self,
        hi: u16,
        lo: u16,
        data: u16,
    ) -> Result<(), Error<Self::CommError>> {
        self.write_reg(hi, (data >> 8) as u8)?;
        self.write_reg(lo, (data & 0xFF) as u8)
    }
}

/// SCCB-style register access on an i2c bus
pub struct Sccb<I2C> {
    base_address: u8,
    width: AddrWidth,
    i2c: I2C,
}

impl<I2C, CommE> Sccb<I2C>
where
    I2C: Write<Error = CommE> + Read<Error = CommE> + WriteRead<Error = CommE>,
{
    /// Create a new instance with a 7-bit i2c address
    pub fn new(i2c: I2C, address: u8, width: AddrWidth) -> Self {
        Self {
            base_address: address,
            width,
            i2c,
        }
    }

    pub fn address(&self) -> u8 {
        self.base_address
    }

    /// Check that something ACKs at our address
    pub fn ping(&mut self) -> Result<(), Error<CommE>> {
        let mut recv_buf = [0u8];
        self.i2c
            .read(self.base_address, &mut recv_buf)
            .map_err(Error::Comm)?;
        Ok(())
    }

    /// Give back the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, CommE> RegisterBus for Sccb<I2C>
where
    I2C: Write<Error = CommE> + Read<Error = CommE> + WriteRead<Error = CommE>,
{
    type CommError = CommE;

    fn read_reg(&mut self, reg: u16) -> Result<u8, Error<CommE>> {
        // SCCB has no repeated start: set the address, then read separately
        let mut cmd_buf = [0u8; 3];
        let len = self.width.encode(reg, &mut cmd_buf);
        let mut recv_buf = [0u8];
        self.i2c
            .write(self.base_address, &cmd_buf[..len])
            .map_err(Error::Comm)?;
        self.i2c
            .read(self.base_address, &mut recv_buf)
            .map_err(Error::Comm)?;

        Ok(recv_buf[0])
    }

    fn write_reg(&mut self, reg: u16, val: u8) -> Result<(), Error<CommE>> {
        let mut write_buf = [0u8; 3];
        let len = self.width.encode(reg, &mut write_buf);
        write_buf[len] = val;
        self.i2c
            .write(self.base_address, &write_buf[..=len])
            .map_err(Error::Comm)?;
        Ok(())
    }
}
