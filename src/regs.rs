/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Register sequence player
//!
//! Mode and stream tables are lists of `{reg, val}` pairs, played in order.
//! Two pseudo-registers are recognized: [`REG_DELAY`] sleeps for `val`
//! milliseconds and [`REG_END`] terminates the table early.

use crate::{Error, RegisterBus};
use embedded_hal::blocking::delay::DelayMs;

/// Pseudo-register: sleep for `val` milliseconds
pub const REG_DELAY: u16 = 0xfffe;
/// Pseudo-register: end of table
pub const REG_END: u16 = 0xffff;

/// One entry of a register table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegValue {
    pub reg: u16,
    pub val: u8,
}

impl RegValue {
    pub const END: RegValue = RegValue {
        reg: REG_END,
        val: 0,
    };

    pub const fn new(reg: u16, val: u8) -> Self {
        Self { reg, val }
    }

    pub const fn delay(ms: u8) -> Self {
        Self {
            reg: REG_DELAY,
            val: ms,
        }
    }
}

/// Shorthand for building register tables
pub(crate) const fn rv(reg: u16, val: u8) -> RegValue {
    RegValue::new(reg, val)
}

/// Play `table` into the sensor.
/// Returns the number of registers written.
pub fn write_array<B, D>(
    bus: &mut B,
    delay: &mut D,
    table: &[RegValue],
) -> Result<usize, Error<B::CommError>>
where
    B: RegisterBus,
    D: DelayMs<u16>,
{
    let mut count = 0;
    for entry in table {
        match entry.reg {
            REG_END => break,
            REG_DELAY => delay.delay_ms(entry.val as u16),
            reg => {
                bus.write_reg(reg, entry.val)?;
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Read back every register named in `table` into `out`.
/// Stops at the end marker or when `out` is full; returns the number read.
pub fn read_array<B, D>(
    bus: &mut B,
    delay: &mut D,
    table: &[RegValue],
    out: &mut [u8],
) -> Result<usize, Error<B::CommError>>
where
    B: RegisterBus,
    D: DelayMs<u16>,
{
    let mut slots = out.iter_mut();
    let mut count = 0;
    for entry in table {
        match entry.reg {
            REG_END => break,
            REG_DELAY => delay.delay_ms(entry.val as u16),
            reg => {
                let slot = match slots.next() {
                    Some(slot) => slot,
                    None => break,
                };
                *slot = bus.read_reg(reg)?;
                count += 1;
            }
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BusFault, FakeDelay, FakeSensor};
    use crate::{AddrWidth, Sccb};

    const TABLE: [RegValue; 6] = [
        RegValue::new(0x0103, 0x01),
        RegValue::delay(10),
        RegValue::new(0x0100, 0x00),
        RegValue::new(0x36e9, 0x80),
        RegValue::END,
        RegValue::new(0x3e01, 0x8c),
    ];

    fn bus() -> Sccb<FakeSensor> {
        let fake = FakeSensor::new(AddrWidth::Sixteen);
        Sccb::new(fake, 0x30, AddrWidth::Sixteen)
    }

    #[test]
    fn plays_until_end_marker() {
        let mut bus = bus();
        let mut delay = FakeDelay::default();
        let n = write_array(&mut bus, &mut delay, &TABLE).unwrap();
        assert_eq!(n, 3);
        assert_eq!(delay.calls, [10]);

        let fake = bus.release();
        assert_eq!(
            fake.writes,
            [(0x0103, 0x01), (0x0100, 0x00), (0x36e9, 0x80)]
        );
        assert_eq!(fake.last_write(0x3e01), None);
    }

    #[test]
    fn table_without_end_marker_plays_to_the_end() {
        let mut bus = bus();
        let mut delay = FakeDelay::default();
        let table = [
            RegValue::new(0x3221, 0x06),
            RegValue::new(0x3e09, 0x20),
        ];
        let n = write_array(&mut bus, &mut delay, &table).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn first_bus_error_aborts() {
        let mut fake = FakeSensor::new(AddrWidth::Sixteen);
        fake.fail_after = Some(1);
        let mut bus = Sccb::new(fake, 0x30, AddrWidth::Sixteen);
        let mut delay = FakeDelay::default();
        assert_eq!(
            write_array(&mut bus, &mut delay, &TABLE),
            Err(Error::Comm(BusFault))
        );
        let fake = bus.release();
        assert_eq!(fake.writes, [(0x0103, 0x01)]);
        assert_eq!(delay.total_ms, 10);
    }

    #[test]
    fn reads_back_programmed_values() {
        let mut bus = bus();
        let mut delay = FakeDelay::default();
        write_array(&mut bus, &mut delay, &TABLE).unwrap();

        let mut out = [0u8; 8];
        let n = read_array(&mut bus, &mut delay, &TABLE, &mut out).unwrap();
        assert_eq!(&out[..n], &[0x01, 0x00, 0x80]);
    }

    #[test]
    fn read_back_stops_when_out_is_full() {
        let mut bus = bus();
        let mut delay = FakeDelay::default();
        let mut out = [0u8; 2];
        let n = read_array(&mut bus, &mut delay, &TABLE, &mut out).unwrap();
        assert_eq!(n, 2);
    }
}
