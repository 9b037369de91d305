/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Gain allocation
//!
//! The ISP's exposure algorithm requests gain as an unsigned fixed-point
//! value of log2 of the linear gain, with [`GAIN_SHIFT`] fractional bits:
//! `0` is 1x, `1 << 16` is 2x, `1 << 17` is 4x.
//! A sensor only supports a discrete set of gain steps, each selected by a
//! register code. The lookup table maps those codes to their gain in the
//! ISP domain, and allocation picks the step to program.

use crate::Error;

/// Fractional bits of the ISP gain domain
pub const GAIN_SHIFT: u32 = 16;

/// One supported gain step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgainEntry {
    /// Register code programmed into the sensor
    pub value: u32,
    /// Gain of this step in the ISP domain
    pub gain: u32,
}

impl AgainEntry {
    pub const fn new(value: u32, gain: u32) -> Self {
        Self { value, gain }
    }
}

/// Result of resolving a requested gain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Register code to program
    pub code: u32,
    /// Gain actually applied, fed back to the ISP
    pub gain: u32,
}

impl Allocation {
    /// No gain step: code 0 at unity gain
    pub const NONE: Self = Self {
        code: 0,
        gain: 0,
    };
}

impl From<AgainEntry> for Allocation {
    fn from(entry: AgainEntry) -> Self {
        Self {
            code: entry.value,
            gain: entry.gain,
        }
    }
}

/// A validated, strictly increasing gain table with an upper limit
#[derive(Clone, Copy, Debug)]
pub struct GainLut<'a> {
    entries: &'a [AgainEntry],
    max_gain: u32,
}

impl<'a> GainLut<'a> {
    /// Check that `entries` is usable with `max_gain`
    pub const fn validate(entries: &[AgainEntry], max_gain: u32) -> bool {
        if entries.is_empty() || entries[0].gain > max_gain {
            return false;
        }
        let mut i = 1;
        while i < entries.len() {
            if entries[i].gain <= entries[i - 1].gain {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Build a table at compile time; a bad table fails const evaluation
    pub const fn checked(entries: &'a [AgainEntry], max_gain: u32) -> Self {
        if !Self::validate(entries, max_gain) {
            panic!("gain table must be non-empty and strictly increasing");
        }
        Self {
            entries,
            max_gain,
        }
    }

    /// Build a table from runtime data
    pub fn new<CommE>(
        entries: &'a [AgainEntry],
        max_gain: u32,
    ) -> Result<Self, Error<CommE>> {
        if Self::validate(entries, max_gain) {
            Ok(Self {
                entries,
                max_gain,
            })
        } else {
            Err(Error::InvalidTable)
        }
    }

    /// Entries that may be selected: those not above the max gain
    fn usable(&self) -> &'a [AgainEntry] {
        let (entries, max) = (self.entries, self.max_gain);
        let end = entries.partition_point(|e| e.gain <= max);
        &entries[..end]
    }

    /// Gain of the lowest step
    pub fn min_gain(&self) -> u32 {
        self.entries.first().map_or(0, |e| e.gain)
    }

    /// Gain of the highest step that may be selected
    pub fn max_gain(&self) -> u32 {
        self.usable().last().map_or(0, |e| e.gain)
    }

    /// Every step of the table, including those above the max gain
    pub fn entries(&self) -> &'a [AgainEntry] {
        self.entries
    }

    /// Whether `code` names one of the table's steps
    pub fn contains_code(&self, code: u32) -> bool {
        self.entries().iter().any(|e| e.value == code)
    }

    /// Resolve a requested ISP gain to a supported step.
    ///
    /// Picks the greatest step whose gain does not exceed the request,
    /// so the applied gain never overshoots. Requests below the first
    /// step get the first step; requests past the top clamp to the
    /// highest step not above the max gain.
    pub fn alloc(&self, isp_gain: u32) -> Allocation {
        let usable = self.usable();
        let below = usable.partition_point(|e| e.gain <= isp_gain);
        let index = below.saturating_sub(1);
        // a validated table always has at least one usable entry
        usable
            .get(index)
            .or_else(|| self.entries.first())
            .copied()
            .map(Allocation::from)
            .unwrap_or(Allocation::NONE)
    }
}

/// Resolve against an optional table; parts without one report no gain
pub fn alloc_optional(lut: Option<&GainLut<'_>>, isp_gain: u32) -> Allocation {
    match lut {
        Some(lut) => lut.alloc(isp_gain),
        None => Allocation::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::BusFault;

    const STEPS: [AgainEntry; 6] = [
        AgainEntry::new(0x10, 0),
        AgainEntry::new(0x20, 65536),
        AgainEntry::new(0x30, 103872),
        AgainEntry::new(0x40, 131072),
        AgainEntry::new(0x80, 196608),
        AgainEntry::new(0xf8, 259142),
    ];

    const LUT: GainLut<'static> = GainLut::checked(&STEPS, 196608);

    fn step(code: u32, gain: u32) -> Allocation {
        AgainEntry::new(code, gain).into()
    }

    #[test]
    fn zero_request_gets_first_step() {
        assert_eq!(LUT.alloc(0), step(0x10, 0));
    }

    #[test]
    fn rounds_down_between_steps() {
        assert_eq!(LUT.alloc(65535).code, 0x10);
        assert_eq!(LUT.alloc(100000), step(0x20, 65536));
        assert_eq!(LUT.alloc(131071).code, 0x30);
    }

    #[test]
    fn exact_match_wins() {
        assert_eq!(LUT.alloc(103872), step(0x30, 103872));
        assert_eq!(LUT.alloc(131072).code, 0x40);
    }

    #[test]
    fn clamps_at_max_gain() {
        assert_eq!(LUT.alloc(196608).code, 0x80);
        assert_eq!(LUT.alloc(259142).code, 0x80);
        assert_eq!(LUT.alloc(u32::MAX), step(0x80, 196608));
        assert_eq!(LUT.max_gain(), 196608);
    }

    #[test]
    fn request_below_first_step_gets_first_step() {
        let steps = [
            AgainEntry::new(0x03, 2000),
            AgainEntry::new(0x07, 70000),
        ];
        let lut = GainLut::new::<BusFault>(&steps, 70000).unwrap();
        assert_eq!(lut.alloc(1500), step(0x03, 2000));
        assert_eq!(lut.min_gain(), 2000);
    }

    #[test]
    fn applied_gain_never_exceeds_request() {
        let mut req = 0;
        while req < 300_000 {
            let a = LUT.alloc(req);
            assert!(a.gain <= req.max(LUT.min_gain()));
            req += 997;
        }
    }

    #[test]
    fn rejects_bad_tables() {
        let dup = [AgainEntry::new(1, 10), AgainEntry::new(2, 10)];
        assert!(GainLut::new::<BusFault>(&dup, 100).is_err());
        assert!(GainLut::new::<BusFault>(&[], 100).is_err());
        assert_eq!(
            GainLut::new::<BusFault>(&STEPS[1..], 10).err(),
            Some(Error::InvalidTable)
        );
    }

    #[test]
    fn codes_above_max_gain_are_still_known() {
        assert_eq!(LUT.entries().len(), 6);
        assert!(LUT.contains_code(0xf8));
        assert!(!LUT.contains_code(0x11));
    }

    #[test]
    fn missing_table_reports_no_gain() {
        assert_eq!(alloc_optional(None, 70000), Allocation::NONE);
        assert_eq!(alloc_optional(Some(&LUT), 70000).code, 0x20);
    }
}
