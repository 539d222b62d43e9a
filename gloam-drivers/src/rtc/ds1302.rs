//! DS1302 timekeeping chip driver
//!
//! Three-wire serial interface bit-banged over GPIO: a chip-enable line, a
//! clock line, and a bidirectional data line. Bytes travel LSB first;
//! calendar registers are BCD-coded. Only the calendar half of the chip is
//! driven here (no trickle charger, no scratch RAM).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use gloam_core::traits::TimeOfDay;

/// Bidirectional data line.
///
/// `embedded-hal` has no trait for a pin that switches direction at
/// runtime, so the driver defines its own narrow seam; firmware implements
/// it over the HAL's flex pin type.
pub trait DataPin {
    fn set_input(&mut self);
    fn set_output(&mut self);
    fn write(&mut self, high: bool);
    fn read(&mut self) -> bool;
}

// Write command bytes; the matching read command is `reg | 1`.
const REG_SECONDS: u8 = 0x80;
const REG_MINUTES: u8 = 0x82;
const REG_HOURS: u8 = 0x84;
const REG_DATE: u8 = 0x86;
const REG_MONTH: u8 = 0x88;
const REG_WEEKDAY: u8 = 0x8A;
const REG_YEAR: u8 = 0x8C;
const REG_WRITE_PROTECT: u8 = 0x8E;

/// Clock-halt flag in the seconds register.
const CH_BIT: u8 = 0x80;
/// 12-hour mode flag in the hours register.
const HOUR_12H_BIT: u8 = 0x80;
/// PM flag, only meaningful in 12-hour mode.
const HOUR_PM_BIT: u8 = 0x20;

/// Half-period of the bit-bang clock, microseconds. The chip tops out at
/// 2 MHz; this keeps comfortable margin on any wiring.
const CLOCK_HALF_PERIOD_US: u32 = 2;

/// Chip-enable setup/hold time, microseconds.
const CE_SETUP_US: u32 = 4;

/// Calendar timestamp used to program the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// Day of week, 1..=7 (any consistent convention works).
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// DS1302 on three GPIO lines plus a delay source for bit timing.
pub struct Ds1302<CE, CLK, IO, D> {
    ce: CE,
    clk: CLK,
    io: IO,
    delay: D,
}

impl<CE, CLK, IO, D> Ds1302<CE, CLK, IO, D>
where
    CE: OutputPin,
    CLK: OutputPin,
    IO: DataPin,
    D: DelayNs,
{
    /// Take ownership of the bus pins. Lines idle low.
    pub fn new(mut ce: CE, mut clk: CLK, io: IO, delay: D) -> Self {
        let _ = ce.set_low();
        let _ = clk.set_low();
        Self { ce, clk, io, delay }
    }

    /// Read a single calendar register.
    pub fn read_register(&mut self, reg: u8) -> u8 {
        self.begin();
        self.write_byte(reg | 1);
        let value = self.read_byte();
        self.end();
        value
    }

    /// Write a single calendar register.
    pub fn write_register(&mut self, reg: u8, value: u8) {
        self.begin();
        self.write_byte(reg);
        self.write_byte(value);
        self.end();
    }

    /// Program the calendar and start the oscillator.
    ///
    /// Clears write protect for the duration, writes every calendar
    /// register in 24-hour mode, clears the clock-halt flag, then protects
    /// the registers again.
    pub fn set_datetime(&mut self, dt: &DateTime) {
        self.write_register(REG_WRITE_PROTECT, 0x00);
        self.write_register(REG_SECONDS, to_bcd(dt.second % 60) & !CH_BIT);
        self.write_register(REG_MINUTES, to_bcd(dt.minute % 60));
        self.write_register(REG_HOURS, to_bcd(dt.hour % 24));
        self.write_register(REG_DATE, to_bcd(dt.day));
        self.write_register(REG_MONTH, to_bcd(dt.month));
        self.write_register(REG_WEEKDAY, to_bcd(dt.weekday));
        self.write_register(REG_YEAR, to_bcd((dt.year % 100) as u8));
        self.write_register(REG_WRITE_PROTECT, 0x80);
    }

    /// Current hour of day, decoding either hour mode.
    pub fn read_hour(&mut self) -> u8 {
        decode_hour(self.read_register(REG_HOURS))
    }

    /// Current minute.
    pub fn read_minute(&mut self) -> u8 {
        from_bcd(self.read_register(REG_MINUTES) & 0x7F)
    }

    /// Current second. The clock-halt flag shares this register.
    pub fn read_second(&mut self) -> u8 {
        from_bcd(self.read_register(REG_SECONDS) & !CH_BIT)
    }

    /// Whether the oscillator is halted (factory-fresh chip or dead cell).
    pub fn is_halted(&mut self) -> bool {
        self.read_register(REG_SECONDS) & CH_BIT != 0
    }

    fn begin(&mut self) {
        let _ = self.clk.set_low();
        let _ = self.ce.set_high();
        self.delay.delay_us(CE_SETUP_US);
    }

    fn end(&mut self) {
        let _ = self.ce.set_low();
        // Release the data line between transactions.
        self.io.set_input();
        self.delay.delay_us(CE_SETUP_US);
    }

    fn write_byte(&mut self, byte: u8) {
        self.io.set_output();
        for bit in 0..8 {
            self.io.write(byte & (1 << bit) != 0);
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
            let _ = self.clk.set_high();
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
            let _ = self.clk.set_low();
        }
    }

    fn read_byte(&mut self) -> u8 {
        self.io.set_input();
        let mut byte = 0;
        for bit in 0..8 {
            if self.io.read() {
                byte |= 1 << bit;
            }
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
            let _ = self.clk.set_high();
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
            let _ = self.clk.set_low();
        }
        byte
    }
}

impl<CE, CLK, IO, D> TimeOfDay for Ds1302<CE, CLK, IO, D>
where
    CE: OutputPin,
    CLK: OutputPin,
    IO: DataPin,
    D: DelayNs,
{
    fn hour(&mut self) -> u8 {
        self.read_hour()
    }
}

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

fn from_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

fn decode_hour(raw: u8) -> u8 {
    if raw & HOUR_12H_BIT != 0 {
        let hour12 = from_bcd(raw & 0x1F);
        let pm = raw & HOUR_PM_BIT != 0;
        match (hour12, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        }
    } else {
        from_bcd(raw & 0x3F)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Default)]
    struct MockOut {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for MockOut {
        type Error = Infallible;
    }

    impl OutputPin for MockOut {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    /// Records written bits and replays preloaded read bits, LSB first.
    #[derive(Default)]
    struct MockData {
        written: u64,
        written_count: u32,
        readback: u64,
        read_count: u32,
        input_mode: bool,
    }

    impl DataPin for MockData {
        fn set_input(&mut self) {
            self.input_mode = true;
        }

        fn set_output(&mut self) {
            self.input_mode = false;
        }

        fn write(&mut self, high: bool) {
            if high {
                self.written |= 1 << self.written_count;
            }
            self.written_count += 1;
        }

        fn read(&mut self) -> bool {
            let bit = self.readback & (1 << self.read_count) != 0;
            self.read_count += 1;
            bit
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn rtc(readback: u64) -> Ds1302<MockOut, MockOut, MockData, NoopDelay> {
        Ds1302::new(
            MockOut::default(),
            MockOut::default(),
            MockData {
                readback,
                ..Default::default()
            },
            NoopDelay,
        )
    }

    #[test]
    fn bcd_roundtrip() {
        for v in 0..=99 {
            assert_eq!(from_bcd(to_bcd(v)), v);
        }
        assert_eq!(to_bcd(59), 0x59);
        assert_eq!(from_bcd(0x23), 23);
    }

    #[test]
    fn hour_decodes_24h_mode() {
        assert_eq!(decode_hour(0x00), 0);
        assert_eq!(decode_hour(0x09), 9);
        assert_eq!(decode_hour(0x23), 23);
    }

    #[test]
    fn hour_decodes_12h_mode() {
        // 5 PM
        assert_eq!(decode_hour(HOUR_12H_BIT | HOUR_PM_BIT | 0x05), 17);
        // 12 AM is midnight
        assert_eq!(decode_hour(HOUR_12H_BIT | 0x12), 0);
        // 12 PM is noon
        assert_eq!(decode_hour(HOUR_12H_BIT | HOUR_PM_BIT | 0x12), 12);
    }

    #[test]
    fn read_sends_read_command_lsb_first() {
        let mut rtc = rtc(0x23);
        assert_eq!(rtc.read_hour(), 23);
        // Exactly one command byte went out: the hours read address.
        assert_eq!(rtc.io.written_count, 8);
        assert_eq!((rtc.io.written & 0xFF) as u8, REG_HOURS | 1);
        // The chip was deselected afterwards.
        assert!(!rtc.ce.high);
    }

    #[test]
    fn write_sends_command_then_value() {
        let mut rtc = rtc(0);
        rtc.write_register(REG_WRITE_PROTECT, 0x80);
        assert_eq!(rtc.io.written_count, 16);
        assert_eq!((rtc.io.written & 0xFF) as u8, REG_WRITE_PROTECT);
        assert_eq!(((rtc.io.written >> 8) & 0xFF) as u8, 0x80);
    }

    #[test]
    fn halted_flag_reads_from_seconds_register() {
        let mut rtc = rtc(CH_BIT as u64 | 0x15);
        assert!(rtc.is_halted());
    }
}
