//! Test doubles for the bus, pin and delay traits

use std::collections::VecDeque;
use std::vec::Vec;

use ferrule_hal::delay::Delay;
use ferrule_hal::gpio::{ConfigurablePin, OutputPin, PinMode};
use ferrule_hal::i2c::I2cBus;
use ferrule_hal::onewire::OneWire;
use ferrule_hal::spi::SpiBus;

/// Error raised by a mock whose script says the transfer fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// One expected I2C transaction
#[derive(Debug, Clone)]
pub struct Transaction {
    address: u16,
    write: Vec<u8>,
    response: Vec<u8>,
    fail: bool,
}

impl Transaction {
    pub fn write(address: u16, bytes: &[u8]) -> Self {
        Self::write_read(address, bytes, &[])
    }

    pub fn read(address: u16, response: &[u8]) -> Self {
        Self::write_read(address, &[], response)
    }

    pub fn write_read(address: u16, bytes: &[u8], response: &[u8]) -> Self {
        Self {
            address,
            write: bytes.to_vec(),
            response: response.to_vec(),
            fail: false,
        }
    }

    /// The device NACKs this transaction
    pub fn nack(mut self) -> Self {
        self.fail = true;
        self
    }
}

/// Scripted I2C bus
///
/// Every `tx` must match the next expected transaction; mismatches panic
/// so the test points at the offending call.
pub struct MockI2c {
    expected: Vec<Transaction>,
    next: usize,
}

impl MockI2c {
    pub fn new(expected: &[Transaction]) -> Self {
        Self {
            expected: expected.to_vec(),
            next: 0,
        }
    }

    /// Assert that the whole script was consumed
    pub fn done(&self) {
        assert_eq!(
            self.next,
            self.expected.len(),
            "{} transaction(s) never happened",
            self.expected.len() - self.next
        );
    }
}

impl I2cBus for MockI2c {
    type Error = MockError;

    fn tx(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> Result<(), MockError> {
        let t = self
            .expected
            .get(self.next)
            .unwrap_or_else(|| panic!("unexpected transaction to {:#04x}: {:02x?}", address, write));
        assert_eq!(address, t.address, "transaction {} address", self.next);
        assert_eq!(write, &t.write[..], "transaction {} write", self.next);
        assert_eq!(read.len(), t.response.len(), "transaction {} read length", self.next);
        self.next += 1;

        if t.fail {
            return Err(MockError);
        }
        read.copy_from_slice(&t.response);
        Ok(())
    }
}

/// SPI bus that records sent bytes and answers from a queue
#[derive(Default)]
pub struct MockSpi {
    pub sent: Vec<u8>,
    pub replies: VecDeque<u8>,
    pub fail: bool,
}

impl MockSpi {
    pub fn replying(replies: &[u8]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl SpiBus for MockSpi {
    type Error = MockError;

    fn transfer(&mut self, byte: u8) -> Result<u8, MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.sent.push(byte);
        Ok(self.replies.pop_front().unwrap_or(0xFF))
    }
}

/// Delay that only records what was asked of it
#[derive(Default)]
pub struct MockDelay {
    pub us: Vec<u32>,
}

impl MockDelay {
    pub fn total_us(&self) -> u64 {
        self.us.iter().map(|&us| us as u64).sum()
    }
}

impl Delay for MockDelay {
    fn sleep_us(&mut self, us: u32) {
        self.us.push(us);
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.us.push(ms * 1000);
    }
}

/// Chip-select style output pin recording every level change
#[derive(Default)]
pub struct MockPin {
    pub mode: Option<PinMode>,
    pub history: Vec<bool>,
}

impl MockPin {
    pub fn level(&self) -> Option<bool> {
        self.history.last().copied()
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.history.push(true);
    }

    fn set_low(&mut self) {
        self.history.push(false);
    }

    fn is_set_high(&self) -> bool {
        self.level() == Some(true)
    }
}

impl ConfigurablePin for MockPin {
    fn configure(&mut self, mode: PinMode) {
        self.mode = Some(mode);
    }
}

/// Byte-level 1-Wire bus
///
/// Records resets and written bytes, answers reads from a queue
/// (0xFF once it runs dry, like an idle pulled-up line).
pub struct MockOneWire {
    pub present: bool,
    pub resets: u32,
    pub written: Vec<u8>,
    pub replies: VecDeque<u8>,
    pub fail: bool,
}

impl MockOneWire {
    pub fn new() -> Self {
        Self {
            present: true,
            resets: 0,
            written: Vec::new(),
            replies: VecDeque::new(),
            fail: false,
        }
    }

    pub fn absent() -> Self {
        Self {
            present: false,
            ..Self::new()
        }
    }

    pub fn reply(&mut self, bytes: &[u8]) {
        self.replies.extend(bytes.iter().copied());
    }
}

impl OneWire for MockOneWire {
    type Error = MockError;

    fn reset(&mut self) -> Result<bool, MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.resets += 1;
        Ok(self.present)
    }

    fn write_bit(&mut self, _bit: bool) -> Result<(), MockError> {
        unreachable!("byte-level mock")
    }

    fn read_bit(&mut self) -> Result<bool, MockError> {
        unreachable!("byte-level mock")
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.written.push(byte);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, MockError> {
        if self.fail {
            return Err(MockError);
        }
        Ok(self.replies.pop_front().unwrap_or(0xFF))
    }
}

/// Bit-level 1-Wire bus populated with simulated devices
///
/// Models the wired-AND line during ROM search: each triplet reads the
/// AND of all participating devices' bit and complement, and the
/// direction bit written by the master drops the devices that disagree.
pub struct SearchBus {
    devices: Vec<SimDevice>,
    state: SearchState,
    bit: usize,
    phase: u8,
    /// Bytes written since the last reset
    command: Vec<u8>,
    partial: u8,
    partial_bits: u8,
    pub resets: u32,
    /// Every device stops answering once a search reaches this bit
    pub vanish_at_bit: Option<usize>,
    /// Presence pulses stop after this many resets
    pub present_resets: Option<u32>,
}

struct SimDevice {
    rom: [u8; 8],
    alarmed: bool,
    active: bool,
}

#[derive(PartialEq)]
enum SearchState {
    Command,
    Searching,
    Idle,
}

impl SearchBus {
    pub fn new(roms: &[[u8; 8]]) -> Self {
        Self::with_alarms(roms, &[])
    }

    /// Devices whose index is listed in `alarmed` answer an alarm search
    pub fn with_alarms(roms: &[[u8; 8]], alarmed: &[usize]) -> Self {
        Self {
            devices: roms
                .iter()
                .enumerate()
                .map(|(i, rom)| SimDevice {
                    rom: *rom,
                    alarmed: alarmed.contains(&i),
                    active: false,
                })
                .collect(),
            state: SearchState::Idle,
            bit: 0,
            phase: 0,
            command: Vec::new(),
            partial: 0,
            partial_bits: 0,
            resets: 0,
            vanish_at_bit: None,
            present_resets: None,
        }
    }

    fn rom_bit(rom: &[u8; 8], n: usize) -> bool {
        rom[n / 8] >> (n % 8) & 1 == 1
    }

    fn start(&mut self, command: u8) {
        let alarm_only = command == ferrule_hal::onewire::ALARM_SEARCH;
        for dev in &mut self.devices {
            dev.active = !alarm_only || dev.alarmed;
        }
        self.state = SearchState::Searching;
        self.bit = 0;
        self.phase = 0;
    }
}

impl OneWire for SearchBus {
    type Error = MockError;

    fn reset(&mut self) -> Result<bool, MockError> {
        self.resets += 1;
        self.state = SearchState::Command;
        self.command.clear();
        self.partial = 0;
        self.partial_bits = 0;
        let powered = self.present_resets.map_or(true, |n| self.resets <= n);
        Ok(powered && !self.devices.is_empty())
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), MockError> {
        match self.state {
            SearchState::Command => {
                self.partial |= (bit as u8) << self.partial_bits;
                self.partial_bits += 1;
                if self.partial_bits == 8 {
                    let byte = self.partial;
                    self.command.push(byte);
                    self.partial = 0;
                    self.partial_bits = 0;
                    if byte == ferrule_hal::onewire::SEARCH_ROM
                        || byte == ferrule_hal::onewire::ALARM_SEARCH
                    {
                        self.start(byte);
                    }
                }
            }
            SearchState::Searching => {
                assert_eq!(self.phase, 2, "direction written before both reads");
                let n = self.bit;
                for dev in &mut self.devices {
                    if dev.active && Self::rom_bit(&dev.rom, n) != bit {
                        dev.active = false;
                    }
                }
                self.bit += 1;
                self.phase = 0;
                if self.bit == 64 {
                    self.state = SearchState::Idle;
                }
            }
            SearchState::Idle => {}
        }
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, MockError> {
        if self.state != SearchState::Searching {
            return Ok(true);
        }
        let n = self.bit;
        if self.vanish_at_bit.is_some_and(|at| n >= at) {
            for dev in &mut self.devices {
                dev.active = false;
            }
        }
        let complement = self.phase == 1;
        self.phase += 1;
        // Wired-AND: any device pulling low wins
        Ok(self
            .devices
            .iter()
            .filter(|d| d.active)
            .all(|d| Self::rom_bit(&d.rom, n) != complement))
    }
}
