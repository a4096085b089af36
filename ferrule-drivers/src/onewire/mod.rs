//! 1-Wire bus support
//!
//! - [`GpioOneWire`]: bus master bit-banged on one GPIO line
//! - [`search`] / [`search_alarms`]: enumerate the ids of devices on a bus

pub mod bitbang;

pub use bitbang::GpioOneWire;

use heapless::Vec;

use ferrule_core::{Error, RomId};
use ferrule_hal::onewire::{OneWire, ALARM_SEARCH, SEARCH_ROM};

/// Maximum number of ids a single search collects
pub const MAX_DEVICES: usize = 32;

/// Ids found by a search, in ascending bus order
pub type RomList = Vec<RomId, MAX_DEVICES>;

/// Enumerate every device on the bus
///
/// Each id is CRC-checked before it is returned. A bus with no presence
/// pulse yields an empty list.
pub fn search_all<W: OneWire>(bus: &mut W) -> Result<RomList, Error> {
    search(bus, SEARCH_ROM)
}

/// Enumerate devices whose alarm flag is set
pub fn search_alarms<W: OneWire>(bus: &mut W) -> Result<RomList, Error> {
    search(bus, ALARM_SEARCH)
}

/// Run a ROM search with the given search command
///
/// Binary tree walk over the 64 id bits. At each bit position the master
/// reads the AND of all participating devices' bit and of its complement:
///
/// ```text
/// bit  cmp
///  0    1   every remaining device has 0
///  1    0   every remaining device has 1
///  0    0   devices disagree: take 0 first, revisit with 1 later
///  1    1   nobody is participating
/// ```
///
/// Stops after [`MAX_DEVICES`] ids.
pub fn search<W: OneWire>(bus: &mut W, command: u8) -> Result<RomList, Error> {
    let mut found = RomList::new();
    let mut rom = [0u8; 8];
    // Bit positions are 1-based, 0 means "no discrepancy"
    let mut last_discrepancy = 0usize;

    loop {
        if !bus.reset().map_err(|_| Error::Bus)? {
            return if found.is_empty() {
                Ok(found)
            } else {
                Err(Error::NotConnected)
            };
        }
        bus.write_byte(command).map_err(|_| Error::Bus)?;

        let mut last_zero = 0usize;
        for position in 1..=64usize {
            let id_bit = bus.read_bit().map_err(|_| Error::Bus)?;
            let cmp_bit = bus.read_bit().map_err(|_| Error::Bus)?;

            let byte = (position - 1) / 8;
            let mask = 1u8 << ((position - 1) % 8);

            let direction = match (id_bit, cmp_bit) {
                (true, true) => {
                    // An alarm search with no alarmed device ends here
                    if position == 1 && found.is_empty() {
                        return Ok(found);
                    }
                    warn!("onewire: device vanished at bit {}", position);
                    return Err(Error::NotConnected);
                }
                (true, false) => true,
                (false, true) => false,
                (false, false) => {
                    let take_one = if position < last_discrepancy {
                        rom[byte] & mask != 0
                    } else {
                        position == last_discrepancy
                    };
                    if !take_one {
                        last_zero = position;
                    }
                    take_one
                }
            };

            if direction {
                rom[byte] |= mask;
            } else {
                rom[byte] &= !mask;
            }
            bus.write_bit(direction).map_err(|_| Error::Bus)?;
        }

        let id = RomId::new(rom)?;
        trace!("onewire: found {}", id);
        if found.push(id).is_err() {
            break;
        }

        last_discrepancy = last_zero;
        if last_discrepancy == 0 {
            break;
        }
        if found.is_full() {
            warn!("onewire: search stopped at {} devices", MAX_DEVICES);
            break;
        }
    }

    Ok(found)
}
