//! Interrupt-driven quadrature decoder
//!
//! Decodes the two 90°-phase outputs of a mechanical or optical rotary
//! encoder into a signed step count, without polling.
//!
//! # Decoding
//!
//! The decoder keeps a 4-bit history `old_ab` of the previous and current
//! `(A, B)` samples. On every edge of either pin it shifts in the new
//! sample and looks the 4-bit value up in [`TRANSITIONS`]:
//!
//! ```text
//!   index = (A_prev B_prev A_now B_now)
//!
//!   +1 direction:  11 -> 01 -> 00 -> 10 -> 11
//!   -1 direction:  11 -> 10 -> 00 -> 01 -> 11
//! ```
//!
//! Unchanged samples (bounce) and diagonal jumps (a missed edge) yield 0.
//! The history is still updated, so the next interrupt decodes from the
//! state the pins are actually in.
//!
//! # Interrupt wiring
//!
//! [`QuadratureEncoder::on_edge`], [`QuadratureEncoder::position`] and
//! [`QuadratureEncoder::set_position`] take `&self` and only touch atomics,
//! so a configured encoder can be placed in a `static` and shared between
//! the GPIO interrupt vector and the main loop:
//!
//! ```ignore
//! static ENCODER: StaticCell<QuadratureEncoder<Pin, Pin>> = StaticCell::new();
//!
//! #[interrupt]
//! fn IO_IRQ_BANK0() {
//!     ENCODER_REF.on_edge();
//! }
//! ```
//!
//! On cores without atomic read-modify-write (Cortex-M0) `portable-atomic`
//! falls back to a critical section, so the application must link a
//! `critical-section` implementation.

use portable_atomic::{AtomicI32, AtomicU8, Ordering};

use ferrule_core::{Driver, DriverState, Error};
use ferrule_hal::gpio::{ConfigurablePin, Edge, InputPin, InterruptPin, PinMode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Count change for every `(previous, current)` sample pair
pub const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Steps per reported position: one position per full quadrature cycle
pub const DEFAULT_PRECISION: i32 = 4;

/// History value with both lines idle high
const IDLE_AB: u8 = 0b0011;

/// Quadrature decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadratureConfig {
    /// Steps per reported position; zero or negative selects the default of 4
    pub precision: i32,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl QuadratureConfig {
    /// Precision actually applied (always at least 1)
    pub fn effective_precision(&self) -> i32 {
        if self.precision <= 0 {
            DEFAULT_PRECISION
        } else {
            self.precision
        }
    }
}

/// Advance the sample history and decode the step
///
/// Returns the new 4-bit history and the count change it implies.
pub fn step(old_ab: u8, a: bool, b: bool) -> (u8, i8) {
    let ab = ((old_ab << 2) | ((a as u8) << 1) | b as u8) & 0x0F;
    (ab, TRANSITIONS[ab as usize])
}

/// Rotary encoder on two GPIO lines with edge interrupts
///
/// Edges are ignored until `configure` succeeds. `position` and
/// `set_position` work in any state and report 0 before any edge counted.
pub struct QuadratureEncoder<A, B> {
    pin_a: A,
    pin_b: B,
    /// Written only by `on_edge`
    old_ab: AtomicU8,
    /// Written by `on_edge` and `set_position`
    counter: AtomicI32,
    precision: i32,
    state: DriverState,
}

impl<A, B> QuadratureEncoder<A, B> {
    /// Create a new encoder
    ///
    /// Does not touch the pins; call `configure` to set them up.
    pub const fn new(pin_a: A, pin_b: B) -> Self {
        Self {
            pin_a,
            pin_b,
            old_ab: AtomicU8::new(IDLE_AB),
            counter: AtomicI32::new(0),
            precision: DEFAULT_PRECISION,
            state: DriverState::Created,
        }
    }

    /// Current position: raw step count divided by the precision
    ///
    /// Integer division, truncating toward zero.
    pub fn position(&self) -> i32 {
        self.counter.load(Ordering::Relaxed) / self.precision
    }

    /// Overwrite the position
    pub fn set_position(&self, position: i32) {
        self.counter
            .store(position.wrapping_mul(self.precision), Ordering::Relaxed);
    }

    /// Raw step count (4 per full quadrature cycle)
    pub fn count(&self) -> i32 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Steps per reported position
    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// Release the pins
    pub fn release(self) -> (A, B) {
        (self.pin_a, self.pin_b)
    }
}

impl<A: InputPin, B: InputPin> QuadratureEncoder<A, B> {
    /// Edge interrupt handler
    ///
    /// Call from the GPIO interrupt vector on every edge of either pin.
    /// Never blocks and never fails. Does nothing unless configured.
    pub fn on_edge(&self) {
        if !self.state.is_ready() {
            return;
        }
        let a = self.pin_a.is_high();
        let b = self.pin_b.is_high();
        let (ab, delta) = step(self.old_ab.load(Ordering::Relaxed), a, b);
        self.old_ab.store(ab, Ordering::Relaxed);
        if delta != 0 {
            self.counter.fetch_add(delta as i32, Ordering::Relaxed);
        }
    }
}

impl<A, B> QuadratureEncoder<A, B>
where
    A: InputPin + ConfigurablePin + InterruptPin,
    B: InputPin + ConfigurablePin + InterruptPin,
{
    fn setup_pins(&mut self) -> Result<(), Error> {
        self.pin_a.configure(PinMode::InputPullup);
        self.pin_a
            .set_interrupt(Edge::Toggle)
            .map_err(|_| Error::Unsupported)?;

        self.pin_b.configure(PinMode::InputPullup);
        if self.pin_b.set_interrupt(Edge::Toggle).is_err() {
            // Leave no half-wired decoder behind
            self.pin_a.clear_interrupt();
            return Err(Error::Unsupported);
        }
        Ok(())
    }
}

impl<A, B> Driver for QuadratureEncoder<A, B>
where
    A: InputPin + ConfigurablePin + InterruptPin,
    B: InputPin + ConfigurablePin + InterruptPin,
{
    type Config = QuadratureConfig;

    /// Configure both pins as pulled-up inputs with toggle interrupts
    ///
    /// Fails with [`Error::Unsupported`] if either pin cannot raise edge
    /// interrupts.
    fn configure(&mut self, config: QuadratureConfig) -> Result<(), Error> {
        let result = self.setup_pins();
        if result.is_ok() {
            self.precision = config.effective_precision();
            debug!("quadrature: configured, precision {}", self.precision);
        } else {
            warn!("quadrature: pins lack edge interrupts");
        }
        self.state.settle(result)
    }

    fn state(&self) -> DriverState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use ferrule_hal::gpio::InterruptError;
    use proptest::prelude::*;

    /// Input line whose level the test drives through a shared cell
    struct LinePin<'a> {
        level: &'a Cell<bool>,
        mode: Option<PinMode>,
        edge: Option<Edge>,
        has_interrupts: bool,
    }

    impl<'a> LinePin<'a> {
        fn new(level: &'a Cell<bool>) -> Self {
            Self {
                level,
                mode: None,
                edge: None,
                has_interrupts: true,
            }
        }

        fn without_interrupts(level: &'a Cell<bool>) -> Self {
            Self {
                has_interrupts: false,
                ..Self::new(level)
            }
        }
    }

    impl InputPin for LinePin<'_> {
        fn is_high(&self) -> bool {
            self.level.get()
        }
    }

    impl ConfigurablePin for LinePin<'_> {
        fn configure(&mut self, mode: PinMode) {
            self.mode = Some(mode);
        }
    }

    impl InterruptPin for LinePin<'_> {
        fn set_interrupt(&mut self, edge: Edge) -> Result<(), InterruptError> {
            if !self.has_interrupts {
                return Err(InterruptError::Unsupported);
            }
            self.edge = Some(edge);
            Ok(())
        }

        fn clear_interrupt(&mut self) {
            self.edge = None;
        }
    }

    /// Encoder plus the two line levels feeding it
    struct Rig {
        a: Cell<bool>,
        b: Cell<bool>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                a: Cell::new(true),
                b: Cell::new(true),
            }
        }

        fn encoder(&self) -> QuadratureEncoder<LinePin<'_>, LinePin<'_>> {
            let mut enc = QuadratureEncoder::new(LinePin::new(&self.a), LinePin::new(&self.b));
            enc.configure(QuadratureConfig::default()).unwrap();
            enc
        }

        /// Set both levels, then fire the interrupt handler
        fn sample(&self, enc: &QuadratureEncoder<LinePin<'_>, LinePin<'_>>, a: bool, b: bool) {
            self.a.set(a);
            self.b.set(b);
            enc.on_edge();
        }
    }

    #[test]
    fn test_configure_sets_pullups_and_toggle_interrupts() {
        let rig = Rig::new();
        let enc = rig.encoder();
        let (a, b) = enc.release();

        assert_eq!(a.mode, Some(PinMode::InputPullup));
        assert_eq!(b.mode, Some(PinMode::InputPullup));
        assert_eq!(a.edge, Some(Edge::Toggle));
        assert_eq!(b.edge, Some(Edge::Toggle));
    }

    #[test]
    fn test_clean_rotation() {
        let rig = Rig::new();
        let enc = rig.encoder();

        let mut history = IDLE_AB;
        let expected_index = [14u8, 8, 1, 7];
        for (i, &(a, b)) in [(true, false), (false, false), (false, true), (true, true)]
            .iter()
            .enumerate()
        {
            let (ab, delta) = step(history, a, b);
            assert_eq!(ab, expected_index[i]);
            assert_eq!(delta, -1);
            history = ab;

            rig.sample(&enc, a, b);
        }

        assert_eq!(enc.count(), -4);
        assert_eq!(enc.position(), -1);
    }

    #[test]
    fn test_illegal_jump_is_discarded() {
        let rig = Rig::new();
        let enc = rig.encoder();

        rig.sample(&enc, true, false);
        rig.sample(&enc, false, true);

        assert_eq!(enc.count(), -1);
    }

    #[test]
    fn test_bounce_does_not_count() {
        let rig = Rig::new();
        let enc = rig.encoder();

        rig.sample(&enc, true, true);
        rig.sample(&enc, true, true);

        assert_eq!(enc.count(), 0);
    }

    #[test]
    fn test_set_position_scales_by_precision() {
        let rig = Rig::new();
        let enc = rig.encoder();

        enc.set_position(3);
        assert_eq!(enc.count(), 12);
        assert_eq!(enc.position(), 3);

        enc.set_position(-2);
        assert_eq!(enc.count(), -8);
        assert_eq!(enc.position(), -2);
    }

    #[test]
    fn test_non_positive_precision_defaults() {
        let rig = Rig::new();
        let mut enc = QuadratureEncoder::new(LinePin::new(&rig.a), LinePin::new(&rig.b));

        enc.configure(QuadratureConfig { precision: 0 }).unwrap();
        assert_eq!(enc.precision(), 4);

        enc.configure(QuadratureConfig { precision: -3 }).unwrap();
        assert_eq!(enc.precision(), 4);

        enc.configure(QuadratureConfig { precision: 1 }).unwrap();
        rig.sample(&enc, true, false);
        assert_eq!(enc.position(), -1);
    }

    #[test]
    fn test_pin_without_interrupts_is_unsupported() {
        let rig = Rig::new();
        let mut enc = QuadratureEncoder::new(
            LinePin::new(&rig.a),
            LinePin::without_interrupts(&rig.b),
        );

        assert_eq!(
            enc.configure(QuadratureConfig::default()),
            Err(Error::Unsupported)
        );
        assert_eq!(enc.state(), DriverState::Failed(Error::Unsupported));
        assert_eq!(enc.state().ensure_ready(), Err(Error::Unsupported));

        // Pin A's interrupt was rolled back
        let (a, _) = enc.release();
        assert_eq!(a.edge, None);
    }

    #[test]
    fn test_edges_ignored_unless_configured() {
        let rig = Rig::new();
        let mut enc = QuadratureEncoder::new(
            LinePin::new(&rig.a),
            LinePin::without_interrupts(&rig.b),
        );

        rig.sample(&enc, true, false);
        assert_eq!(enc.count(), 0);

        assert!(enc.configure(QuadratureConfig::default()).is_err());
        rig.sample(&enc, false, false);
        assert_eq!(enc.count(), 0);
        assert_eq!(enc.position(), 0);
    }

    /// Position of a state on the +1 cycle 11 -> 01 -> 00 -> 10
    fn phase(a: bool, b: bool) -> i32 {
        match (a, b) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        }
    }

    proptest! {
        #[test]
        fn prop_each_interrupt_moves_at_most_one(
            samples in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..64)
        ) {
            let rig = Rig::new();
            let enc = rig.encoder();
            for (a, b) in samples {
                let before = enc.count();
                rig.sample(&enc, a, b);
                let delta = enc.count() - before;
                prop_assert!((-1..=1).contains(&delta));
            }
        }

        #[test]
        fn prop_legal_walk_tracks_phase(flips in proptest::collection::vec(any::<bool>(), 0..128)) {
            let rig = Rig::new();
            let enc = rig.encoder();
            let (mut a, mut b) = (true, true);
            for flip_a in flips {
                if flip_a { a = !a } else { b = !b }
                rig.sample(&enc, a, b);
            }
            prop_assert_eq!(enc.count().rem_euclid(4), phase(a, b));
        }

        #[test]
        fn prop_cycles_out_and_back_return_to_zero(cycles in 0usize..16) {
            let rig = Rig::new();
            let enc = rig.encoder();
            let forward = [(false, true), (false, false), (true, false), (true, true)];
            for _ in 0..cycles {
                for &(a, b) in &forward {
                    rig.sample(&enc, a, b);
                }
            }
            prop_assert_eq!(enc.count(), 4 * cycles as i32);
            for _ in 0..cycles {
                for &(a, b) in forward.iter().rev().skip(1).chain([(true, true)].iter()) {
                    rig.sample(&enc, a, b);
                }
            }
            prop_assert_eq!(enc.count(), 0);
        }
    }
}
