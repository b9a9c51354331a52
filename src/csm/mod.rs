//! Manchester coding state machine.
//!
//! [`Csm`] turns a byte buffer into a half-symbol pin-toggle sequence on
//! transmit, and a stream of [`EdgeEvent`]s back into byte buffers on
//! receive. It owns no timer or capture peripheral itself; the platform
//! drives it by calling [`Csm::on_tx_tick`] once per half-symbol and
//! [`Csm::on_rx_edge`] once per line transition.
//!
//! For the bit-level transmit state machine, see [`tx`]. For the
//! edge-timing receive state machine, see [`rx`].

pub mod rx;
pub mod tx;

pub use rx::RxState;
pub use tx::TxState;

use crate::consts::MAX_WIRE_LEN_USIZE;
use crate::packet::ByteBuf;
use embedded_hal::digital::OutputPin;
use rx::CsmRx;
use tx::CsmTx;

/// A single transition observed on the receive line.
///
/// Produced by the platform's capture peripheral and fed to
/// [`Csm::on_rx_edge`]. `elapsed` must be linearly proportional to time and
/// non-decreasing across one packet; `level` is the new line level after
/// the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct EdgeEvent {
    /// Timer ticks elapsed since the previous edge.
    pub elapsed: u16,
    /// The new line level: `true` for high, `false` for low.
    pub level: bool,
}

/// The capability the coding state machine needs from the platform's mic
/// pin: drive a level, and switch direction between transmit and receive.
///
/// Builds on `embedded_hal::digital::OutputPin` for the level-driving half
/// (the same trait the reference hardware's TX/RX generics are bound on),
/// and adds the direction-switching methods `embedded-hal` has no standard
/// trait for. This plays the role of the reference firmware's
/// `pal_set_digital` / `pal_configure_mic` free functions, expressed as a
/// trait so the state machine can be driven without any global
/// function-pointer table.
pub trait MicPin: embedded_hal::digital::OutputPin {
    /// Switches the pin to output mode, for transmitting.
    fn configure_as_output(&mut self) -> Result<(), Self::Error>;

    /// Switches the pin to input mode, for receiving.
    fn configure_as_input(&mut self) -> Result<(), Self::Error>;
}

/// Outcome of a [`Csm::send_buffer`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum SendBufferOutcome {
    /// The buffer was accepted and transmission has started.
    Accepted,
    /// Another transmission is already in flight.
    Busy,
    /// The buffer exceeds the wire-format length limit.
    TooLong,
}

/// The Manchester coding state machine, generic over the platform's mic pin.
#[derive(Debug)]
pub struct Csm<M: MicPin> {
    mic: M,
    tx: CsmTx,
    rx: CsmRx,
}

impl<M: MicPin> Csm<M> {
    /// Creates a new coding state machine driving `mic`. The pin starts
    /// configured as input, matching the `Idle` tx sub-state.
    pub fn new(mic: M) -> Self {
        Self {
            mic,
            tx: CsmTx::new(),
            rx: CsmRx::new(),
        }
    }

    /// Submits `buf` for transmission. See [`tx::CsmTx::send_buffer`] for
    /// the full contract.
    pub fn send_buffer(&mut self, buf: &[u8]) -> SendBufferOutcome {
        if buf.len() > MAX_WIRE_LEN_USIZE {
            return SendBufferOutcome::TooLong;
        }
        let outcome = self.tx.send_buffer(buf);
        if outcome == SendBufferOutcome::Accepted {
            let _ = self.mic.configure_as_output();
        }
        outcome
    }

    /// Advances the transmit state machine by one half-symbol tick.
    ///
    /// Returns `true` exactly when this tick completed the postamble and
    /// the state machine has returned to `Idle` — the tx-done signal the
    /// framing engine uses to clear its in-flight flag.
    pub fn on_tx_tick(&mut self) -> bool {
        let action = self.tx.on_tick();
        if let Some(level) = action.write_level {
            let _ = if level {
                self.mic.set_high()
            } else {
                self.mic.set_low()
            };
        }
        if action.configure_input {
            let _ = self.mic.configure_as_input();
        }
        action.done
    }

    /// Feeds one receive-line edge into the decoder.
    ///
    /// Returns the decoded byte buffer when a packet boundary is
    /// recognized (clean terminator or salvageable partial byte, per the
    /// rx state machine's termination rule); `None` while still
    /// accumulating or after a silent drop.
    pub fn on_rx_edge(&mut self, event: EdgeEvent) -> Option<ByteBuf> {
        self.rx.on_edge(event)
    }

    /// Reference to the underlying mic pin, mainly for platform glue and tests.
    pub fn mic(&mut self) -> &mut M {
        &mut self.mic
    }
}


#[cfg(test)]
mod roundtrip {
    use super::rx::CsmRx;
    use super::tx::CsmTx;
    use super::{EdgeEvent, SendBufferOutcome};

    /// Ticks per unit of `elapsed` fed to the decoder. A scale of 1 makes
    /// the locked symbol period round down to a zero fuzzy-match tolerance;
    /// any factor large enough to keep that tolerance non-zero works.
    const TICK_SCALE: u16 = 100;

    /// Drives `tx` to completion and returns the pin-level timeline, one
    /// entry per half-symbol tick.
    fn drive_to_completion(tx: &mut CsmTx) -> std::vec::Vec<bool> {
        let mut levels = std::vec::Vec::new();
        loop {
            let action = tx.on_tick();
            levels.push(action.write_level.expect("tx writes a level while sending"));
            if action.done {
                break;
            }
        }
        levels
    }

    /// Collapses a level timeline into the edge events a capture peripheral
    /// would report: one per level change, `elapsed` scaled by the run
    /// length that just ended. The leading run is dropped since nothing
    /// observed its start.
    fn levels_to_edges(levels: &[bool]) -> std::vec::Vec<EdgeEvent> {
        let mut runs: std::vec::Vec<(bool, u16)> = std::vec::Vec::new();
        for &level in levels {
            match runs.last_mut() {
                Some((last_level, count)) if *last_level == level => *count += 1,
                _ => runs.push((level, 1)),
            }
        }

        runs.windows(2)
            .map(|pair| EdgeEvent {
                elapsed: pair[0].1 * TICK_SCALE,
                level: pair[1].0,
            })
            .collect()
    }

    fn round_trip(payload: &[u8]) {
        let mut tx = CsmTx::new();
        assert_eq!(tx.send_buffer(payload), SendBufferOutcome::Accepted);
        let levels = drive_to_completion(&mut tx);
        let edges = levels_to_edges(&levels);

        let mut rx = CsmRx::new();
        let mut decoded = None;
        for edge in edges {
            if let Some(buf) = rx.on_edge(edge) {
                decoded = Some(buf);
            }
        }
        // The postamble's trailing runs don't always land on an interval
        // the decoder reads as a terminator; force one, the same way a real
        // link eventually goes idle after the last edge.
        if decoded.is_none() {
            if let Some(buf) = rx.on_edge(EdgeEvent {
                elapsed: TICK_SCALE * 10,
                level: true,
            }) {
                decoded = Some(buf);
            }
        }

        let decoded = decoded.expect("payload round-trips through tx and rx");
        assert_eq!(&decoded[..], payload);
    }

    #[test]
    fn single_byte_round_trips() {
        round_trip(&[0x43]);
    }

    #[test]
    fn zero_byte_round_trips() {
        round_trip(&[0x00]);
    }

    #[test]
    fn multi_byte_round_trips() {
        round_trip(&[0x01, 0xFF, 0x80, 0x7E]);
    }
}
