//! Glue: wires the coding state machine to the framing engine and exposes
//! the crate's sole public entry point, [`HiJack`].
//!
//! Mirrors the reference firmware's `main.c` initialization procedure,
//! which pointed each layer's callback slots at the other layer's
//! handlers. Here there are no callback slots to register — [`HiJack`]
//! owns both [`Csm`] and [`Fe`] directly and forwards between them inline,
//! per the "one owner, one capability" guidance: the facade is that one
//! owner, so there is nothing left to dispatch through a function pointer.

use crate::csm::{Csm, EdgeEvent, MicPin, SendBufferOutcome};
use crate::error::HiJackError;
use crate::framing::{Fe, SendPacketOutcome};
use crate::packet::Packet;

/// The HiJack modem: couples a [`Csm`] to an [`Fe`] and exposes packet-level
/// send/receive on top of the platform's two interrupt sources.
///
/// Applications construct one `HiJack` per mic pin, place it behind a
/// `critical_section::Mutex<RefCell<Option<HiJack<..>>>>` global (see
/// [`crate::timer::isr`]), and drive it from their tx-timer and rx-capture
/// interrupt handlers.
#[derive(Debug)]
pub struct HiJack<M: MicPin> {
    csm: Csm<M>,
    fe: Fe,
}

impl<M: MicPin> HiJack<M> {
    /// Creates a new facade driving `mic`.
    pub fn new(mic: M) -> Self {
        Self {
            csm: Csm::new(mic),
            fe: Fe::new(),
        }
    }

    /// Submits `pkt` for transmission. Returns `Busy` if a send is already
    /// in flight, `TooLong` if the payload exceeds `MAX_PAYLOAD`, `Fail` if
    /// the coding state machine rejected the serialized buffer.
    pub fn send_packet(&mut self, pkt: &Packet) -> SendPacketOutcome {
        let csm = &mut self.csm;
        self.fe.send_packet(pkt, |bytes| {
            csm.send_buffer(bytes) == SendBufferOutcome::Accepted
        })
    }

    /// Same as [`HiJack::send_packet`], but collapses the result to a
    /// `Result` for application code that prefers `?` over matching on the
    /// outcome enum. Not used on any hot path inside this crate.
    pub fn send_packet_checked(&mut self, pkt: &Packet) -> Result<(), HiJackError> {
        match self.send_packet(pkt) {
            SendPacketOutcome::Accepted => Ok(()),
            SendPacketOutcome::Busy => Err(HiJackError::Busy),
            SendPacketOutcome::Fail => Err(HiJackError::Fail),
            SendPacketOutcome::TooLong => Err(HiJackError::TooLong {
                len: pkt.length as usize,
                max: crate::consts::MAX_PAYLOAD_USIZE,
            }),
        }
    }

    /// Advances the transmit state machine by one half-symbol tick. Call
    /// this from the platform's tx half-symbol timer interrupt.
    pub fn on_tx_tick(&mut self) {
        if self.csm.on_tx_tick() {
            self.fe.on_buffer_sent(|| {});
        }
    }

    /// Feeds one receive-line edge into the decoder. Call this from the
    /// platform's edge-capture interrupt.
    pub fn on_rx_edge(&mut self, event: EdgeEvent) {
        if let Some(buf) = self.csm.on_rx_edge(event) {
            self.fe.on_buffer_received(&buf, |_pkt| {});
        }
    }

    /// Takes the most recently received, checksum-validated packet, if any
    /// has arrived since the last call. Safe to call from foreground code;
    /// internally this only touches state written under `on_rx_edge`.
    pub fn take_received_packet(&mut self) -> Option<Packet> {
        self.fe.take_received_packet()
    }

    /// Whether a packet send is currently in flight.
    pub fn is_sending(&self) -> bool {
        self.fe.is_sending()
    }

    /// Reference to the underlying mic pin, mainly for platform glue and tests.
    pub fn mic(&mut self) -> &mut M {
        self.csm.mic()
    }
}
