//! Global-singleton helpers for driving a [`HiJack`] from two interrupt
//! sources.
//!
//! `HiJack` takes a fundamentally different interrupt shape from the
//! single-tick driver these helpers are adapted from: a periodic
//! half-symbol transmit timer and an asynchronous rx edge capture, matching
//! spec.md §5's two-priority preemptive interrupt model. Both entry points
//! dispatch into one process-wide [`HiJack`] behind a `critical_section`
//! mutex, so neither interrupt context ever contends with the other or with
//! foreground code for longer than the critical section itself.

use crate::csm::{EdgeEvent, MicPin};
use crate::glue::HiJack;
use crate::packet::Packet;
use core::cell::RefCell;
use critical_section::Mutex;

/// Creates the `const` initializer for a global `Mutex<RefCell<Option<HiJack<M>>>>`.
///
/// # Example
/// ```rust
/// use hijack::glue::HiJack;
/// use hijack::timer::global_hijack_init;
/// # use embedded_hal_mock::eh1::digital::Mock as Pin;
/// use core::cell::RefCell;
/// use critical_section::Mutex;
///
/// static HIJACK: Mutex<RefCell<Option<HiJack<Pin>>>> = global_hijack_init::<Pin>();
/// ```
pub const fn global_hijack_init<M: MicPin>() -> Mutex<RefCell<Option<HiJack<M>>>> {
    Mutex::new(RefCell::new(None))
}

/// Initializes a global `HiJack` singleton declared via [`global_hijack_init`].
pub fn global_hijack_setup<M: MicPin>(global: &'static Mutex<RefCell<Option<HiJack<M>>>>, mic: M) {
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(HiJack::new(mic)));
    });
}

/// Advances the global `HiJack`'s transmit state machine by one half-symbol
/// tick. Call this from the platform's tx half-symbol timer interrupt.
pub fn global_hijack_tx_tick<M: MicPin>(global: &'static Mutex<RefCell<Option<HiJack<M>>>>) {
    critical_section::with(|cs| {
        if let Some(hj) = global.borrow(cs).borrow_mut().as_mut() {
            hj.on_tx_tick();
        }
    });
}

/// Feeds one rx edge event into the global `HiJack`. Call this from the
/// platform's edge-capture interrupt.
pub fn global_hijack_rx_edge<M: MicPin>(
    global: &'static Mutex<RefCell<Option<HiJack<M>>>>,
    event: EdgeEvent,
) {
    critical_section::with(|cs| {
        if let Some(hj) = global.borrow(cs).borrow_mut().as_mut() {
            hj.on_rx_edge(event);
        }
    });
}

/// Submits `pkt` for transmission through the global `HiJack`.
///
/// Returns `false` if the singleton has not been set up yet, or if
/// [`HiJack::send_packet`] rejected the packet (busy, too long, or the
/// coding state machine refused the buffer).
pub fn send_from_global_hijack<M: MicPin>(
    global: &'static Mutex<RefCell<Option<HiJack<M>>>>,
    pkt: &Packet,
) -> bool {
    critical_section::with(|cs| {
        let mut guard = global.borrow(cs).borrow_mut();
        match guard.as_mut() {
            Some(hj) => hj.send_packet(pkt) == crate::framing::SendPacketOutcome::Accepted,
            None => false,
        }
    })
}

/// Takes the most recently received, checksum-validated packet from the
/// global `HiJack`, if any has arrived since the last call.
pub fn receive_from_global_hijack<M: MicPin>(
    global: &'static Mutex<RefCell<Option<HiJack<M>>>>,
) -> Option<Packet> {
    critical_section::with(|cs| {
        let mut guard = global.borrow(cs).borrow_mut();
        guard.as_mut()?.take_received_packet()
    })
}
