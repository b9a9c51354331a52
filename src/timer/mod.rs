//! Critical-section-backed singleton wiring for [`crate::glue::HiJack`].
//!
//! The modem has two interrupt sources instead of the single periodic tick
//! this module's ancestor drove: a half-symbol transmit timer and an
//! asynchronous rx edge capture. [`isr`] exposes the global-singleton
//! helpers for both, and [`macros`] wraps them the way the reference
//! firmware's `main.c` wires `pal_register_periodic_timer_cb` /
//! `pal_register_capture_cb` into one process-wide state object.
//!
//! Clock setup and timer-peripheral configuration (computing prescaler or
//! OCR values for a target half-symbol rate) are platform concerns this
//! crate does not model; see spec.md §1's exclusion of the platform layer.

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;
#[cfg(feature = "timer-isr")]
pub use macros::*;
