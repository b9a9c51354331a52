//! # hijack
//!
//! A portable, `no_std` Rust implementation of the **HiJack** audio-jack
//! modem: a two-layer software stack that turns a byte stream into a
//! Manchester-encoded half-symbol pin-toggle sequence on transmit, and a
//! stream of line-edge events back into decoded, checksummed packets on
//! receive.
//!
//! This crate implements only the two layers that matter: the
//! [`csm`] (Coding State Machine — Manchester edge timing) and the
//! [`framing`] engine (packet header/checksum framing) above it, coupled by
//! [`glue::HiJack`]. The microcontroller platform layer — GPIO toggling,
//! analog sampling, clock setup, the periodic timer peripheral driving the
//! half-symbol tick, and the I²C command surface some HiJack deployments
//! expose to a host — is out of scope; this crate models that boundary as
//! an injected pin capability ([`csm::MicPin`]) and two call-ins
//! ([`glue::HiJack::on_tx_tick`], [`glue::HiJack::on_rx_edge`]).
//!
//! ## Software Features
//!
//! - Manchester transmit state machine: preamble, start bit, data,
//!   postamble, driven by a half-symbol tick
//! - Edge-timing receive state machine: preamble-lock, start-bit
//!   calibration, same/different-bit classification against a measured
//!   symbol period
//! - Packet framing: header byte (power-down / ack-requested / retries /
//!   type) + payload + additive checksum
//! - Single-in-flight-sender lock on both the coding and framing layers
//! - `critical-section`-backed global singleton and ISR-dispatch macros for
//!   interrupt-driven platforms
//!
//! ## Crate features
//!
//! | Feature                | Description |
//! |-------------------------|-------------|
//! | `std`                   | Disables `#![no_std]` and replaces `heapless::Vec` with `std::vec::Vec` |
//! | `timer-isr` (default)   | Enables the `critical_section`-backed global singleton and macros in [`timer`] |
//! | `defmt-0-3`             | Derives `defmt::Format` on public types and logs rx drops via `defmt` |
//! | `log`                   | Logs rx drops via the `log` crate |
//!
//! ## Usage
//!
//! ```rust
//! use hijack::csm::MicPin;
//! use hijack::glue::HiJack;
//! use hijack::packet::Packet;
//! # use embedded_hal::digital::{ErrorType, OutputPin};
//! # use core::convert::Infallible;
//! #
//! # #[derive(Debug, Default)]
//! # struct MicPinImpl;
//! # impl ErrorType for MicPinImpl { type Error = Infallible; }
//! # impl OutputPin for MicPinImpl {
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl MicPin for MicPinImpl {
//! #     fn configure_as_output(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn configure_as_input(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let mut hijack = HiJack::new(MicPinImpl::default());
//!
//! let pkt = Packet {
//!     length: 0,
//!     power_down: false,
//!     ack_requested: false,
//!     retries: 0,
//!     type_: 1,
//!     data: Default::default(),
//! };
//! let _ = hijack.send_packet(&pkt);
//!
//! loop {
//!     hijack.on_tx_tick(); // called once per half-symbol by the platform timer
//!     # break; // for doctest purposes
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - The platform drives [`glue::HiJack::on_tx_tick`] from a periodic
//!   half-symbol timer, and [`glue::HiJack::on_rx_edge`] from an edge-capture
//!   interrupt; neither call blocks or allocates.
//! - Only one [`glue::HiJack`] instance should be active per mic pin.
//! - Received packets are delivered via [`glue::HiJack::take_received_packet`],
//!   polled from foreground code; delivery itself happens synchronously
//!   inside `on_rx_edge`'s interrupt context.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

#[cfg(all(feature = "timer-isr", not(feature = "std")))]
pub use heapless;

pub mod consts;
pub mod csm;
pub mod error;
pub mod framing;
pub mod glue;
pub mod packet;
pub mod timer;
