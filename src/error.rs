//! Unified error type for the rare call site that wants a `Result`.
//!
//! The hot paths of this crate — [`crate::csm::Csm::on_tx_tick`],
//! [`crate::csm::Csm::on_rx_edge`], [`crate::csm::Csm::send_buffer`],
//! [`crate::framing::Fe::send_packet`] — return plain enums rather than
//! `Result<_, HiJackError>`, since allocation-free, non-unwinding returns
//! matter more than `?`-ergonomics in interrupt-adjacent code. `HiJackError`
//! exists for the facade's ergonomic helpers and for application code that
//! would rather propagate a single error type with `?`.

/// Errors a caller of the HiJack facade may want to propagate with `?`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum HiJackError {
    /// A send was requested while a previous one was still in flight.
    #[error("a transmission is already in progress")]
    Busy,
    /// The requested payload exceeds `MAX_PAYLOAD`.
    #[error("payload of {len} bytes exceeds the {max}-byte limit")]
    TooLong {
        /// Length of the rejected payload.
        len: usize,
        /// The configured maximum.
        max: usize,
    },
    /// The lower layer rejected a byte-buffer submission.
    #[error("lower layer rejected the outgoing buffer")]
    Fail,
}
