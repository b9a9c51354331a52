//! Tunable constants for the HiJack Manchester/framing stack.
//!
//! These mirror the handful of protocol-wide knobs the reference hardware
//! exposed as preprocessor defines: payload sizing, preamble/postamble
//! lengths, and the fuzzy-match tolerance used by the receive-side edge
//! classifier. They stay `pub const` rather than fields of a runtime config
//! struct, the same way the hardware this crate grew out of bakes its
//! protocol timing into a `consts` module instead of threading a config
//! object through the driver.

/// Maximum packet payload length, in bytes.
pub const MAX_PAYLOAD: u8 = 128;

/// See [`MAX_PAYLOAD`], as a `usize` for buffer sizing.
pub const MAX_PAYLOAD_USIZE: usize = MAX_PAYLOAD as usize;

/// Maximum length, in bytes, of a framed wire buffer: header + payload + checksum.
///
/// Distinct from [`MAX_PAYLOAD`] because the framing engine adds two bytes
/// of overhead on top of the payload; a `TooLong` check against the payload
/// cap alone would make it impossible to ever transmit a maximum-size packet.
pub const MAX_WIRE_LEN: u16 = MAX_PAYLOAD as u16 + 2;

/// See [`MAX_WIRE_LEN`], as a `usize` for buffer sizing.
pub const MAX_WIRE_LEN_USIZE: usize = MAX_WIRE_LEN as usize;

/// Number of inter-edge intervals the preamble-lock detector keeps in its
/// sliding window before it will attempt a start-bit match.
pub const RX_PREAMBLE_LEN: usize = 7;

/// Number of Manchester-encoded preamble bits the transmitter sends before
/// the start bit.
pub const PREAMBLE_BITS: u8 = 4;

/// Number of half-symbols of postamble sent after the last data bit,
/// including the final end-of-packet spike.
pub const POSTAMBLE_HALFSYMBOLS: u8 = 8;

/// Value of the Manchester-encoded preamble bit (always `1`).
pub const PREAMBLE_BIT: bool = true;

/// Value of the Manchester-encoded start bit (always `0`); its opposite
/// polarity relative to the preamble is what produces the double-width
/// interval the receiver locks onto.
pub const START_BIT: bool = false;

/// Denominator of the preamble-window uniformity test: the window is
/// considered locked when `max - min < average / UNIFORMITY_DIVISOR`.
pub const UNIFORMITY_DIVISOR: u32 = 10;

/// Numerator/denominator of the fraction of the measured symbol period
/// (`deltaT`) used as the Data-state fuzzy-match tolerance: intervals within
/// `deltaT * THRESHOLD_FRACTION_NUM / THRESHOLD_FRACTION_DEN` of a half or
/// full symbol period are treated as a match. `4/10` in the reference
/// firmware.
pub const THRESHOLD_FRACTION_NUM: u32 = 4;
pub const THRESHOLD_FRACTION_DEN: u32 = 10;

/// Divisor applied to the preamble-uniformity tolerance to get the
/// start-bit double-width interval match tolerance: half as strict as the
/// uniformity test itself.
pub const START_DOUBLE_WIDTH_MATCH_DIVISOR: u16 = 2;
