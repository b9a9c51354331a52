//! The logical protocol data unit surfaced to the application.
//!
//! A [`Packet`] is what the framing engine produces on ingress and consumes
//! on egress; it never appears on the wire directly; see
//! [`crate::framing`] for the header/checksum framing around it.

use crate::consts::MAX_PAYLOAD_USIZE;

/// Byte buffer type used throughout the crate for payload and wire storage.
///
/// Matches the no-std/std split used across this crate: a fixed-capacity
/// [`heapless::Vec`] when built without `std`, a heap-allocated
/// [`std::vec::Vec`] when `std` is enabled for hosted testing and tooling.
#[cfg(not(feature = "std"))]
pub type ByteBuf = heapless::Vec<u8, { crate::consts::MAX_WIRE_LEN_USIZE }>;
#[cfg(feature = "std")]
pub type ByteBuf = std::vec::Vec<u8>;

/// A decoded application packet.
///
/// `retries` is a 2-bit field (0..=3) and `type_` is a 4-bit field (0..=15);
/// both are stored widened to `u8` but [`Packet::header_byte`] masks them
/// down before packing so an out-of-range caller value cannot corrupt a
/// sibling field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Packet {
    /// Payload length in bytes, `0..=MAX_PAYLOAD`.
    pub length: u8,
    /// Power-down request flag.
    pub power_down: bool,
    /// Acknowledgement-requested flag.
    pub ack_requested: bool,
    /// Retry counter, 2 bits (0..=3).
    pub retries: u8,
    /// Application-defined packet type, 4 bits (0..=15).
    pub type_: u8,
    /// Payload bytes, `data[0..length]` significant.
    pub data: ByteBuf,
}

impl Packet {
    /// Packs the five header fields into a single byte per the layout in
    /// the wire format: `power_down`(7) `ack_requested`(6) `retries`(5-4)
    /// `type_`(3-0).
    pub fn header_byte(&self) -> u8 {
        ((self.power_down as u8) << 7)
            | ((self.ack_requested as u8) << 6)
            | ((self.retries & 0x03) << 4)
            | (self.type_ & 0x0f)
    }

    /// Builds a packet's header fields from a wire header byte, leaving
    /// `length` at `0` and `data` empty; the caller fills those in from the
    /// remainder of the wire buffer.
    pub fn from_header_byte(header: u8) -> Self {
        Self {
            length: 0,
            power_down: header & 0x80 != 0,
            ack_requested: header & 0x40 != 0,
            retries: (header >> 4) & 0x03,
            type_: header & 0x0f,
            data: ByteBuf::default(),
        }
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self {
            length: 0,
            power_down: false,
            ack_requested: false,
            retries: 0,
            type_: 0,
            data: ByteBuf::default(),
        }
    }
}

const _: () = assert!(MAX_PAYLOAD_USIZE <= u8::MAX as usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_byte_round_trip() {
        let mut pkt = Packet {
            length: 1,
            power_down: false,
            ack_requested: true,
            retries: 0,
            type_: 3,
            data: ByteBuf::default(),
        };
        let _ = pkt.data.push(0x00);
        assert_eq!(pkt.header_byte(), 0x43);

        let decoded = Packet::from_header_byte(0x43);
        assert_eq!(decoded.power_down, false);
        assert_eq!(decoded.ack_requested, true);
        assert_eq!(decoded.retries, 0);
        assert_eq!(decoded.type_, 3);
    }

    #[test]
    fn header_byte_masks_out_of_range_fields() {
        let pkt = Packet {
            length: 0,
            power_down: true,
            ack_requested: true,
            retries: 0xff,
            type_: 0xff,
            data: ByteBuf::default(),
        };
        // retries masked to 2 bits, type_ masked to 4 bits.
        assert_eq!(pkt.header_byte(), 0xff);
    }
}
