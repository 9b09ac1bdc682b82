//! Error types for the unit drivers.

use core::fmt;

use embedded_hal_async::i2c::{ErrorKind, NoAcknowledgeSource};

/// Status code of a successful register operation.
pub const STATUS_OK: u8 = 0;

/// Status code when the register address was accepted but the data read was
/// refused.
pub const STATUS_NO_DATA: u8 = 10;

/// Offset added to the transport code when the register-select write of a
/// read fails.
pub const STATUS_ADDRESS_OFFSET: u8 = 100;

/// Byte some callers display in place of a failed single-byte read.
pub const BYTE_SENTINEL: u8 = 0xAA;

/// Value some callers display in place of a failed 4-byte read.
pub const LONG_SENTINEL: i32 = 0xDEAD_BEEF_u32 as i32;

/// Errors that can occur when communicating with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The register-select write that starts a read failed.
    Address(E),

    /// The register address was written but the unit refused the data read.
    NoData(E),

    /// A register write failed.
    Write(E),

    /// Payload exceeds the largest register block (8 bytes).
    PayloadTooLong(usize),

    /// Channel or LED index out of range.
    InvalidChannel(u8),

    /// Address does not fit in 7 bits.
    InvalidAddress(u8),
}

impl<E: embedded_hal_async::i2c::Error> Error<E> {
    /// Composite status code in the numbering of Arduino's `Wire` library.
    ///
    /// * `1..=9`: raw transport code of a failed write
    /// * `10`: data read refused
    /// * `100..`: raw transport code + 100 for a failed register select
    ///
    /// Argument errors never reach the bus and have no status code.
    pub fn status_code(&self) -> Option<u8> {
        match self {
            Error::Address(e) => Some(STATUS_ADDRESS_OFFSET + transport_code(e.kind())),
            Error::NoData(_) => Some(STATUS_NO_DATA),
            Error::Write(e) => Some(transport_code(e.kind())),
            Error::PayloadTooLong(_) => Some(1),
            Error::InvalidChannel(_) | Error::InvalidAddress(_) => None,
        }
    }
}

/// Map a bus error onto the `Wire::endTransmission` codes.
pub fn transport_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Overrun => 1,
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => 3,
        ErrorKind::NoAcknowledge(_) => 2,
        _ => 4,
    }
}

/// Validate a channel or LED index against `count`.
pub(crate) fn check_channel<E>(channel: u8, count: usize) -> Result<usize, Error<E>> {
    let index = channel as usize;
    if index < count {
        Ok(index)
    } else {
        Err(Error::InvalidChannel(channel))
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Address(e) => write!(f, "register select failed: {:?}", e),
            Error::NoData(e) => write!(f, "no data from unit: {:?}", e),
            Error::Write(e) => write!(f, "register write failed: {:?}", e),
            Error::PayloadTooLong(n) => write!(f, "payload of {} bytes exceeds 8", n),
            Error::InvalidChannel(ch) => write!(f, "invalid channel {}", ch),
            Error::InvalidAddress(addr) => write!(f, "invalid 7-bit address 0x{:02X}", addr),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Address(e) => defmt::write!(f, "register select failed: {}", e),
            Error::NoData(e) => defmt::write!(f, "no data from unit: {}", e),
            Error::Write(e) => defmt::write!(f, "register write failed: {}", e),
            Error::PayloadTooLong(n) => defmt::write!(f, "payload of {} bytes exceeds 8", n),
            Error::InvalidChannel(ch) => defmt::write!(f, "invalid channel {}", ch),
            Error::InvalidAddress(addr) => defmt::write!(f, "invalid 7-bit address {=u8:#x}", addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_codes_follow_wire_numbering() {
        assert_eq!(transport_code(ErrorKind::Overrun), 1);
        assert_eq!(transport_code(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)), 2);
        assert_eq!(transport_code(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)), 2);
        assert_eq!(transport_code(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)), 3);
        assert_eq!(transport_code(ErrorKind::Bus), 4);
        assert_eq!(transport_code(ErrorKind::ArbitrationLoss), 4);
        assert_eq!(transport_code(ErrorKind::Other), 4);
    }

    #[test]
    fn status_ranges_are_disjoint() {
        let nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
        assert_eq!(Error::Address(nack).status_code(), Some(102));
        assert_eq!(Error::NoData(nack).status_code(), Some(10));
        assert_eq!(Error::Write(nack).status_code(), Some(2));
        assert_eq!(Error::<ErrorKind>::PayloadTooLong(9).status_code(), Some(1));
        assert_eq!(Error::<ErrorKind>::InvalidChannel(8).status_code(), None);
        assert_eq!(Error::<ErrorKind>::InvalidAddress(0x80).status_code(), None);
    }

    #[test]
    fn long_sentinel_bit_pattern() {
        assert_eq!(LONG_SENTINEL as u32, 0xDEAD_BEEF);
    }
}
