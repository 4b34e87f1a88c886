//! Timestamp encoding used for hashing.

use std::time::SystemTime;

/// Length of an encoded timestamp.
pub const TIMESTAMP_LEN: usize = 13;

/// Convert a given timestamp to a byte array.
///
/// The layout is a sign byte (1 before the UNIX epoch, 0 otherwise), the
/// whole seconds of the offset to the epoch as big endian `u64` and the
/// remaining nanoseconds as big endian `u32`. Distinct timestamps never
/// share an encoding.
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use treechain_client_api::time::system_time_to_bytes;
///
/// let time = SystemTime::UNIX_EPOCH + Duration::new(2, 1);
/// assert_eq!(
///     system_time_to_bytes(time),
///     [0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 1]
/// );
/// ```
#[must_use]
pub fn system_time_to_bytes(time: SystemTime) -> [u8; TIMESTAMP_LEN] {
    let (sign, offset) = match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(duration) => (0, duration),
        Err(err) => (1, err.duration()),
    };

    let mut bytes = [0; TIMESTAMP_LEN];
    bytes[0] = sign;
    bytes[1..9].copy_from_slice(&offset.as_secs().to_be_bytes());
    bytes[9..].copy_from_slice(&offset.subsec_nanos().to_be_bytes());
    bytes
}
