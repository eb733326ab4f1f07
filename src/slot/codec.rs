//! Slot codec
//!
//! Encoding and decoding of a single fixed-size slot.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{Slot, SlotState, HEADER_SIZE, PAYLOAD_CAPACITY, SLOT_SIZE};
use crate::error::{Result, SlotError};

/// Encode a slot into exactly `SLOT_SIZE` bytes
///
/// Format: state (1) + fingerprint (4, LE) + payload_len (2, LE) + payload,
/// zero-padded to the slot size.
pub fn encode(state: SlotState, fingerprint: u32, payload: &[u8]) -> Result<Bytes> {
    if payload.len() > PAYLOAD_CAPACITY {
        return Err(SlotError::PayloadTooBig {
            size: payload.len(),
            capacity: PAYLOAD_CAPACITY,
        });
    }

    let mut buf = BytesMut::with_capacity(SLOT_SIZE);
    buf.put_u8(state.as_byte());
    buf.put_u32_le(fingerprint);
    buf.put_u16_le(payload.len() as u16);
    buf.put_slice(payload);
    buf.resize(SLOT_SIZE, 0);

    Ok(buf.freeze())
}

/// Decode a slot from a `SLOT_SIZE` buffer
///
/// Rejects declared lengths past the slot capacity, so garbage is never read
/// as a giant payload. Unrecognized state tags decode as `SlotState::Unknown`.
pub fn decode(buf: &[u8]) -> Result<Slot> {
    if buf.len() != SLOT_SIZE {
        return Err(SlotError::Corruption(format!(
            "slot buffer is {} bytes, expected {}",
            buf.len(),
            SLOT_SIZE
        )));
    }

    let mut header = &buf[..HEADER_SIZE];
    let state = SlotState::from(header.get_u8());
    let fingerprint = header.get_u32_le();
    let payload_len = header.get_u16_le() as usize;

    if payload_len > PAYLOAD_CAPACITY {
        return Err(SlotError::Corruption(format!(
            "declared payload length {} exceeds capacity {}",
            payload_len, PAYLOAD_CAPACITY
        )));
    }

    Ok(Slot {
        state,
        fingerprint,
        payload: buf[HEADER_SIZE..HEADER_SIZE + payload_len].to_vec(),
    })
}
