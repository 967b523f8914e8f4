// Chunk framing for file payloads on the data channel.
//
// Wire form: a 4-character decimal length, left-justified and space-padded,
// immediately followed by that many payload bytes.

use crate::constants::{LENGTH_FIELD_WIDTH, MAX_FILE_CHUNK};
use crate::helpers::pad_message;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("Chunk payload of {0} bytes exceeds 4092")]
    PayloadTooLarge(usize),

    #[error("Malformed length field {0:?}")]
    MalformedLength(String),

    #[error("Length {0} outside 0..=4092")]
    LengthOutOfRange(usize),
}

/// Encodes `length` as the fixed-width length field.
pub fn encode_length(length: usize) -> Result<[u8; LENGTH_FIELD_WIDTH], FrameError> {
    if length > MAX_FILE_CHUNK {
        return Err(FrameError::PayloadTooLarge(length));
    }
    let padded = pad_message(length.to_string().as_bytes(), LENGTH_FIELD_WIDTH);
    let mut field = [b' '; LENGTH_FIELD_WIDTH];
    field.copy_from_slice(&padded);
    Ok(field)
}

/// Decodes a length field. Surrounding spaces are accepted.
pub fn decode_length(field: &[u8]) -> Result<usize, FrameError> {
    let text = std::str::from_utf8(field)
        .map_err(|_| FrameError::MalformedLength(String::from_utf8_lossy(field).into_owned()))?;
    let trimmed = text.trim_matches(' ');
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FrameError::MalformedLength(text.to_string()));
    }
    let length = trimmed
        .parse::<usize>()
        .map_err(|_| FrameError::MalformedLength(text.to_string()))?;
    if length > MAX_FILE_CHUNK {
        return Err(FrameError::LengthOutOfRange(length));
    }
    Ok(length)
}

/// Builds one packet: length field followed by the payload.
pub fn frame_chunk(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    let field = encode_length(payload.len())?;
    let mut packet = Vec::with_capacity(LENGTH_FIELD_WIDTH + payload.len());
    packet.extend_from_slice(&field);
    packet.extend_from_slice(payload);
    Ok(packet)
}

/// Reads one framed chunk from the receiving side of a data channel.
///
/// Returns `Ok(None)` when the sender closed the channel before a new
/// length field started, which is how a transfer ends.
pub async fn read_chunk<R>(reader: &mut R) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut field = [0u8; LENGTH_FIELD_WIDTH];
    let got = crate::helpers::read_full(reader, &mut field).await?;
    if got == 0 {
        return Ok(None);
    }
    if got < LENGTH_FIELD_WIDTH {
        return Err(std::io::ErrorKind::UnexpectedEof.into());
    }

    let length = decode_length(&field)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let mut payload = vec![0u8; length];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}
