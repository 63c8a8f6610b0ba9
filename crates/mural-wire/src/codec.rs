//! Newline-delimited JSON framing
//!
//! Frame = compact JSON object + `\n`
//!
//! Compact JSON never contains a raw newline, so the delimiter cannot appear
//! inside a frame. Blank lines between frames are skipped.

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use mural_core::{MuralError, MuralResult};

/// Frame delimiter
pub const FRAME_DELIMITER: u8 = b'\n';

/// Default upper bound on a single frame, delimiter excluded
pub const MAX_FRAME_SIZE: usize = 8 * 1024 * 1024;

/// Serialize a message into one frame
pub fn encode<T: Serialize>(msg: &T) -> MuralResult<Vec<u8>> {
    let mut buf = serde_json::to_vec(msg).map_err(|e| MuralError::MalformedFrame(e.to_string()))?;
    buf.push(FRAME_DELIMITER);
    Ok(buf)
}

/// Parse the JSON object inside a frame
pub fn parse_value(frame: &[u8]) -> MuralResult<Value> {
    serde_json::from_slice(frame).map_err(|e| MuralError::MalformedFrame(e.to_string()))
}

/// Read the next frame.
///
/// Returns `Ok(None)` on a clean end of stream. Bytes left without a
/// delimiter at end of stream form a final frame.
pub async fn read_frame<R>(reader: &mut R, limit: usize) -> MuralResult<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut frame = Vec::new();
    loop {
        let (complete, used) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(finish(frame));
            }
            match available.iter().position(|&b| b == FRAME_DELIMITER) {
                Some(pos) => {
                    frame.extend_from_slice(&available[..pos]);
                    (true, pos + 1)
                }
                None => {
                    frame.extend_from_slice(available);
                    (false, available.len())
                }
            }
        };
        reader.consume(used);

        if frame.len() > limit {
            return Err(MuralError::FrameTooLarge {
                size: frame.len(),
                limit,
            });
        }

        if complete {
            if let Some(frame) = finish(std::mem::take(&mut frame)) {
                return Ok(Some(frame));
            }
        }
    }
}

/// Strip a trailing `\r` and drop blank frames
fn finish(mut frame: Vec<u8>) -> Option<Vec<u8>> {
    if frame.last() == Some(&b'\r') {
        frame.pop();
    }
    if frame.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(frame)
    }
}

/// Write one message as a frame and flush it
pub async fn write_frame<W, T>(writer: &mut W, msg: &T) -> MuralResult<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let bytes = encode(msg)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
