use answer_core::StreamChunk;
use answer_logging::{answer_debug, answer_warn};
use bytes::BytesMut;

/// Marker that starts every payload line of the `/ask` stream.
pub const FRAME_PREFIX: &str = "data:";

/// Incremental splitter for the newline-delimited `/ask` response body.
///
/// Network chunks may end mid-line or mid-character, so bytes are buffered
/// until a full line is available. Lines without [`FRAME_PREFIX`] are ignored
/// and payloads that fail to decode are skipped.
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: BytesMut,
    max_frame_bytes: usize,
    /// Bytes of `buffer` already searched for a newline.
    scanned: usize,
    /// Set while dropping the remainder of an oversized line.
    discarding: bool,
}

impl FrameDecoder {
    pub fn new(max_frame_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            max_frame_bytes,
            scanned: 0,
            discarding: false,
        }
    }

    /// Feeds raw body bytes and returns every chunk completed by them, in order.
    ///
    /// Lines longer than `max_frame_bytes` are dropped whole, however the
    /// network split them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamChunk> {
        self.buffer.extend_from_slice(bytes);

        let mut chunks = Vec::new();
        while let Some(offset) = self.buffer[self.scanned..].iter().position(|b| *b == b'\n') {
            let end = self.scanned + offset;
            let line = self.buffer.split_to(end + 1);
            self.scanned = 0;
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if end > self.max_frame_bytes {
                self.warn_oversized(end);
                continue;
            }
            if let Some(chunk) = decode_frame(&line[..end]) {
                chunks.push(chunk);
            }
        }
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_frame_bytes {
            if !self.discarding {
                self.warn_oversized(self.buffer.len());
            }
            self.buffer.clear();
            self.scanned = 0;
            self.discarding = true;
        }
        chunks
    }

    /// Decodes a final line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<StreamChunk> {
        let line = self.buffer.split();
        self.scanned = 0;
        if std::mem::take(&mut self.discarding) || line.is_empty() {
            return None;
        }
        decode_frame(&line)
    }

    fn warn_oversized(&self, len: usize) {
        answer_warn!(
            "Dropping oversized frame: {} bytes, limit {}",
            len,
            self.max_frame_bytes
        );
    }
}

/// Decodes one line (without its `\n`). Returns `None` for blank lines,
/// non-data lines and malformed payloads.
pub fn decode_frame(line: &[u8]) -> Option<StreamChunk> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let text = match std::str::from_utf8(line) {
        Ok(text) => text,
        Err(err) => {
            answer_debug!("Skipping non-UTF-8 frame: {}", err);
            return None;
        }
    };
    let payload = text.strip_prefix(FRAME_PREFIX)?.trim();
    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => Some(chunk),
        Err(err) => {
            answer_debug!("Skipping malformed frame ({}): {}", err, payload);
            None
        }
    }
}
