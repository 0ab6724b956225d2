//! Incremental server-sent-events decoder.
//!
//! Network chunks arrive at arbitrary boundaries: a frame may be split
//! mid-line or mid-codepoint. The decoder buffers bytes until a valid UTF-8
//! prefix is available, then buffers text until a blank line closes a
//! frame. Each frame is emitted exactly once.

/// One decoded SSE frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Stateful decoder, fed one network chunk at a time
#[derive(Debug, Default)]
pub struct SseDecoder {
    bytes: Vec<u8>,
    text: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every frame it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.bytes.extend_from_slice(chunk);

        // move the maximal valid UTF-8 prefix into the text buffer; a
        // codepoint split across chunks stays in `bytes` until its tail
        // arrives
        let valid = match std::str::from_utf8(&self.bytes) {
            Ok(s) => s.len(),
            Err(e) => e.valid_up_to(),
        };
        if valid > 0 {
            // the prefix was just validated
            self.text
                .push_str(std::str::from_utf8(&self.bytes[..valid]).unwrap_or_default());
            self.bytes.drain(..valid);
        }

        let mut frames = Vec::new();
        while let Some(boundary) = self.text.find("\n\n") {
            let block: String = self.text.drain(..boundary + 2).collect();
            if let Some(frame) = parse_block(&block) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush at EOF: a final frame without a trailing blank line still counts.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let leftover = std::mem::take(&mut self.text);
        parse_block(&leftover)
    }
}

/// Parse one blank-line-delimited block into a frame.
///
/// Blocks without a `data:` line (comments, keep-alives) are skipped.
fn parse_block(block: &str) -> Option<SseFrame> {
    let mut event = String::new();
    let mut data = String::new();

    for line in block.lines() {
        if let Some(value) = line.strip_prefix("event: ") {
            event = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("data: ") {
            data = value.to_string();
        }
    }

    if data.is_empty() {
        return None;
    }
    Some(SseFrame { event, data })
}
