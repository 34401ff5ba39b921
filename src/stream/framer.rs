//! Brace-depth framing of the `intel_gpu_top -J` output stream.
//!
//! `intel_gpu_top` prints one JSON object per sample, but the objects are
//! separated by `,` and newlines inside a never-closed top-level array, and
//! older builds print a banner first. We therefore do not parse the stream as
//! JSON at all: we count braces and cut out each top-level object.
//!
//! Limitation: braces inside string literals are counted like structural
//! braces. `intel_gpu_top` never emits such values, so this is not handled.

use log::warn;

/// Framer state between two calls to [`StreamFramer::feed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Waiting for the next `{`; everything else is discarded
    #[default]
    Idle,

    /// Accumulating an object; `depth` is always >= 1
    InObject { depth: usize },
}

/// Turns arbitrarily chunked bytes into complete top-level JSON object texts
///
/// **Public** - the first stage of the pipeline
///
/// The framer works on bytes, so a chunk boundary inside a multi-byte UTF-8
/// sequence is harmless. It is not `Sync`-shared: one producer owns it.
#[derive(Debug, Default)]
pub struct StreamFramer {
    state: ParserState,
    buffer: Vec<u8>,
    max_frame_bytes: Option<usize>,
    overflows: u64,
}

impl StreamFramer {
    /// Create an unbounded framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a framer that drops any frame growing past `max_frame_bytes`
    ///
    /// On overflow the partial frame is discarded and the framer goes back
    /// to [`ParserState::Idle`], resynchronizing on the next `{`.
    pub fn with_max_frame_bytes(max_frame_bytes: usize) -> Self {
        Self {
            max_frame_bytes: Some(max_frame_bytes),
            ..Self::default()
        }
    }

    /// Feed the next chunk of the stream
    ///
    /// **Public** - main entry point
    ///
    /// # Arguments
    /// * `chunk` - Next bytes of the stream, any size, any boundary
    ///
    /// # Returns
    /// Every frame completed by this chunk, in arrival order (possibly none)
    pub fn feed(&mut self, chunk: impl AsRef<[u8]>) -> Vec<String> {
        let mut frames = Vec::new();

        for &byte in chunk.as_ref() {
            match self.state {
                ParserState::Idle => {
                    if byte == b'{' {
                        self.buffer.clear();
                        self.buffer.push(byte);
                        self.state = ParserState::InObject { depth: 1 };
                    }
                }
                ParserState::InObject { depth } => {
                    self.buffer.push(byte);
                    if self.overflowed() {
                        continue;
                    }

                    let depth = match byte {
                        b'{' => depth + 1,
                        b'}' => depth - 1,
                        _ => depth,
                    };

                    if depth == 0 {
                        frames.push(self.take_frame());
                        self.state = ParserState::Idle;
                    } else {
                        self.state = ParserState::InObject { depth };
                    }
                }
            }
        }

        frames
    }

    /// Current state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Bytes held for the frame currently being accumulated
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of frames discarded because they exceeded the size cap
    pub fn overflow_count(&self) -> u64 {
        self.overflows
    }

    /// Emit the buffered frame and reset the buffer
    ///
    /// **Private** - invalid UTF-8 is replaced, the decoder rejects what it must
    fn take_frame(&mut self) -> String {
        let bytes = std::mem::take(&mut self.buffer);
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// Discard the buffer if it grew past the cap, including on the closing brace
    fn overflowed(&mut self) -> bool {
        let Some(cap) = self.max_frame_bytes else {
            return false;
        };

        if self.buffer.len() > cap {
            warn!(
                "Discarding partial frame of {} bytes (limit {}), resynchronizing",
                self.buffer.len(),
                cap
            );
            self.buffer = Vec::new();
            self.state = ParserState::Idle;
            self.overflows += 1;
            return true;
        }

        false
    }
}
