//! Newline framing for streaming bodies.

use bytes::{Bytes, BytesMut};

/// Reassembles `\n`-terminated lines from arbitrarily split body frames.
///
/// A line may span several frames and a frame may hold several lines. Each
/// completed line is returned without its `\n` or `\r\n` terminator; blank
/// lines (keep-alives) are dropped. Bytes after the last newline stay
/// buffered until more data arrives.
#[derive(Debug, Default)]
pub(crate) struct LineSplitter {
    buffer: BytesMut,
    scanned: usize,
}

impl LineSplitter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a frame and returns every line it completes, in order.
    pub(crate) fn push(&mut self, frame: &[u8]) -> Vec<Bytes> {
        self.buffer.extend_from_slice(frame);

        let mut lines = Vec::new();
        while let Some(offset) = self.buffer[self.scanned..].iter().position(|b| *b == b'\n') {
            let end = self.scanned + offset;
            let mut line = self.buffer.split_to(end + 1);
            self.scanned = 0;

            line.truncate(end);
            if line.last() == Some(&b'\r') {
                line.truncate(end - 1);
            }
            if !line.is_empty() {
                lines.push(line.freeze());
            }
        }
        self.scanned = self.buffer.len();

        lines
    }

    /// Number of buffered bytes not yet terminated by a newline.
    pub(crate) fn pending(&self) -> usize {
        self.buffer.len()
    }
}
