use crate::CodecError;

/// Reassembles newline-delimited lines from arbitrarily split chunks.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
    /// Inside an overlong line that was already reported; drop bytes up to
    /// its newline.
    discarding: bool,
}

impl LineDecoder {
    /// Upper bound on a single line, terminator excluded.
    pub const MAX_LINE: usize = 4096;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Returns the next complete line without its terminator, skipping blank
    /// lines. `None` means more input is needed. A line longer than
    /// [`Self::MAX_LINE`] is reported once as [`CodecError::LineTooLong`] and
    /// dropped entirely.
    pub fn next_line(&mut self) -> Option<Result<String, CodecError>> {
        loop {
            let Some(end) = self.buffer.iter().position(|b| *b == b'\n') else {
                if self.buffer.len() > Self::MAX_LINE {
                    let size = self.buffer.len();
                    self.buffer.clear();
                    if !self.discarding {
                        self.discarding = true;
                        return Some(Err(CodecError::LineTooLong(size)));
                    }
                }
                return None;
            };

            let mut line = self.buffer.drain(..=end).collect::<Vec<u8>>();
            if std::mem::take(&mut self.discarding) {
                continue;
            }

            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }
            if line.len() > Self::MAX_LINE {
                return Some(Err(CodecError::LineTooLong(line.len())));
            }

            return Some(String::from_utf8(line).map_err(|_| CodecError::InvalidUtf8));
        }
    }

    /// Drains whatever is left once the input has ended.
    pub fn finish(&mut self) -> Option<Result<String, CodecError>> {
        if std::mem::take(&mut self.discarding) {
            self.buffer.clear();
        }
        if self.buffer.is_empty() {
            return None;
        }
        self.buffer.push(b'\n');
        self.next_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reassembles_split_line() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"{\"type\":\"hr");
        assert!(decoder.next_line().is_none());
        decoder.push(b"m\"}\n{\"ty");
        assert_eq!(decoder.next_line().unwrap().unwrap(), "{\"type\":\"hrm\"}");
        assert!(decoder.next_line().is_none());
        assert_eq!(decoder.finish().unwrap().unwrap(), "{\"ty");
    }

    #[test]
    fn skips_blank_lines_and_crlf() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"\n\r\na\r\nb\n");
        assert_eq!(decoder.next_line().unwrap().unwrap(), "a");
        assert_eq!(decoder.next_line().unwrap().unwrap(), "b");
        assert!(decoder.next_line().is_none());
    }

    #[test]
    fn finish_flushes_unterminated_tail() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"tail");
        assert!(decoder.next_line().is_none());
        assert_eq!(decoder.finish().unwrap().unwrap(), "tail");
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut decoder = LineDecoder::new();
        decoder.push(&[0xFF, 0xFE, b'\n']);
        assert!(matches!(
            decoder.next_line(),
            Some(Err(CodecError::InvalidUtf8))
        ));
    }

    #[test]
    fn overlong_line_is_dropped() {
        let mut decoder = LineDecoder::new();
        decoder.push(&vec![b'x'; LineDecoder::MAX_LINE + 1]);
        assert!(matches!(
            decoder.next_line(),
            Some(Err(CodecError::LineTooLong(_)))
        ));
        assert!(decoder.next_line().is_none());
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn overlong_terminated_line_is_dropped() {
        let mut decoder = LineDecoder::new();
        let mut chunk = vec![b'x'; LineDecoder::MAX_LINE + 1000];
        chunk.extend_from_slice(b"\nok\n");
        decoder.push(&chunk);

        assert!(matches!(
            decoder.next_line(),
            Some(Err(CodecError::LineTooLong(5096)))
        ));
        assert_eq!(decoder.next_line().unwrap().unwrap(), "ok");
        assert!(decoder.next_line().is_none());
    }

    #[test]
    fn line_at_limit_is_kept() {
        let mut decoder = LineDecoder::new();
        let mut chunk = vec![b'x'; LineDecoder::MAX_LINE];
        chunk.push(b'\n');
        decoder.push(&chunk);
        assert_eq!(decoder.next_line().unwrap().unwrap().len(), LineDecoder::MAX_LINE);
    }

    #[test]
    fn overlong_line_split_across_chunks_reports_once() {
        let mut decoder = LineDecoder::new();
        for _ in 0..5 {
            decoder.push(&[b'x'; 1024]);
        }
        assert!(matches!(
            decoder.next_line(),
            Some(Err(CodecError::LineTooLong(5120)))
        ));

        decoder.push(&[b'x'; 1024]);
        assert!(decoder.next_line().is_none());
        decoder.push(b"xxxx\nok\n");
        assert_eq!(decoder.next_line().unwrap().unwrap(), "ok");
        assert!(decoder.next_line().is_none());
    }
}
