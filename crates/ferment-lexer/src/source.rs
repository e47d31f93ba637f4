//! Character-at-a-time reading over a byte stream.

use std::io::{self, BufRead};

/// Decodes UTF-8 characters from a reader, with room to push one back.
pub(crate) struct CharSource<R> {
    reader: R,
    pushback: Option<char>,
}

impl<R: BufRead> CharSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            pushback: None,
        }
    }

    /// Next character, or `None` once the stream is exhausted.
    pub(crate) fn read(&mut self) -> io::Result<Option<char>> {
        if let Some(c) = self.pushback.take() {
            return Ok(Some(c));
        }
        self.decode()
    }

    /// Returns `c` to the stream so the next [`read`](Self::read) yields it again.
    pub(crate) fn unread(&mut self, c: char) {
        debug_assert!(self.pushback.is_none(), "only one character of pushback");
        self.pushback = Some(c);
    }

    pub(crate) fn peek(&mut self) -> io::Result<Option<char>> {
        let c = self.read()?;
        if let Some(c) = c {
            self.unread(c);
        }
        Ok(c)
    }

    fn decode(&mut self) -> io::Result<Option<char>> {
        let mut buf = [0u8; 4];
        let lead = match self.reader.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.reader.consume(1);
        buf[0] = lead;

        let width = utf8_width(lead).ok_or_else(invalid_utf8)?;
        if width > 1 {
            self.reader.read_exact(&mut buf[1..width]).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    invalid_utf8()
                } else {
                    e
                }
            })?;
        }

        let s = std::str::from_utf8(&buf[..width]).map_err(|_| invalid_utf8())?;
        Ok(s.chars().next())
    }
}

fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}
