//! ROT13 stream decoding

use std::io::{self, Read};

/// Rotates an ASCII letter by 13 places; other bytes pass through
pub fn rot13(byte: u8) -> u8 {
    match byte {
        b'A'..=b'M' | b'a'..=b'm' => byte + 13,
        b'N'..=b'Z' | b'n'..=b'z' => byte - 13,
        _ => byte,
    }
}

/// Reader that applies ROT13 to everything read from the inner reader
#[derive(Debug)]
pub struct Rot13Reader<R> {
    inner: R,
}

impl<R: Read> Rot13Reader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Rot13Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        for byte in &mut buf[..n] {
            *byte = rot13(*byte);
        }
        Ok(n)
    }
}
