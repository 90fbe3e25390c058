//! Incremental chunking over a `Read` source
//!
//! Holds the bytes of the chunk being built plus `window + 1` bytes of
//! look-ahead, instead of the whole input.

use std::io::{self, Read};

use bytes::BytesMut;

use super::types::Chunk;
use crate::sync::rolling_hash::{BuzHash, RollingHash};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Iterator of chunks read from `R`, created by [`Chunker::stream`].
///
/// Boundaries and digests match the in-memory pass exactly. A read error is
/// yielded once and ends the stream.
///
/// [`Chunker::stream`]: super::Chunker::stream
pub struct ChunkStream<R> {
    reader: R,
    hash: BuzHash,
    mask: u64,
    /// Bytes from the start of the pending chunk up to the read frontier
    buffer: BytesMut,
    scratch: Vec<u8>,
    /// Source offset of `buffer[0]`
    offset: u64,
    /// Index in `buffer` of the next position to test
    pos: usize,
    primed: bool,
    eof: bool,
    done: bool,
}

impl<R: Read> ChunkStream<R> {
    pub(crate) fn new(reader: R, hash: BuzHash, mask: u64) -> Self {
        Self {
            reader,
            hash,
            mask,
            buffer: BytesMut::with_capacity(READ_BUFFER_SIZE),
            scratch: vec![0u8; READ_BUFFER_SIZE],
            offset: 0,
            pos: 0,
            primed: false,
            eof: false,
            done: false,
        }
    }

    /// Bytes consumed into emitted chunks so far
    pub fn bytes_emitted(&self) -> u64 {
        self.offset
    }

    fn fill(&mut self, needed: usize) -> io::Result<()> {
        while !self.eof && self.buffer.len() < needed {
            match self.reader.read(&mut self.scratch) {
                Ok(0) => self.eof = true,
                Ok(n) => self.buffer.extend_from_slice(&self.scratch[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        let window = self.hash.window_size();

        loop {
            self.fill(self.pos.saturating_add(window).saturating_add(1))?;

            // Short of look-ahead only at end of input
            let len = self.buffer.len();
            if self.pos >= len {
                return Ok(None);
            }

            if !self.primed {
                self.hash.initialize(&self.buffer, window.min(len));
                self.primed = true;
            }

            let incoming = self.pos.saturating_add(window).min(len - 1);
            let current = self.hash.roll(self.buffer[self.pos], self.buffer[incoming]);
            let last = self.eof && self.pos == len - 1;

            if u64::from(current) & self.mask == 0 || last {
                let data = self.buffer.split_to(self.pos + 1).freeze();
                let chunk = Chunk::new(self.offset, data);
                self.offset = chunk.end();
                self.pos = 0;
                return Ok(Some(chunk));
            }

            self.pos += 1;
        }
    }
}

impl<R: Read> Iterator for ChunkStream<R> {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Chunker, ChunkerConfig};
    use std::io::Cursor;

    /// Returns at most `step` bytes per read
    struct TrickleReader {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for TrickleReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Serves `good` bytes, then fails
    struct FailingReader {
        good: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.good == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "disk gone"));
            }
            let n = self.good.min(buf.len());
            buf[..n].fill(0xAB);
            self.good -= n;
            Ok(n)
        }
    }

    fn sample_data(len: usize) -> Vec<u8> {
        (0..len).map(|i| ((i * 7919) ^ (i >> 3)) as u8).collect()
    }

    #[test]
    fn test_stream_matches_in_memory() {
        for (len, chunk_size) in [(0, 64), (1, 64), (50, 64), (5000, 64), (100_000, 1024)] {
            let data = sample_data(len);
            let chunker = Chunker::new(ChunkerConfig::new(chunk_size)).unwrap();

            let expected = chunker.chunk_slice(&data);
            let streamed: Vec<Chunk> = chunker
                .stream(Cursor::new(data.clone()))
                .collect::<io::Result<_>>()
                .unwrap();

            assert_eq!(streamed, expected, "len {}, chunk_size {}", len, chunk_size);
        }
    }

    #[test]
    fn test_stream_short_reads() {
        let data = sample_data(20_000);
        let chunker = Chunker::new(ChunkerConfig::new(128)).unwrap();
        let expected = chunker.chunk_slice(&data);

        for step in [1, 3, 63, 64, 65, 1000] {
            let reader = TrickleReader {
                data: data.clone(),
                pos: 0,
                step,
            };
            let mut stream = chunker.stream(reader);
            let streamed: Vec<Chunk> = stream.by_ref().collect::<io::Result<_>>().unwrap();

            assert_eq!(streamed, expected, "step {}", step);
            assert_eq!(stream.bytes_emitted(), data.len() as u64);
        }
    }

    #[test]
    fn test_stream_read_error_ends_stream() {
        let chunker = Chunker::new(ChunkerConfig::new(64)).unwrap();
        let mut stream = chunker.stream(FailingReader { good: 100 });

        let err = stream
            .by_ref()
            .find_map(|item| item.err())
            .expect("read error should surface");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(stream.next().is_none());
    }
}
