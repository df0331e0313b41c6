use std::io::{self, Write};

/// Wraps a `Write` and tracks the number of bytes written through it so
/// far, so that a serializer can record section offsets without a second
/// pass over the data.
pub struct CountingWriter<W> {
    underlying: W,
    bytes_written: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn wrap(underlying: W) -> CountingWriter<W> {
        CountingWriter {
            underlying,
            bytes_written: 0,
        }
    }

    pub fn written_bytes(&self) -> u64 {
        self.bytes_written
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.underlying)
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.underlying.write(buf)?;
        self.bytes_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.underlying.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_writer_tracks_length() {
        let mut writer = CountingWriter::wrap(Vec::new());
        writer.write_all(&[1, 2, 3]).unwrap();
        writer.write_all(&[4, 5]).unwrap();
        assert_eq!(writer.written_bytes(), 5);
        let buf = writer.finish().unwrap();
        assert_eq!(buf, vec![1, 2, 3, 4, 5]);
    }
}
