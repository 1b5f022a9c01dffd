use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::crypto::errors::Result;

/// Where plaintext or ciphertext is read from, chunk by chunk.
pub(crate) enum Source<'a> {
    Memory(&'a [u8]),
    File { file: File, len: u64 },
}

impl<'a> Source<'a> {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Source::File { file, len })
    }

    pub(crate) fn len(&self) -> u64 {
        match self {
            Source::Memory(data) => data.len() as u64,
            Source::File { len, .. } => *len,
        }
    }

    pub(crate) fn is_memory(&self) -> bool {
        matches!(self, Source::Memory(_))
    }

    /// Fills `buf` with the bytes starting at `offset`.
    pub(crate) fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        match self {
            Source::Memory(data) => {
                let start = offset as usize;
                buf.copy_from_slice(&data[start..start + buf.len()]);
            }
            Source::File { file, .. } => {
                file.seek(SeekFrom::Start(offset))?;
                file.read_exact(buf)?;
            }
        }
        Ok(())
    }
}

/// Destination written strictly in order.
pub(crate) enum Sink<'a> {
    Memory(&'a mut Vec<u8>),
    File(File),
}

impl<'a> Sink<'a> {
    /// Creates or truncates the file at `path`.
    pub(crate) fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Sink::File(file))
    }

    pub(crate) fn is_memory(&self) -> bool {
        matches!(self, Sink::Memory(_))
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> Result<()> {
        match self {
            Sink::Memory(buffer) => buffer.extend_from_slice(data),
            Sink::File(file) => file.write_all(data)?,
        }
        Ok(())
    }

    /// Cuts the output to exactly `len` bytes.
    pub(crate) fn finish(&mut self, len: u64) -> Result<()> {
        match self {
            Sink::Memory(buffer) => buffer.truncate(len as usize),
            Sink::File(file) => {
                file.flush()?;
                file.set_len(len)?;
            }
        }
        Ok(())
    }
}
