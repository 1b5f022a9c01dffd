//! Block-cipher modes of operation over chunks of whole blocks.

use rayon::prelude::*;

use crate::crypto::byte_ops::{pack_be, unpack_be, xor, xor_in_place};
use crate::crypto::cipher_traits::SymmetricCipherWithRounds;
use crate::crypto::cipher_types::CipherMode;
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::progress::Progress;

/// Chunks with fewer blocks than this run on the calling thread.
pub(crate) const PARALLEL_THRESHOLD_BLOCKS: usize = 64;

pub(crate) type Cipher = dyn SymmetricCipherWithRounds + Send + Sync;

/// `(IV + i * delta) & mask`, one block wide.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Counter {
    base: u128,
    delta: u128,
    mask: u128,
    width: usize,
}

impl Counter {
    pub(crate) fn new(iv: &[u8], delta: u128) -> Result<Self> {
        let width = iv.len();
        Ok(Counter {
            base: unpack_be(iv)?,
            delta,
            mask: block_mask(width)?,
            width,
        })
    }

    pub(crate) fn block(&self, index: u64) -> Result<Vec<u8>> {
        let value = self
            .base
            .wrapping_add((index as u128).wrapping_mul(self.delta))
            & self.mask;
        pack_be(value, self.width)
    }
}

/// Largest block a counter can address.
pub(crate) const MAX_COUNTER_BLOCK: usize = 16;

/// All ones over `width` bytes. Counters only exist for 1 to 16 byte blocks.
pub(crate) fn block_mask(width: usize) -> Result<u128> {
    match width {
        0 => Err(CryptoError::InconsistentArguments(
            "counter block must not be empty".to_string(),
        )),
        MAX_COUNTER_BLOCK => Ok(u128::MAX),
        w if w < MAX_COUNTER_BLOCK => Ok((1u128 << (w * 8)) - 1),
        w => Err(CryptoError::InconsistentArguments(format!(
            "counter modes support blocks of at most {MAX_COUNTER_BLOCK} bytes, got {w}"
        ))),
    }
}

fn store(out: &mut [u8], block: Vec<u8>) -> Result<()> {
    if block.len() != out.len() {
        return Err(CryptoError::InvalidBlockLength {
            expected: out.len(),
            actual: block.len(),
        });
    }
    out.copy_from_slice(&block);
    Ok(())
}

/// Mode state carried from one chunk to the next.
pub(crate) struct ModeEngine<'a> {
    cipher: &'a Cipher,
    mode: CipherMode,
    block_size: usize,
    lanes: usize,
    progress: &'a Progress,
    counter: Option<Counter>,
    /// Previous ciphertext (CBC, CFB), `P ^ C` (PCBC) or keystream (OFB).
    feedback: Vec<u8>,
}

impl<'a> ModeEngine<'a> {
    pub(crate) fn new(
        cipher: &'a Cipher,
        mode: CipherMode,
        iv: Option<&[u8]>,
        delta: u128,
        lanes: usize,
        progress: &'a Progress,
    ) -> Result<Self> {
        let block_size = cipher.block_size();
        let feedback = match (mode.requires_iv(), iv) {
            (false, _) => Vec::new(),
            (true, Some(iv)) => iv.to_vec(),
            (true, None) => return Err(CryptoError::MissingIv(mode.name())),
        };
        let counter = match mode {
            CipherMode::CTR | CipherMode::RandomDelta => Some(Counter::new(&feedback, delta)?),
            _ => None,
        };

        Ok(ModeEngine {
            cipher,
            mode,
            block_size,
            lanes: lanes.max(1),
            progress,
            counter,
            feedback,
        })
    }

    /// Whether this direction of the mode can spread blocks across stripes.
    pub(crate) fn is_parallel(mode: CipherMode, encrypt: bool) -> bool {
        match mode {
            CipherMode::ECB | CipherMode::CTR | CipherMode::RandomDelta => true,
            CipherMode::CBC | CipherMode::CFB => !encrypt,
            CipherMode::PCBC | CipherMode::OFB => false,
        }
    }

    fn cancelled(&self) -> bool {
        self.progress.is_cancel_requested()
    }

    /// Runs `f(i, out_i)` for every block of `output`.
    ///
    /// Blocks are dealt to `lanes` interleaved stripes: stripe `s` handles
    /// blocks `s, s + lanes, s + 2 * lanes, ...`. Stripes write disjoint blocks.
    fn striped<F>(&self, output: &mut [u8], f: F) -> Result<()>
    where
        F: Fn(usize, &mut [u8]) -> Result<()> + Sync,
    {
        let block_size = self.block_size;
        let blocks = output.len() / block_size;
        let lanes = self.lanes.min(blocks);
        let progress = self.progress;

        if lanes <= 1 || blocks < PARALLEL_THRESHOLD_BLOCKS {
            for (i, out) in output.chunks_mut(block_size).enumerate() {
                if progress.is_cancel_requested() {
                    break;
                }
                f(i, out)?;
                progress.advance(1);
            }
            return Ok(());
        }

        let mut stripes: Vec<Vec<(usize, &mut [u8])>> = (0..lanes)
            .map(|_| Vec::with_capacity(blocks / lanes + 1))
            .collect();
        for (i, out) in output.chunks_mut(block_size).enumerate() {
            stripes[i % lanes].push((i, out));
        }

        stripes.into_par_iter().try_for_each(|stripe| {
            for (i, out) in stripe {
                if progress.is_cancel_requested() {
                    break;
                }
                f(i, out)?;
                progress.advance(1);
            }
            Ok(())
        })
    }

    fn keystream(&self, input: &[u8], output: &mut [u8], first_block: u64) -> Result<()> {
        let counter = self
            .counter
            .ok_or_else(|| CryptoError::InconsistentArguments("counter mode without a counter".into()))?;
        let block_size = self.block_size;
        let cipher = self.cipher;
        self.striped(output, |i, out| {
            let pad = cipher.encrypt(&counter.block(first_block + i as u64)?)?;
            store(out, xor(&input[i * block_size..(i + 1) * block_size], &pad)?)
        })
    }

    /// Encrypts `input` into `output`. Both hold the same whole number of blocks;
    /// `first_block` is the global index of the first one.
    pub(crate) fn encrypt_chunk(&mut self, first_block: u64, input: &[u8], output: &mut [u8]) -> Result<()> {
        let block_size = self.block_size;
        let cipher = self.cipher;
        match self.mode {
            CipherMode::ECB => self.striped(output, |i, out| {
                store(out, cipher.encrypt(&input[i * block_size..(i + 1) * block_size])?)
            }),
            CipherMode::CBC => {
                for (plain, out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
                    if self.cancelled() {
                        break;
                    }
                    store(out, cipher.encrypt(&xor(plain, &self.feedback)?)?)?;
                    self.feedback.copy_from_slice(out);
                    self.progress.advance(1);
                }
                Ok(())
            }
            CipherMode::PCBC => {
                for (plain, out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
                    if self.cancelled() {
                        break;
                    }
                    store(out, cipher.encrypt(&xor(plain, &self.feedback)?)?)?;
                    self.feedback = xor(plain, out)?;
                    self.progress.advance(1);
                }
                Ok(())
            }
            CipherMode::CFB => {
                for (plain, out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
                    if self.cancelled() {
                        break;
                    }
                    store(out, xor(plain, &cipher.encrypt(&self.feedback)?)?)?;
                    self.feedback.copy_from_slice(out);
                    self.progress.advance(1);
                }
                Ok(())
            }
            CipherMode::OFB => self.output_feedback(input, output),
            CipherMode::CTR | CipherMode::RandomDelta => self.keystream(input, output, first_block),
        }
    }

    pub(crate) fn decrypt_chunk(&mut self, first_block: u64, input: &[u8], output: &mut [u8]) -> Result<()> {
        let block_size = self.block_size;
        let cipher = self.cipher;
        match self.mode {
            CipherMode::ECB => self.striped(output, |i, out| {
                store(out, cipher.decrypt(&input[i * block_size..(i + 1) * block_size])?)
            }),
            CipherMode::CBC => {
                let carried = self.feedback.as_slice();
                self.striped(output, |i, out| {
                    let previous = if i == 0 {
                        carried
                    } else {
                        &input[(i - 1) * block_size..i * block_size]
                    };
                    let mut plain = cipher.decrypt(&input[i * block_size..(i + 1) * block_size])?;
                    xor_in_place(&mut plain, previous)?;
                    store(out, plain)
                })?;
                self.carry_last_block(input);
                Ok(())
            }
            CipherMode::PCBC => {
                for (encrypted, out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
                    if self.cancelled() {
                        break;
                    }
                    store(out, xor(&cipher.decrypt(encrypted)?, &self.feedback)?)?;
                    self.feedback = xor(encrypted, out)?;
                    self.progress.advance(1);
                }
                Ok(())
            }
            CipherMode::CFB => {
                let carried = self.feedback.as_slice();
                self.striped(output, |i, out| {
                    let previous = if i == 0 {
                        carried
                    } else {
                        &input[(i - 1) * block_size..i * block_size]
                    };
                    let pad = cipher.encrypt(previous)?;
                    store(out, xor(&input[i * block_size..(i + 1) * block_size], &pad)?)
                })?;
                self.carry_last_block(input);
                Ok(())
            }
            CipherMode::OFB => self.output_feedback(input, output),
            CipherMode::CTR | CipherMode::RandomDelta => self.keystream(input, output, first_block),
        }
    }

    /// OFB is its own inverse.
    fn output_feedback(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        let block_size = self.block_size;
        for (data, out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
            if self.cancelled() {
                break;
            }
            self.feedback = self.cipher.encrypt(&self.feedback)?;
            store(out, xor(data, &self.feedback)?)?;
            self.progress.advance(1);
        }
        Ok(())
    }

    fn carry_last_block(&mut self, input: &[u8]) {
        if input.len() >= self.block_size {
            self.feedback
                .copy_from_slice(&input[input.len() - self.block_size..]);
        }
    }
}
