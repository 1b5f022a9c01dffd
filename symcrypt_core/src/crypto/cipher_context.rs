use std::sync::Arc;

use log::{debug, info};

use crate::crypto::algorithms::{adjust_key, Algorithm, AlgorithmInfo, ALGORITHMS};
use crate::crypto::cipher_io::{Sink, Source};
use crate::crypto::cipher_traits::SymmetricCipherWithRounds;
use crate::crypto::cipher_types::{CipherInput, CipherMode, CipherOutput, ExtraParams, PaddingMode};
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::mode_engine::{block_mask, Cipher, ModeEngine};
use crate::crypto::progress::{Progress, TransformHandle, TransformOutcome};

// 1MB of input per chunk
const CHUNK_SIZE: usize = 1024 * 1024;

/// In-memory buffers are addressed with a 32-bit signed block count.
pub const MEMORY_BLOCK_LIMIT: u64 = i32::MAX as u64;

/// Checks an `RD` increment against the block width and returns it masked.
pub fn validate_delta(delta: u128, block_size: usize) -> Result<u128> {
    let masked = delta & block_mask(block_size)?;
    let low = masked & 0xFF;
    let high = (masked >> (8 * (block_size - 1))) & 0xFF;
    if masked == 0 || low == 0 || high == 0 {
        return Err(CryptoError::UnsafeDelta(delta));
    }
    Ok(masked)
}

/// A block cipher bound to a mode, a padding and the mode's parameters.
///
/// Cheap to clone: clones share the keyed cipher.
#[derive(Clone)]
pub struct CipherContext {
    algorithm: Arc<Cipher>,
    mode: CipherMode,
    padding: PaddingMode,
    iv: Option<Vec<u8>>,
    delta: u128,
    parallelism: Option<usize>,
}

impl CipherContext {
    pub fn new(
        algorithm: Box<dyn SymmetricCipherWithRounds + Send + Sync>,
        mode: CipherMode,
        padding: PaddingMode,
        iv: Option<Vec<u8>>,
        params: ExtraParams,
    ) -> Result<Self> {
        let block_size = algorithm.block_size();
        if block_size == 0 {
            return Err(CryptoError::InconsistentArguments(
                "cipher reports an empty block".to_string(),
            ));
        }

        let iv = match (mode.requires_iv(), iv) {
            (true, None) => return Err(CryptoError::MissingIv(mode.name())),
            (true, Some(iv)) if iv.len() != block_size => {
                return Err(CryptoError::InvalidIvLength {
                    expected: block_size,
                    actual: iv.len(),
                })
            }
            (false, Some(_)) => {
                return Err(CryptoError::InconsistentArguments(format!(
                    "cipher mode {mode} does not take an initialization vector"
                )))
            }
            (_, iv) => iv,
        };

        let delta = match mode {
            CipherMode::CTR => {
                block_mask(block_size)?;
                1
            }
            CipherMode::RandomDelta => {
                validate_delta(params.random_delta.ok_or(CryptoError::MissingDelta)?, block_size)?
            }
            _ => 0,
        };

        debug!(
            "cipher context ready: {}-byte blocks, {} rounds, mode {}, padding {}",
            block_size,
            algorithm.rounds(),
            mode,
            padding
        );

        Ok(Self {
            algorithm: Arc::from(algorithm),
            mode,
            padding,
            iv,
            delta,
            parallelism: None,
        })
    }

    /// Number of stripes for parallel modes. `1` keeps everything on one thread.
    pub fn with_parallelism(mut self, lanes: usize) -> Self {
        self.parallelism = Some(lanes.max(1));
        self
    }

    pub fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    pub fn padding(&self) -> PaddingMode {
        self.padding
    }

    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_deref()
    }

    pub fn algorithm_info() -> &'static [AlgorithmInfo] {
        &ALGORITHMS
    }

    fn lanes(&self) -> usize {
        self.parallelism
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }

    fn chunk_blocks(&self) -> u64 {
        (CHUNK_SIZE / self.block_size()).max(1) as u64
    }

    fn check_block_limit(&self, blocks: u64, source: &Source, sink: &Sink) -> Result<()> {
        if (source.is_memory() || sink.is_memory()) && blocks > MEMORY_BLOCK_LIMIT {
            return Err(CryptoError::TooManyBlocks {
                blocks,
                limit: MEMORY_BLOCK_LIMIT,
            });
        }
        Ok(())
    }

    fn engine<'a>(&'a self, progress: &'a Progress) -> Result<ModeEngine<'a>> {
        ModeEngine::new(
            &*self.algorithm,
            self.mode,
            self.iv.as_deref(),
            self.delta,
            self.lanes(),
            progress,
        )
    }

    fn encrypt_stream(
        &self,
        source: &mut Source,
        sink: &mut Sink,
        progress: &Progress,
    ) -> Result<TransformOutcome<()>> {
        let block_size = self.block_size();
        let len = source.len();
        let blocks = self.padding.block_count(len, block_size)?;
        self.check_block_limit(blocks, source, sink)?;
        progress.set_total(blocks);

        let mut engine = self.engine(progress)?;
        let chunk_blocks = self.chunk_blocks();
        let mut input = Vec::new();
        let mut output = Vec::new();

        let mut block = 0u64;
        while block < blocks {
            let count = chunk_blocks.min(blocks - block);
            let start = block * block_size as u64;
            let chunk_len = count as usize * block_size;
            let available = (len - start).min(chunk_len as u64) as usize;

            input.resize(chunk_len, 0);
            source.read_at(start, &mut input[..available])?;
            if available < chunk_len {
                let last = chunk_len - block_size;
                self.padding
                    .set_padding(&mut input[last..], available.saturating_sub(last));
            }

            output.resize(chunk_len, 0);
            debug!("encrypting blocks {}..{}", block, block + count);
            engine.encrypt_chunk(block, &input, &mut output)?;
            if progress.is_cancel_requested() {
                return Ok(TransformOutcome::Cancelled);
            }
            sink.write(&output)?;
            block += count;
        }

        sink.finish(blocks * block_size as u64)?;
        Ok(TransformOutcome::Completed(()))
    }

    fn decrypt_stream(
        &self,
        source: &mut Source,
        sink: &mut Sink,
        progress: &Progress,
    ) -> Result<TransformOutcome<()>> {
        let block_size = self.block_size();
        let len = source.len();
        if len % block_size as u64 != 0 {
            return Err(CryptoError::MisalignedInput { len, block_size });
        }
        let blocks = len / block_size as u64;
        self.check_block_limit(blocks, source, sink)?;
        progress.set_total(blocks);

        let mut engine = self.engine(progress)?;
        let chunk_blocks = self.chunk_blocks();
        let mut input = Vec::new();
        let mut output = Vec::new();

        let mut block = 0u64;
        let mut written = 0u64;
        while block < blocks {
            let count = chunk_blocks.min(blocks - block);
            let chunk_len = count as usize * block_size;

            input.resize(chunk_len, 0);
            source.read_at(block * block_size as u64, &mut input)?;
            output.resize(chunk_len, 0);
            debug!("decrypting blocks {}..{}", block, block + count);
            engine.decrypt_chunk(block, &input, &mut output)?;
            if progress.is_cancel_requested() {
                return Ok(TransformOutcome::Cancelled);
            }

            let keep = if block + count == blocks {
                chunk_len - self.padding.padding_len(&output[chunk_len - block_size..])
            } else {
                chunk_len
            };
            sink.write(&output[..keep])?;
            written += keep as u64;
            block += count;
        }

        sink.finish(written)?;
        Ok(TransformOutcome::Completed(()))
    }

    fn process(
        &self,
        encrypt: bool,
        source: &mut Source,
        sink: &mut Sink,
        progress: &Progress,
    ) -> Result<TransformOutcome<()>> {
        if encrypt {
            self.encrypt_stream(source, sink, progress)
        } else {
            self.decrypt_stream(source, sink, progress)
        }
    }

    fn run(
        &self,
        encrypt: bool,
        input: &CipherInput,
        output: &mut CipherOutput,
        progress: &Progress,
    ) -> Result<TransformOutcome<()>> {
        let mut source = match input {
            CipherInput::Bytes(data) => Source::Memory(data.as_slice()),
            CipherInput::File(path) => Source::open(path)?,
        };

        match output {
            CipherOutput::Buffer(buffer) => {
                buffer.clear();
                let mut sink = Sink::Memory(buffer);
                self.process(encrypt, &mut source, &mut sink, progress)
            }
            CipherOutput::File(path) => {
                info!(
                    "{} {} bytes into {}",
                    if encrypt { "encrypting" } else { "decrypting" },
                    source.len(),
                    path.display()
                );
                let mut sink = Sink::create(path)?;
                self.process(encrypt, &mut source, &mut sink, progress)
            }
        }
    }

    fn memory(&self, encrypt: bool, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() + self.block_size());
        let progress = Progress::default();
        self.process(
            encrypt,
            &mut Source::Memory(data),
            &mut Sink::Memory(&mut out),
            &progress,
        )?;
        Ok(out)
    }

    pub fn encrypt_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.memory(true, data)
    }

    pub fn decrypt_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.memory(false, data)
    }

    /// Any combination of in-memory and file source and destination.
    pub fn encrypt_to(&self, input: &CipherInput, output: &mut CipherOutput) -> Result<()> {
        self.run(true, input, output, &Progress::default()).map(|_| ())
    }

    pub fn decrypt_to(&self, input: &CipherInput, output: &mut CipherOutput) -> Result<()> {
        self.run(false, input, output, &Progress::default()).map(|_| ())
    }

    fn spawn(&self, encrypt: bool, input: CipherInput, output: CipherOutput) -> TransformHandle<CipherOutput> {
        let this = self.clone();
        TransformHandle::spawn(Arc::new(Progress::default()), move |progress| {
            let mut output = output;
            Ok(match this.run(encrypt, &input, &mut output, progress)? {
                TransformOutcome::Completed(()) => TransformOutcome::Completed(output),
                TransformOutcome::Cancelled => TransformOutcome::Cancelled,
            })
        })
    }

    /// Starts encryption on tokio's blocking pool. The handle yields the filled `output`.
    pub fn encrypt_async(&self, input: CipherInput, output: CipherOutput) -> TransformHandle<CipherOutput> {
        self.spawn(true, input, output)
    }

    pub fn decrypt_async(&self, input: CipherInput, output: CipherOutput) -> TransformHandle<CipherOutput> {
        self.spawn(false, input, output)
    }

    pub async fn encrypt(&self, input: CipherInput, output: &mut CipherOutput) -> Result<()> {
        let handle = self.encrypt_async(input, std::mem::replace(output, CipherOutput::buffer()));
        *output = Self::finished(handle.wait().await?)?;
        Ok(())
    }

    pub async fn decrypt(&self, input: CipherInput, output: &mut CipherOutput) -> Result<()> {
        let handle = self.decrypt_async(input, std::mem::replace(output, CipherOutput::buffer()));
        *output = Self::finished(handle.wait().await?)?;
        Ok(())
    }

    fn finished(outcome: TransformOutcome<CipherOutput>) -> Result<CipherOutput> {
        outcome
            .completed()
            .ok_or_else(|| CryptoError::Task("transform was cancelled".to_string()))
    }
}

/// Resolves names, fits the key and builds a ready context.
pub fn construct_context(
    algorithm: &str,
    key: &[u8],
    mode: &str,
    padding: &str,
    iv: Option<&[u8]>,
    params: &ExtraParams,
) -> Result<CipherContext> {
    let algorithm: Algorithm = algorithm.parse()?;
    let mode: CipherMode = mode.parse()?;
    let padding: PaddingMode = padding.parse()?;

    let key = adjust_key(algorithm, key)?;
    debug!("constructing {} context with a {}-byte key", algorithm, key.len());

    CipherContext::new(
        algorithm.instantiate(&key)?,
        mode,
        padding,
        iv.map(<[u8]>::to_vec),
        params.clone(),
    )
}
