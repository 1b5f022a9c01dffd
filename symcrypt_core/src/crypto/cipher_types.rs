use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::crypto::errors::CryptoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMode {
    ECB,
    CBC,
    PCBC,
    CFB,
    OFB,
    CTR,
    RandomDelta,
}

impl CipherMode {
    pub const ALL: [CipherMode; 7] = [
        CipherMode::ECB,
        CipherMode::CBC,
        CipherMode::PCBC,
        CipherMode::CFB,
        CipherMode::OFB,
        CipherMode::CTR,
        CipherMode::RandomDelta,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CipherMode::ECB => "ECB",
            CipherMode::CBC => "CBC",
            CipherMode::PCBC => "PCBC",
            CipherMode::CFB => "CFB",
            CipherMode::OFB => "OFB",
            CipherMode::CTR => "CTR",
            CipherMode::RandomDelta => "RD",
        }
    }

    pub fn requires_iv(self) -> bool {
        !matches!(self, CipherMode::ECB)
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherMode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CipherMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| CryptoError::UnknownMode(s.to_string()))
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingMode {
    None,
    Zeros,
    ANSI_X923,
    PKCS7,
    ISO10126,
}

impl PaddingMode {
    pub const ALL: [PaddingMode; 5] = [
        PaddingMode::None,
        PaddingMode::Zeros,
        PaddingMode::ANSI_X923,
        PaddingMode::PKCS7,
        PaddingMode::ISO10126,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PaddingMode::None => "NONE",
            PaddingMode::Zeros => "ZEROS",
            PaddingMode::ANSI_X923 => "ANSI_X923",
            PaddingMode::PKCS7 => "PKCS7",
            PaddingMode::ISO10126 => "ISO_10126",
        }
    }
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spaces are read as underscores, so `"ISO 10126"` parses.
impl FromStr for PaddingMode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace(' ', "_");
        PaddingMode::ALL
            .into_iter()
            .find(|padding| padding.name() == normalized)
            .ok_or_else(|| CryptoError::UnknownPadding(s.to_string()))
    }
}

/// Mode-specific parameters supplied at context construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraParams {
    /// Counter increment for `RD`.
    pub random_delta: Option<u128>,
}

impl ExtraParams {
    pub fn with_random_delta(delta: u128) -> Self {
        Self {
            random_delta: Some(delta),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherInput {
    Bytes(Vec<u8>),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherOutput {
    Buffer(Vec<u8>),
    File(PathBuf),
}

impl CipherOutput {
    pub fn buffer() -> Self {
        CipherOutput::Buffer(Vec::new())
    }

    /// The produced bytes when writing to memory.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            CipherOutput::Buffer(bytes) => Some(bytes),
            CipherOutput::File(_) => None,
        }
    }
}
