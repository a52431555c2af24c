//! Short reference codes linking a logged error to what the user was shown.
//!
//! Format: three uppercase ASCII letters followed by three digits (`QXR042`).
//! The space holds 26³ × 10³ ≈ 17.6M codes. Uniqueness is not checked; the
//! code is a support aid, not an identifier.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of every reference code.
pub const REFERENCE_CODE_LEN: usize = 6;

/// A six character `AAA###` support reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceCode([u8; REFERENCE_CODE_LEN]);

impl ReferenceCode {
    /// Draw a fresh code from the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Draw a fresh code from a caller-supplied RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; REFERENCE_CODE_LEN];
        for b in &mut bytes[..3] {
            *b = rng.gen_range(b'A'..=b'Z');
        }
        for b in &mut bytes[3..] {
            *b = rng.gen_range(b'0'..=b'9');
        }
        Self(bytes)
    }

    /// Validate a code quoted back by a user or support agent.
    ///
    /// Lowercase letters are accepted and normalized.
    pub fn parse(input: &str) -> Result<Self, ReferenceCodeError> {
        let input = input.trim();
        if input.len() != REFERENCE_CODE_LEN {
            return Err(ReferenceCodeError::InvalidLength { len: input.len() });
        }

        let mut bytes = [0u8; REFERENCE_CODE_LEN];
        for (i, c) in input.bytes().enumerate() {
            let c = c.to_ascii_uppercase();
            let valid = if i < 3 {
                c.is_ascii_uppercase()
            } else {
                c.is_ascii_digit()
            };
            if !valid {
                return Err(ReferenceCodeError::InvalidCharacter { position: i });
            }
            bytes[i] = c;
        }
        Ok(Self(bytes))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // Bytes are always ASCII letters and digits.
        std::str::from_utf8(&self.0).unwrap_or("??????")
    }
}

impl fmt::Display for ReferenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ReferenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceCode({})", self.as_str())
    }
}

impl FromStr for ReferenceCode {
    type Err = ReferenceCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReferenceCode {
    type Error = ReferenceCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferenceCode> for String {
    fn from(code: ReferenceCode) -> Self {
        code.as_str().to_owned()
    }
}

/// Rejection reasons for [`ReferenceCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceCodeError {
    /// Input is not six bytes long.
    InvalidLength { len: usize },
    /// Letter expected in 0..3 or digit expected in 3..6.
    InvalidCharacter { position: usize },
}

impl fmt::Display for ReferenceCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { len } => {
                write!(f, "Reference code must be {} characters, got {}", REFERENCE_CODE_LEN, len)
            }
            Self::InvalidCharacter { position } => {
                write!(f, "Invalid reference code character at position {}", position)
            }
        }
    }
}

impl std::error::Error for ReferenceCodeError {}
