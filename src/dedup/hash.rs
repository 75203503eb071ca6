//! Content fingerprinting for deduplication.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Read buffer size for streamed file hashing.
const BUFFER_SIZE: usize = 8192;

/// SHA-256 digest of a document's canonical bytes, as lower-case hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form used in log lines.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint an arbitrary byte sequence.
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    let digest = Sha256::digest(bytes);
    Fingerprint(format!("{:x}", digest))
}

/// Serialize a JSON value to its canonical (RFC 8785) byte form.
///
/// Object keys are sorted and numbers normalized, so two values that compare
/// equal always canonicalize to the same bytes.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>> {
    serde_jcs::to_vec(value).map_err(Error::Json)
}

/// Fingerprint the canonical form of a JSON value.
pub fn fingerprint_json(value: &Value) -> Result<Fingerprint> {
    Ok(fingerprint(&canonical_bytes(value)?))
}

/// Compute the fingerprint of a local file without loading it whole.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Fingerprint(format!("{:x}", hasher.finalize())))
}
