//! `chain_state.bin` holds a single 16-byte little-endian record:
//!
//! ```text
//! head_block_num       u32
//! head_trust_block_num u32
//! genesis_time         i64
//! ```
//!
//! There is no header, checksum or atomic rename. A crash in the middle of
//! [`ChainState::write`] can leave a record mixing old and new fields, and
//! [`ChainState::read`] cannot tell.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

pub const STATE_FILE_NAME: &str = "chain_state.bin";
pub const RECORD_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("chain state io failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadState {
    pub head_block_num: u32,
    pub head_trust_block_num: u32,
    pub genesis_time: i64,
}

impl HeadState {
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut out = [0u8; RECORD_LEN];
        out[..4].copy_from_slice(&self.head_block_num.to_le_bytes());
        out[4..8].copy_from_slice(&self.head_trust_block_num.to_le_bytes());
        out[8..].copy_from_slice(&self.genesis_time.to_le_bytes());
        out
    }

    /// Decodes up to [`RECORD_LEN`] bytes. Missing bytes read as zero, so a
    /// short record yields partially or fully default fields.
    pub fn decode_lenient(bytes: &[u8]) -> Self {
        let mut buf = [0u8; RECORD_LEN];
        let len = bytes.len().min(RECORD_LEN);
        buf[..len].copy_from_slice(&bytes[..len]);

        let mut u32_buf = [0u8; 4];
        u32_buf.copy_from_slice(&buf[..4]);
        let head_block_num = u32::from_le_bytes(u32_buf);
        u32_buf.copy_from_slice(&buf[4..8]);
        let head_trust_block_num = u32::from_le_bytes(u32_buf);
        let mut i64_buf = [0u8; 8];
        i64_buf.copy_from_slice(&buf[8..]);
        let genesis_time = i64::from_le_bytes(i64_buf);

        HeadState {
            head_block_num,
            head_trust_block_num,
            genesis_time,
        }
    }
}

/// Location of the head-state record. Single writer; callers serialize
/// access themselves.
#[derive(Debug, Clone)]
pub struct ChainState {
    path: PathBuf,
}

impl ChainState {
    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STATE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Overwrites the record in place.
    pub fn write(&self, state: &HeadState) -> Result<(), StateError> {
        fs::write(&self.path, state.encode())?;
        debug!(
            head = state.head_block_num,
            trust = state.head_trust_block_num,
            genesis = state.genesis_time,
            "chain state written"
        );
        Ok(())
    }

    /// Reads the record. A missing or short file is not an error: absent
    /// bytes come back as zero and a warning is logged.
    pub fn read(&self) -> HeadState {
        let mut raw = Vec::with_capacity(RECORD_LEN);
        let read = File::open(&self.path)
            .and_then(|file| file.take(RECORD_LEN as u64).read_to_end(&mut raw));
        match read {
            Ok(len) if len == RECORD_LEN => {}
            Ok(len) => warn!(path = %self.path.display(), len, "short chain state record"),
            Err(err) => warn!(path = %self.path.display(), %err, "chain state unreadable"),
        }
        HeadState::decode_lenient(&raw)
    }
}
