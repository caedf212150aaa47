
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loader::{Record, RecordMetadata};
use crate::{RagError, Result};

/// A bounded slice of a record's text, the unit of embedding and retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The chunk text, at most `chunk_size` characters
    pub text: String,
    /// Position of the parent record in load order
    pub record_index: usize,
    /// Position of this chunk within the parent record
    pub chunk_index: usize,
    /// Metadata copied from the parent record
    pub metadata: RecordMetadata,
}

/// Configuration for splitting record text into chunks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Number of characters shared between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 50,
        }
    }
}

impl ChunkingConfig {
    /// Check that the parameters describe a valid sliding window.
    /// Invariant: `0 < chunk_overlap < chunk_size`.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "chunk_size must be positive".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }

    /// Characters advanced between consecutive window starts
    fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

/// Split one record into ordered, overlapping chunks.
///
/// Windows of `chunk_size` characters step forward by
/// `chunk_size - chunk_overlap`; the final window may be shorter. Text no
/// longer than `chunk_size` yields exactly one chunk equal to the whole
/// text. Window boundaries are `char` boundaries, never byte offsets.
#[expect(
    clippy::string_slice,
    reason = "offsets come from char_indices and are always char boundaries"
)]
#[inline]
pub fn chunk_record(
    record: &Record,
    record_index: usize,
    config: &ChunkingConfig,
) -> Result<Vec<Chunk>> {
    config.validate()?;

    let text = record.text.as_str();

    // Byte offset of every char boundary, including the end of the text
    let mut boundaries: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    boundaries.push(text.len());
    let char_count = boundaries.len() - 1;

    if char_count <= config.chunk_size {
        return Ok(vec![Chunk {
            text: text.to_string(),
            record_index,
            chunk_index: 0,
            metadata: record.metadata.clone(),
        }]);
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + config.chunk_size).min(char_count);
        let chunk_index = chunks.len();
        chunks.push(Chunk {
            text: text[boundaries[start]..boundaries[end]].to_string(),
            record_index,
            chunk_index,
            metadata: record.metadata.clone(),
        });

        if end == char_count {
            break;
        }
        start += config.step();
    }

    Ok(chunks)
}

/// Split every record in load order, keeping chunks grouped by record.
#[inline]
pub fn chunk_records(records: &[Record], config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    config.validate()?;

    let mut chunks = Vec::new();
    for (record_index, record) in records.iter().enumerate() {
        chunks.extend(chunk_record(record, record_index, config)?);
    }

    debug!(
        "Chunked {} records into {} chunks (size {}, overlap {})",
        records.len(),
        chunks.len(),
        config.chunk_size,
        config.chunk_overlap
    );

    Ok(chunks)
}
