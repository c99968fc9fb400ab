// SPDX-License-Identifier: MIT

//! Range sums and the chunk split shared by every parallel strategy.

use crate::error::{Error, Result};

/// Half-open index range `[start, end)` into an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Sums `values[start..end]` into an `i64`.
///
/// Out-of-order or out-of-bounds ranges are rejected with
/// [`Error::InvalidRange`] rather than clamped.
pub fn sum_range(values: &[i32], start: usize, end: usize) -> Result<i64> {
    if start > end || end > values.len() {
        return Err(Error::InvalidRange {
            start,
            end,
            len: values.len(),
        });
    }
    Ok(sum_slice(&values[start..end]))
}

pub(crate) fn sum_slice(values: &[i32]) -> i64 {
    values.iter().map(|&v| i64::from(v)).sum()
}

/// Iterator over the `num_chunks` chunks of `[0, total_items)`.
///
/// Chunk `i` covers `[i * total_items / num_chunks, (i + 1) * total_items /
/// num_chunks)` with floor division, so chunk sizes differ by at most one
/// and the chunks tile the range with no gaps or overlaps. When
/// `num_chunks > total_items` some chunks are empty.
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    /// Total number of items to be split into chunks.
    total_items: usize,
    /// Number of chunks to produce.
    num_chunks: usize,
    /// The index of the next chunk to produce.
    current_chunk_index: usize,
}

impl ChunkSplitter {
    /// Fails with [`Error::InvalidPartitions`] when `num_chunks` is zero.
    pub fn new(total_items: usize, num_chunks: usize) -> Result<Self> {
        if num_chunks == 0 {
            return Err(Error::InvalidPartitions);
        }
        Ok(ChunkSplitter {
            total_items,
            num_chunks,
            current_chunk_index: 0,
        })
    }

    fn boundary(&self, index: usize) -> usize {
        // u128 keeps `index * total_items` from overflowing.
        (index as u128 * self.total_items as u128 / self.num_chunks as u128)
            as usize
    }
}

impl Iterator for ChunkSplitter {
    type Item = Chunk;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_chunk_index == self.num_chunks {
            return None;
        }
        let chunk = Chunk {
            start: self.boundary(self.current_chunk_index),
            end: self.boundary(self.current_chunk_index + 1),
        };
        self.current_chunk_index += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_chunks - self.current_chunk_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkSplitter {}

/// Collects the chunk boundaries for `num_chunks` chunks of
/// `[0, total_items)`.
pub fn partition_bounds(
    total_items: usize,
    num_chunks: usize,
) -> Result<Vec<Chunk>> {
    Ok(ChunkSplitter::new(total_items, num_chunks)?.collect())
}

/// Sums every chunk on the calling thread, pairing each chunk with its sum.
pub fn chunk_sums(
    values: &[i32],
    num_chunks: usize,
) -> Result<Vec<(Chunk, i64)>> {
    ChunkSplitter::new(values.len(), num_chunks)?
        .map(|chunk| Ok((chunk, sum_range(values, chunk.start, chunk.end)?)))
        .collect()
}
