// SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Immutable array shared by every strategy of a benchmark run.
///
/// The values live behind an `Arc` so pool tasks can hold onto them without
/// copying.
#[derive(Debug, Clone)]
pub struct Dataset {
    values: Arc<[i32]>,
}

impl Dataset {
    /// Draws `len` uniform integers from `[min, max]` using a generator
    /// seeded with `seed`. The same arguments always produce the same array.
    pub fn generate(
        len: usize,
        min: i32,
        max: i32,
        seed: u64,
    ) -> Result<Self> {
        if len == 0 {
            return Err(Error::EmptyArray);
        }
        if min > max {
            return Err(Error::InvalidBounds { min, max });
        }

        let values: Vec<i32> = StdRng::seed_from_u64(seed)
            .sample_iter(Uniform::new_inclusive(min, max))
            .take(len)
            .collect();

        Ok(Dataset {
            values: values.into(),
        })
    }

    pub fn from_vec(values: Vec<i32>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::EmptyArray);
        }
        Ok(Dataset {
            values: values.into(),
        })
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    /// Cheap clone of the backing storage, for moving into pool tasks.
    pub fn shared(&self) -> Arc<[i32]> {
        self.values.clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AsRef<[i32]> for Dataset {
    fn as_ref(&self) -> &[i32] {
        self.as_slice()
    }
}
