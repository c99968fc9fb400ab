// SPDX-License-Identifier: MIT

use std::sync::Arc;

/// Array `[0, 1, ..., n - 1]`, whose sum is `n * (n - 1) / 2`.
pub fn iota(n: usize) -> Vec<i32> {
    (0..n as i32).collect()
}

/// Closed-form sum of [`iota`].
pub fn iota_sum(n: usize) -> i64 {
    let n = n as i64;
    n * (n - 1) / 2
}

/// Array of `n` ones, shared for pool tasks.
pub fn shared_ones(n: usize) -> Arc<[i32]> {
    vec![1i32; n].into()
}

/// Array alternating between `high` and `-high`, so that chunk sums cancel
/// out unless a chunk boundary is misplaced.
pub fn alternating(n: usize, high: i32) -> Vec<i32> {
    (0..n)
        .map(|i| if i % 2 == 0 { high } else { -high })
        .collect()
}
