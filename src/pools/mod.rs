// SPDX-License-Identifier: MIT

pub mod handle;
pub mod standardpool;

pub use handle::TaskHandle;
pub use standardpool::{PoolState, StandardPool, Task};
