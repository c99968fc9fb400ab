// SPDX-License-Identifier: MIT

pub mod slices_utils;
pub mod tasks;
