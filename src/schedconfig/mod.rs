// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reading and patching the scheduler configuration document.

pub mod extract;
mod locate;
pub mod patch;

pub use extract::{decode_profile, decode_profiles, extract, extract_all};
pub use patch::{render_config, scheduler_config};
