// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod objects;
pub mod removal;

pub use objects::{ManifestObject, ManifestSet, WaitPredicate, WaitableObject};
pub use removal::{plan_removal, RemovalPlan, StepOutcome};
