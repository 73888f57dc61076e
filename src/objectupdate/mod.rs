// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-place updates applied to cloned template objects.

pub mod flags;
pub mod rbac;
pub mod workload;
