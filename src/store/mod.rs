// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local persistence.
//!
//! A snapshot bundles orders, vehicles and an optional solution in one JSON document. It stands in
//! for the backend when editing offline, and backs the built-in demo.

pub mod snapshot_file;

pub use snapshot_file::{MemoryStore, Snapshot, SnapshotFile, StoreError, WriteDurability};
