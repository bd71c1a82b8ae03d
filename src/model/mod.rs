// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Orders and vehicles are read-only inputs served by the routing backend; solutions are the
//! documents the planner reads as a starting point and writes back on save.

pub mod fixtures;
pub mod ids;
pub mod order;
pub mod solution;
pub mod vehicle;

pub use ids::{
    ContainerKey, Id, IdError, OrderId, ParseContainerKeyError, RouteId, VehicleId,
};
pub use order::{Order, OrderFilter, TimeWindow};
pub use solution::{RouteRecord, RouteStep, RouteWrite, Solution, VehicleRoute};
pub use vehicle::Vehicle;
