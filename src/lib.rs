// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! routedesk: a terminal route-planning desk.
//!
//! Orders are dragged between an `unassigned` column and one column per vehicle; the resulting
//! per-vehicle sequences are saved back to the routing backend as a solution document.
//!
//! - [`model`]: orders, vehicles, ids, solution documents.
//! - [`planner`]: the partition store and the drag reducer.
//! - [`api`]: collaborator traits and the REST client.
//! - [`store`]: JSON snapshot files and an in-memory store.
//! - [`ui`]: save-status bookkeeping shared with the board.
//! - [`tui`]: the ratatui board.

pub mod api;
pub mod model;
pub mod planner;
pub mod store;
pub mod tui;
pub mod ui;
