// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::ids::{ContainerKey, VehicleId};

/// A delivery vehicle as served by the backend's `/api/vehicles` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: SmolStr,
    /// Maximum aggregate demand; `None` means the backend did not report one.
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub start_lat: f64,
    #[serde(default)]
    pub start_lon: f64,
}

impl Vehicle {
    pub fn new(id: VehicleId, name: impl Into<SmolStr>, capacity: u32) -> Self {
        Self { id, name: name.into(), capacity: Some(capacity), start_lat: 0.0, start_lon: 0.0 }
    }

    pub fn container_key(&self) -> ContainerKey {
        ContainerKey::Vehicle(self.id)
    }
}
