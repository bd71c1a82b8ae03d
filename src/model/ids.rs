// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A backend-issued numeric identifier.
///
/// The routing backend hands out positive integer ids for orders, vehicles and routes. The tag
/// parameter keeps them from being mixed up; zero and negative values are rejected because the
/// backend uses `0` as "no id" in its own payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: i64) -> Result<Self, IdError> {
        if value <= 0 {
            return Err(IdError::NotPositive(value));
        }
        Ok(Self { value, _marker: PhantomData })
    }

    pub fn get(self) -> i64 {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        f.write_str(buf.format(self.value))
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<i64>().map_err(|_| IdError::NotANumber(s.to_owned()))?;
        Self::new(value)
    }
}

impl<T> TryFrom<i64> for Id<T> {
    type Error = IdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    NotPositive(i64),
    NotANumber(String),
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive(value) => write!(f, "id must be positive (got {value})"),
            Self::NotANumber(raw) => write!(f, "id must be an integer (got {raw:?})"),
        }
    }
}

impl std::error::Error for IdError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderIdTag {}
pub type OrderId = Id<OrderIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleIdTag {}
pub type VehicleId = Id<VehicleIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteIdTag {}
pub type RouteId = Id<RouteIdTag>;

const UNASSIGNED_KEY: &str = "unassigned";
const VEHICLE_KEY_PREFIX: &str = "vehicle-";

/// Key of one planner container: the `unassigned` pool or one vehicle.
///
/// The string form (`unassigned`, `vehicle-<id>`) is stable and is what drag controllers use as
/// drop-target ids for whole columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerKey {
    Unassigned,
    Vehicle(VehicleId),
}

impl ContainerKey {
    pub fn vehicle_id(self) -> Option<VehicleId> {
        match self {
            Self::Unassigned => None,
            Self::Vehicle(vehicle_id) => Some(vehicle_id),
        }
    }

    pub fn is_unassigned(self) -> bool {
        matches!(self, Self::Unassigned)
    }
}

impl From<VehicleId> for ContainerKey {
    fn from(vehicle_id: VehicleId) -> Self {
        Self::Vehicle(vehicle_id)
    }
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => f.write_str(UNASSIGNED_KEY),
            Self::Vehicle(vehicle_id) => write!(f, "{VEHICLE_KEY_PREFIX}{vehicle_id}"),
        }
    }
}

impl FromStr for ContainerKey {
    type Err = ParseContainerKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == UNASSIGNED_KEY {
            return Ok(Self::Unassigned);
        }
        let Some(raw_id) = s.strip_prefix(VEHICLE_KEY_PREFIX) else {
            return Err(ParseContainerKeyError::UnknownPrefix(s.to_owned()));
        };
        let vehicle_id = raw_id
            .parse::<VehicleId>()
            .map_err(|source| ParseContainerKeyError::InvalidVehicleId { raw: s.to_owned(), source })?;
        Ok(Self::Vehicle(vehicle_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseContainerKeyError {
    UnknownPrefix(String),
    InvalidVehicleId { raw: String, source: IdError },
}

impl fmt::Display for ParseContainerKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPrefix(raw) => {
                write!(f, "container key must be '{UNASSIGNED_KEY}' or '{VEHICLE_KEY_PREFIX}<id>' (got {raw:?})")
            }
            Self::InvalidVehicleId { raw, source } => {
                write!(f, "invalid vehicle id in container key {raw:?}: {source}")
            }
        }
    }
}

impl std::error::Error for ParseContainerKeyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownPrefix(_) => None,
            Self::InvalidVehicleId { source, .. } => Some(source),
        }
    }
}
