// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

use super::ids::{OrderId, RouteId};

/// A delivery order as served by the backend's `/api/orders` endpoint.
///
/// Read-only for the planner: only `id`, `customer_name` and `demand` drive planning. The
/// remaining fields are carried so snapshots round-trip without losing backend data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    pub customer_name: SmolStr,
    pub demand: u32,
    pub lat: f64,
    pub lon: f64,
    #[serde(
        default,
        deserialize_with = "lenient_time_windows",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub time_windows: Vec<TimeWindow>,
    #[serde(default)]
    pub service_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<RouteId>,
}

impl Order {
    pub fn new(id: OrderId, customer_name: impl Into<SmolStr>, demand: u32) -> Self {
        Self {
            id,
            customer_id: None,
            customer_name: customer_name.into(),
            demand,
            lat: 0.0,
            lon: 0.0,
            time_windows: Vec::new(),
            service_duration: 0,
            created_at: None,
            status: None,
            route_id: None,
        }
    }

    pub fn with_position(mut self, lat: f64, lon: f64) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }
}

/// Delivery window in minutes from the start of the planning day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: u32,
    pub end: u32,
}

/// Last minute of the planning day; the open end of a window without an `end`.
const DAY_END_MINUTE: u32 = 1440;

/// Accepts every window shape the backend stores: `null`, a flat `[start, end]` pair, a list of
/// pairs, or a list of `{start, end}` objects. Anything else decodes as no windows.
fn lenient_time_windows<'de, D>(deserializer: D) -> Result<Vec<TimeWindow>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(time_windows_from_value).unwrap_or_default())
}

fn time_windows_from_value(value: &Value) -> Vec<TimeWindow> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    if let [start, end] = items.as_slice() {
        if let (Some(start), Some(end)) = (minutes(start), minutes(end)) {
            return vec![TimeWindow { start, end }];
        }
    }
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(TimeWindow {
                start: fields.get("start").and_then(minutes).unwrap_or(0),
                end: fields.get("end").and_then(minutes).unwrap_or(DAY_END_MINUTE),
            }),
            Value::Array(pair) => match pair.as_slice() {
                [start, end, ..] => Some(TimeWindow { start: minutes(start)?, end: minutes(end)? }),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn minutes(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|minutes| u32::try_from(minutes).ok())
}

/// Query filter for the order source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub route_id: Option<RouteId>,
}

impl OrderFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.route_id.is_none()
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = &self.status {
            if order.status.as_deref() != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(route_id) = self.route_id {
            if order.route_id != Some(route_id) {
                return false;
            }
        }
        true
    }
}
