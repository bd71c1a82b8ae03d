// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Route solution documents.
//!
//! The same document shape is produced by the planner on save and by the backend optimizer, with
//! one wrinkle: optimizer output names the vehicle `vehicle_db_id` and includes depot start/end
//! steps that carry no `order_id`. Both shapes decode into [`Solution`]; encoding always emits the
//! planner shape.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::ids::{OrderId, RouteId, VehicleId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub vehicles: Vec<VehicleRoute>,
}

impl Solution {
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Order ids in document order, skipping depot steps.
    pub fn order_ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.vehicles.iter().flat_map(VehicleRoute::order_ids)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRoute {
    #[serde(alias = "vehicle_db_id")]
    pub vehicle_id: VehicleId,
    #[serde(default)]
    pub route: Vec<RouteStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance_m: Option<f64>,
}

impl VehicleRoute {
    pub fn new(vehicle_id: VehicleId, order_ids: impl IntoIterator<Item = OrderId>) -> Self {
        Self {
            vehicle_id,
            route: order_ids.into_iter().map(RouteStep::order).collect(),
            total_distance_m: None,
        }
    }

    pub fn order_ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.route.iter().filter_map(|step| step.order_id)
    }
}

/// One stop on a vehicle route.
///
/// Planner-written steps only carry `order_id`. Optimizer-written steps add timing and node data,
/// which is kept on decode so an unedited document survives a snapshot round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<i64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SmolStr>,
}

impl RouteStep {
    pub fn order(order_id: OrderId) -> Self {
        Self { order_id: Some(order_id), ..Self::default() }
    }
}

/// A persisted route as returned by `/api/routes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id: RouteId,
    #[serde(default)]
    pub solution_json: Option<Solution>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub status: String,
}

impl RouteRecord {
    pub fn stop_count(&self) -> usize {
        self.solution_json.as_ref().map_or(0, |solution| solution.order_ids().count())
    }
}

/// Request body for route create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteWrite<'a> {
    pub solution_json: &'a Solution,
}

#[cfg(test)]
mod tests {
    use super::{RouteRecord, Solution, VehicleRoute};
    use crate::model::{OrderId, VehicleId};

    fn oid(value: i64) -> OrderId {
        OrderId::new(value).expect("order id")
    }

    #[test]
    fn planner_shape_encodes_order_ids_only() {
        let solution = Solution {
            vehicles: vec![VehicleRoute::new(VehicleId::new(1).expect("vehicle id"), [oid(7), oid(5)])],
        };

        let json = serde_json::to_value(&solution).expect("encode");
        assert_eq!(
            json,
            serde_json::json!({
                "vehicles": [{"vehicle_id": 1, "route": [{"order_id": 7}, {"order_id": 5}]}]
            })
        );
    }

    #[test]
    fn optimizer_shape_decodes_with_depot_steps() {
        let raw = r#"{
            "vehicles": [{
                "vehicle_db_id": 3,
                "total_distance_m": 1520,
                "route": [
                    {"node_index": 0, "min_time": 0, "max_time": 0},
                    {"node_index": 4, "min_time": 30, "max_time": 45, "order_id": 11, "customer_id": 2, "customer_name": "Loja"},
                    {"node_index": 0, "min_time": 90, "max_time": 90, "type": "end"}
                ]
            }]
        }"#;

        let solution: Solution = serde_json::from_str(raw).expect("decode");
        assert_eq!(solution.vehicles.len(), 1);
        assert_eq!(solution.vehicles[0].vehicle_id, VehicleId::new(3).expect("vehicle id"));
        assert_eq!(solution.order_ids().collect::<Vec<_>>(), vec![oid(11)]);
        assert_eq!(solution.vehicles[0].route[2].kind.as_deref(), Some("end"));
    }

    #[test]
    fn route_record_tolerates_missing_solution() {
        let raw = r#"{"id": 4, "solution_json": null, "created_at": "2025-02-01", "status": "draft"}"#;
        let record: RouteRecord = serde_json::from_str(raw).expect("decode");
        assert_eq!(record.stop_count(), 0);
        assert_eq!(record.status, "draft");
    }
}
