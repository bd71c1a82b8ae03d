// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Assignment editor.
//!
//! A [`Planner`] owns the partition of order ids across containers (`unassigned` plus one per
//! vehicle) and applies drag events to it through [`PlannerState::apply`] / [`reduce`]. Every
//! transition is a single remove-then-insert on the in-memory partition, so each order id sits in
//! exactly one container before and after every event.

mod load;
mod partition;
mod reducer;
mod target;

use smol_str::SmolStr;

use crate::model::{ContainerKey, Order, OrderId, Solution, Vehicle, VehicleId};

pub use load::{ContainerLoad, OrderIndex};
pub use partition::{Container, MoveError, Partition};
pub use reducer::{reduce, DragEvent, PlannerState, Transition};
pub use target::{DropTarget, InsertSide, PointerGeometry, Resolved};

const UNASSIGNED_TITLE: &str = "Unassigned";

/// One editing session: inputs, derived order index, and the mutable planner state.
#[derive(Debug, Clone)]
pub struct Planner {
    vehicles: Vec<Vehicle>,
    index: OrderIndex,
    state: PlannerState,
}

impl Planner {
    pub fn new(orders: Vec<Order>, vehicles: Vec<Vehicle>, initial: Option<&Solution>) -> Self {
        let index = OrderIndex::new(orders);
        let partition = Partition::seed(&index, &vehicles, initial);
        tracing::info!(
            orders = index.len(),
            vehicles = vehicles.len(),
            unassigned = partition.orders_in(ContainerKey::Unassigned).len(),
            "planner session seeded"
        );
        Self { vehicles, index, state: PlannerState::new(partition) }
    }

    pub fn dispatch(&mut self, event: DragEvent) -> Transition {
        let transition = self.state.apply(event);
        match transition {
            Transition::Moved { .. } | Transition::Reordered { .. } => {
                tracing::debug!(?event, ?transition, "partition updated");
            }
            _ => tracing::trace!(?event, ?transition, "drag event"),
        }
        transition
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn partition(&self) -> &Partition {
        self.state.partition()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == vehicle_id)
    }

    pub fn index(&self) -> &OrderIndex {
        &self.index
    }

    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.index.get(order_id)
    }

    /// The order under the drag overlay, if a drag is in progress.
    pub fn active_order(&self) -> Option<&Order> {
        self.state.active().and_then(|order_id| self.index.get(order_id))
    }

    /// Sum of demand over the orders currently in `key`.
    pub fn load(&self, key: ContainerKey) -> u64 {
        self.index.load(self.partition().orders_in(key))
    }

    pub fn container_load(&self, key: ContainerKey) -> ContainerLoad {
        let capacity = key
            .vehicle_id()
            .and_then(|vehicle_id| self.vehicle(vehicle_id))
            .and_then(|vehicle| vehicle.capacity);
        ContainerLoad { load: self.load(key), capacity }
    }

    pub fn title(&self, key: ContainerKey) -> SmolStr {
        match key.vehicle_id().and_then(|vehicle_id| self.vehicle(vehicle_id)) {
            Some(vehicle) => vehicle.name.clone(),
            None if key.is_unassigned() => SmolStr::new_static(UNASSIGNED_TITLE),
            None => SmolStr::new(key.to_string()),
        }
    }

    /// Solution document for the current arrangement.
    pub fn solution(&self) -> Solution {
        self.partition().to_solution()
    }

    /// Swaps in fresh order data: rebuilds the index and reconciles the partition against it.
    pub fn replace_orders(&mut self, orders: Vec<Order>) {
        let previous = std::mem::replace(&mut self.index, OrderIndex::new(orders));
        self.state.partition_mut().reconcile(&previous, &self.index);
        if let Some(active) = self.state.active() {
            if self.state.partition().locate(active).is_none() {
                self.state.apply(DragEvent::Cancel);
            }
        }
        tracing::info!(orders = self.index.len(), "order data refreshed");
    }
}
