// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;
use std::fmt;

use crate::model::{ContainerKey, OrderId, Solution, Vehicle, VehicleRoute};

use super::load::OrderIndex;
use super::target::{DropTarget, Resolved};

/// One column of the planner: a key plus its ordered order ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    key: ContainerKey,
    orders: Vec<OrderId>,
}

impl Container {
    fn new(key: ContainerKey) -> Self {
        Self { key, orders: Vec::new() }
    }

    pub fn key(&self) -> ContainerKey {
        self.key
    }

    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn position(&self, order_id: OrderId) -> Option<usize> {
        self.orders.iter().position(|id| *id == order_id)
    }
}

/// Assignment of every session order id to exactly one container.
///
/// Containers keep a fixed order: `unassigned` first, then one per vehicle in the order the
/// vehicles were supplied. That order is what columns render in and what saves emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    containers: Vec<Container>,
}

impl Partition {
    /// Seeds the partition from an optional prior solution.
    ///
    /// Route entries for unknown vehicles are dropped without error. Vehicle sequences are copied
    /// verbatim, including ids missing from `index` (a filtered order list does not strip a saved
    /// route). Ids already placed by an earlier entry are skipped so each order lands exactly once.
    /// Orders left unplaced go to `unassigned` in input order.
    pub fn seed(index: &OrderIndex, vehicles: &[Vehicle], initial: Option<&Solution>) -> Self {
        let mut containers = Vec::with_capacity(vehicles.len() + 1);
        containers.push(Container::new(ContainerKey::Unassigned));
        for vehicle in vehicles {
            let key = vehicle.container_key();
            if containers.iter().any(|container| container.key == key) {
                continue;
            }
            containers.push(Container::new(key));
        }
        let mut partition = Self { containers };

        let mut assigned = HashSet::new();
        for route in initial.map(|solution| solution.vehicles.as_slice()).unwrap_or_default() {
            let key = ContainerKey::Vehicle(route.vehicle_id);
            let Some(slot) = partition.slot_of(key) else {
                tracing::debug!(container = %key, "dropping route for unknown vehicle");
                continue;
            };
            for order_id in route.order_ids() {
                if !index.contains(order_id) {
                    tracing::debug!(%order_id, container = %key, "keeping routed order missing from order list");
                }
                if !assigned.insert(order_id) {
                    tracing::debug!(%order_id, container = %key, "dropping repeated order from route");
                    continue;
                }
                partition.containers[slot].orders.push(order_id);
            }
        }

        let unassigned = &mut partition.containers[0].orders;
        unassigned.extend(
            index.orders().iter().map(|order| order.id).filter(|order_id| !assigned.contains(order_id)),
        );

        partition
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn container(&self, key: ContainerKey) -> Option<&Container> {
        self.containers.iter().find(|container| container.key == key)
    }

    /// Order ids of `key`, or an empty slice for unknown containers.
    pub fn orders_in(&self, key: ContainerKey) -> &[OrderId] {
        self.container(key).map(Container::orders).unwrap_or(&[])
    }

    pub fn has_container(&self, key: ContainerKey) -> bool {
        self.slot_of(key).is_some()
    }

    /// Key of the container currently holding `order_id`.
    pub fn locate(&self, order_id: OrderId) -> Option<ContainerKey> {
        self.containers
            .iter()
            .find(|container| container.orders.contains(&order_id))
            .map(|container| container.key)
    }

    /// Resolves a drop target: a container key resolves to itself, an order id to the container
    /// holding it.
    pub fn resolve(&self, target: DropTarget) -> Resolved {
        match target {
            DropTarget::Container(key) if self.has_container(key) => Resolved::Container(key),
            DropTarget::Container(_) => Resolved::NotFound,
            DropTarget::Order(order_id) => match self.locate(order_id) {
                Some(container) => Resolved::Order { order_id, container },
                None => Resolved::NotFound,
            },
        }
    }

    /// Total number of placed ids across all containers.
    pub fn len(&self) -> usize {
        self.containers.iter().map(|container| container.orders.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn order_ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.containers.iter().flat_map(|container| container.orders.iter().copied())
    }

    /// Moves `order_id` into `to` at `index` (clamped to the destination length).
    ///
    /// Removal and insertion happen within this call; no caller can observe the id in zero or two
    /// containers.
    pub fn move_to(
        &mut self,
        order_id: OrderId,
        to: ContainerKey,
        index: usize,
    ) -> Result<usize, MoveError> {
        let to_slot = self.slot_of(to).ok_or(MoveError::UnknownContainer(to))?;
        let (from_slot, from_index) =
            self.position_of(order_id).ok_or(MoveError::UnknownOrder(order_id))?;

        self.containers[from_slot].orders.remove(from_index);
        let destination = &mut self.containers[to_slot].orders;
        let index = index.min(destination.len());
        destination.insert(index, order_id);
        Ok(index)
    }

    /// Stable list move inside one container: the element at `from` ends up at `to`, all others
    /// keep their relative order.
    pub fn reorder(&mut self, key: ContainerKey, from: usize, to: usize) -> Result<(), MoveError> {
        let slot = self.slot_of(key).ok_or(MoveError::UnknownContainer(key))?;
        let orders = &mut self.containers[slot].orders;
        let len = orders.len();
        if from >= len || to >= len {
            return Err(MoveError::IndexOutOfRange { container: key, index: from.max(to), len });
        }
        let order_id = orders.remove(from);
        orders.insert(to, order_id);
        Ok(())
    }

    /// Moves the partition from `previous` order data to `index`.
    ///
    /// Ids that `previous` knew and `index` no longer does are removed; ids neither list knows
    /// (carried over from a seeded route) stay where they are. Newly known ids not yet placed are
    /// appended to `unassigned`.
    pub fn reconcile(&mut self, previous: &OrderIndex, index: &OrderIndex) {
        let mut placed = HashSet::new();
        for container in &mut self.containers {
            container.orders.retain(|order_id| {
                let dropped = previous.contains(*order_id) && !index.contains(*order_id);
                !dropped && placed.insert(*order_id)
            });
        }
        let fresh = index
            .orders()
            .iter()
            .map(|order| order.id)
            .filter(|order_id| !placed.contains(order_id))
            .collect::<Vec<_>>();
        self.containers[0].orders.extend(fresh);
    }

    /// Serializes vehicle containers into a solution document.
    ///
    /// `unassigned` and empty vehicle containers are not part of the output.
    pub fn to_solution(&self) -> Solution {
        let vehicles = self
            .containers
            .iter()
            .filter(|container| !container.orders.is_empty())
            .filter_map(|container| {
                container
                    .key
                    .vehicle_id()
                    .map(|vehicle_id| VehicleRoute::new(vehicle_id, container.orders.iter().copied()))
            })
            .collect();
        Solution { vehicles }
    }

    fn slot_of(&self, key: ContainerKey) -> Option<usize> {
        self.containers.iter().position(|container| container.key == key)
    }

    fn position_of(&self, order_id: OrderId) -> Option<(usize, usize)> {
        self.containers.iter().enumerate().find_map(|(slot, container)| {
            container.position(order_id).map(|index| (slot, index))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    UnknownOrder(OrderId),
    UnknownContainer(ContainerKey),
    IndexOutOfRange { container: ContainerKey, index: usize, len: usize },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOrder(order_id) => write!(f, "order {order_id} is not in the partition"),
            Self::UnknownContainer(key) => write!(f, "container {key} does not exist"),
            Self::IndexOutOfRange { container, index, len } => {
                write!(f, "index {index} out of range for {container} (len={len})")
            }
        }
    }
}

impl std::error::Error for MoveError {}
