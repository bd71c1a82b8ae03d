// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use crate::model::{Order, OrderId};

/// Order lookup by id, derived once from the order list.
///
/// Rebuilt only when the order data itself changes; drag events never touch it.
#[derive(Debug, Clone, Default)]
pub struct OrderIndex {
    orders: Vec<Order>,
    by_id: HashMap<OrderId, usize>,
}

impl OrderIndex {
    /// Builds the index; a repeated id keeps its first occurrence.
    pub fn new(orders: Vec<Order>) -> Self {
        let mut by_id = HashMap::with_capacity(orders.len());
        let mut unique = Vec::with_capacity(orders.len());
        for order in orders {
            if by_id.contains_key(&order.id) {
                tracing::debug!(order_id = %order.id, "duplicate order in input; keeping first");
                continue;
            }
            by_id.insert(order.id, unique.len());
            unique.push(order);
        }
        Self { orders: unique, by_id }
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.by_id.get(&order_id).map(|&idx| &self.orders[idx])
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.by_id.contains_key(&order_id)
    }

    /// Orders in input order, duplicates removed.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Sum of demand over `order_ids`; ids missing from the index count as zero.
    pub fn load(&self, order_ids: &[OrderId]) -> u64 {
        order_ids
            .iter()
            .filter_map(|order_id| self.get(*order_id))
            .map(|order| u64::from(order.demand))
            .sum()
    }
}

/// Current load of a container next to its vehicle's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerLoad {
    pub load: u64,
    pub capacity: Option<u32>,
}

impl ContainerLoad {
    /// Advisory only: the planner never blocks an over-capacity assignment.
    pub fn is_over_limit(&self) -> bool {
        self.capacity.is_some_and(|capacity| self.load > u64::from(capacity))
    }
}
