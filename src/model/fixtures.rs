// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{OrderId, VehicleId};
use super::order::Order;
use super::solution::{Solution, VehicleRoute};
use super::vehicle::Vehicle;

fn oid(value: i64) -> OrderId {
    match OrderId::new(value) {
        Ok(id) => id,
        Err(_) => unreachable!("fixture order ids are positive"),
    }
}

fn vid(value: i64) -> VehicleId {
    match VehicleId::new(value) {
        Ok(id) => id,
        Err(_) => unreachable!("fixture vehicle ids are positive"),
    }
}

/// A small depot-day used by `--demo` and the benches.
pub fn demo_orders() -> Vec<Order> {
    [
        (1, "Padaria Central", 12, -23.5505, -46.6333),
        (2, "Mercado Bom Preço", 30, -23.5614, -46.6559),
        (3, "Farmácia Vida", 5, -23.5489, -46.6388),
        (4, "Restaurante Sabor", 18, -23.5671, -46.6484),
        (5, "Livraria Letras", 8, -23.5432, -46.6420),
        (6, "Pet Shop Amigo", 22, -23.5583, -46.6601),
        (7, "Hortifruti Verde", 25, -23.5527, -46.6712),
        (8, "Café da Esquina", 4, -23.5470, -46.6501),
        (9, "Açougue Nobre", 16, -23.5698, -46.6350),
        (10, "Papelaria Ponto", 6, -23.5455, -46.6299),
    ]
    .into_iter()
    .map(|(id, name, demand, lat, lon)| Order::new(oid(id), name, demand).with_position(lat, lon))
    .collect()
}

pub fn demo_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle::new(vid(1), "Van 01", 60),
        Vehicle::new(vid(2), "Van 02", 60),
        Vehicle::new(vid(3), "Moto 01", 20),
    ]
}

/// A prior solution that leaves some orders unassigned and loads `Moto 01` past capacity.
pub fn demo_solution() -> Solution {
    Solution {
        vehicles: vec![
            VehicleRoute::new(vid(1), [oid(2), oid(1), oid(3)]),
            VehicleRoute::new(vid(3), [oid(4), oid(8)]),
        ],
    }
}

/// `count` orders with cycling demands, for benches and property-style tests.
pub fn generated_orders(count: usize) -> Vec<Order> {
    (1..=count as i64)
        .map(|id| Order::new(oid(id), format!("Customer {id}"), 1 + (id % 17) as u32))
        .collect()
}

pub fn generated_vehicles(count: usize, capacity: u32) -> Vec<Vehicle> {
    (1..=count as i64).map(|id| Vehicle::new(vid(id), format!("Vehicle {id}"), capacity)).collect()
}
