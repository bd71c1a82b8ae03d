// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use routedesk::model::{fixtures, ContainerKey, Order, OrderId, Solution, Vehicle, VehicleRoute};
use routedesk::planner::{reduce, DragEvent, DropTarget, Planner, PointerGeometry};

mod profiler;

// Benchmark identity (keep stable):
// - Groups: `planner.seed`, `planner.drag`, `planner.reduce`, `planner.solution`.
// - Case ids after the `/` (`small`, `medium`, `large`) stay stable so results remain comparable.
const CASES: &[(&str, usize, usize)] = &[("small", 40, 4), ("medium", 400, 12), ("large", 4000, 40)];

/// Deals orders out to vehicles in turn, leaving every fifth order unassigned.
fn round_robin_solution(orders: &[Order], vehicles: &[Vehicle]) -> Solution {
    let mut routes = vehicles.iter().map(|vehicle| (vehicle.id, Vec::new())).collect::<Vec<_>>();
    for (idx, order) in orders.iter().enumerate() {
        if idx % 5 == 4 {
            continue;
        }
        let slot = idx % routes.len();
        routes[slot].1.push(order.id);
    }
    Solution {
        vehicles: routes.into_iter().map(|(id, order_ids)| VehicleRoute::new(id, order_ids)).collect(),
    }
}

fn board(order_count: usize, vehicle_count: usize) -> Planner {
    let orders = fixtures::generated_orders(order_count);
    let vehicles = fixtures::generated_vehicles(vehicle_count, 120);
    let solution = round_robin_solution(&orders, &vehicles);
    Planner::new(orders, vehicles, Some(&solution))
}

/// One gesture: pick up the first unassigned order and sweep it across every vehicle column,
/// hovering the middle card of each, then release on the last.
fn sweep_gesture(planner: &Planner) -> Vec<DragEvent> {
    let partition = planner.partition();
    let Some(&active) = partition.orders_in(ContainerKey::Unassigned).first() else {
        return Vec::new();
    };
    let mut events = vec![DragEvent::Start { active }];
    let mut last: Option<OrderId> = None;
    for (column, container) in partition.containers().iter().enumerate().skip(1) {
        let orders = container.orders();
        let over = match orders.get(orders.len() / 2) {
            Some(&order_id) => DropTarget::Order(order_id),
            None => DropTarget::Container(container.key()),
        };
        if let DropTarget::Order(order_id) = over {
            last = Some(order_id);
        }
        let top = (column * 2) as f64;
        let pointer = PointerGeometry::new(top + 1.5, top, 2.0);
        events.push(DragEvent::Over { active, over: Some(over), pointer: Some(pointer) });
    }
    events.push(DragEvent::End { active, over: last.map(DropTarget::Order), pointer: None });
    events
}

fn benches_planner(c: &mut Criterion) {
    let mut group = c.benchmark_group("planner.seed");
    for &(case, order_count, vehicle_count) in CASES {
        let orders = fixtures::generated_orders(order_count);
        let vehicles = fixtures::generated_vehicles(vehicle_count, 120);
        let solution = round_robin_solution(&orders, &vehicles);
        group.throughput(Throughput::Elements(order_count as u64));
        group.bench_function(case, |b| {
            b.iter_batched(
                || (orders.clone(), vehicles.clone()),
                |(orders, vehicles)| {
                    let planner = Planner::new(orders, vehicles, Some(black_box(&solution)));
                    black_box(planner.partition().len())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("planner.drag");
    for &(case, order_count, vehicle_count) in CASES {
        let template = board(order_count, vehicle_count);
        let events = sweep_gesture(&template);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_function(case, |b| {
            b.iter_batched(
                || template.clone(),
                |mut planner| {
                    for event in &events {
                        black_box(planner.dispatch(black_box(*event)));
                    }
                    black_box(planner.load(ContainerKey::Unassigned))
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("planner.reduce");
    for &(case, order_count, vehicle_count) in CASES {
        let template = board(order_count, vehicle_count);
        let events = sweep_gesture(&template);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_function(case, |b| {
            b.iter(|| {
                let state = events
                    .iter()
                    .fold(template.state().clone(), |state, event| reduce(&state, *event));
                black_box(state.partition().len())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("planner.solution");
    for &(case, order_count, vehicle_count) in CASES {
        let planner = board(order_count, vehicle_count);
        group.throughput(Throughput::Elements(order_count as u64));
        group.bench_function(case, |b| {
            b.iter(|| {
                let solution = planner.solution();
                let json = serde_json::to_vec(black_box(&solution)).unwrap_or_default();
                black_box(json.len())
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_planner
}
criterion_main!(benches);
