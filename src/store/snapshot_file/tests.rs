// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{MemoryStore, Snapshot, SnapshotFile, StoreError, WriteDurability};
use crate::api::{ApiError, OrderSource, SaveTarget, SolutionSink, VehicleSource};
use crate::model::{
    fixtures, OrderFilter, OrderId, RouteId, Solution, VehicleId, VehicleRoute,
};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("routedesk-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct SnapshotTestCtx {
    tmp: TempDir,
    file: SnapshotFile,
}

#[fixture]
fn ctx() -> SnapshotTestCtx {
    let tmp = TempDir::new("snapshot");
    let file = SnapshotFile::new(tmp.path().join("board.json"));
    SnapshotTestCtx { tmp, file }
}

fn solution(vehicle: i64, orders: &[i64]) -> Solution {
    Solution {
        vehicles: vec![VehicleRoute::new(
            VehicleId::new(vehicle).unwrap(),
            orders.iter().map(|id| OrderId::new(*id).unwrap()),
        )],
    }
}

fn temp_files(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".routedesk.tmp."))
        .collect()
}

#[rstest]
fn save_then_load_returns_same_snapshot(ctx: SnapshotTestCtx) {
    let snapshot = Snapshot::demo();
    ctx.file.save(&snapshot).unwrap();

    assert_eq!(ctx.file.load().unwrap(), snapshot);
    assert!(temp_files(ctx.tmp.path()).is_empty());
}

#[rstest]
fn save_creates_missing_parent_directories(ctx: SnapshotTestCtx) {
    let nested = SnapshotFile::new(ctx.tmp.path().join("a").join("b").join("board.json"))
        .with_durability(WriteDurability::Durable);
    nested.save(&Snapshot::default()).unwrap();

    assert!(nested.path().is_file());
}

#[rstest]
fn save_solution_rewrites_only_the_solution(ctx: SnapshotTestCtx) {
    let mut snapshot = Snapshot::demo();
    snapshot.solution = None;
    ctx.file.save(&snapshot).unwrap();

    ctx.file.write_solution(&solution(2, &[9, 10])).unwrap();

    let reloaded = ctx.file.load().unwrap();
    assert_eq!(reloaded.orders, snapshot.orders);
    assert_eq!(reloaded.vehicles, snapshot.vehicles);
    assert_eq!(reloaded.solution, Some(solution(2, &[9, 10])));
    assert!(temp_files(ctx.tmp.path()).is_empty());
}

#[rstest]
fn snapshot_without_solution_omits_the_key(ctx: SnapshotTestCtx) {
    ctx.file.save(&Snapshot::default()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(ctx.file.path()).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({"orders": [], "vehicles": []}));
}

#[rstest]
fn missing_file_reports_io_error_with_path(ctx: SnapshotTestCtx) {
    let err = ctx.file.load().unwrap_err();

    assert!(matches!(&err, StoreError::Io { path, .. } if path == ctx.file.path()));
    assert!(err.to_string().contains("board.json"));
}

#[rstest]
fn malformed_file_reports_json_error(ctx: SnapshotTestCtx) {
    std::fs::write(ctx.file.path(), b"{\"orders\": [").unwrap();

    assert!(matches!(ctx.file.load(), Err(StoreError::Json { .. })));
}

#[rstest]
fn optimizer_shaped_solution_loads(ctx: SnapshotTestCtx) {
    let raw = serde_json::json!({
        "orders": [
            {"id": 1, "customer_name": "Padaria Central", "demand": 5, "lat": -23.55, "lon": -46.63},
            {"id": 2, "customer_name": "Mercado Sul", "demand": 3, "lat": -23.56, "lon": -46.65}
        ],
        "vehicles": [{"id": 4, "name": "Van 04", "capacity": 30}],
        "solution": {"vehicles": [{
            "vehicle_db_id": 4,
            "total_distance_m": 1520.5,
            "route": [
                {"node_index": 0, "type": "depot"},
                {"order_id": 2, "node_index": 2, "min_time": 30, "max_time": 60},
                {"order_id": 1, "node_index": 1},
                {"node_index": 0, "type": "depot"}
            ]
        }]}
    });
    std::fs::write(ctx.file.path(), serde_json::to_vec(&raw).unwrap()).unwrap();

    let snapshot = ctx.file.load().unwrap();
    let solution = snapshot.solution.unwrap();
    assert_eq!(solution.vehicles[0].vehicle_id, VehicleId::new(4).unwrap());
    assert_eq!(
        solution.order_ids().collect::<Vec<_>>(),
        vec![OrderId::new(2).unwrap(), OrderId::new(1).unwrap()]
    );
}

#[rstest]
fn snapshot_file_serves_collaborator_traits(ctx: SnapshotTestCtx) {
    ctx.file.save(&Snapshot::demo()).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

    runtime.block_on(async {
        let orders = ctx.file.orders(&OrderFilter::default()).await.unwrap();
        assert_eq!(orders.len(), fixtures::demo_orders().len());
        assert_eq!(ctx.file.vehicles().await.unwrap(), fixtures::demo_vehicles());

        let saved_to = SolutionSink::save_solution(
            &ctx.file,
            SaveTarget::Route(RouteId::new(3).unwrap()),
            &solution(1, &[1]),
        )
        .await
        .unwrap();
        assert_eq!(saved_to, None);
    });

    assert_eq!(ctx.file.load().unwrap().solution, Some(solution(1, &[1])));
}

#[rstest]
fn snapshot_sink_error_maps_to_store_variant(ctx: SnapshotTestCtx) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

    let err = runtime
        .block_on(SolutionSink::save_solution(&ctx.file, SaveTarget::NewRoute, &solution(1, &[1])))
        .unwrap_err();

    assert!(matches!(err, ApiError::Store { source: StoreError::Io { .. } }));
}

#[tokio::test]
async fn memory_store_filters_orders_and_keeps_saved_solution() {
    let mut snapshot = Snapshot::demo();
    snapshot.orders[0].status = Some("pending".to_owned());
    let store = MemoryStore::new(snapshot);

    let pending = store
        .orders(&OrderFilter { status: Some("pending".to_owned()), route_id: None })
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    store.save_solution(SaveTarget::NewRoute, &solution(3, &[4])).await.unwrap();
    assert_eq!(store.snapshot().solution, Some(solution(3, &[4])));
}

#[rstest]
fn snapshot_collaborators_interleave_on_one_runtime(ctx: SnapshotTestCtx) {
    ctx.file.save(&Snapshot::demo()).unwrap();
    let file = ctx.file.clone().with_durability(WriteDurability::Durable);
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

    let (saved, vehicles) = runtime.block_on(async {
        let new_solution = solution(2, &[3, 1]);
        tokio::join!(
            SolutionSink::save_solution(&file, SaveTarget::NewRoute, &new_solution),
            file.vehicles(),
        )
    });

    assert_eq!(saved.unwrap(), None);
    assert_eq!(vehicles.unwrap(), fixtures::demo_vehicles());
    assert_eq!(file.load().unwrap().solution, Some(solution(2, &[3, 1])));
    assert!(temp_files(ctx.tmp.path()).is_empty());
}
