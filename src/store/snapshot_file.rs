// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, OrderSource, SaveTarget, SolutionSink, VehicleSource};
use crate::model::{fixtures, Order, OrderFilter, RouteId, Solution, Vehicle};

/// On-disk document: the inputs of one planning session plus its last saved solution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Solution>,
}

impl Snapshot {
    /// The bundled demo board.
    pub fn demo() -> Self {
        Self {
            orders: fixtures::demo_orders(),
            vehicles: fixtures::demo_vehicles(),
            solution: Some(fixtures::demo_solution()),
        }
    }

    pub fn filtered_orders(&self, filter: &OrderFilter) -> Vec<Order> {
        self.orders.iter().filter(|order| filter.matches(order)).cloned().collect()
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place without syncing.
    #[default]
    BestEffort,
    /// Also syncs the file contents and, on unix, the parent directory.
    Durable,
}

/// A snapshot document at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), durability: WriteDurability::default() }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Snapshot, StoreError> {
        let bytes = fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            orders = snapshot.orders.len(),
            vehicles = snapshot.vehicles.len(),
            has_solution = snapshot.solution.is_some(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut json = serde_json::to_vec_pretty(snapshot).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        json.push(b'\n');
        write_atomic(&self.path, &json, self.durability)
    }

    /// Replaces the stored solution, keeping orders and vehicles as they are on disk.
    pub fn write_solution(&self, solution: &Solution) -> Result<(), StoreError> {
        let mut snapshot = self.load()?;
        snapshot.solution = Some(solution.clone());
        self.save(&snapshot)?;
        tracing::info!(path = %self.path.display(), vehicles = solution.vehicles.len(), "snapshot solution saved");
        Ok(())
    }

    /// Runs a file operation on the blocking pool so reads, renames and syncs never stall the
    /// runtime thread.
    async fn off_runtime<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&SnapshotFile) -> Result<T, StoreError> + Send + 'static,
    {
        let file = self.clone();
        let path = self.path.clone();
        let result = tokio::task::spawn_blocking(move || op(&file)).await.map_err(|err| {
            StoreError::Io { path, source: io::Error::other(err.to_string()) }
        })?;
        Ok(result?)
    }
}

#[async_trait]
impl OrderSource for SnapshotFile {
    async fn orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError> {
        let filter = filter.clone();
        self.off_runtime(move |file| Ok(file.load()?.filtered_orders(&filter))).await
    }
}

#[async_trait]
impl VehicleSource for SnapshotFile {
    async fn vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.off_runtime(|file| Ok(file.load()?.vehicles)).await
    }
}

/// Snapshot files have no routes; the target is ignored and every save rewrites the file.
#[async_trait]
impl SolutionSink for SnapshotFile {
    async fn save_solution(
        &self,
        _target: SaveTarget,
        solution: &Solution,
    ) -> Result<Option<RouteId>, ApiError> {
        let solution = solution.clone();
        self.off_runtime(move |file| file.write_solution(&solution)).await?;
        Ok(None)
    }
}

/// In-memory snapshot, used by the demo board.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Snapshot>,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot: Mutex::new(snapshot) }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl OrderSource for MemoryStore {
    async fn orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError> {
        Ok(self.snapshot.lock().unwrap_or_else(PoisonError::into_inner).filtered_orders(filter))
    }
}

#[async_trait]
impl VehicleSource for MemoryStore {
    async fn vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        Ok(self.snapshot.lock().unwrap_or_else(PoisonError::into_inner).vehicles.clone())
    }
}

#[async_trait]
impl SolutionSink for MemoryStore {
    async fn save_solution(
        &self,
        _target: SaveTarget,
        solution: &Solution,
    ) -> Result<Option<RouteId>, ApiError> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner).solution =
            Some(solution.clone());
        tracing::info!(vehicles = solution.vehicles.len(), "solution kept in memory");
        Ok(None)
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };
    fs::create_dir_all(parent).map_err(io_error(parent))?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: io::Error::other("refusing to write through symlink"),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    }

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path = parent.join(format!(
        ".routedesk.tmp.{}.{}.{nanos}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_error(&tmp_path))?;
    let written = file.write_all(contents).and_then(|()| match durability {
        WriteDurability::Durable => file.sync_all(),
        WriteDurability::BestEffort => Ok(()),
    });
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: tmp_path, source });
    }

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: path.to_path_buf(), source });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(io_error(parent))?;
            dir.sync_all().map_err(io_error(parent))?;
        }
    }

    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

#[cfg(test)]
mod tests;
