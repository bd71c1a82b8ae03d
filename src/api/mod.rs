// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Collaborators the planner talks to: where orders and vehicles come from, and where solutions
//! go. [`ApiClient`] implements them against the REST backend; the `store` module implements them
//! against a local snapshot.

pub mod client;

use std::fmt;

use async_trait::async_trait;

use crate::model::{Order, OrderFilter, RouteId, Solution, Vehicle};
use crate::store::StoreError;

pub use client::{ApiClient, DEFAULT_API_URL};

#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError>;
}

#[async_trait]
pub trait VehicleSource: Send + Sync {
    async fn vehicles(&self) -> Result<Vec<Vehicle>, ApiError>;
}

/// Persists a solution document.
///
/// Returns the route the document landed on when the sink tracks routes, so the caller can point
/// follow-up saves at it.
#[async_trait]
pub trait SolutionSink: Send + Sync {
    async fn save_solution(
        &self,
        target: SaveTarget,
        solution: &Solution,
    ) -> Result<Option<RouteId>, ApiError>;
}

/// Where the next save goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveTarget {
    #[default]
    NewRoute,
    Route(RouteId),
}

impl SaveTarget {
    /// Target for follow-up saves once a save reported `saved_to`.
    pub fn after_save(self, saved_to: Option<RouteId>) -> Self {
        saved_to.map_or(self, Self::Route)
    }
}

impl fmt::Display for SaveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewRoute => f.write_str("new route"),
            Self::Route(route_id) => write!(f, "route {route_id}"),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    InvalidUrl {
        url: String,
        reason: String,
    },
    Request {
        url: String,
        source: reqwest::Error,
    },
    /// Non-success HTTP status; `message` is the backend's `error` field when it sent one.
    Status {
        url: String,
        status: u16,
        message: String,
    },
    Decode {
        url: String,
        source: serde_json::Error,
    },
    Store {
        source: StoreError,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, reason } => write!(f, "invalid api url {url:?}: {reason}"),
            Self::Request { url, source } => write!(f, "request to {url} failed: {source}"),
            Self::Status { url, status, message } => {
                write!(f, "{url} answered {status}: {message}")
            }
            Self::Decode { url, source } => write!(f, "cannot decode response from {url}: {source}"),
            Self::Store { source } => write!(f, "snapshot store error: {source}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUrl { .. } | Self::Status { .. } => None,
            Self::Request { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Store { source } => Some(source),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(source: StoreError) -> Self {
        Self::Store { source }
    }
}

#[cfg(test)]
mod tests {
    use super::SaveTarget;
    use crate::model::RouteId;

    #[test]
    fn save_target_moves_to_created_route() {
        let route = RouteId::new(12).expect("route id");
        assert_eq!(SaveTarget::NewRoute.after_save(Some(route)), SaveTarget::Route(route));
        assert_eq!(SaveTarget::NewRoute.after_save(None), SaveTarget::NewRoute);
        assert_eq!(SaveTarget::Route(route).after_save(None), SaveTarget::Route(route));
        assert_eq!(SaveTarget::Route(route).to_string(), "route 12");
    }
}
