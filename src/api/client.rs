// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{Order, OrderFilter, RouteId, RouteRecord, RouteWrite, Solution, Vehicle};

use super::{ApiError, OrderSource, SaveTarget, SolutionSink, VehicleSource};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// REST client for the route backend. All paths live under `<base>/api`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim_end_matches('/');
        let base = Url::parse(&format!("{trimmed}/api/")).map_err(|err| ApiError::InvalidUrl {
            url: base_url.to_owned(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_owned(),
                reason: "not a base url".to_owned(),
            });
        }
        Ok(Self { http: reqwest::Client::new(), base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn get_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError> {
        let mut url = self.url("orders")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(status) = &filter.status {
                query.append_pair("status", status);
            }
            if let Some(route_id) = filter.route_id {
                query.append_pair("route_id", &route_id.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        self.call(Method::GET, url, None::<&()>).await
    }

    pub async fn get_vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.call(Method::GET, self.url("vehicles")?, None::<&()>).await
    }

    pub async fn list_routes(&self) -> Result<Vec<RouteRecord>, ApiError> {
        self.call(Method::GET, self.url("routes")?, None::<&()>).await
    }

    pub async fn get_route(&self, route_id: RouteId) -> Result<RouteRecord, ApiError> {
        self.call(Method::GET, self.url(&format!("routes/{route_id}"))?, None::<&()>).await
    }

    pub async fn create_route(&self, solution: &Solution) -> Result<RouteRecord, ApiError> {
        let body = RouteWrite { solution_json: solution };
        self.call(Method::POST, self.url("routes")?, Some(&body)).await
    }

    pub async fn update_route(
        &self,
        route_id: RouteId,
        solution: &Solution,
    ) -> Result<RouteRecord, ApiError> {
        let body = RouteWrite { solution_json: solution };
        self.call(Method::PUT, self.url(&format!("routes/{route_id}"))?, Some(&body)).await
    }

    /// Asks the backend to optimize every pending order. Returns the backend's acknowledgement.
    pub async fn trigger_optimization(&self) -> Result<String, ApiError> {
        let ack: MessageBody =
            self.call(Method::POST, self.url("routes/optimize")?, None::<&()>).await?;
        Ok(ack.message)
    }

    pub async fn reprocess_route(&self, route_id: RouteId) -> Result<String, ApiError> {
        let url = self.url(&format!("routes/{route_id}/reprocess"))?;
        let ack: MessageBody = self.call(Method::POST, url, None::<&()>).await?;
        Ok(ack.message)
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|err| ApiError::InvalidUrl {
            url: format!("{}{path}", self.base),
            reason: err.to_string(),
        })
    }

    async fn call<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url_text = url.to_string();
        tracing::debug!(%method, url = %url_text, "api request");

        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|source| ApiError::Request {
            url: url_text.clone(),
            source,
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| ApiError::Request {
            url: url_text.clone(),
            source,
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| {
                    status.canonical_reason().unwrap_or("request failed").to_owned()
                });
            tracing::warn!(%method, url = %url_text, status = status.as_u16(), %message, "api error");
            return Err(ApiError::Status { url: url_text, status: status.as_u16(), message });
        }

        tracing::debug!(%method, url = %url_text, status = status.as_u16(), bytes = bytes.len(), "api response");
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { url: url_text, source })
    }
}

#[async_trait]
impl OrderSource for ApiClient {
    async fn orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, ApiError> {
        self.get_orders(filter).await
    }
}

#[async_trait]
impl VehicleSource for ApiClient {
    async fn vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.get_vehicles().await
    }
}

#[async_trait]
impl SolutionSink for ApiClient {
    async fn save_solution(
        &self,
        target: SaveTarget,
        solution: &Solution,
    ) -> Result<Option<RouteId>, ApiError> {
        let record = match target {
            SaveTarget::NewRoute => self.create_route(solution).await?,
            SaveTarget::Route(route_id) => self.update_route(route_id, solution).await?,
        };
        tracing::info!(%target, route_id = %record.id, vehicles = solution.vehicles.len(), "solution saved");
        Ok(Some(record.id))
    }
}
