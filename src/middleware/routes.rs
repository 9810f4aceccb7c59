//! Route table.
//!
//! [`RouteTable`] builds the axum router and, alongside it, a catalogue of
//! every endpoint with the gates it declared. The table is assembled once in
//! [`crate::router::init_router`] and is read-only afterwards.

use std::sync::Arc;

use axum::{
    Router,
    handler::Handler,
    http::Method,
    middleware,
    routing::{self, MethodRouter},
};
use serde::Serialize;
use utoipa::ToSchema;

use coursehub_config::JwtConfig;

use crate::middleware::gate::{Gate, GateState, enforce_gates};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
    pub gates: &'static [Gate],
}

impl Endpoint {
    pub fn is_public(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn requires(&self, gate: &Gate) -> bool {
        self.gates.contains(gate)
    }

    pub fn describe(&self) -> EndpointInfo {
        EndpointInfo {
            method: self.method.to_string(),
            path: self.path.clone(),
            gates: self.gates.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Wire form of an [`Endpoint`] for `GET /api/v1/routes`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
    pub gates: Vec<String>,
}

/// The frozen endpoint list, shared with the introspection handler.
#[derive(Debug, Clone)]
pub struct RouteCatalog(pub Arc<[Endpoint]>);

pub struct RouteTable {
    router: Router<AppState>,
    endpoints: Vec<Endpoint>,
    jwt_config: Arc<JwtConfig>,
}

impl RouteTable {
    pub fn new(jwt_config: Arc<JwtConfig>) -> Self {
        Self {
            router: Router::new(),
            endpoints: Vec::new(),
            jwt_config,
        }
    }

    pub fn get<H, T>(self, path: &str, gates: &'static [Gate], handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::GET, path, gates, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &str, gates: &'static [Gate], handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::POST, path, gates, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &str, gates: &'static [Gate], handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::PUT, path, gates, routing::put(handler))
    }

    pub fn delete<H, T>(self, path: &str, gates: &'static [Gate], handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.add(Method::DELETE, path, gates, routing::delete(handler))
    }

    fn add(
        mut self,
        method: Method,
        path: &str,
        gates: &'static [Gate],
        method_router: MethodRouter<AppState>,
    ) -> Self {
        // Ungated routes skip identity resolution entirely.
        let method_router = if gates.is_empty() {
            method_router
        } else {
            method_router.route_layer(middleware::from_fn_with_state(
                GateState {
                    jwt_config: self.jwt_config.clone(),
                    gates,
                },
                enforce_gates,
            ))
        };

        self.router = self.router.route(path, method_router);
        self.endpoints.push(Endpoint {
            method,
            path: path.to_string(),
            gates,
        });
        self
    }

    /// Registers the routes built by `build` under `prefix`.
    pub fn nest(mut self, prefix: &str, build: impl FnOnce(RouteTable) -> RouteTable) -> Self {
        let child = build(RouteTable::new(self.jwt_config.clone()));

        self.endpoints
            .extend(child.endpoints.into_iter().map(|endpoint| Endpoint {
                path: format!("{}{}", prefix, endpoint.path),
                ..endpoint
            }));
        self.router = self.router.nest(prefix, child.router);
        self
    }

    /// Applies `f` to the routes registered so far, e.g. to add a layer.
    pub fn map_router(mut self, f: impl FnOnce(Router<AppState>) -> Router<AppState>) -> Self {
        self.router = f(self.router);
        self
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn find(&self, method: &Method, path: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.method == *method && e.path == path)
    }

    pub fn into_parts(self) -> (Router<AppState>, RouteCatalog) {
        (self.router, RouteCatalog(self.endpoints.into()))
    }
}
