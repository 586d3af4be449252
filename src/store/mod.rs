//! Session-scoped storage for finalized routes.

pub mod error;
pub mod export;

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::notify::{NoticeLevel, Notifier};
use crate::route::{Route, RouteId};

use self::error::ExportError;
use self::export::{Export, ExportFormat};

/// Finalized routes held in memory, most recently added first.
///
/// Nothing is persisted: dropping the store drops every route.
pub struct RouteStore {
    routes: RwLock<VecDeque<Route>>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for RouteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteStore")
            .field("routes", &self.len())
            .field("notifier", &"<Notifier>")
            .finish()
    }
}

impl RouteStore {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            routes: RwLock::new(VecDeque::new()),
            notifier,
        }
    }

    pub fn add(&self, route: Route) {
        info!(
            route_id = %route.id(),
            name = %route.name(),
            samples = route.sample_count(),
            "Route stored"
        );
        self.routes
            .write()
            .expect("route store lock poisoned")
            .push_front(route);
    }

    /// Remove the route with `route_id`, returning it if it was present.
    pub fn remove(&self, route_id: RouteId) -> Option<Route> {
        let removed = {
            let mut routes = self.routes.write().expect("route store lock poisoned");
            let index = routes.iter().position(|route| route.id() == route_id);
            index.and_then(|index| routes.remove(index))
        };

        match removed {
            Some(route) => {
                info!(route_id = %route_id, "Route deleted");
                self.notifier.notify(NoticeLevel::Success, "Route deleted");
                Some(route)
            }
            None => {
                debug!(route_id = %route_id, "No route to delete");
                None
            }
        }
    }

    pub fn get(&self, route_id: RouteId) -> Option<Route> {
        self.routes
            .read()
            .expect("route store lock poisoned")
            .iter()
            .find(|route| route.id() == route_id)
            .cloned()
    }

    /// Snapshot of every stored route in current order.
    pub fn list(&self) -> Vec<Route> {
        self.routes
            .read()
            .expect("route store lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.read().expect("route store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize a route and announce the outcome. The stored routes are not touched.
    pub fn export(&self, route: &Route, format: ExportFormat) -> Result<Export, ExportError> {
        match export::export(route, format) {
            Ok(export) => {
                self.notifier
                    .notify(NoticeLevel::Success, &format!("Route exported as {format}"));
                Ok(export)
            }
            Err(error) => {
                warn!(route_id = %route.id(), %format, %error, "Route export failed");
                self.notifier
                    .notify(NoticeLevel::Error, &format!("Export failed: {error}"));
                Err(error)
            }
        }
    }
}
