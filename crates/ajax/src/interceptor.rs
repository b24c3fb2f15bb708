//! Interceptor registries.
//!
//! An [`InterceptorRegistry`] is an ordered collection of transforms for one
//! direction of a client. It keeps two parallel structures: the handle order,
//! which decides application order, and a handle → transform lookup. Both are
//! updated together under one lock, so every handle in the order has a
//! lookup entry and vice versa.
//!
//! Registries are read on every request and written only when callers register
//! or remove transforms. Readers take a snapshot of the chain and release the
//! lock before any transform runs.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::{BoxError, InterceptorId, RequestConfig};

/// A registered transform. Takes the accumulated value and returns the next one.
pub type Transform<T> = Arc<dyn Fn(T) -> Result<T, BoxError> + Send + Sync>;

/// Which chain an interceptor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Applied to outgoing [`RequestConfig`] values.
    Request,
    /// Applied to incoming transport responses.
    Response,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request => f.write_str("request"),
            Self::Response => f.write_str("response"),
        }
    }
}

struct Entries<T> {
    order: Vec<InterceptorId>,
    lookup: HashMap<InterceptorId, Transform<T>>,
    next_id: u64,
}

/// Ordered, handle-addressable chain of transforms for one direction.
pub struct InterceptorRegistry<T> {
    direction: Direction,
    entries: RwLock<Entries<T>>,
}

impl<T> InterceptorRegistry<T> {
    /// Creates an empty registry for `direction`.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            entries: RwLock::new(Entries {
                order: Vec::new(),
                lookup: HashMap::new(),
                next_id: 0,
            }),
        }
    }

    /// The chain this registry feeds.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Appends `transform` to the end of the chain and returns its handle.
    pub fn register<F>(&self, transform: F) -> InterceptorId
    where
        F: Fn(T) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let mut entries = self.write();
        let id = InterceptorId::new(entries.next_id);
        entries.next_id += 1;
        entries.order.push(id);
        entries.lookup.insert(id, Arc::new(transform));

        tracing::debug!(direction = %self.direction, %id, "interceptor registered");
        id
    }

    /// Removes the transform registered under `id`, keeping the order of the
    /// others. Unknown handles are ignored; returns whether anything was removed.
    pub fn remove(&self, id: InterceptorId) -> bool {
        let mut entries = self.write();
        let Some(index) = entries.order.iter().position(|registered| *registered == id) else {
            return false;
        };
        entries.order.remove(index);
        entries.lookup.remove(&id);

        tracing::debug!(direction = %self.direction, %id, "interceptor removed");
        true
    }

    /// Returns `true` if `id` is currently registered.
    pub fn contains(&self, id: InterceptorId) -> bool {
        self.read().lookup.contains_key(&id)
    }

    /// Number of registered transforms.
    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every transform. Handles already issued are not reused.
    pub fn clear(&self) {
        let mut entries = self.write();
        entries.order.clear();
        entries.lookup.clear();
    }

    /// Registered transforms in application order: most recently registered
    /// first.
    pub(crate) fn chain(&self) -> Vec<(InterceptorId, Transform<T>)> {
        let entries = self.read();
        entries
            .order
            .iter()
            .rev()
            .filter_map(|id| entries.lookup.get(id).map(|f| (*id, Arc::clone(f))))
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries<T>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries<T>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for InterceptorRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("direction", &self.direction)
            .field("order", &self.read().order)
            .finish()
    }
}

/// The pair of registries owned by a client.
pub struct Interceptors<R> {
    /// Transforms applied to outgoing request configuration.
    pub request: InterceptorRegistry<RequestConfig>,
    /// Transforms applied to incoming responses.
    pub response: InterceptorRegistry<R>,
}

impl<R> Interceptors<R> {
    pub fn new() -> Self {
        Self {
            request: InterceptorRegistry::new(Direction::Request),
            response: InterceptorRegistry::new(Direction::Response),
        }
    }
}

impl<R> std::fmt::Debug for Interceptors<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptors")
            .field("request", &self.request)
            .field("response", &self.response)
            .finish()
    }
}

impl<R> Default for Interceptors<R> {
    fn default() -> Self {
        Self::new()
    }
}
