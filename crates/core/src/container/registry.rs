//! Container registry implementation.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::error::RegistryError;

/// A container record.
///
/// Besides its `id`, a container holds whatever fields the caller supplied
/// at creation time (conventionally at least `name`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    /// Registry-assigned ID.
    pub id: i64,
    /// Caller-supplied fields, never containing `id`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Container {
    /// Creates a container with only a name.
    #[must_use]
    pub fn named(id: i64, name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name.into()));
        Self { id, fields }
    }

    /// Returns the `name` field if it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }
}

struct Inner {
    containers: Vec<Container>,
    next_id: i64,
}

/// Process-wide ordered collection of containers.
///
/// IDs come from a counter that only moves forward, so they stay unique even
/// though nothing is ever removed from the list.
pub struct ContainerRegistry {
    inner: RwLock<Inner>,
}

impl ContainerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::from_containers(Vec::new())
    }

    /// Creates a registry holding the given records.
    ///
    /// The counter starts after the highest existing ID.
    #[must_use]
    pub fn from_containers(containers: Vec<Container>) -> Self {
        let next_id = containers.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(Inner {
                containers,
                next_id,
            }),
        }
    }

    /// Creates a registry with the two demo records `Container A` and `Container B`.
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_containers(vec![
            Container::named(1, "Container A"),
            Container::named(2, "Container B"),
        ])
    }

    /// Returns all containers in insertion order.
    pub fn list(&self) -> Vec<Container> {
        self.read().containers.clone()
    }

    /// Returns the container with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no container has this ID.
    pub fn get(&self, id: i64) -> Result<Container, RegistryError> {
        self.read()
            .containers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// Appends a new container built from caller-supplied fields.
    ///
    /// An integer `id` in `fields` replaces the assigned one. Any other `id`
    /// value is dropped.
    pub fn create(&self, mut fields: Map<String, Value>) -> Container {
        let mut inner = self.write();

        let assigned = inner.next_id;
        inner.next_id += 1;

        let id = match fields.remove("id") {
            None => assigned,
            Some(Value::Number(n)) if n.as_i64().is_some() => {
                let requested = n.as_i64().unwrap_or(assigned);
                warn!(assigned, requested, "caller-supplied id overrides assigned id");
                requested
            }
            Some(other) => {
                warn!(assigned, value = %other, "ignoring non-integer caller-supplied id");
                assigned
            }
        };

        let container = Container { id, fields };
        inner.containers.push(container.clone());
        container
    }

    /// Number of containers held.
    pub fn len(&self) -> usize {
        self.read().containers.len()
    }

    /// Returns true if the registry holds no containers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ContainerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
