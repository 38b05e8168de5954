// lib/src/engine/entity_map.rs

//! An id-keyed, insertion-ordered map with copy-on-write sharing.
//!
//! Cloning an `EntityMap` is a reference-count bump. The first write through a
//! shared handle copies the index (ids and `Arc` pointers, never the entities
//! themselves); later writes through the now-unique handle are in place.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use models::Identifier;

pub struct EntityMap<T> {
    inner: Arc<EntityMapInner<T>>,
}

struct EntityMapInner<T> {
    order: Vec<Identifier>,
    entries: HashMap<Identifier, Arc<T>>,
}

impl<T> Clone for EntityMapInner<T> {
    fn clone(&self) -> Self {
        EntityMapInner {
            order: self.order.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<T> Clone for EntityMap<T> {
    fn clone(&self) -> Self {
        EntityMap {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EntityMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for EntityMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl<T> EntityMap<T> {
    pub fn new() -> Self {
        EntityMap {
            inner: Arc::new(EntityMapInner {
                order: Vec::new(),
                entries: HashMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.order.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.inner.entries.get(id).map(|entity| entity.as_ref())
    }

    /// Inserts or overwrites `id`. An overwritten id keeps its original position.
    pub fn insert(&mut self, id: Identifier, entity: T) {
        self.insert_shared(id, Arc::new(entity));
    }

    fn insert_shared(&mut self, id: Identifier, entity: Arc<T>) {
        let inner = Arc::make_mut(&mut self.inner);
        if inner.entries.insert(id.clone(), entity).is_none() {
            inner.order.push(id);
        }
    }

    /// Persistent insert: returns a new map and leaves `self` untouched.
    pub fn with(&self, id: Identifier, entity: T) -> Self {
        let mut next = self.clone();
        next.insert(id, entity);
        next
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &Identifier> + '_ {
        self.inner.order.iter()
    }

    /// Entities in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries().map(|(_, entity)| entity)
    }

    /// `(id, entity)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&Identifier, &T)> + '_ {
        let inner = &*self.inner;
        inner
            .order
            .iter()
            .filter_map(move |id| inner.entries.get(id).map(|entity| (id, entity.as_ref())))
    }

    /// A new map holding the entities for which `keep` is true. Surviving
    /// entities are shared with `self`, not copied.
    pub fn filter(&self, mut keep: impl FnMut(&T) -> bool) -> Self {
        let mut order = Vec::new();
        let mut entries = HashMap::new();
        for id in &self.inner.order {
            if let Some(entity) = self.inner.entries.get(id) {
                if keep(entity) {
                    order.push(id.clone());
                    entries.insert(id.clone(), Arc::clone(entity));
                }
            }
        }
        EntityMap {
            inner: Arc::new(EntityMapInner { order, entries }),
        }
    }

    /// A new map with every entity replaced by `f(entity)` under the same id.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> EntityMap<U> {
        let mut mapped = EntityMap::new();
        for (id, entity) in self.entries() {
            mapped.insert(id.clone(), f(entity));
        }
        mapped
    }

    /// True when both handles point at the same underlying storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> FromIterator<(Identifier, T)> for EntityMap<T> {
    fn from_iter<I: IntoIterator<Item = (Identifier, T)>>(iter: I) -> Self {
        let mut map = EntityMap::new();
        for (id, entity) in iter {
            map.insert(id, entity);
        }
        map
    }
}

impl<T: Serialize> Serialize for EntityMap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, entity) in self.entries() {
            map.serialize_entry(id, entity)?;
        }
        map.end()
    }
}

struct EntityMapVisitor<T> {
    marker: PhantomData<fn() -> EntityMap<T>>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for EntityMapVisitor<T> {
    type Value = EntityMap<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object keyed by entity id")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = EntityMap::new();
        while let Some((id, entity)) = access.next_entry::<Identifier, T>()? {
            map.insert(id, entity);
        }
        Ok(map)
    }
}

// Keys are taken in document order, so a round trip keeps iteration order.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for EntityMap<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(EntityMapVisitor {
            marker: PhantomData,
        })
    }
}
