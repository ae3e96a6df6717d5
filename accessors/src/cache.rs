use crate::config::DEFAULT_INITIAL_CAPACITY;
use crate::shape::{synthesize, FactoryOf, Shape};
use crate::Accessible;
use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    marker::PhantomData,
    sync::atomic::{AtomicUsize, Ordering},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Types with a cached factory.
    pub entries: usize,
    /// Factories synthesized so far, at most one per type.
    pub builds: usize,
}

/// Process-lifetime map from a type to its synthesized factory of shape `S`.
///
/// The guard is held while a missing factory is built, so each type is synthesized once
/// no matter how many threads ask for it; it is released before the factory is used.
pub struct TypeAccessorCache<S: Shape> {
    inner: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    builds: AtomicUsize,
    _shape: PhantomData<S>,
}

impl<S: Shape> TypeAccessorCache<S> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TypeAccessorCache {
            inner: Mutex::new(HashMap::with_capacity(capacity)),
            builds: AtomicUsize::new(0),
            _shape: PhantomData,
        }
    }

    // Entries are inserted only after a successful build, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Arc<dyn Any + Send + Sync>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_or_create<T: Accessible>(&self) -> Arc<FactoryOf<S, T>> {
        let key = TypeId::of::<T>();
        let mut map = self.lock();
        let erased = map.entry(key).or_insert_with(|| Arc::new(self.build::<T>()) as Arc<dyn Any + Send + Sync>).clone();
        drop(map);
        Arc::downcast::<FactoryOf<S, T>>(erased)
            .unwrap_or_else(|_| panic!("{} cache entry of '{}' holds a foreign factory", S::NAME, type_name::<T>()))
    }

    fn build<T: Accessible>(&self) -> FactoryOf<S, T> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        match synthesize::<T, S::Builder<T>>() {
            Ok(factory) => factory,
            Err(e) => {
                error!("{} accessor synthesis for '{}' failed: {}", S::NAME, type_name::<T>(), e);
                panic!("{} accessor synthesis for '{}' failed: {}", S::NAME, type_name::<T>(), e)
            }
        }
    }

    pub fn contains<T: Accessible>(&self) -> bool {
        self.lock().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { entries: self.len(), builds: self.builds.load(Ordering::SeqCst) }
    }
}

impl<S: Shape> Default for TypeAccessorCache<S> {
    fn default() -> Self {
        Self::new()
    }
}
