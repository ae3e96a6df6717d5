use crate::accessor::{AccessorArray, AccessorMap};
use crate::cache::{CacheStats, TypeAccessorCache};
use crate::config::RegistryConfig;
use crate::shape::{ArrayFactory, ArrayShape, MapFactory, MapShape};
use crate::{Accessible, AccessibleInfo};
use once_cell::sync::Lazy;
use std::sync::Arc;

static GLOBAL: Lazy<AccessorRegistry> = Lazy::new(|| AccessorRegistry::with_config(&RegistryConfig::from_env()));

/// Owner of the array-shaped and map-shaped caches.
///
/// [`AccessorRegistry::global`] is the process-wide instance used by the crate-level
/// entry points; separate instances share nothing with it.
pub struct AccessorRegistry {
    arrays: TypeAccessorCache<ArrayShape>,
    maps: TypeAccessorCache<MapShape>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub arrays: CacheStats,
    pub maps: CacheStats,
}

impl AccessorRegistry {
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    /// Preloads every registered type when `config.preload` is set.
    pub fn with_config(config: &RegistryConfig) -> Self {
        let registry = AccessorRegistry {
            arrays: TypeAccessorCache::with_capacity(config.initial_capacity),
            maps: TypeAccessorCache::with_capacity(config.initial_capacity),
        };
        if config.preload {
            let count = registry.preload_registered();
            info!("Preloaded accessors of {} registered types", count);
        }
        registry
    }

    pub fn global() -> &'static AccessorRegistry {
        &GLOBAL
    }

    /// Accessors of `source` with parallel column types and names, `None` for a missing source.
    pub fn accessor_array<'a, T: Accessible>(&self, source: Option<&'a T>) -> Option<AccessorArray<'a, T>> {
        let source = source?;
        Some(self.array_factory::<T>().invoke(source))
    }

    /// Accessors of `source` keyed by member name, `None` for a missing source.
    pub fn accessor_map<'a, T: Accessible>(&self, source: Option<&'a T>) -> Option<AccessorMap<'a, T>> {
        let source = source?;
        Some(self.map_factory::<T>().invoke(source))
    }

    pub fn array_factory<T: Accessible>(&self) -> Arc<ArrayFactory<T>> {
        self.arrays.get_or_create::<T>()
    }

    pub fn map_factory<T: Accessible>(&self) -> Arc<MapFactory<T>> {
        self.maps.get_or_create::<T>()
    }

    /// Builds both factories of every type registered by `#[derive(Accessors)]`.
    pub fn preload_registered(&self) -> usize {
        let mut count = 0;
        for info in inventory::iter::<AccessibleInfo> {
            (info.preload_fn)(self);
            count += 1;
        }
        count
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats { arrays: self.arrays.stats(), maps: self.maps.stats() }
    }
}

impl Default for AccessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of all types registered by `#[derive(Accessors)]`.
pub fn registered_types() -> Vec<&'static str> {
    inventory::iter::<AccessibleInfo>.into_iter().map(|info| info.name).collect()
}
