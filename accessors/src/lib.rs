//! accessors builds, once per type, a table of read accessors over the public fields and
//! properties of that type and caches it for the rest of the process, so that generic code
//! (serializers, mappers, tabular exporters) can read arbitrary values without per-type code.
//!
//! Member tables are emitted at compile time by `#[derive(Accessors)]` or written by hand
//! through [`Members`]. The first request for a type synthesizes its factory under the cache
//! guard; every later request reuses it.
//!
//! ```
//! use accessors::*;
//!
//! #[derive(Accessors)]
//! #[accessors(rename_all = "PascalCase")]
//! pub struct Person {
//!     pub name: String,
//!     pub age: i32,
//! }
//!
//! let ann = Person { name: "Ann".to_string(), age: 30 };
//! let array = get_accessor_array(Some(&ann)).unwrap();
//! assert_eq!(array.column_names(), &["Name", "Age"]);
//! assert_eq!(array.get(1).unwrap().get::<i32>(), Ok(30));
//!
//! let map = ann.to_accessor_map();
//! assert_eq!(map.value::<String>("Name"), Ok("Ann".to_string()));
//! ```

extern crate self as accessors;

#[macro_use]
pub mod logger;
pub mod config;
pub mod error;
pub mod member;
pub mod accessor;
pub mod shape;
pub mod cache;
pub mod registry;

pub use accessor::{Accessor, AccessorArray, AccessorMap, Column};
pub use cache::{CacheStats, TypeAccessorCache};
pub use self::config::{LogLevel, RegistryConfig};
pub use error::AccessorError;
pub use inventory;
pub use macros::Accessors;
pub use member::{MemberDescriptor, MemberKind, MemberValue, Members, TypeHandle};
pub use registry::{registered_types, AccessorRegistry, RegistryStats};
pub use shape::{ArrayFactory, ArrayShape, Assembly, MapFactory, MapShape, Shape};

/// A type whose public members can be read through cached accessors.
///
/// The cache is keyed by the implementing type itself, so reading through a wrapper type
/// yields the wrapper's members, never those of what it wraps.
pub trait Accessible: Sized + 'static {
    /// Eligible members in column order.
    fn members() -> Members<Self>;
}

/// Registration record submitted by `#[derive(Accessors)]` for non-generic types.
pub struct AccessibleInfo {
    pub name: &'static str,
    pub preload_fn: fn(&AccessorRegistry),
}

inventory::collect!(AccessibleInfo);

/// Builds both cached factories of `T` in `registry`.
pub fn preload<T: Accessible>(registry: &AccessorRegistry) {
    registry.array_factory::<T>();
    registry.map_factory::<T>();
}

/// Array-shaped accessors of `source` from the global registry; `None` when `source` is `None`.
pub fn get_accessor_array<T: Accessible>(source: Option<&T>) -> Option<AccessorArray<'_, T>> {
    AccessorRegistry::global().accessor_array(source)
}

/// Map-shaped accessors of `source` from the global registry; `None` when `source` is `None`.
pub fn get_accessor_map<T: Accessible>(source: Option<&T>) -> Option<AccessorMap<'_, T>> {
    AccessorRegistry::global().accessor_map(source)
}

pub trait AccessorExt: Accessible {
    fn to_accessor_array(&self) -> AccessorArray<'_, Self> {
        AccessorRegistry::global().array_factory::<Self>().invoke(self)
    }

    fn to_accessor_map(&self) -> AccessorMap<'_, Self> {
        AccessorRegistry::global().map_factory::<Self>().invoke(self)
    }
}

impl<T: Accessible> AccessorExt for T {}
