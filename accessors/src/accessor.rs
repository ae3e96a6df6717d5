use crate::error::AccessorError;
use crate::member::{MemberDescriptor, MemberKind, MemberValue, TypeHandle};
use serde::Serialize;
use std::any::{type_name, Any};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Read accessor of one member bound to one instance.
pub struct Accessor<'a, T> {
    source: &'a T,
    member: Arc<MemberDescriptor<T>>,
}

impl<'a, T> Accessor<'a, T> {
    pub(crate) fn bind(source: &'a T, member: Arc<MemberDescriptor<T>>) -> Accessor<'a, T> {
        Accessor { source, member }
    }

    pub fn name(&self) -> &'static str {
        self.member.name()
    }

    pub fn declared_type(&self) -> TypeHandle {
        self.member.declared_type()
    }

    pub fn kind(&self) -> MemberKind {
        self.member.kind()
    }

    /// Reads the current value of the member.
    pub fn call(&self) -> MemberValue<'a> {
        self.member.get_value(self.source)
    }

    /// Reads the member without cloning it.
    pub fn with<V: Any, R>(&self, f: impl FnOnce(&V) -> R) -> Result<R, AccessorError> {
        self.check::<V>()?;
        let value = self.call();
        let result = value.downcast_ref::<V>().map(f);
        result.ok_or_else(|| self.mismatch::<V>())
    }

    pub fn get<V: Any + Clone>(&self) -> Result<V, AccessorError> {
        self.check::<V>()?;
        match self.call() {
            MemberValue::Borrowed(value) => value.downcast_ref::<V>().cloned().ok_or_else(|| self.mismatch::<V>()),
            MemberValue::Owned(value) => value.downcast::<V>().map(|v| *v).map_err(|_| self.mismatch::<V>()),
        }
    }

    fn check<V: Any>(&self) -> Result<(), AccessorError> {
        if self.declared_type().is::<V>() {
            Ok(())
        } else {
            Err(self.mismatch::<V>())
        }
    }

    fn mismatch<V: Any>(&self) -> AccessorError {
        AccessorError::TypeMismatch {
            member: self.name(),
            declared: self.declared_type().name(),
            requested: type_name::<V>(),
        }
    }
}

impl<T> Clone for Accessor<'_, T> {
    fn clone(&self) -> Self {
        Accessor { source: self.source, member: Arc::clone(&self.member) }
    }
}

impl<T> fmt::Debug for Accessor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name())
            .field("declared_type", &self.declared_type())
            .field("kind", &self.kind())
            .finish()
    }
}

/// Schema row of one member, in column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub kind: MemberKind,
}

impl<T> From<&MemberDescriptor<T>> for Column {
    fn from(member: &MemberDescriptor<T>) -> Self {
        Column { name: member.name(), type_name: member.declared_type().name(), kind: member.kind() }
    }
}

/// Array-shaped accessor set: accessors with parallel column types and names.
pub struct AccessorArray<'a, T> {
    accessors: Vec<Accessor<'a, T>>,
    column_types: Arc<[TypeHandle]>,
    column_names: Arc<[&'static str]>,
}

impl<'a, T> AccessorArray<'a, T> {
    pub(crate) fn new(accessors: Vec<Accessor<'a, T>>, column_types: Arc<[TypeHandle]>, column_names: Arc<[&'static str]>) -> Self {
        AccessorArray { accessors, column_types, column_names }
    }

    pub fn accessors(&self) -> &[Accessor<'a, T>] {
        &self.accessors
    }

    pub fn column_types(&self) -> &[TypeHandle] {
        &self.column_types
    }

    pub fn column_names(&self) -> &[&'static str] {
        &self.column_names
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Accessor<'a, T>> {
        self.accessors.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|n| *n == name)
    }

    pub fn by_name(&self, name: &str) -> Result<&Accessor<'a, T>, AccessorError> {
        self.position(name)
            .map(|index| &self.accessors[index])
            .ok_or_else(|| AccessorError::UnknownMember { type_name: type_name::<T>(), member: name.to_string() })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Accessor<'a, T>> {
        self.accessors.iter()
    }

    /// `(accessors, column_types, column_names)`, all in the same column order.
    pub fn into_parts(self) -> (Vec<Accessor<'a, T>>, Arc<[TypeHandle]>, Arc<[&'static str]>) {
        (self.accessors, self.column_types, self.column_names)
    }
}

impl<'a, T> IntoIterator for AccessorArray<'a, T> {
    type Item = Accessor<'a, T>;
    type IntoIter = std::vec::IntoIter<Accessor<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.accessors.into_iter()
    }
}

impl<T> fmt::Debug for AccessorArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.accessors.iter()).finish()
    }
}

/// Map-shaped accessor set keyed by member name.
pub struct AccessorMap<'a, T> {
    accessors: HashMap<&'static str, Accessor<'a, T>>,
}

impl<'a, T> AccessorMap<'a, T> {
    pub(crate) fn new(accessors: HashMap<&'static str, Accessor<'a, T>>) -> Self {
        AccessorMap { accessors }
    }

    pub fn get(&self, name: &str) -> Option<&Accessor<'a, T>> {
        self.accessors.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    pub fn keys(&self) -> hash_map::Keys<'_, &'static str, Accessor<'a, T>> {
        self.accessors.keys()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, &'static str, Accessor<'a, T>> {
        self.accessors.iter()
    }

    /// Reads member `name` as `V`.
    pub fn value<V: Any + Clone>(&self, name: &str) -> Result<V, AccessorError> {
        self.accessors
            .get(name)
            .ok_or_else(|| AccessorError::UnknownMember { type_name: type_name::<T>(), member: name.to_string() })?
            .get::<V>()
    }

    pub fn into_inner(self) -> HashMap<&'static str, Accessor<'a, T>> {
        self.accessors
    }
}

impl<'a, T> IntoIterator for AccessorMap<'a, T> {
    type Item = (&'static str, Accessor<'a, T>);
    type IntoIter = hash_map::IntoIter<&'static str, Accessor<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.accessors.into_iter()
    }
}

impl<T> fmt::Debug for AccessorMap<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.accessors.iter()).finish()
    }
}
