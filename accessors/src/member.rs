use crate::error::AccessorError;
use crate::Accessible;
use serde::{Serialize, Serializer};
use std::any::{type_name, Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Declared type of a member, comparable by `TypeId` and printable by name.
#[derive(Clone, Copy)]
pub struct TypeHandle {
    id: TypeId,
    name: &'static str,
}

impl TypeHandle {
    pub fn of<V: Any>() -> TypeHandle {
        TypeHandle { id: TypeId::of::<V>(), name: type_name::<V>() }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<V: Any>(&self) -> bool {
        self.id == TypeId::of::<V>()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for TypeHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MemberKind {
    Field,
    Property,
}

/// Value produced by reading a member: fields are borrowed from the instance,
/// properties are computed and owned.
pub enum MemberValue<'a> {
    Borrowed(&'a dyn Any),
    Owned(Box<dyn Any>),
}

impl<'a> MemberValue<'a> {
    pub fn as_any(&self) -> &dyn Any {
        match self {
            MemberValue::Borrowed(value) => *value,
            MemberValue::Owned(value) => &**value,
        }
    }

    pub fn is<V: Any>(&self) -> bool {
        self.as_any().is::<V>()
    }

    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.as_any().downcast_ref::<V>()
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, MemberValue::Borrowed(_))
    }
}

impl fmt::Debug for MemberValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Borrowed(_) => f.write_str("Borrowed(..)"),
            MemberValue::Owned(_) => f.write_str("Owned(..)"),
        }
    }
}

pub(crate) type ReadFn<T> = dyn for<'a> Fn(&'a T) -> MemberValue<'a> + Send + Sync;

fn erase<T, F>(read: F) -> Arc<ReadFn<T>>
where
    F: for<'a> Fn(&'a T) -> MemberValue<'a> + Send + Sync + 'static,
{
    Arc::new(read)
}

/// One eligible member of `T`: its name, declared type, kind and how to read it.
pub struct MemberDescriptor<T> {
    name: &'static str,
    declared_type: TypeHandle,
    kind: MemberKind,
    read: Arc<ReadFn<T>>,
}

impl<T: 'static> MemberDescriptor<T> {
    pub fn field<V, F>(name: &'static str, read: F) -> MemberDescriptor<T>
    where
        V: Any,
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        MemberDescriptor {
            name,
            declared_type: TypeHandle::of::<V>(),
            kind: MemberKind::Field,
            read: erase(move |source: &T| MemberValue::Borrowed(read(source))),
        }
    }

    pub fn property<V, F>(name: &'static str, read: F) -> MemberDescriptor<T>
    where
        V: Any,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        MemberDescriptor {
            name,
            declared_type: TypeHandle::of::<V>(),
            kind: MemberKind::Property,
            read: erase(move |source: &T| MemberValue::Owned(Box::new(read(source)))),
        }
    }
}

impl<T> MemberDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared_type(&self) -> TypeHandle {
        self.declared_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn get_value<'a>(&self, source: &'a T) -> MemberValue<'a> {
        (self.read)(source)
    }
}

impl<T> Clone for MemberDescriptor<T> {
    fn clone(&self) -> Self {
        MemberDescriptor {
            name: self.name,
            declared_type: self.declared_type,
            kind: self.kind,
            read: Arc::clone(&self.read),
        }
    }
}

impl<T> fmt::Debug for MemberDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Ordered member table of a type, returned by [`Accessible::members`].
///
/// `#[derive(Accessors)]` emits one of these; types may also build it by hand:
///
/// ```
/// use accessors::{Accessible, Members};
///
/// struct Point { x: i32, y: i32 }
///
/// impl Point {
///     fn norm(&self) -> f64 { ((self.x * self.x + self.y * self.y) as f64).sqrt() }
/// }
///
/// impl Accessible for Point {
///     fn members() -> Members<Self> {
///         Members::new()
///             .field("x", |p: &Point| &p.x)
///             .field("y", |p: &Point| &p.y)
///             .property("norm", Point::norm)
///     }
/// }
/// ```
pub struct Members<T> {
    members: Vec<MemberDescriptor<T>>,
}

impl<T: 'static> Members<T> {
    pub fn new() -> Members<T> {
        Members { members: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Members<T> {
        Members { members: Vec::with_capacity(capacity) }
    }

    pub fn field<V, F>(mut self, name: &'static str, read: F) -> Members<T>
    where
        V: Any,
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        self.members.push(MemberDescriptor::field(name, read));
        self
    }

    pub fn property<V, F>(mut self, name: &'static str, read: F) -> Members<T>
    where
        V: Any,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.members.push(MemberDescriptor::property(name, read));
        self
    }
}

impl<T> Members<T> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberDescriptor<T>> {
        self.members.iter()
    }
}

impl<T: 'static> Default for Members<T> {
    fn default() -> Self {
        Members::new()
    }
}

impl<T> IntoIterator for Members<T> {
    type Item = MemberDescriptor<T>;
    type IntoIter = std::vec::IntoIter<MemberDescriptor<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

/// Materializes the member table of `T` and checks that member names are unique.
pub fn scan<T: Accessible>() -> Result<Vec<MemberDescriptor<T>>, AccessorError> {
    let members: Vec<MemberDescriptor<T>> = T::members().into_iter().collect();
    let mut seen = HashSet::with_capacity(members.len());
    for member in members.iter() {
        if !seen.insert(member.name) {
            return Err(AccessorError::DuplicateMember { type_name: type_name::<T>(), member: member.name });
        }
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        owner: String,
        balance: i64,
    }

    impl Account {
        fn in_credit(&self) -> bool {
            self.balance > 0
        }
    }

    impl Accessible for Account {
        fn members() -> Members<Self> {
            Members::new()
                .field("owner", |a: &Account| &a.owner)
                .field("balance", |a: &Account| &a.balance)
                .property("in_credit", Account::in_credit)
        }
    }

    struct Clashing {
        value: u8,
    }

    impl Accessible for Clashing {
        fn members() -> Members<Self> {
            Members::new()
                .field("value", |c: &Clashing| &c.value)
                .property("value", |c: &Clashing| c.value as u32)
        }
    }

    #[test]
    fn type_handles_compare_by_type() {
        assert_eq!(TypeHandle::of::<String>(), TypeHandle::of::<String>());
        assert_ne!(TypeHandle::of::<u32>(), TypeHandle::of::<i32>());
        assert!(TypeHandle::of::<i64>().is::<i64>());
        assert_eq!(TypeHandle::of::<bool>().to_string(), "bool");
    }

    #[test]
    fn scan_keeps_declaration_order_and_kinds() {
        let members = scan::<Account>().unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["owner", "balance", "in_credit"]);
        assert_eq!(members[0].kind(), MemberKind::Field);
        assert_eq!(members[2].kind(), MemberKind::Property);
        assert_eq!(members[1].declared_type(), TypeHandle::of::<i64>());
        assert_eq!(members[2].declared_type(), TypeHandle::of::<bool>());
    }

    #[test]
    fn fields_are_borrowed_and_properties_owned() {
        let account = Account { owner: "Ann".to_string(), balance: 12 };
        let members = scan::<Account>().unwrap();

        let owner = members[0].get_value(&account);
        assert!(owner.is_borrowed());
        assert_eq!(owner.downcast_ref::<String>(), Some(&account.owner));
        assert!(std::ptr::eq(owner.downcast_ref::<String>().unwrap(), &account.owner));

        let in_credit = members[2].get_value(&account);
        assert!(!in_credit.is_borrowed());
        assert_eq!(in_credit.downcast_ref::<bool>(), Some(&true));
        assert!(in_credit.downcast_ref::<String>().is_none());
    }

    #[test]
    fn duplicate_names_fail_the_scan() {
        let err = scan::<Clashing>().unwrap_err();
        assert!(matches!(err, AccessorError::DuplicateMember { member: "value", .. }));
    }
}
