use crate::accessor::{Accessor, AccessorArray, AccessorMap, Column};
use crate::error::AccessorError;
use crate::member::{scan, MemberDescriptor, TypeHandle};
use crate::Accessible;
use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

/// Output-shape strategy driven by [`synthesize`].
pub trait Assembly<T: Accessible>: Sized {
    type Factory: Send + Sync + 'static;

    fn start(len: usize) -> Self;
    fn add_member(&mut self, member: MemberDescriptor<T>);
    fn finish(self) -> Self::Factory;
}

/// Marker selecting the assembly used by a [`TypeAccessorCache`](crate::cache::TypeAccessorCache).
pub trait Shape: Send + Sync + 'static {
    const NAME: &'static str;
    type Builder<T: Accessible>: Assembly<T>;
}

pub type FactoryOf<S, T> = <<S as Shape>::Builder<T> as Assembly<T>>::Factory;

/// Scans `T` once and feeds every member into a fresh assembly.
pub fn synthesize<T: Accessible, A: Assembly<T>>() -> Result<A::Factory, AccessorError> {
    let members = scan::<T>()?;
    debug!("synthesizing {} accessors for {}", members.len(), type_name::<T>());
    let mut assembly = A::start(members.len());
    for member in members {
        assembly.add_member(member);
    }
    Ok(assembly.finish())
}

pub struct ArrayShape;

impl Shape for ArrayShape {
    const NAME: &'static str = "array";
    type Builder<T: Accessible> = ArrayAssembly<T>;
}

pub struct ArrayAssembly<T> {
    slots: Vec<Arc<MemberDescriptor<T>>>,
    column_types: Vec<TypeHandle>,
    column_names: Vec<&'static str>,
}

impl<T: Accessible> Assembly<T> for ArrayAssembly<T> {
    type Factory = ArrayFactory<T>;

    fn start(len: usize) -> Self {
        ArrayAssembly {
            slots: Vec::with_capacity(len),
            column_types: Vec::with_capacity(len),
            column_names: Vec::with_capacity(len),
        }
    }

    fn add_member(&mut self, member: MemberDescriptor<T>) {
        self.column_types.push(member.declared_type());
        self.column_names.push(member.name());
        self.slots.push(Arc::new(member));
    }

    fn finish(self) -> ArrayFactory<T> {
        ArrayFactory {
            slots: self.slots.into(),
            column_types: self.column_types.into(),
            column_names: self.column_names.into(),
        }
    }
}

/// Produces the array-shaped accessor set of `T`; names and types are shared by every invocation.
pub struct ArrayFactory<T> {
    slots: Arc<[Arc<MemberDescriptor<T>>]>,
    column_types: Arc<[TypeHandle]>,
    column_names: Arc<[&'static str]>,
}

impl<T> ArrayFactory<T> {
    pub fn invoke<'a>(&self, source: &'a T) -> AccessorArray<'a, T> {
        let mut accessors = Vec::with_capacity(self.slots.len());
        for member in self.slots.iter() {
            accessors.push(Accessor::bind(source, Arc::clone(member)));
        }
        AccessorArray::new(accessors, Arc::clone(&self.column_types), Arc::clone(&self.column_names))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn column_types(&self) -> &[TypeHandle] {
        &self.column_types
    }

    pub fn column_names(&self) -> &[&'static str] {
        &self.column_names
    }

    pub fn columns(&self) -> Vec<Column> {
        self.slots.iter().map(|m| Column::from(&**m)).collect()
    }
}

pub struct MapShape;

impl Shape for MapShape {
    const NAME: &'static str = "map";
    type Builder<T: Accessible> = MapAssembly<T>;
}

pub struct MapAssembly<T> {
    members: Vec<Arc<MemberDescriptor<T>>>,
}

impl<T: Accessible> Assembly<T> for MapAssembly<T> {
    type Factory = MapFactory<T>;

    fn start(len: usize) -> Self {
        MapAssembly { members: Vec::with_capacity(len) }
    }

    fn add_member(&mut self, member: MemberDescriptor<T>) {
        self.members.push(Arc::new(member));
    }

    fn finish(self) -> MapFactory<T> {
        MapFactory { members: self.members.into() }
    }
}

/// Produces the map-shaped accessor set of `T`.
pub struct MapFactory<T> {
    members: Arc<[Arc<MemberDescriptor<T>>]>,
}

impl<T> MapFactory<T> {
    pub fn invoke<'a>(&self, source: &'a T) -> AccessorMap<'a, T> {
        let mut accessors = HashMap::with_capacity(self.members.len());
        for member in self.members.iter() {
            accessors.insert(member.name(), Accessor::bind(source, Arc::clone(member)));
        }
        AccessorMap::new(accessors)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|m| m.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{MemberKind, Members};

    struct Order {
        id: u64,
        customer: String,
        lines: Vec<u32>,
    }

    impl Order {
        fn total(&self) -> u32 {
            self.lines.iter().sum()
        }
    }

    impl Accessible for Order {
        fn members() -> Members<Self> {
            Members::new()
                .field("id", |o: &Order| &o.id)
                .field("customer", |o: &Order| &o.customer)
                .property("total", Order::total)
        }
    }

    struct Empty;

    impl Accessible for Empty {
        fn members() -> Members<Self> {
            Members::new()
        }
    }

    fn order() -> Order {
        Order { id: 9, customer: "Bo".to_string(), lines: vec![2, 3] }
    }

    #[test]
    fn array_factory_fills_fixed_slots() {
        let factory = synthesize::<Order, ArrayAssembly<Order>>().unwrap();
        let order = order();
        let array = factory.invoke(&order);

        assert_eq!(array.column_names(), &["id", "customer", "total"]);
        assert_eq!(array.column_types(), &[TypeHandle::of::<u64>(), TypeHandle::of::<String>(), TypeHandle::of::<u32>()]);
        for (index, accessor) in array.iter().enumerate() {
            assert_eq!(accessor.name(), array.column_names()[index]);
            assert_eq!(accessor.declared_type(), array.column_types()[index]);
        }
        assert_eq!(array.get(0).unwrap().get::<u64>(), Ok(9));
        assert_eq!(array.by_name("total").unwrap().get::<u32>(), Ok(5));
        assert!(array.by_name("missing").is_err());
    }

    #[test]
    fn array_factory_shares_column_metadata_across_invocations() {
        let factory = synthesize::<Order, ArrayAssembly<Order>>().unwrap();
        let (first, second) = (order(), order());
        let (_, types_a, names_a) = factory.invoke(&first).into_parts();
        let (_, types_b, names_b) = factory.invoke(&second).into_parts();
        assert!(Arc::ptr_eq(&types_a, &types_b));
        assert!(Arc::ptr_eq(&names_a, &names_b));
    }

    #[test]
    fn map_factory_keys_by_member_name() {
        let factory = synthesize::<Order, MapAssembly<Order>>().unwrap();
        let order = order();
        let map = factory.invoke(&order);

        assert_eq!(map.len(), 3);
        assert_eq!(map.value::<String>("customer"), Ok("Bo".to_string()));
        assert_eq!(map.get("total").unwrap().kind(), MemberKind::Property);
        assert!(matches!(map.value::<u8>("nope"), Err(AccessorError::UnknownMember { .. })));
        assert_eq!(factory.names().collect::<Vec<_>>(), vec!["id", "customer", "total"]);
    }

    #[test]
    fn accessors_see_current_instance_state() {
        let factory = synthesize::<Order, ArrayAssembly<Order>>().unwrap();
        let mut order = order();
        order.lines.push(10);
        order.customer.push('b');
        let array = factory.invoke(&order);
        assert_eq!(array.by_name("total").unwrap().get::<u32>(), Ok(15));
        assert_eq!(array.by_name("customer").unwrap().get::<String>(), Ok("Bob".to_string()));
    }

    #[test]
    fn types_without_members_yield_empty_sets() {
        let arrays = synthesize::<Empty, ArrayAssembly<Empty>>().unwrap();
        let maps = synthesize::<Empty, MapAssembly<Empty>>().unwrap();
        assert!(arrays.invoke(&Empty).is_empty());
        assert!(arrays.column_names().is_empty());
        assert!(maps.invoke(&Empty).is_empty());
    }

    #[test]
    fn columns_describe_the_array_order() {
        let factory = synthesize::<Order, ArrayAssembly<Order>>().unwrap();
        let kinds: Vec<_> = factory.columns().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![MemberKind::Field, MemberKind::Field, MemberKind::Property]);
    }
}
