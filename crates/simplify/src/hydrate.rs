//! Relation hydration.
//!
//! Populates a relation member of already-fetched entities with a follow-up
//! query keyed on a foreign value, emulating a join without one:
//!
//! 1. read the parent key (one parent, or every parent of a slice),
//! 2. select every child whose key column equals / is in those values,
//! 3. run it through an executor,
//! 4. write the matching children into the parent's member according to the
//!    member's [`RelationKind`].
//!
//! Everything that can be wrong with a relation (unknown key property,
//! unsupported member type, unregistered entity) is reported by
//! [`Hydrator::relation`], before any query runs.
//!
//! ```ignore
//! use simplify::hydrate::{Hydrator, Member};
//! use simplify::{key, Dialect};
//!
//! let hydrator = Hydrator::new(&registry, Dialect::SqlServer);
//! let permissions = hydrator.relation(
//!     key!(User, user_id),
//!     Member::many("permissions", |u: &mut User| &mut u.permissions),
//!     key!(Permission, user_id),
//! )?;
//!
//! permissions.hydrate_all(&executor, &mut users).await?;
//! ```

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::builder::QueryBuilder;
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::executor::{BlockingExecutor, Executor};
use crate::metadata::{Entity, MetadataProvider};
use crate::row::FromRow;
use crate::value::Value;

/// A named key projection: `property` must be a mapped property of `E`, and
/// `get` reads it.
///
/// Build one with the [`key!`](crate::key) macro so the name and the field
/// access cannot drift apart. Relation setup checks only that the name is
/// mapped; what `get` returns is taken on trust.
pub struct Key<E, K> {
    property: &'static str,
    get: fn(&E) -> K,
}

impl<E, K> Key<E, K> {
    /// Pair a property name with an arbitrary reader.
    ///
    /// Nothing ties `get` to `property`: `new_unchecked("id", |a| a.id * 2)`
    /// validates but joins on the wrong values. Prefer [`key!`](crate::key).
    pub fn new_unchecked(property: &'static str, get: fn(&E) -> K) -> Self {
        Self { property, get }
    }

    pub fn property(&self) -> &'static str {
        self.property
    }

    pub fn get(&self, entity: &E) -> K {
        (self.get)(entity)
    }
}

impl<E, K> Clone for Key<E, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, K> Copy for Key<E, K> {}

impl<E, K> std::fmt::Debug for Key<E, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Key").field(&self.property).finish()
    }
}

/// Build a [`Key`] reading a field by clone.
///
/// `key!(User, user_id)` is
/// `Key::new_unchecked("user_id", |e: &User| e.user_id.clone())`.
#[macro_export]
macro_rules! key {
    ($entity:ty, $field:ident) => {
        $crate::hydrate::Key::<$entity, _>::new_unchecked(stringify!($field), |e: &$entity| {
            ::core::clone::Clone::clone(&e.$field)
        })
    };
}

/// Build a [`Member`] from a field, classifying it by its declared type.
///
/// Evaluates to `OrmResult<Member<_, _>>`; a field that is not `Vec<C>`,
/// `Option<Vec<C>>`, `C` or `Option<C>` yields
/// [`OrmError::UnsupportedShape`].
#[macro_export]
macro_rules! member {
    ($entity:ty, $field:ident) => {
        $crate::hydrate::Member::declared(stringify!($field), |p: &mut $entity| &mut p.$field)
    };
}

/// How hydrated children are written into the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// A collection; every matching child is appended.
    Many,
    /// A required single reference; the first match is assigned.
    One,
    /// An optional single reference; the first match, or nothing.
    OptionalOne,
}

enum Slot<P, C> {
    Many(fn(&mut P) -> &mut Vec<C>),
    LazyMany(fn(&mut P) -> &mut Option<Vec<C>>),
    One(fn(&mut P) -> &mut C),
    OptionalOne(fn(&mut P) -> &mut Option<C>),
}

/// The relation member of a parent `P` that receives children `C`.
pub struct Member<P, C> {
    name: &'static str,
    declared_type: &'static str,
    slot: Slot<P, C>,
}

impl<P, C> Member<P, C> {
    /// A `Vec<C>` member.
    pub fn many(name: &'static str, access: fn(&mut P) -> &mut Vec<C>) -> Self {
        Self {
            name,
            declared_type: std::any::type_name::<Vec<C>>(),
            slot: Slot::Many(access),
        }
    }

    /// An `Option<Vec<C>>` member, allocated on first assignment.
    pub fn lazy_many(name: &'static str, access: fn(&mut P) -> &mut Option<Vec<C>>) -> Self {
        Self {
            name,
            declared_type: std::any::type_name::<Option<Vec<C>>>(),
            slot: Slot::LazyMany(access),
        }
    }

    /// A `C` member.
    pub fn one(name: &'static str, access: fn(&mut P) -> &mut C) -> Self {
        Self {
            name,
            declared_type: std::any::type_name::<C>(),
            slot: Slot::One(access),
        }
    }

    /// An `Option<C>` member.
    pub fn optional_one(name: &'static str, access: fn(&mut P) -> &mut Option<C>) -> Self {
        Self {
            name,
            declared_type: std::any::type_name::<Option<C>>(),
            slot: Slot::OptionalOne(access),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared_type(&self) -> &'static str {
        self.declared_type
    }

    pub fn kind(&self) -> RelationKind {
        match self.slot {
            Slot::Many(_) | Slot::LazyMany(_) => RelationKind::Many,
            Slot::One(_) => RelationKind::One,
            Slot::OptionalOne(_) => RelationKind::OptionalOne,
        }
    }

    /// Write `children` (already filtered to this parent) into the member.
    fn assign(&self, parent: &mut P, children: Vec<C>) {
        match self.slot {
            Slot::Many(access) => access(parent).extend(children),
            Slot::LazyMany(access) => access(parent).get_or_insert_with(Vec::new).extend(children),
            Slot::One(access) => {
                if let Some(first) = children.into_iter().next() {
                    *access(parent) = first;
                }
            }
            Slot::OptionalOne(access) => *access(parent) = children.into_iter().next(),
        }
    }
}

impl<P: 'static, C: 'static> Member<P, C> {
    /// Classify a member by its declared type `T`.
    ///
    /// `Vec<C>` and `Option<Vec<C>>` are [`RelationKind::Many`], `C` is
    /// [`RelationKind::One`] and `Option<C>` is [`RelationKind::OptionalOne`].
    /// Anything else is rejected.
    pub fn declared<T: 'static>(name: &'static str, access: fn(&mut P) -> &mut T) -> OrmResult<Self> {
        let erased: &dyn Any = &access;
        let slot = if let Some(f) = erased.downcast_ref::<fn(&mut P) -> &mut Vec<C>>() {
            Slot::Many(*f)
        } else if let Some(f) = erased.downcast_ref::<fn(&mut P) -> &mut Option<Vec<C>>>() {
            Slot::LazyMany(*f)
        } else if let Some(f) = erased.downcast_ref::<fn(&mut P) -> &mut C>() {
            Slot::One(*f)
        } else if let Some(f) = erased.downcast_ref::<fn(&mut P) -> &mut Option<C>>() {
            Slot::OptionalOne(*f)
        } else {
            return Err(OrmError::unsupported_shape(name, std::any::type_name::<T>()));
        };
        Ok(Self {
            name,
            declared_type: std::any::type_name::<T>(),
            slot,
        })
    }
}

impl<P, C> std::fmt::Debug for Member<P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Creates validated [`Relation`]s from entity metadata.
#[derive(Debug, Clone, Copy)]
pub struct Hydrator<'m, M> {
    metadata: &'m M,
    dialect: Dialect,
}

impl<'m, M: MetadataProvider> Hydrator<'m, M> {
    pub fn new(metadata: &'m M, dialect: Dialect) -> Self {
        Self { metadata, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Configure a relation from `P` to `C`, joined on
    /// `parent_key(P) == child_key(C)`.
    ///
    /// Fails with [`OrmError::Metadata`] if either entity is unregistered and
    /// with [`OrmError::InvalidAccessor`] if a key names a property that is
    /// not mapped.
    pub fn relation<P, C, K>(
        &self,
        parent_key: Key<P, K>,
        member: Member<P, C>,
        child_key: Key<C, K>,
    ) -> OrmResult<Relation<P, C, K>>
    where
        P: Entity,
        C: Entity,
    {
        self.metadata.table_name::<P>()?;
        if self.metadata.column_name::<P>(parent_key.property()).is_none() {
            return Err(OrmError::invalid_accessor(
                std::any::type_name::<P>(),
                parent_key.property(),
            ));
        }

        let child_table = self.metadata.table_name::<C>()?;
        let child_column = self
            .metadata
            .column_name::<C>(child_key.property())
            .ok_or_else(|| {
                OrmError::invalid_accessor(std::any::type_name::<C>(), child_key.property())
            })?;

        Ok(Relation {
            dialect: self.dialect,
            child_table,
            child_column,
            parent_key,
            member,
            child_key,
        })
    }
}

/// A validated relation, reusable across any number of hydration calls.
pub struct Relation<P, C, K> {
    dialect: Dialect,
    child_table: String,
    child_column: String,
    parent_key: Key<P, K>,
    member: Member<P, C>,
    child_key: Key<C, K>,
}

impl<P, C, K> Relation<P, C, K>
where
    K: Into<Value> + Clone + Eq + Hash,
{
    pub fn child_table(&self) -> &str {
        &self.child_table
    }

    pub fn child_column(&self) -> &str {
        &self.child_column
    }

    pub fn member(&self) -> &Member<P, C> {
        &self.member
    }

    /// `SELECT child.* FROM child WHERE child.key = @key0`
    pub fn query_for(&self, parent: &P) -> QueryBuilder {
        let key = self.parent_key.get(parent);
        QueryBuilder::new(self.dialect)
            .select_all_from(&self.child_table)
            .where_equals(&self.child_table, &self.child_column, key)
    }

    /// `SELECT child.* FROM child WHERE child.key IN (...)` over the distinct
    /// parent keys in first-seen order, or `None` when there are no parents.
    pub fn query_for_all(&self, parents: &[P]) -> Option<QueryBuilder> {
        let keys = self.distinct_keys(parents);
        if keys.is_empty() {
            return None;
        }
        Some(
            QueryBuilder::new(self.dialect)
                .select_all_from(&self.child_table)
                .where_in(&self.child_table, &self.child_column, keys),
        )
    }

    fn distinct_keys(&self, parents: &[P]) -> Vec<K> {
        let mut seen = HashSet::with_capacity(parents.len());
        parents
            .iter()
            .map(|p| self.parent_key.get(p))
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }

    /// Assign the children whose key equals the parent's key, in order.
    pub fn assign_one(&self, parent: &mut P, children: Vec<C>) {
        let key = self.parent_key.get(parent);
        let matching = children
            .into_iter()
            .filter(|c| self.child_key.get(c) == key)
            .collect();
        self.member.assign(parent, matching);
    }

    /// Group `children` by key and assign each parent its group. Parents
    /// sharing a key each receive a copy.
    pub fn assign_all(&self, parents: &mut [P], children: Vec<C>)
    where
        C: Clone,
    {
        let mut groups: HashMap<K, Vec<C>> = HashMap::new();
        for child in children {
            groups.entry(self.child_key.get(&child)).or_default().push(child);
        }
        for parent in parents.iter_mut() {
            let key = self.parent_key.get(parent);
            let matching = groups.get(&key).cloned().unwrap_or_default();
            self.member.assign(parent, matching);
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn trace(&self, parents: usize, children: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "simplify.hydrate",
            child_table = %self.child_table,
            member = self.member.name(),
            kind = ?self.member.kind(),
            parents,
            children,
        );
    }
}

impl<P, C, K> Relation<P, C, K>
where
    C: FromRow + Send,
    K: Into<Value> + Clone + Eq + Hash,
{
    /// Fetch and assign the children of one parent.
    pub async fn hydrate<E: Executor>(&self, executor: &E, parent: &mut P) -> OrmResult<()> {
        let query = self.query_for(parent);
        let children: Vec<C> = executor.fetch_all(&query).await?;
        self.trace(1, children.len());
        self.assign_one(parent, children);
        Ok(())
    }

    /// Fetch the children of every parent with one query and assign them.
    /// An empty slice issues no query.
    pub async fn hydrate_all<E: Executor>(&self, executor: &E, parents: &mut [P]) -> OrmResult<()>
    where
        C: Clone,
    {
        let Some(query) = self.query_for_all(parents) else {
            return Ok(());
        };
        let children: Vec<C> = executor.fetch_all(&query).await?;
        self.trace(parents.len(), children.len());
        self.assign_all(parents, children);
        Ok(())
    }
}

impl<P, C, K> Relation<P, C, K>
where
    C: FromRow,
    K: Into<Value> + Clone + Eq + Hash,
{
    pub fn hydrate_blocking<E: BlockingExecutor>(&self, executor: &E, parent: &mut P) -> OrmResult<()> {
        let query = self.query_for(parent);
        let children: Vec<C> = executor.fetch_all(&query)?;
        self.trace(1, children.len());
        self.assign_one(parent, children);
        Ok(())
    }

    pub fn hydrate_all_blocking<E: BlockingExecutor>(&self, executor: &E, parents: &mut [P]) -> OrmResult<()>
    where
        C: Clone,
    {
        let Some(query) = self.query_for_all(parents) else {
            return Ok(());
        };
        let children: Vec<C> = executor.fetch_all(&query)?;
        self.trace(parents.len(), children.len());
        self.assign_all(parents, children);
        Ok(())
    }
}

impl<P, C, K> std::fmt::Debug for Relation<P, C, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relation")
            .field("child_table", &self.child_table)
            .field("child_column", &self.child_column)
            .field("parent_key", &self.parent_key)
            .field("member", &self.member)
            .field("child_key", &self.child_key)
            .finish()
    }
}
