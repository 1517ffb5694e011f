//! Entity metadata: table names, column names and property values.
//!
//! An [`Entity`] describes its mapped properties; a [`TableMeta`] says how
//! they become columns. Both are registered once in an [`EntityRegistry`],
//! which the builders, the hydrator and the repository consume through the
//! [`MetadataProvider`] trait.

use std::any::TypeId;
use std::collections::HashMap;

use crate::error::{OrmError, OrmResult};
use crate::naming::NamingConvention;
use crate::value::Value;

/// A type that maps to one table.
///
/// Usually derived with `#[derive(Entity)]`. A manual impl:
///
/// ```ignore
/// use simplify::{Entity, NamingConvention, TableMeta, Value};
///
/// struct User {
///     user_id: i64,
///     username: String,
/// }
///
/// impl Entity for User {
///     const PROPERTIES: &'static [&'static str] = &["user_id", "username"];
///
///     fn column_values(&self) -> Vec<Value> {
///         vec![self.user_id.into(), self.username.clone().into()]
///     }
///
///     fn table_meta() -> TableMeta {
///         TableMeta::new("User").naming(NamingConvention::Pascal)
///     }
/// }
/// ```
pub trait Entity: 'static {
    /// Mapped property names, in column order. Relation members are not listed.
    const PROPERTIES: &'static [&'static str];

    /// Property values, in the same order as [`Entity::PROPERTIES`].
    fn column_values(&self) -> Vec<Value>;

    /// Table name, naming convention and column overrides. Defaults to the
    /// bare type name with property names used verbatim.
    fn table_meta() -> TableMeta
    where
        Self: Sized,
    {
        TableMeta::new(short_type_name::<Self>())
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Registration data for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    pub table: String,
    pub naming: NamingConvention,
    pub overrides: Vec<(String, String)>,
}

impl TableMeta {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            naming: NamingConvention::None,
            overrides: Vec::new(),
        }
    }

    /// Naming convention applied to every property without an override.
    pub fn naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    /// Map `property` to an explicit column name.
    pub fn column(mut self, property: impl Into<String>, column: impl Into<String>) -> Self {
        self.overrides.push((property.into(), column.into()));
        self
    }

    /// Column name for a property: override first, then the naming convention.
    pub fn resolve_column(&self, property: &str) -> String {
        self.overrides
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, c)| c.clone())
            .unwrap_or_else(|| self.naming.apply(property))
    }
}

/// One `{property, column, value}` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityProperty {
    pub property: &'static str,
    pub column: String,
    pub value: Value,
}

/// Source of table/column metadata for entity types.
pub trait MetadataProvider {
    /// Table name of `T`.
    fn table_name<T: Entity>(&self) -> OrmResult<String>;

    /// Column name of a property of `T`, or `None` if `T` is unregistered or
    /// has no such property.
    fn column_name<T: Entity>(&self, property: &str) -> Option<String>;

    /// Ordered property triples of an instance.
    fn properties<T: Entity>(&self, entity: &T) -> OrmResult<Vec<EntityProperty>>;
}

#[derive(Debug, Clone)]
struct Registered {
    type_name: &'static str,
    table: String,
    properties: &'static [&'static str],
    columns: Vec<String>,
}

/// Registry of entity metadata, keyed by type.
///
/// Populate it once at process start, either by hand with
/// [`EntityRegistry::register`] or from every `#[derive(Entity)]` type with
/// [`EntityRegistry::from_inventory`].
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: HashMap<TypeId, Registered>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every type that submitted an
    /// [`EntityRegistration`].
    pub fn from_inventory() -> OrmResult<Self> {
        let mut registry = Self::new();
        for reg in inventory::iter::<EntityRegistration> {
            (reg.register_fn)(&mut registry)?;
        }
        Ok(registry)
    }

    /// Register `T` using [`Entity::table_meta`].
    pub fn register<T: Entity>(&mut self) -> OrmResult<&mut Self> {
        self.register_with::<T>(T::table_meta())
    }

    /// Register `T` with explicit metadata.
    pub fn register_with<T: Entity>(&mut self, meta: TableMeta) -> OrmResult<&mut Self> {
        let type_name = std::any::type_name::<T>();
        if meta.table.trim().is_empty() {
            return Err(OrmError::metadata(format!("{type_name}: empty table name")));
        }
        for (property, _) in &meta.overrides {
            if !T::PROPERTIES.contains(&property.as_str()) {
                return Err(OrmError::metadata(format!(
                    "{type_name}: column override for unknown property '{property}'"
                )));
            }
        }
        let columns = T::PROPERTIES
            .iter()
            .map(|p| meta.resolve_column(p))
            .collect();
        self.entries.insert(
            TypeId::of::<T>(),
            Registered {
                type_name,
                table: meta.table,
                properties: T::PROPERTIES,
                columns,
            },
        );
        Ok(self)
    }

    pub fn is_registered<T: Entity>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// `true` if `property` is a mapped property of `T`.
    pub fn has_property<T: Entity>(&self, property: &str) -> OrmResult<bool> {
        Ok(self.get::<T>()?.properties.contains(&property))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get<T: Entity>(&self) -> OrmResult<&Registered> {
        self.entries.get(&TypeId::of::<T>()).ok_or_else(|| {
            OrmError::metadata(format!(
                "entity {} is not registered",
                std::any::type_name::<T>()
            ))
        })
    }
}

impl MetadataProvider for EntityRegistry {
    fn table_name<T: Entity>(&self) -> OrmResult<String> {
        Ok(self.get::<T>()?.table.clone())
    }

    fn column_name<T: Entity>(&self, property: &str) -> Option<String> {
        let reg = self.get::<T>().ok()?;
        let idx = reg.properties.iter().position(|p| *p == property)?;
        reg.columns.get(idx).cloned()
    }

    fn properties<T: Entity>(&self, entity: &T) -> OrmResult<Vec<EntityProperty>> {
        let reg = self.get::<T>()?;
        let values = entity.column_values();
        if values.len() != reg.properties.len() {
            return Err(OrmError::metadata(format!(
                "{}: {} properties but {} values",
                reg.type_name,
                reg.properties.len(),
                values.len()
            )));
        }
        Ok(reg
            .properties
            .iter()
            .zip(&reg.columns)
            .zip(values)
            .map(|((property, column), value)| EntityProperty {
                property: *property,
                column: column.clone(),
                value,
            })
            .collect())
    }
}

/// Registration entry for auto-registering entities.
///
/// This is used by the `#[derive(Entity)]` macro to register every entity type
/// with [`EntityRegistry::from_inventory`].
pub struct EntityRegistration {
    /// Function that registers an entity type with an EntityRegistry.
    pub register_fn: fn(&mut EntityRegistry) -> OrmResult<()>,
}

inventory::collect!(EntityRegistration);
