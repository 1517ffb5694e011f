//! Convenience re-exports.
//!
//! ```ignore
//! use simplify::prelude::*;
//! ```

pub use crate::builder::{CommandBuilder, Condition, Order, QueryBuilder};
pub use crate::dialect::Dialect;
pub use crate::error::{OrmError, OrmResult};
pub use crate::executor::{BlockingExecutor, Executor};
pub use crate::hydrate::{Hydrator, Member, RelationKind};
pub use crate::metadata::{Entity, EntityRegistry, MetadataProvider, TableMeta};
pub use crate::naming::NamingConvention;
pub use crate::row::{FromRow, Row};
pub use crate::value::Value;
pub use crate::{key, member};
