//! # simplify
//!
//! A lightweight, dialect-aware SQL builder with relation hydration.
//!
//! ## Features
//!
//! - **Three dialects**: SQL Server (`[x]`, `TOP n`), PostgreSQL (`"x"`, `LIMIT n`) and
//!   MySQL (`` `x` ``, `LIMIT n`), plus an unquoted generic dialect
//! - **Named parameters**: every value is bound as `@name`, with collision-free names
//!   when the same column is used more than once
//! - **Entity metadata**: table names, naming conventions and column overrides,
//!   registered once via [`EntityRegistry`] or `#[derive(Entity)]`
//! - **Hydration**: fill `Vec<C>`, `Option<Vec<C>>`, `C` and `Option<C>` members from
//!   one follow-up query per relation
//! - **Bring your own driver**: implement [`Executor`] or [`BlockingExecutor`]
//!
//! ## Query builder
//!
//! ```ignore
//! use simplify::{Dialect, Order, QueryBuilder};
//!
//! let q = QueryBuilder::new(Dialect::Postgres)
//!     .select_all_from("User")
//!     .where_equals("User", "UserId", 1)
//!     .and_between("User", "Permission", 1, 5)
//!     .order_by("User", "Username", Order::Asc)
//!     .limit(10);
//!
//! assert_eq!(
//!     q.build_query(),
//!     r#"SELECT "User".* FROM "User" WHERE "User"."UserId" = @UserId0 AND "User"."Permission" BETWEEN @Permission0 AND @Permission1 ORDER BY "User"."Username" ASC LIMIT 10 ;"#
//! );
//! ```
//!
//! ## Hydration
//!
//! ```ignore
//! use simplify::{key, Dialect, EntityRegistry, Hydrator, Member};
//!
//! let registry = EntityRegistry::from_inventory()?;
//! let hydrator = Hydrator::new(&registry, Dialect::SqlServer);
//! let posts = hydrator.relation(
//!     key!(User, user_id),
//!     Member::many("posts", |u: &mut User| &mut u.posts),
//!     key!(Post, author_id),
//! )?;
//!
//! let mut users: Vec<User> = executor.fetch_all(&query).await?;
//! posts.hydrate_all(&executor, &mut users).await?;
//! ```

pub mod builder;
pub mod config;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod hydrate;
pub mod instrument;
pub mod metadata;
pub mod naming;
pub mod prelude;
pub mod repository;
pub mod row;
pub mod value;

pub use builder::{CommandBuilder, Condition, Order, Parameters, QueryBuilder};
pub use config::SimplifyConfig;
pub use dialect::{Dialect, Formatter};
pub use error::{OrmError, OrmResult};
pub use executor::{BlockingExecutor, BlockingTransaction, Executor, Transaction};
pub use hydrate::{Hydrator, Key, Member, Relation, RelationKind};
pub use instrument::{LoggedExecutor, SqlLogger};
pub use metadata::{
    Entity, EntityProperty, EntityRegistration, EntityRegistry, MetadataProvider, TableMeta,
};
pub use naming::NamingConvention;
pub use repository::Repository;
pub use row::{FromRow, Row};
pub use value::{FromValue, Value};

#[cfg(feature = "derive")]
pub use simplify_derive::{Entity, FromRow};

// Re-export inventory for use by derive macros
pub use inventory;
