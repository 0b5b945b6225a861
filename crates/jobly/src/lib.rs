//! # jobly
//!
//! Companies, jobs, users and applications stored in PostgreSQL.
//!
//! ## Features
//!
//! - **Partial updates**: [`build_set_clause`] turns an ordered [`Patch`] into
//!   `"col" = $n, ...` with external names mapped through a [`FieldMap`]
//! - **Search filters**: [`CompanyFilter`] and [`JobFilter`] build conjunctive
//!   WHERE clauses whose values are always bound, never inlined
//! - **Repositories**: [`CompanyRepo`], [`JobRepo`] and [`UserRepo`] over any
//!   [`GenericClient`], so the same call works inside a transaction
//! - **Embedded migrations**: [`migrate::run_pool`] brings a database up to date
//!
//! ## Example
//!
//! ```ignore
//! use jobly::{CompanyFilter, CompanyRepo, DbConfig, create_pool};
//!
//! let pool = create_pool(&DbConfig::from_env()?)?;
//! jobly::migrate::run_pool(&pool).await?;
//!
//! let client = pool.get().await?;
//! let filter = CompanyFilter { min_employees: Some(10), ..Default::default() };
//! let companies = CompanyRepo::find_all(&client, &filter).await?;
//! ```
//!
//! Statements are logged on the `jobly.sql` tracing target at `debug` level.

pub mod clause;
pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod filter;
pub mod ident;
pub mod migrate;
pub mod models;
pub mod param;
pub mod partial_update;
pub mod pool;
pub mod query;
pub mod repo;
pub mod row;

pub use clause::Clause;
pub use client::GenericClient;
pub use config::DbConfig;
pub use error::{JoblyError, JoblyResult};
pub use fields::{Field, FieldMap, map_field};
pub use filter::{CompanyFilter, Criteria, JobFilter, Op, Predicate, build_where};
pub use ident::Ident;
pub use param::{Param, ParamList};
pub use partial_update::{Patch, build_set_clause};
pub use pool::create_pool;
pub use query::{Query, query};
pub use repo::{CompanyRepo, JobRepo, UserRepo};
pub use row::{FromRow, RowExt};

// Re-export driver crates so callers name the same versions.
pub use deadpool_postgres;
pub use rust_decimal;
pub use tokio_postgres;
