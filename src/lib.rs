//! Searchable, filterable, paginated list of vaccination locations.
//!
//! The `data` feature exposes the plain data layer: filter criteria, the
//! location record, sorting, pagination and form parsing. The `component`
//! feature adds the stateful list, its tokio driver and the local adapters.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod pagination;

#[cfg(feature = "component")]
pub mod models;
#[cfg(feature = "component")]
pub mod repository;
#[cfg(feature = "component")]
pub mod services;
