//! Wire types and client-side logic of the Muebles back-office.
//!
//! Everything here is plain Rust without browser dependencies so it can be
//! unit-tested natively; the `frontend` crate only adds the UI around it.

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod usecases;
