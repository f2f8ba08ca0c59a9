//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL article storage via Diesel.
//! - **memory**: in-process article storage for development and tests.
//! - **storage**: uploaded images on the local filesystem via `cap-std`.
//!
//! Adapters translate between domain types and infrastructure
//! representations and carry no business rules.

pub mod memory;
pub mod persistence;
pub mod storage;
