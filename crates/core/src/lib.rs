//! Core business logic for the CoffeeTech transactions service.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies.
//!
//! # Modules
//!
//! - `report` - Financial report aggregation over plot transactions

pub mod report;
