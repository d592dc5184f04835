//! The water metrics engine: three independent sub-engines sharing the
//! append-only store abstractions in [`store`].

pub mod quality;
pub mod reports;
pub mod store;
pub mod usage;
