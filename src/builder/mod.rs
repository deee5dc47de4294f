//! Builder API for declaring a whole machine up front.
//!
//! [`StateMachineBuilder`] lets a graph be described by state id, with the
//! arena keys resolved and the graph validated in one `build` call. The
//! [`event_codes!`](crate::event_codes) macro declares the application's
//! event constants and a matching [`EventCatalog`](crate::core::EventCatalog).

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
