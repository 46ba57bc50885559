//#![deny(missing_docs)] // TODO: Complete missing documentation and enable this option
#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # mapsearch-entities
//!
//! Reusable, agnostic domain entities for mapsearch.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod geo;
pub mod location;
pub mod map;
pub mod route;
pub mod search;
pub mod time;
