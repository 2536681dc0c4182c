//! Per-bucket shipment construction
//!
//! Each bucket becomes exactly one shipment record. A draft is built fresh
//! from the inbound order's fields, a preset is resolved and merged over it,
//! and the tag set is derived from the bucket plus its lineage. Records are
//! terminal once assembled; nothing here mutates them afterward.

mod assemble;
mod preset;
mod tags;

pub use assemble::draft_shipment;
pub use preset::{apply_preset, resolve_preset};
pub use tags::{Lineage, derive_tags};
