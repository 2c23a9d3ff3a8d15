//! VFA Write - identity-preserving JSON writer for the analysis IR
//!
//! Serializes a whole [`vfa_ir::Ir`] snapshot into one self-contained JSON
//! document. The IR is a dense web of cross-references; the writer keeps it
//! that way on disk:
//!
//! - every node is written once, under its intrinsic id, in its graph's node
//!   map;
//! - every edge, type, value, loop and memory object is written once, at the
//!   position given by its pool id;
//! - every other mention of any of them is a bare integer.
//!
//! # Example
//!
//! ```
//! use vfa_ir::Ir;
//! use vfa_write::{write_ir, WriterConfig};
//!
//! let ir = Ir::new();
//! let json = write_ir(&ir, WriterConfig::default()).unwrap_or_default();
//! assert!(json.starts_with("{\"pag\":"));
//! ```

mod config;
mod content;
mod encode;
mod error;
mod graph_writer;
mod graphs;
mod pool;
mod writer;

#[cfg(test)]
mod test_helpers;

pub use config::{BitSetEncoding, WriterConfig, BIT_SET_PLACEHOLDER};
pub use encode::{encode_seq, Encode};
pub use error::{GraphKind, Result, Violation, WriteError};
pub use graph_writer::GraphWriter;
pub use graphs::{ChgWriter, IcfgWriter, PagWriter};
pub use pool::IdPool;
pub use writer::{write_ir, write_ir_to, IrWriter};
