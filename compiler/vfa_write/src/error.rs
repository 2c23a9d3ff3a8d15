//! Error types for document writing

use std::fmt;
use std::io;
use std::panic::Location;

use thiserror::Error;
use vfa_ir::{NodeId, SymId};

pub type Result<T> = std::result::Result<T, WriteError>;

/// Which graph a node lookup was made against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphKind {
    Pag,
    Icfg,
    Chg,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GraphKind::Pag => "pag",
            GraphKind::Icfg => "icfg",
            GraphKind::Chg => "chg",
        })
    }
}

/// A broken assumption about the IR being written.
///
/// These indicate an inconsistent IR snapshot (or a writer bug), never bad
/// user input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{graph} node handle {slot} is not part of the graph")]
    UnknownNode { graph: GraphKind, slot: u32 },

    #[error("{graph} has no node with id {id}")]
    UnknownNodeId { graph: GraphKind, id: NodeId },

    #[error("memory object symbol {sym} is not in the symbol table")]
    UnknownSymbol { sym: SymId },

    #[error("{kind} handle {index} does not resolve (arena holds {len})")]
    DanglingHandle {
        kind: &'static str,
        index: u32,
        len: usize,
    },

    #[error("{pool} id {id} is out of range (pool holds {len})")]
    IdOutOfRange {
        pool: &'static str,
        id: usize,
        len: usize,
    },

    #[error("class hierarchy is not backed by a graph")]
    MissingGraph,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("invariant violation at {location}: {violation}")]
    Invariant {
        violation: Violation,
        location: &'static Location<'static>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl WriteError {
    /// Wrap `violation`, recording the caller's source location.
    #[track_caller]
    pub fn invariant(violation: Violation) -> Self {
        WriteError::Invariant {
            violation,
            location: Location::caller(),
        }
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            WriteError::Invariant { violation, .. } => Some(violation),
            WriteError::Json(_) | WriteError::Io(_) => None,
        }
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, WriteError::Invariant { .. })
    }
}
