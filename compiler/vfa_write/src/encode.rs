//! Field encoding.
//!
//! [`Encode`] turns one field value into a JSON value. Handles are encoded
//! by reference: a node handle becomes its intrinsic id, every other handle
//! its pool id. The entity behind the handle is written once, by the
//! matching content encoder on [`IrWriter`].
//!
//! Only the types listed here can be written; there is no blanket impl.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use vfa_ir::{
    AccessPath, ChEdgeRef, ChNodeRef, ClassAttrs, IcfgEdgeRef, IcfgNodeRef, LoopRef, MemObjRef,
    ObjFlags, SparseBitSet, StmtRef, TypeRef, ValueRef, VarRef,
};

use crate::config::{BitSetEncoding, BIT_SET_PLACEHOLDER};
use crate::error::WriteError;
use crate::writer::IrWriter;

pub trait Encode {
    fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError>;
}

/// Node handles: intrinsic id, `null` when absent (0 is a valid node id).
macro_rules! encode_node_ref {
    ($($handle:ty => $graph:ident),* $(,)?) => {$(
        impl Encode for $handle {
            fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
                Ok(Value::from(w.$graph.node_id(*self)?.raw()))
            }
        }

        impl Encode for Option<$handle> {
            fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
                match self {
                    Some(handle) => handle.encode(w),
                    None => Ok(Value::Null),
                }
            }
        }
    )*};
}

/// Pooled handles: pool id, 0 when absent.
macro_rules! encode_pool_ref {
    ($($handle:ty => $id:ident),* $(,)?) => {$(
        impl Encode for $handle {
            fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
                Ok(Value::from(w.$id(*self)?))
            }
        }

        impl Encode for Option<$handle> {
            fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
                match self {
                    Some(handle) => handle.encode(w),
                    None => Ok(Value::from(0)),
                }
            }
        }
    )*};
}

encode_node_ref! {
    VarRef => pag,
    IcfgNodeRef => icfg,
    ChNodeRef => chg,
}

encode_pool_ref! {
    StmtRef => pag_edge_id,
    IcfgEdgeRef => icfg_edge_id,
    ChEdgeRef => chg_edge_id,
    TypeRef => type_id,
    ValueRef => value_id,
    LoopRef => loop_id,
    MemObjRef => mem_obj_id,
}

macro_rules! encode_int {
    ($($int:ty),*) => {$(
        impl Encode for $int {
            #[inline]
            fn encode(&self, _: &mut IrWriter<'_>) -> Result<Value, WriteError> {
                Ok(Value::from(*self))
            }
        }
    )*};
}

encode_int!(u8, u16, u32, u64, usize, i32, i64);

impl Encode for bool {
    #[inline]
    fn encode(&self, _: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        Ok(Value::Bool(*self))
    }
}

impl Encode for str {
    fn encode(&self, _: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        Ok(Value::String(self.to_owned()))
    }
}

impl Encode for String {
    fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        self.as_str().encode(w)
    }
}

/// Non-finite values have no JSON number form and are written as strings.
impl Encode for f64 {
    fn encode(&self, _: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        Ok(serde_json::Number::from_f64(*self)
            .map_or_else(|| Value::String(self.to_string()), Value::Number))
    }
}

/// Encode every item of a sequence, in iteration order.
pub fn encode_seq<'a, T, I>(items: I, w: &mut IrWriter<'_>) -> Result<Value, WriteError>
where
    T: Encode + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| item.encode(w))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        encode_seq(self, w)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        encode_seq(self, w)
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        encode_seq(self, w)
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        let mut pair = Map::new();
        pair.insert("first".to_owned(), self.0.encode(w)?);
        pair.insert("second".to_owned(), self.1.encode(w)?);
        Ok(Value::Object(pair))
    }
}

impl Encode for AccessPath {
    fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        let mut ap = Map::new();
        ap.insert("fldIdx".to_owned(), self.fld_idx.encode(w)?);
        ap.insert(
            "idxOperandPairs".to_owned(),
            self.offset_var_and_gep_type_pairs.encode(w)?,
        );
        Ok(Value::Object(ap))
    }
}

impl Encode for ObjFlags {
    fn encode(&self, _: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        Ok(Value::from(self.bits()))
    }
}

impl Encode for ClassAttrs {
    fn encode(&self, _: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        Ok(Value::from(self.bits()))
    }
}

impl Encode for SparseBitSet {
    fn encode(&self, w: &mut IrWriter<'_>) -> Result<Value, WriteError> {
        Ok(match w.config().bit_sets {
            BitSetEncoding::Expand => Value::Array(self.iter().map(Value::from).collect()),
            BitSetEncoding::Placeholder => Value::String(BIT_SET_PLACEHOLDER.to_owned()),
        })
    }
}
