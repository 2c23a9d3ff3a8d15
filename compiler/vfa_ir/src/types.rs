//! Type descriptors.
//!
//! Descriptors are shared by every graph through the type arena of the
//! [`Ir`](crate::Ir) snapshot; graphs hold [`TypeRef`] handles only.

use crate::TypeRef;

/// A type as seen by the analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDesc {
    /// Allocation size in bytes; 0 for unsized types.
    pub byte_size: u32,
    /// Scalar or pointer (fits in one register).
    pub is_single_value: bool,
    /// Type reached by dereferencing, if this type is a pointer.
    pub pointer_to: Option<TypeRef>,
    pub kind: TypeKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Pointer,
    Integer {
        bits: u32,
    },
    Function {
        ret: Option<TypeRef>,
        params: Vec<TypeRef>,
        var_arg: bool,
    },
    Struct {
        name: String,
        fields: Vec<TypeRef>,
    },
    Array {
        elem: Option<TypeRef>,
        len: u64,
    },
    /// Anything else, kept as its printed form.
    Other {
        repr: String,
    },
}

impl TypeKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeKind::Pointer => "PointerType",
            TypeKind::Integer { .. } => "IntegerType",
            TypeKind::Function { .. } => "FunctionType",
            TypeKind::Struct { .. } => "StructType",
            TypeKind::Array { .. } => "ArrayType",
            TypeKind::Other { .. } => "OtherType",
        }
    }
}

impl TypeDesc {
    /// A pointer-sized pointer type.
    pub fn pointer(pointee: Option<TypeRef>) -> Self {
        TypeDesc {
            byte_size: 8,
            is_single_value: true,
            pointer_to: pointee,
            kind: TypeKind::Pointer,
        }
    }

    pub fn integer(bits: u32) -> Self {
        TypeDesc {
            byte_size: bits.div_ceil(8),
            is_single_value: true,
            pointer_to: None,
            kind: TypeKind::Integer { bits },
        }
    }
}
