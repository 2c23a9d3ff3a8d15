//! Value descriptors.
//!
//! Every program value the graphs mention (functions, blocks, instructions,
//! globals, constants) is described once in the value arena. Kinds that
//! refine another kind carry the refined kind's data as a nested struct:
//! a virtual call holds [`CallData`], which holds [`InstData`].

use crate::{TypeRef, ValueRef};

#[derive(Clone, Debug, PartialEq)]
pub struct ValueDesc {
    pub name: String,
    pub ty: Option<TypeRef>,
    pub source_loc: String,
    pub ptr_in_uncalled_fun: bool,
    pub const_data_or_agg: bool,
    pub kind: ValueKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    Function(FunctionData),
    BasicBlock(BasicBlockData),
    Instruction(InstData),
    Call(InstData, CallData),
    VirtualCall(InstData, CallData, VirtualCallData),
    Constant,
    GlobalValue {
        real_def_global: Option<ValueRef>,
    },
    Argument {
        fun: Option<ValueRef>,
        arg_no: u32,
        uncalled: bool,
    },
    ConstantData,
    ConstantFp {
        value: f64,
    },
    ConstantInt {
        zext: u64,
        sext: i64,
    },
    ConstantNull,
    BlackHole,
    Other,
}

impl ValueKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueKind::Function(_) => "SVFFunction",
            ValueKind::BasicBlock(_) => "SVFBasicBlock",
            ValueKind::Instruction(_) => "SVFInstruction",
            ValueKind::Call(..) => "SVFCallInst",
            ValueKind::VirtualCall(..) => "SVFVirtualCallInst",
            ValueKind::Constant => "SVFConstant",
            ValueKind::GlobalValue { .. } => "SVFGlobalValue",
            ValueKind::Argument { .. } => "SVFArgument",
            ValueKind::ConstantData => "SVFConstantData",
            ValueKind::ConstantFp { .. } => "SVFConstantFP",
            ValueKind::ConstantInt { .. } => "SVFConstantInt",
            ValueKind::ConstantNull => "SVFConstantNullPtr",
            ValueKind::BlackHole => "SVFBlackHoleValue",
            ValueKind::Other => "SVFOtherValue",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionData {
    pub is_decl: bool,
    pub intrinsic: bool,
    pub addr_taken: bool,
    pub is_uncalled: bool,
    pub is_not_ret: bool,
    pub var_arg: bool,
    pub fun_type: Option<TypeRef>,
    pub args: Vec<ValueRef>,
    pub basic_blocks: Vec<ValueRef>,
    pub exit_block: Option<ValueRef>,
    /// Definition this declaration resolves to, if any.
    pub real_def_fun: Option<ValueRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicBlockData {
    pub fun: Option<ValueRef>,
    pub succs: Vec<ValueRef>,
    pub preds: Vec<ValueRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstData {
    pub bb: Option<ValueRef>,
    pub fun: Option<ValueRef>,
    pub is_ret: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallData {
    pub args: Vec<ValueRef>,
    pub var_arg: bool,
    pub callee: Option<ValueRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VirtualCallData {
    pub vtbl_ptr: Option<ValueRef>,
    pub virtual_fun_idx: i32,
    pub fun_name_of_vcall: String,
}

impl ValueDesc {
    /// A value of `kind` with every shared field empty.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        ValueDesc {
            name: name.into(),
            ty: None,
            source_loc: String::new(),
            ptr_in_uncalled_fun: false,
            const_data_or_agg: false,
            kind,
        }
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeRef) -> Self {
        self.ty = Some(ty);
        self
    }
}
