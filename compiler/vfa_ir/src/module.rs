//! Whole-module summary.

use crate::ValueRef;

/// The top-level entities of the analysed module, in definition order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleInfo {
    pub identifier: String,
    pub functions: Vec<ValueRef>,
    pub globals: Vec<ValueRef>,
    pub aliases: Vec<ValueRef>,
    pub constants: Vec<ValueRef>,
    pub others: Vec<ValueRef>,
}

impl ModuleInfo {
    pub fn new(identifier: impl Into<String>) -> Self {
        ModuleInfo {
            identifier: identifier.into(),
            ..ModuleInfo::default()
        }
    }
}
