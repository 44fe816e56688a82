use once_cell::unsync::OnceCell;

use super::block::{Member, MemberKind};
use super::imports::ImportEntry;
use super::inheritance::ParentMap;
use super::MemberMap;
use crate::annotation::Annotation;
use crate::parser::ast::SourceUnit;

/// Everything a [`ContractModel`](super::ContractModel) derives from its
/// source, each filled on first access and kept for the model's lifetime.
///
/// File-level parts live here directly. Contract-level parts live in one
/// [`ContractCache`] per contract definition, so a file that several children
/// inherit from under different names still documents each contract once.
#[derive(Debug, Default)]
pub struct StructureCache {
    pub identity: OnceCell<String>,
    pub source_unit: OnceCell<SourceUnit>,
    /// Index of the contract the model documents at top level.
    pub selected: OnceCell<usize>,
    pub pragma: OnceCell<String>,
    pub imports: OnceCell<Vec<ImportEntry>>,
    pub contracts: OnceCell<Vec<ContractCache>>,
}

/// Derived parts of a single contract definition.
#[derive(Debug, Default)]
pub struct ContractCache {
    pub parents: OnceCell<ParentMap>,
    pub annotation: OnceCell<Annotation>,
    pub constructor: OnceCell<Option<Member>>,
    events: OnceCell<MemberMap>,
    functions: OnceCell<MemberMap>,
    constant_functions: OnceCell<MemberMap>,
}

impl ContractCache {
    /// Slot holding the member map of `kind`. The constructor is singular and
    /// has no map.
    pub fn members(&self, kind: MemberKind) -> Option<&OnceCell<MemberMap>> {
        match kind {
            MemberKind::Event => Some(&self.events),
            MemberKind::Function => Some(&self.functions),
            MemberKind::ConstantFunction => Some(&self.constant_functions),
            MemberKind::Constructor => None,
        }
    }
}
