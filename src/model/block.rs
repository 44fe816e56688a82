use serde::Serialize;

use crate::annotation::{self, Annotation};
use crate::parser::ast::{ContractPart, FunctionDefinition, FunctionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberKind {
    Constructor,
    Event,
    Function,
    ConstantFunction,
}

/// A classified contract member with the doc comment found above it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub declaration: ContractPart,
    pub annotation: Annotation,
}

const READ_ONLY_MODIFIERS: [&str; 3] = ["constant", "view", "pure"];
const HIDDEN_MODIFIERS: [&str; 2] = ["internal", "private"];

fn is_constructor(function: &FunctionDefinition, contract_name: &str) -> bool {
    function.kind == FunctionKind::Constructor || function.name == contract_name
}

/// Decides which member map a contract body declaration belongs to, if any.
pub fn classify(part: &ContractPart, contract_name: &str) -> Option<MemberKind> {
    match part {
        ContractPart::Function(function) if is_constructor(function, contract_name) => {
            Some(MemberKind::Constructor)
        }
        ContractPart::Event(_) => Some(MemberKind::Event),
        ContractPart::Function(function) => {
            if HIDDEN_MODIFIERS.iter().any(|name| function.has_modifier(name)) {
                None
            } else if READ_ONLY_MODIFIERS.iter().any(|name| function.has_modifier(name)) {
                Some(MemberKind::ConstantFunction)
            } else {
                Some(MemberKind::Function)
            }
        }
        // the compiler generates a getter for public state
        ContractPart::StateVariable(variable) if variable.is_public() => {
            Some(MemberKind::ConstantFunction)
        }
        ContractPart::StateVariable(_) => None,
    }
}

pub fn describe(part: &ContractPart, kind: MemberKind, source: &str) -> Member {
    Member {
        name: part.name().to_string(),
        kind,
        declaration: part.clone(),
        annotation: Annotation::parse(&annotation::extract(source, part.start())),
    }
}
