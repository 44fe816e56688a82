use serde::Serialize;

/// A parsed Solidity file: the top-level declarations the documentation
/// model reads, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceUnit {
    pub items: Vec<SourceItem>,
}

impl SourceUnit {
    pub fn pragmas(&self) -> impl Iterator<Item = &PragmaDirective> {
        self.items.iter().filter_map(|item| match item {
            SourceItem::Pragma(pragma) => Some(pragma),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportDirective> {
        self.items.iter().filter_map(|item| match item {
            SourceItem::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn contracts(&self) -> impl Iterator<Item = &ContractDefinition> {
        self.items.iter().filter_map(|item| match item {
            SourceItem::Contract(contract) => Some(contract),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SourceItem {
    Pragma(PragmaDirective),
    Import(ImportDirective),
    Contract(ContractDefinition),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PragmaDirective {
    pub name: String,
    pub value: String,
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDirective {
    pub from: String,
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<ImportSymbol>,
    pub start: usize,
}

/// One entry of `import {A, B as C} from "...";`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSymbol {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    Contract,
    Interface,
    Library,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDefinition {
    pub name: String,
    pub kind: ContractKind,
    pub is_abstract: bool,
    /// The `is` clause, in declaration order.
    pub parents: Vec<InheritanceSpecifier>,
    pub body: Vec<ContractPart>,
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InheritanceSpecifier {
    pub name: String,
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ContractPart {
    Event(EventDefinition),
    Function(FunctionDefinition),
    StateVariable(StateVariableDeclaration),
}

impl ContractPart {
    pub fn name(&self) -> &str {
        match self {
            ContractPart::Event(event) => &event.name,
            ContractPart::Function(function) => &function.name,
            ContractPart::StateVariable(variable) => &variable.name,
        }
    }

    /// Byte offset of the first token of the declaration.
    pub fn start(&self) -> usize {
        match self {
            ContractPart::Event(event) => event.start,
            ContractPart::Function(function) => function.start,
            ContractPart::StateVariable(variable) => variable.start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDefinition {
    pub name: String,
    pub params: Vec<Parameter>,
    pub anonymous: bool,
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub type_name: String,
    /// `indexed`, `memory`, `storage` or `calldata`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Function,
    Constructor,
    Fallback,
    Receive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    /// Declared name; special functions carry their keyword and an unnamed
    /// legacy fallback is called `fallback`.
    pub name: String,
    pub kind: FunctionKind,
    pub params: Vec<Parameter>,
    pub returns: Vec<Parameter>,
    /// Visibility, mutability and modifier invocations alike, as written.
    pub modifiers: Vec<Modifier>,
    pub has_body: bool,
    pub start: usize,
}

impl FunctionDefinition {
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|modifier| modifier.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modifier {
    pub name: String,
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateVariableDeclaration {
    pub name: String,
    pub type_name: String,
    pub attributes: Vec<String>,
    pub initial_value: Option<String>,
    pub start: usize,
}

impl StateVariableDeclaration {
    pub fn is_public(&self) -> bool {
        self.attributes.iter().any(|attribute| attribute == "public")
    }
}
