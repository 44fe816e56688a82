//! The documentation model of one contract and its ancestors.
//!
//! A [`ContractModel`] owns the source text of a single file. Every part of the
//! model is derived lazily and cached in a [`StructureCache`]; ancestors are
//! loaded through the configured [`ImportResolver`] on first use and merged
//! into the flattened [`ContractStructure`] with override-by-name semantics.

pub mod block;
pub mod cache;
pub mod imports;
pub mod inheritance;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

pub use block::{Member, MemberKind};
pub use cache::{ContractCache, StructureCache};
pub use imports::ImportEntry;
pub use inheritance::ParentMap;

use crate::annotation::{self, Annotation};
use crate::error::{DocError, Result};
use crate::parser::{
    self,
    ast::{ContractDefinition, ContractKind, SourceUnit},
};
use crate::resolver::{FsImportResolver, ImportResolver, ResolvedImport};

/// Member name to descriptor, in declaration order.
pub type MemberMap = IndexMap<String, Member>;

#[derive(Clone)]
pub struct ModelOptions {
    /// Whether [`ContractModel::to_json`] merges ancestors when not told.
    pub merge_with_parents: bool,
    /// Path of the source, handed to the resolver for relative imports.
    pub file_path: Option<String>,
    /// Contract to document when the file declares several.
    pub contract_name: Option<String>,
    pub import_resolver: Rc<dyn ImportResolver>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            merge_with_parents: true,
            file_path: None,
            contract_name: None,
            import_resolver: Rc::new(FsImportResolver::default()),
        }
    }
}

impl ModelOptions {
    pub fn merge_with_parents(mut self, merge: bool) -> Self {
        self.merge_with_parents = merge;
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_contract_name(mut self, name: impl Into<String>) -> Self {
        self.contract_name = Some(name.into());
        self
    }

    pub fn with_import_resolver(mut self, resolver: impl ImportResolver + 'static) -> Self {
        self.import_resolver = Rc::new(resolver);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractInfo {
    pub name: String,
    pub constructor: Option<Member>,
    #[serde(flatten)]
    pub annotation: Annotation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    pub pragma: String,
    pub imports: Vec<ImportEntry>,
}

/// The flattened description of a contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractStructure {
    pub contract: ContractInfo,
    pub source: SourceInfo,
    pub parents: ParentMap,
    pub events: MemberMap,
    pub functions: MemberMap,
    pub constant_functions: MemberMap,
}

/// Ancestor models and the chain of contracts currently being merged.
struct Traversal<'a> {
    /// File identity and contract name of every contract being merged.
    stack: Vec<(String, String)>,
    registry: &'a RefCell<HashMap<String, Rc<ContractModel>>>,
}

impl Traversal<'_> {
    fn enter(&mut self, path: &str, contract: &str) -> Result<()> {
        if self.stack.iter().any(|(p, c)| p == path && c == contract) {
            let mut chain: Vec<&str> = self.stack.iter().map(|(p, _)| p.as_str()).collect();
            chain.push(path);
            return Err(DocError::CircularInheritance {
                path: path.to_string(),
                chain: chain.join(" -> "),
            });
        }
        self.stack.push((path.to_string(), contract.to_string()));
        Ok(())
    }

    fn leave(&mut self) {
        self.stack.pop();
    }
}

pub struct ContractModel {
    source: String,
    options: ModelOptions,
    cache: StructureCache,
    /// Import path as written in this file to the ancestor loaded from it.
    parent_models: RefCell<HashMap<String, Rc<ContractModel>>>,
    /// Every ancestor file reached from this model, by canonical path.
    ancestors: RefCell<HashMap<String, Rc<ContractModel>>>,
}

impl ContractModel {
    pub fn new(source: impl Into<String>, options: ModelOptions) -> Self {
        Self {
            source: source.into(),
            options,
            cache: StructureCache::default(),
            parent_models: RefCell::new(HashMap::new()),
            ancestors: RefCell::new(HashMap::new()),
        }
    }

    fn for_parent(resolved: ResolvedImport, options: &ModelOptions) -> Self {
        let options = ModelOptions {
            merge_with_parents: true,
            file_path: Some(resolved.path),
            contract_name: None,
            import_resolver: Rc::clone(&options.import_resolver),
        };
        ContractModel::new(resolved.source, options)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// The file's path in the resolver's canonical form.
    fn identity(&self) -> &str {
        self.cache.identity.get_or_init(|| match &self.options.file_path {
            Some(path) => self.options.import_resolver.canonical_path(path),
            None => "<root>".to_string(),
        })
    }

    pub fn source_unit(&self) -> Result<&SourceUnit> {
        self.cache.source_unit.get_or_try_init(|| {
            debug!("Parsing {}", self.identity());
            parser::parse(&self.source)
        })
    }

    fn contract_at(&self, index: usize) -> Result<(&ContractDefinition, &ContractCache)> {
        let unit = self.source_unit()?;
        let caches = self
            .cache
            .contracts
            .get_or_init(|| unit.contracts().map(|_| ContractCache::default()).collect());

        let contract = unit.contracts().nth(index).ok_or(DocError::MissingContract)?;
        let cache = caches.get(index).ok_or(DocError::MissingContract)?;
        Ok((contract, cache))
    }

    fn index_of(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.source_unit()?.contracts().position(|contract| contract.name == name))
    }

    fn selected(&self) -> Result<usize> {
        self.cache
            .selected
            .get_or_try_init(|| self.select_contract())
            .copied()
    }

    /// Picks the requested contract, else the first `contract`, else the first
    /// interface or library.
    fn select_contract(&self) -> Result<usize> {
        if let Some(wanted) = &self.options.contract_name {
            return self
                .index_of(wanted)?
                .ok_or_else(|| DocError::ContractNotFound(wanted.clone()));
        }

        let contracts: Vec<&ContractDefinition> = self.source_unit()?.contracts().collect();
        contracts
            .iter()
            .position(|c| c.kind == ContractKind::Contract)
            .or(if contracts.is_empty() { None } else { Some(0) })
            .ok_or(DocError::MissingContract)
    }

    /// Index of the contract an inheriting file names, falling back to the
    /// file's default selection.
    fn inherited_index(&self, contract_name: &str) -> Result<usize> {
        match self.index_of(contract_name)? {
            Some(index) => Ok(index),
            None => {
                debug!("{} declares no {}, using its default contract", self.identity(), contract_name);
                self.selected()
            }
        }
    }

    pub fn contract(&self) -> Result<&ContractDefinition> {
        Ok(self.contract_at(self.selected()?)?.0)
    }

    pub fn name(&self) -> Result<&str> {
        Ok(&self.contract()?.name)
    }

    pub fn pragma(&self) -> Result<&str> {
        self.cache
            .pragma
            .get_or_try_init(|| -> Result<String> {
                let unit = self.source_unit()?;
                let pragma = unit
                    .pragmas()
                    .find(|pragma| pragma.name == "solidity")
                    .or_else(|| unit.pragmas().next())
                    .ok_or(DocError::MissingPragma)?;
                Ok(pragma.value.clone())
            })
            .map(String::as_str)
    }

    pub fn imports(&self) -> Result<&[ImportEntry]> {
        self.cache
            .imports
            .get_or_try_init(|| -> Result<Vec<ImportEntry>> {
                Ok(imports::import_table(self.source_unit()?.imports()))
            })
            .map(Vec::as_slice)
    }

    pub fn parents(&self) -> Result<&ParentMap> {
        self.parents_of(self.selected()?)
    }

    fn parents_of(&self, index: usize) -> Result<&ParentMap> {
        let (contract, cache) = self.contract_at(index)?;
        cache.parents.get_or_try_init(|| -> Result<ParentMap> {
            Ok(inheritance::resolve_parents(&contract.parents, self.imports()?))
        })
    }

    /// Contract a parent name designates inside its own file: the original
    /// name of an aliased symbol import, else the last segment of the name.
    fn parent_contract_name(&self, parent_name: &str) -> Result<String> {
        let symbol = self
            .source_unit()?
            .imports()
            .flat_map(|directive| &directive.symbols)
            .find(|symbol| symbol.alias.as_deref() == Some(parent_name));

        Ok(match symbol {
            Some(symbol) => symbol.name.clone(),
            None => parent_name.rsplit('.').next().unwrap_or(parent_name).to_string(),
        })
    }

    /// The contract's own doc comment; its title defaults to the contract name.
    pub fn contract_annotation(&self) -> Result<&Annotation> {
        self.annotation_of(self.selected()?)
    }

    fn annotation_of(&self, index: usize) -> Result<&Annotation> {
        let (contract, cache) = self.contract_at(index)?;
        cache.annotation.get_or_try_init(|| -> Result<Annotation> {
            let mut parsed = Annotation::parse(&annotation::extract(&self.source, contract.start));
            if parsed.title.is_none() {
                parsed.title = Some(contract.name.clone());
            }
            Ok(parsed)
        })
    }

    pub fn constructor(&self) -> Result<Option<&Member>> {
        self.constructor_of(self.selected()?)
    }

    fn constructor_of(&self, index: usize) -> Result<Option<&Member>> {
        let (contract, cache) = self.contract_at(index)?;
        let constructor = cache.constructor.get_or_init(|| {
            contract
                .body
                .iter()
                .find(|part| block::classify(part, &contract.name) == Some(MemberKind::Constructor))
                .map(|part| block::describe(part, MemberKind::Constructor, &self.source))
        });
        Ok(constructor.as_ref())
    }

    pub fn events(&self) -> Result<&MemberMap> {
        self.member_map(self.selected()?, MemberKind::Event)
    }

    pub fn functions(&self) -> Result<&MemberMap> {
        self.member_map(self.selected()?, MemberKind::Function)
    }

    pub fn constant_functions(&self) -> Result<&MemberMap> {
        self.member_map(self.selected()?, MemberKind::ConstantFunction)
    }

    fn member_map(&self, index: usize, kind: MemberKind) -> Result<&MemberMap> {
        let (contract, cache) = self.contract_at(index)?;
        let cell = cache
            .members(kind)
            .ok_or_else(|| DocError::Malformed(format!("{:?} members have no map", kind)))?;

        cell.get_or_try_init(|| -> Result<MemberMap> {
            let mut members = MemberMap::new();
            for part in &contract.body {
                if block::classify(part, &contract.name) != Some(kind) {
                    continue;
                }
                let member = block::describe(part, kind, &self.source);
                if members.insert(member.name.clone(), member).is_some() {
                    warn!(
                        "{} declares {} more than once, keeping the last",
                        contract.name,
                        part.name()
                    );
                }
            }
            debug!("Classified {} {:?} members of {}", members.len(), kind, contract.name);
            Ok(members)
        })
    }

    pub fn contract_info(&self) -> Result<ContractInfo> {
        self.contract_info_of(self.selected()?)
    }

    fn contract_info_of(&self, index: usize) -> Result<ContractInfo> {
        Ok(ContractInfo {
            name: self.contract_at(index)?.0.name.clone(),
            constructor: self.constructor_of(index)?.cloned(),
            annotation: self.annotation_of(index)?.clone(),
        })
    }

    pub fn source_info(&self) -> Result<SourceInfo> {
        Ok(SourceInfo {
            pragma: self.pragma()?.to_string(),
            imports: self.imports()?.to_vec(),
        })
    }

    /// The ancestor loaded for `import_path`, once a merge has reached it.
    pub fn parent_model(&self, import_path: &str) -> Option<Rc<ContractModel>> {
        self.parent_models.borrow().get(import_path).cloned()
    }

    /// Builds the flattened structure. `None` falls back to
    /// [`ModelOptions::merge_with_parents`].
    pub fn to_json(&self, merge_with_parents: Option<bool>) -> Result<ContractStructure> {
        let index = self.selected()?;
        if !merge_with_parents.unwrap_or(self.options.merge_with_parents) {
            return self.own_structure(index);
        }

        let mut traversal = Traversal {
            stack: Vec::new(),
            registry: &self.ancestors,
        };
        traversal.enter(self.identity(), &self.contract_at(index)?.0.name)?;
        let structure = self.merged_structure(index, &mut traversal)?;
        traversal.leave();
        Ok(structure)
    }

    fn own_structure(&self, index: usize) -> Result<ContractStructure> {
        Ok(ContractStructure {
            contract: self.contract_info_of(index)?,
            source: self.source_info()?,
            parents: self.parents_of(index)?.clone(),
            events: self.member_map(index, MemberKind::Event)?.clone(),
            functions: self.member_map(index, MemberKind::Function)?.clone(),
            constant_functions: self.member_map(index, MemberKind::ConstantFunction)?.clone(),
        })
    }

    fn merged_structure(&self, index: usize, traversal: &mut Traversal<'_>) -> Result<ContractStructure> {
        let mut structure = self.own_structure(index)?;

        let mut events = MemberMap::new();
        let mut functions = MemberMap::new();
        let mut constant_functions = MemberMap::new();

        for (name, import_path) in self.parents_of(index)? {
            let Some(import_path) = import_path else {
                continue;
            };
            let parent = self.load_parent(import_path, traversal)?;
            let parent_index = parent.inherited_index(&self.parent_contract_name(name)?)?;

            traversal.enter(parent.identity(), &parent.contract_at(parent_index)?.0.name)?;
            let inherited = parent.merged_structure(parent_index, traversal)?;
            traversal.leave();

            events.extend(inherited.events);
            functions.extend(inherited.functions);
            constant_functions.extend(inherited.constant_functions);
        }

        structure.events = overlay(events, structure.events);
        structure.functions = overlay(functions, structure.functions);
        structure.constant_functions = overlay(constant_functions, structure.constant_functions);
        Ok(structure)
    }

    fn load_parent(&self, import_path: &str, traversal: &Traversal<'_>) -> Result<Rc<ContractModel>> {
        if let Some(model) = self.parent_model(import_path) {
            return Ok(model);
        }

        let resolver = &self.options.import_resolver;
        let resolved = resolver.resolve(import_path, self.options.file_path.as_deref())?;
        let model = {
            let mut registry = traversal.registry.borrow_mut();
            let model = registry
                .entry(resolver.canonical_path(&resolved.path))
                .or_insert_with(|| {
                    debug!("Loading {} from {}", import_path, resolved.path);
                    Rc::new(ContractModel::for_parent(resolved, &self.options))
                });
            Rc::clone(model)
        };

        self.parent_models
            .borrow_mut()
            .insert(import_path.to_string(), Rc::clone(&model));
        Ok(model)
    }
}

/// `own` entries replace same-named `inherited` ones, keeping their position.
fn overlay(mut inherited: MemberMap, own: MemberMap) -> MemberMap {
    inherited.extend(own);
    inherited
}
