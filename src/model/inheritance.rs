use indexmap::IndexMap;
use log::warn;

use super::imports::ImportEntry;
use crate::parser::ast::InheritanceSpecifier;

/// Declared parent name to the import path it resolves to, in `is` order.
pub type ParentMap = IndexMap<String, Option<String>>;

pub fn resolve_parents(parents: &[InheritanceSpecifier], imports: &[ImportEntry]) -> ParentMap {
    parents
        .iter()
        .map(|parent| {
            let path = resolve_parent(&parent.name, imports);
            if path.is_none() {
                warn!("Parent contract {} matches no import alias", parent.name);
            }
            (parent.name.clone(), path)
        })
        .collect()
}

/// First import whose alias is `name`; `Lib.Base` falls back to `Lib`.
pub fn resolve_parent(name: &str, imports: &[ImportEntry]) -> Option<String> {
    let lookup = |alias: &str| {
        imports
            .iter()
            .find(|entry| entry.alias == alias)
            .map(|entry| entry.from.clone())
    };

    lookup(name).or_else(|| {
        name.split_once('.')
            .and_then(|(qualifier, _)| lookup(qualifier))
    })
}
