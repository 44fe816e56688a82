use serde::Serialize;

use crate::parser::ast::ImportDirective;

/// One usable name brought in by an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub from: String,
    pub alias: String,
    pub default_alias: String,
}

/// Contract name implied by a path: its last segment without `.sol`.
pub fn default_alias(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".sol").unwrap_or(file).to_string()
}

/// Builds the import table in declaration order.
///
/// `import {A, B as C} from "p"` contributes one entry per symbol, aliased by
/// its local name; every other form contributes a single entry.
pub fn import_table<'a>(directives: impl IntoIterator<Item = &'a ImportDirective>) -> Vec<ImportEntry> {
    let mut table = Vec::new();

    for directive in directives {
        let default_alias = default_alias(&directive.from);

        if directive.symbols.is_empty() {
            table.push(ImportEntry {
                from: directive.from.clone(),
                alias: directive.alias.clone().unwrap_or_else(|| default_alias.clone()),
                default_alias,
            });
            continue;
        }

        for symbol in &directive.symbols {
            table.push(ImportEntry {
                from: directive.from.clone(),
                alias: symbol.alias.clone().unwrap_or_else(|| symbol.name.clone()),
                default_alias: default_alias.clone(),
            });
        }
    }

    table
}
