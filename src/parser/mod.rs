pub mod ast;

use log::{debug, trace};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::error::{DocError, Result};
use ast::*;

#[derive(Parser)]
#[grammar = "parser/solidity.pest"]
pub struct SolidityParser;

pub fn parse(source: &str) -> Result<SourceUnit> {
    let mut pairs = SolidityParser::parse(Rule::source_unit, source).map_err(Box::new)?;
    let unit = pairs
        .next()
        .ok_or_else(|| DocError::Malformed("empty source unit".to_string()))?;

    let mut items = Vec::new();
    for pair in unit.into_inner() {
        match pair.as_rule() {
            Rule::pragma_directive => items.push(SourceItem::Pragma(parse_pragma(pair)?)),
            Rule::import_directive => items.push(SourceItem::Import(parse_import(pair)?)),
            Rule::contract_definition => {
                items.push(SourceItem::Contract(parse_contract(pair)?))
            }
            Rule::EOI => {}
            other => trace!("Skipping top-level {:?}", other),
        }
    }

    debug!("Parsed source unit with {} relevant items", items.len());
    Ok(SourceUnit { items })
}

fn required<'i>(pairs: &mut Pairs<'i, Rule>, rule: Rule, context: &str) -> Result<Pair<'i, Rule>> {
    pairs
        .find(|pair| pair.as_rule() == rule)
        .ok_or_else(|| DocError::Malformed(format!("{}: missing {:?}", context, rule)))
}

fn parse_pragma(pair: Pair<Rule>) -> Result<PragmaDirective> {
    let start = pair.as_span().start();
    let mut inner = pair.into_inner();
    let name = required(&mut inner, Rule::identifier, "pragma")?;
    let value = required(&mut inner, Rule::pragma_value, "pragma")?;

    Ok(PragmaDirective {
        name: name.as_str().to_string(),
        value: value.as_str().trim().to_string(),
        start,
    })
}

fn parse_import(pair: Pair<Rule>) -> Result<ImportDirective> {
    let start = pair.as_span().start();
    let mut from = None;
    let mut alias = None;
    let mut symbols = Vec::new();

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::string_literal => from = Some(string_value(item)),
            Rule::import_alias => alias = Some(item.as_str().to_string()),
            Rule::import_symbols => {
                for symbol in item.into_inner() {
                    let mut names = symbol.into_inner().filter(|p| p.as_rule() == Rule::identifier);
                    let name = names
                        .next()
                        .ok_or_else(|| DocError::Malformed("import symbol without name".to_string()))?;
                    symbols.push(ImportSymbol {
                        name: name.as_str().to_string(),
                        alias: names.next().map(|alias| alias.as_str().to_string()),
                    });
                }
            }
            _ => {}
        }
    }

    let from = from.ok_or_else(|| DocError::Malformed("import without path".to_string()))?;
    Ok(ImportDirective {
        from,
        alias,
        symbols,
        start,
    })
}

fn string_value(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|content| content.as_str().to_string())
        .unwrap_or_default()
}

fn parse_contract(pair: Pair<Rule>) -> Result<ContractDefinition> {
    let start = pair.as_span().start();
    let mut contract = ContractDefinition {
        name: String::new(),
        kind: ContractKind::Contract,
        is_abstract: false,
        parents: Vec::new(),
        body: Vec::new(),
        start,
    };

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::abstract_marker => contract.is_abstract = true,
            Rule::contract_kind => {
                contract.kind = match item.as_str() {
                    "interface" => ContractKind::Interface,
                    "library" => ContractKind::Library,
                    _ => ContractKind::Contract,
                }
            }
            Rule::identifier => contract.name = item.as_str().to_string(),
            Rule::inheritance_list => {
                for specifier in item
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::inheritance_specifier)
                {
                    let mut inner = specifier.into_inner();
                    let name = required(&mut inner, Rule::path_name, "inheritance specifier")?;
                    contract.parents.push(InheritanceSpecifier {
                        name: name.as_str().to_string(),
                        arguments: inner.next().map(|args| args.as_str().to_string()),
                    });
                }
            }
            Rule::event_definition => contract.body.push(ContractPart::Event(parse_event(item)?)),
            Rule::function_definition => {
                contract.body.push(ContractPart::Function(parse_function(item)?))
            }
            Rule::state_variable_declaration => {
                contract
                    .body
                    .push(ContractPart::StateVariable(parse_state_variable(item)?))
            }
            other => trace!("Skipping {:?} in contract body", other),
        }
    }

    if contract.name.is_empty() {
        return Err(DocError::Malformed("contract without name".to_string()));
    }

    debug!(
        "Parsed {:?} {} with {} parents and {} members",
        contract.kind,
        contract.name,
        contract.parents.len(),
        contract.body.len()
    );
    Ok(contract)
}

fn parse_event(pair: Pair<Rule>) -> Result<EventDefinition> {
    let start = pair.as_span().start();
    let mut event = EventDefinition {
        name: String::new(),
        params: Vec::new(),
        anonymous: false,
        start,
    };

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::identifier => event.name = item.as_str().to_string(),
            Rule::parameter_list => event.params = parse_parameters(item),
            Rule::anonymous_marker => event.anonymous = true,
            _ => {}
        }
    }

    if event.name.is_empty() {
        return Err(DocError::Malformed("event without name".to_string()));
    }
    Ok(event)
}

fn parse_function(pair: Pair<Rule>) -> Result<FunctionDefinition> {
    let start = pair.as_span().start();
    let mut function = FunctionDefinition {
        name: String::new(),
        kind: FunctionKind::Function,
        params: Vec::new(),
        returns: Vec::new(),
        modifiers: Vec::new(),
        has_body: false,
        start,
    };

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::identifier => function.name = item.as_str().to_string(),
            Rule::special_function => {
                function.name = item.as_str().to_string();
                function.kind = match item.as_str() {
                    "constructor" => FunctionKind::Constructor,
                    "receive" => FunctionKind::Receive,
                    _ => FunctionKind::Fallback,
                };
            }
            Rule::parameter_list => function.params = parse_parameters(item),
            Rule::returns_clause => {
                if let Some(list) = item.into_inner().find(|p| p.as_rule() == Rule::parameter_list) {
                    function.returns = parse_parameters(list);
                }
            }
            Rule::modifier_invocation => {
                let mut inner = item.into_inner();
                let name = required(&mut inner, Rule::modifier_name, "modifier invocation")?;
                function.modifiers.push(Modifier {
                    name: name.as_str().to_string(),
                    arguments: inner.next().map(|args| args.as_str().to_string()),
                });
            }
            Rule::brace_block => function.has_body = true,
            _ => {}
        }
    }

    // pre-0.4.22 fallback: `function () payable { ... }`
    if function.name.is_empty() {
        function.name = "fallback".to_string();
        function.kind = FunctionKind::Fallback;
    }

    Ok(function)
}

fn parse_parameters(pair: Pair<Rule>) -> Vec<Parameter> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::parameter)
        .map(|param| {
            let mut parameter = Parameter {
                type_name: String::new(),
                qualifiers: Vec::new(),
                name: None,
            };
            for token in param.into_inner() {
                match token.as_rule() {
                    Rule::type_name => parameter.type_name = token.as_str().to_string(),
                    Rule::parameter_qualifier => parameter.qualifiers.push(token.as_str().to_string()),
                    Rule::identifier => parameter.name = Some(token.as_str().to_string()),
                    _ => {}
                }
            }
            parameter
        })
        .collect()
}

fn parse_state_variable(pair: Pair<Rule>) -> Result<StateVariableDeclaration> {
    let start = pair.as_span().start();
    let mut variable = StateVariableDeclaration {
        name: String::new(),
        type_name: String::new(),
        attributes: Vec::new(),
        initial_value: None,
        start,
    };

    for token in pair.into_inner() {
        match token.as_rule() {
            Rule::type_name => variable.type_name = token.as_str().to_string(),
            Rule::variable_attribute => {
                // `override(A, B)` keeps only its keyword
                let keyword = token.as_str().split('(').next().unwrap_or_default().trim();
                variable.attributes.push(keyword.to_string());
            }
            Rule::identifier => variable.name = token.as_str().to_string(),
            Rule::initializer => variable.initial_value = Some(token.as_str().trim().to_string()),
            _ => {}
        }
    }

    if variable.name.is_empty() {
        return Err(DocError::Malformed("state variable without name".to_string()));
    }
    Ok(variable)
}
