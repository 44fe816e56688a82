use clap::{App, Arg};
use env_logger::Builder;
use log::{info, LevelFilter};
use std::fs;
use anyhow::{Context, Result};

use soldoc::{ContractModel, FsImportResolver, ModelOptions};

fn main() -> Result<()> {
    let matches = App::new("soldoc")
        .version(soldoc::VERSION)
        .author("Solidity documentation extractor")
        .about("Extracts the documentation model of a Solidity contract, merged with its ancestors")
        .arg(
            Arg::with_name("INPUT")
                .help("Input Solidity file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Write the JSON model to FILE instead of stdout")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("contract")
                .short("c")
                .long("contract")
                .value_name("NAME")
                .help("Contract to document when the file declares several")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("include")
                .short("I")
                .long("include-path")
                .value_name("DIR")
                .help("Directory searched for non-relative imports")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("no-merge")
                .long("no-merge")
                .help("Only describe the contract itself, without inherited members"),
        )
        .arg(
            Arg::with_name("compact")
                .long("compact")
                .help("Print JSON on a single line"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increase log verbosity"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new().filter(None, level).parse_default_env().init();

    let input_file = matches
        .value_of("INPUT")
        .context("Missing input file")?;

    // Read input file
    let source = fs::read_to_string(input_file)
        .with_context(|| format!("Failed to read input file: {}", input_file))?;

    // relative imports resolve next to each file, bare ones against -I then cwd
    let mut resolver = FsImportResolver::new(".");
    for dir in matches.values_of("include").into_iter().flatten() {
        resolver = resolver.with_include_path(dir);
    }

    let mut options = ModelOptions::default()
        .merge_with_parents(!matches.is_present("no-merge"))
        .with_file_path(input_file)
        .with_import_resolver(resolver);
    if let Some(name) = matches.value_of("contract") {
        options = options.with_contract_name(name);
    }

    let model = ContractModel::new(source, options);
    let structure = model
        .to_json(None)
        .with_context(|| format!("Failed to build documentation model for {}", input_file))?;

    let json = if matches.is_present("compact") {
        serde_json::to_string(&structure)
    } else {
        serde_json::to_string_pretty(&structure)
    }
    .context("Failed to serialize documentation model")?;

    match matches.value_of("output") {
        Some(output_file) => {
            fs::write(output_file, json)
                .with_context(|| format!("Failed to write output file: {}", output_file))?;
            info!("Wrote documentation model of {} to {}", structure.contract.name, output_file);
        }
        None => println!("{}", json),
    }

    Ok(())
}
