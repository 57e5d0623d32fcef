//! # qc
//!
//! The Q compiler. It sequences parsing, the semantic passes, and C code
//! generation, then drives the system C toolchain to produce an
//! executable named `pgm`.
mod cli;

use cli::Cli;

use std::fs;

use log::{error, info};
use q_lang::{
    ast::{Ast, QParser},
    compiler::Compiler,
    typechecker::{audit_constructors, build_type_tree, TypeError, Typechecker},
};

fn main() {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(io_error) => {
            error!(
                "Could not read file '{}': {io_error}",
                args.file.to_string_lossy()
            );
            std::process::exit(-1);
        }
    };

    let mut ast = Ast::from_program(QParser::parse_program(&source));
    if args.dump_parsed {
        info!("Parsed AST:\n{ast:#?}");
    }

    // Every constructed class must be declared.
    if let Err(errors) = audit_constructors(&ast) {
        report(&errors);
        std::process::exit(-1);
    }

    // Build the class hierarchy, rejecting malformed ones.
    let tree = match build_type_tree(&ast) {
        Ok(tree) => tree,
        Err(hierarchy_error) => {
            eprintln!("{hierarchy_error}");
            std::process::exit(-1);
        }
    };

    // The main semantic pass. It runs to completion and aborts afterwards
    // if it accumulated any diagnostics.
    let analysis = match Typechecker::new(tree).check(&mut ast) {
        Ok(analysis) => analysis,
        Err(errors) => {
            report(&errors);
            eprintln!("{} errors reported", errors.len());
            std::process::exit(-1);
        }
    };
    if args.dump_typed {
        info!("Checked AST:\n{ast:#?}");
    }

    let compiler = Compiler::new(&analysis);
    if let Err(compile_error) = compiler.compile_program(&ast, args.emit_c) {
        error!("{compile_error}");
        std::process::exit(-1);
    }
}

fn report(errors: &[TypeError]) {
    for type_error in errors {
        eprintln!("{type_error}");
    }
}
