//! Compile the Irata instruction set and report on it.
//!
//! Usage: `microcode-report [--dump] [--fingerprint] [--output FILE]`

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use irata_microcode::ir::InstructionSet;
use irata_microcode::{dsl, dump_table, CompileReport, Compiler, Table};
use irata_spec::{Catalog, IrataDecl};

#[derive(Parser, Debug)]
#[command(name = "microcode-report")]
#[command(about = "Compile the Irata microcode and report step and assertion counts")]
struct Args {
    /// Print every table entry
    #[arg(long)]
    dump: bool,

    /// Print the SHA-256 fingerprint of the serialized table
    #[arg(long)]
    fingerprint: bool,

    /// Write the serialized table to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let hw = IrataDecl::build().context("Failed to declare Irata hardware")?;
    let catalog = Catalog::irata().context("Failed to build instruction catalog")?;
    let set = dsl::irata::build(&hw, &catalog).context("Failed to build instruction set")?;
    let compiler = Compiler::for_irata(&hw, &catalog);

    let before = InstructionSet::from_dsl(&set, hw.hdl()).context("Failed to lower DSL")?;
    let before = CompileReport::from_ir(hw.hdl(), &before)?;
    let ir = compiler.compile_to_ir(&set).context("Compilation failed")?;
    let after = CompileReport::from_ir(hw.hdl(), &ir)?;
    let table = Table::lower(&ir).context("Lowering failed")?;

    println!("Before optimization:\n{}", before);
    println!("After optimization:\n{}", after);
    println!(
        "Step reduction: {:.1}%, {} table entries",
        before.step_reduction(&after) * 100.0,
        table.len()
    );

    if args.dump {
        print!("{}", dump_table(hw.hdl(), &table));
    }

    if args.fingerprint {
        println!("Fingerprint: {}", table.fingerprint_hex()?);
    }

    if let Some(path) = args.output {
        let bytes = table.to_bytes()?;
        fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} bytes to {}", bytes.len(), path.display());
    }

    Ok(())
}
