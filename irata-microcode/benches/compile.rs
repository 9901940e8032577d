//! Pipeline throughput over the full Irata instruction set.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use irata_microcode::ir::InstructionSet;
use irata_microcode::{dsl, Compiler, Pass, Table};
use irata_spec::{Catalog, IrataDecl};

fn bench_compile(c: &mut Criterion) {
    let hw = IrataDecl::build().unwrap();
    let catalog = Catalog::irata().unwrap();
    let set = dsl::irata::build(&hw, &catalog).unwrap();
    let compiler = Compiler::for_irata(&hw, &catalog);

    let mut group = c.benchmark_group("compile");

    group.bench_function("full_pipeline", |b| {
        b.iter(|| compiler.compile(black_box(&set)).unwrap())
    });

    group.bench_function("validate_only", |b| {
        b.iter(|| compiler.validate(black_box(&set)).unwrap())
    });

    let decorated = compiler
        .run_passes(
            &[Pass::StepIndexTransformer],
            InstructionSet::from_dsl(&set, hw.hdl()).unwrap(),
        )
        .unwrap();
    group.bench_function("step_merger", |b| {
        b.iter(|| {
            compiler
                .run_passes(&[Pass::StepMerger], black_box(decorated.clone()))
                .unwrap()
        })
    });

    group.finish();
}

fn bench_table(c: &mut Criterion) {
    let hw = IrataDecl::build().unwrap();
    let catalog = Catalog::irata().unwrap();
    let table = irata_microcode::compile_irata(&hw, &catalog).unwrap();
    let bytes = table.to_bytes().unwrap();

    let mut group = c.benchmark_group("table");

    group.bench_function("lookup", |b| {
        b.iter(|| {
            for opcode in [0x00u8, 0x10, 0x30, 0x51] {
                black_box(table.lookup(opcode, black_box(2), |_| true));
            }
        })
    });

    group.bench_function("from_bytes", |b| {
        b.iter(|| Table::from_bytes(black_box(&bytes)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_table);
criterion_main!(benches);
