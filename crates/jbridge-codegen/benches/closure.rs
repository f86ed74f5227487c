//! Closure and emission benchmarks
//!
//! Measures a full generation run over a synthetic hierarchy: `depth` levels
//! of subclasses, each level referencing `width` sibling classes through
//! method signatures.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use jbridge_codegen::{ClosureAnalyzer, Generator, TypeSet};
use jbridge_core::{
    ClassPool, ClassSpec, FieldSpec, GenerationRequest, MethodSpec, ReflectionProvider, TypeRef,
};
use std::collections::BTreeSet;
use std::hint::black_box;

fn hierarchy(depth: usize, width: usize) -> ClassPool {
    let mut specs = Vec::new();
    for level in 0..depth {
        for item in 0..width {
            let name = format!("bench.l{level}.C{item}");
            let mut spec = ClassSpec::class(name.as_str())
                .field(FieldSpec::new("id", "long"))
                .method(MethodSpec::new("hash", "int", &[]));
            if level > 0 {
                spec = spec.extends(format!("bench.l{}.C{item}", level - 1));
            }
            for other in 0..width {
                spec = spec.method(MethodSpec::new(
                    format!("peer{other}"),
                    &format!("bench.l{level}.C{other}"),
                    &["java.lang.String", "int[]"],
                ));
            }
            specs.push(spec);
        }
    }
    ClassPool::from_specs(specs).unwrap()
}

fn request(depth: usize) -> GenerationRequest {
    let mut request = GenerationRequest::new().with_class(format!("bench.l{}.C0", depth - 1));
    for level in 0..depth {
        request = request.with_package(format!("bench.l{level}"));
    }
    request
}

fn bench_required_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_required_types");

    for depth in [4, 16, 64] {
        let pool = hierarchy(depth, 2);
        let packages = BTreeSet::new();
        let excludes = BTreeSet::new();
        let leaf = pool.find_class(&format!("bench.l{}.C0", depth - 1)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                let analyzer = ClosureAnalyzer::new(&pool, &packages, &excludes);
                let mut typeset = TypeSet::new();
                analyzer
                    .add_required_types(black_box(&TypeRef::Plain(leaf)), &mut typeset, true)
                    .unwrap();
                typeset
            })
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for (depth, width) in [(2, 4), (4, 8), (8, 16)] {
        let pool = hierarchy(depth, width);
        let request = request(depth);

        group.bench_with_input(
            BenchmarkId::new("classes", depth * width),
            &request,
            |b, request| {
                b.iter(|| {
                    Generator::new(black_box(&pool), request)
                        .generate()
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_required_types, bench_generate);

criterion_main!(benches);
