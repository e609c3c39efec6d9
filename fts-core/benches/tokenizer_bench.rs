use criterion::{criterion_group, criterion_main, Criterion};
use fts_core::tokenizer::tokenize;

const ABSTRACT: &str = "Anarchism is a political philosophy and movement that is skeptical of \
all justifications for authority and seeks to abolish the institutions it claims maintain \
unnecessary coercion and hierarchy, typically including the state and capitalism.";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_abstract", |b| b.iter(|| tokenize(ABSTRACT)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
