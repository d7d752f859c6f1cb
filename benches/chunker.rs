//! Chunk/role-assignment benchmark over a synthetic tagged sentence.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use anthroscore::parse::{analyze, TaggedToken};

fn tagged_sentence() -> (String, Vec<TaggedToken>) {
    let words: &[(&str, &str)] = &[
        ("The", "DT"),
        ("large", "JJ"),
        ("neural", "JJ"),
        ("system", "NN"),
        ("quickly", "RB"),
        ("analyzes", "VBZ"),
        ("the", "DT"),
        ("experimental", "JJ"),
        ("data", "NNS"),
        ("and", "CC"),
        ("researchers", "NNS"),
        ("use", "VBP"),
        ("the", "DT"),
        ("model", "NN"),
        (".", "."),
    ];
    let mut sentence = String::new();
    let mut tokens = Vec::new();
    for (text, tag) in words {
        if !sentence.is_empty() && *text != "." {
            sentence.push(' ');
        }
        let start = sentence.len();
        sentence.push_str(text);
        tokens.push(TaggedToken {
            text: (*text).to_string(),
            tag: (*tag).to_string(),
            start,
            end: start + text.len(),
        });
    }
    (sentence, tokens)
}

fn bench_analyze(c: &mut Criterion) {
    let (sentence, tokens) = tagged_sentence();
    c.bench_function("analyze_tagged_sentence", |b| {
        b.iter(|| analyze(black_box(&sentence), black_box(&tokens)))
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
