//! Benchmarks for expression analysis and control group mining
//!
//! Measures:
//! - Single expression analysis, simple and decomposed
//! - Batch analysis across thread counts
//! - Mining time as the corpus grows

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use form_analysis::{
    analyze_expressions, BatchConfig, ControlGroupMiner, ExpressionAnalyzer, FormControl,
    FormDefinition, FormView, MiningPreferences,
};

const EXPRESSIONS: [&str; 4] = [
    "my:Total",
    "string-length(my:Name) > 0",
    r#"my:Status = "Open" and (count(../my:Items/my:Item[my:Qty > 0]) > 2 or my:Override = 'yes')"#,
    "if(my:A >= 5, concat(my:First, ' ', my:Last), xdUser:get-UserName())",
];

const CONTROL_POOL: [(&str, &str); 8] = [
    ("TextField", "First Name"),
    ("TextField", "Last Name"),
    ("TextField", "Email"),
    ("TextField", "Phone"),
    ("DatePicker", "Start Date"),
    ("DropDown", "Department"),
    ("TextField", "Street Address"),
    ("TextField", "City"),
];

/// Forms that share overlapping runs of the control pool
fn generate_corpus(forms: usize, controls_per_form: usize) -> Vec<FormDefinition> {
    (0..forms)
        .map(|form_id| {
            let controls = (0..controls_per_form)
                .map(|i| {
                    let (control_type, label) = CONTROL_POOL[(form_id + i) % CONTROL_POOL.len()];
                    FormControl::new(control_type, format!("c{}", i)).with_label(label)
                })
                .collect();
            FormDefinition::new(format!("Form{}", form_id)).with_view(FormView::new("Main", controls))
        })
        .collect()
}

fn bench_expression_analysis(c: &mut Criterion) {
    let analyzer = ExpressionAnalyzer::new();
    let mut group = c.benchmark_group("expression_analysis");

    for (index, expression) in EXPRESSIONS.iter().enumerate() {
        group.bench_with_input(BenchmarkId::new("analyze", index), expression, |b, e| {
            b.iter(|| analyzer.analyze(black_box(e)))
        });
    }

    group.finish();
}

fn bench_batch_analysis(c: &mut Criterion) {
    let expressions: Vec<String> = (0..2_000)
        .map(|i| EXPRESSIONS[i % EXPRESSIONS.len()].to_string())
        .collect();
    let mut group = c.benchmark_group("batch_analysis");
    group.sample_size(20);

    for threads in [1, 2, 4, 8] {
        let config = BatchConfig::with_threads(threads);
        group.bench_with_input(BenchmarkId::new("threads", threads), &config, |b, config| {
            b.iter(|| analyze_expressions(black_box(&expressions), config))
        });
    }

    group.finish();
}

fn bench_mining(c: &mut Criterion) {
    let miner = ControlGroupMiner::with_preferences(MiningPreferences::with_sizes(2, 2, 10));
    let mut group = c.benchmark_group("mining");
    group.sample_size(20);

    for forms in [10, 50, 200] {
        let corpus = generate_corpus(forms, 20);
        group.bench_with_input(BenchmarkId::new("forms", forms), &corpus, |b, corpus| {
            b.iter(|| miner.analyze(black_box(corpus)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_expression_analysis, bench_batch_analysis, bench_mining);
criterion_main!(benches);
