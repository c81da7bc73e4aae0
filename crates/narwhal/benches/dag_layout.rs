use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use narwhal::config::{DagDimensions, EdgeStyle, LayoutOptions};
use narwhal::skeleton::{DagNodeSkeleton, StateTable, build_graph};
use narwhal::{DagLayout, GraphSpec};
use serde_json::json;
use std::hint::black_box;
use std::time::Duration;

/// `width` parallel pipelines of `depth` steps, each wrapped in an expanded group.
fn build_spec(width: usize, depth: usize) -> GraphSpec {
    let mut skeleton = Vec::new();
    let mut meta = StateTable::new();
    for lane in 0..width {
        let mut chain: Option<DagNodeSkeleton> = None;
        for step in (0..depth).rev() {
            let mut node = DagNodeSkeleton::execution(format!("l{lane}s{step}"));
            if let Some(next) = chain.take() {
                node = node.with_next(vec![next]);
            }
            chain = Some(node);
        }
        let group_id = format!("lane{lane}");
        meta.insert(group_id.clone(), json!({"expanded": true, "hasControlNode": true}));
        skeleton.push(DagNodeSkeleton::group(group_id, chain.into_iter().collect()));
    }
    build_graph(&skeleton, &meta).expect("valid skeleton")
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("dag_layout");
    group.measurement_time(Duration::from_secs(5));
    for &(width, depth) in &[(4usize, 5usize), (10, 10), (20, 15)] {
        let template = build_spec(width, depth);
        for style in [EdgeStyle::ProviderSpline, EdgeStyle::Snapped] {
            group.bench_with_input(
                BenchmarkId::new(format!("{style:?}"), format!("{width}x{depth}")),
                &template,
                |b, template| {
                    b.iter_batched(
                        || template.clone(),
                        |mut spec| {
                            let mut layout = DagLayout::new(
                                LayoutOptions::default(),
                                DagDimensions::default(),
                                style,
                            );
                            black_box(layout.layout(&mut spec).width)
                        },
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
