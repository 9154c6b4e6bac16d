use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ipgraph::engine::{CapacityChoice, EngineConfig, SummaryEngine};
use std::net::Ipv4Addr;

fn synthetic_log(nodes: u32, edges: u32) -> Vec<String> {
    let address = |i: u32| Ipv4Addr::from(0x0A00_0000 + i * 7).to_string();
    let mut lines = vec![format!("{nodes} {edges}")];
    lines.extend((0..nodes).map(address));
    for e in 0..edges {
        let u = e.wrapping_mul(2_654_435_761) % nodes;
        let v = e.wrapping_mul(40_503) % nodes;
        lines.push(format!("Jun 1 00:00:00 {}:{} {}:22 {} Illegal user", address(u), 1024 + e % 1000, address(v), e % 97));
    }
    lines
}

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary_engine");
    let log = synthetic_log(2000, 10_000);
    let config = EngineConfig {
        capacity_choice: CapacityChoice::new(5).unwrap(),
        ..EngineConfig::default()
    };

    group.bench_function("build_2000_nodes_10000_edges", |b| {
        b.iter(|| black_box(SummaryEngine::build(&log, config)));
    });

    if let Ok(engine) = SummaryEngine::build(&log, config) {
        let probes: Vec<String> = (0..100).map(|i| Ipv4Addr::from(0x0A00_0000 + i * 7).to_string()).collect();
        group.bench_function("summarize_100_addresses", |b| {
            b.iter(|| {
                for ip in &probes {
                    let _ = black_box(engine.summarize(ip));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summary);
criterion_main!(benches);
