use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use player_stats_terminal::config::{Category, Config, HITTERS};
use player_stats_terminal::fetch::parse_records_json;
use player_stats_terminal::page::{Page, Section};
use player_stats_terminal::prefs::MemoryPreferenceStore;
use player_stats_terminal::record::PlayerRecord;
use player_stats_terminal::render;
use player_stats_terminal::sync::SyncEngine;

fn roster(n: usize) -> Vec<PlayerRecord> {
    (0..n)
        .map(|idx| {
            PlayerRecord::new()
                .with("name", format!("Player {idx}"))
                .with("avg", format!(".{:03}", 200 + idx % 120))
                .with("hr", (idx % 40) as u64)
                .with("ops", format!(".{:03}", 650 + idx % 300))
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let raw = serde_json_body(500);
    c.bench_function("records_parse_500", |b| {
        b.iter(|| {
            let rows = parse_records_json(black_box(&raw)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_render_mobile(c: &mut Criterion) {
    let records = roster(500);
    let mut section = Section::standard();
    c.bench_function("render_mobile_500", |b| {
        b.iter(|| {
            render::render(&mut section, black_box(&records), HITTERS.columns, true, false)
                .unwrap();
            black_box(section.card_count());
        })
    });
}

fn bench_resize_repair(c: &mut Criterion) {
    let records = roster(500);
    c.bench_function("resize_repair_500", |b| {
        b.iter(|| {
            let mut engine = SyncEngine::new(
                Config::default(),
                Page::standard(),
                Box::new(MemoryPreferenceStore::default()),
                160,
            );
            engine.finish_refresh(Category::Hitters, Ok(records.clone()));
            engine.apply_layout(60);
            black_box(engine.page().section(Category::Hitters).card_count());
        })
    });
}

fn serde_json_body(n: usize) -> String {
    let rows: Vec<String> = (0..n)
        .map(|idx| {
            format!(
                r#"{{"name":"Player {idx}","avg":".{:03}","hr":{},"ops":".{:03}"}}"#,
                200 + idx % 120,
                idx % 40,
                650 + idx % 300
            )
        })
        .collect();
    format!("[{}]", rows.join(","))
}

criterion_group!(benches, bench_parse, bench_render_mobile, bench_resize_repair);
criterion_main!(benches);
