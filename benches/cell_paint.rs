use burble::ui::hit::{decline_all, HitRouter};
use burble::ui::style::{paint, MessageStyle, TailCorner};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;

fn bench_paint(c: &mut Criterion) {
    let bounds = Rect::new(0, 0, 42, 8);
    let styles = [
        ("none", MessageStyle::None),
        ("bubble", MessageStyle::Bubble),
        (
            "bubble_tail",
            MessageStyle::BubbleTail(TailCorner::BottomRight),
        ),
        ("outline", MessageStyle::BubbleOutline(Color::Cyan)),
        (
            "tail_outline",
            MessageStyle::BubbleTailOutline(Color::Cyan, TailCorner::BottomLeft),
        ),
    ];
    let mut group = c.benchmark_group("paint");
    for (name, style) in &styles {
        group.bench_with_input(BenchmarkId::from_parameter(name), style, |b, style| {
            b.iter(|| paint(style, bounds));
        });
    }
    group.finish();
}

fn bench_hit_resolution(c: &mut Criterion) {
    let mut router = HitRouter::default();
    router.rebuild(
        Rect::new(6, 2, 40, 6),
        Rect::new(0, 6, 4, 2),
        Rect::new(6, 0, 40, 1),
        Rect::new(6, 9, 40, 1),
    );
    c.bench_function("resolve", |b| {
        b.iter(|| {
            router.resolve(Position::new(20, 4), &decline_all);
            router.resolve(Position::new(1, 7), &decline_all);
            router.resolve(Position::new(60, 20), &decline_all);
        });
    });
}

criterion_group!(benches, bench_paint, bench_hit_resolution);
criterion_main!(benches);
