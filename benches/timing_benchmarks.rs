use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drumpad_trainer::audio::SilentOutput;
use drumpad_trainer::pads::{ACTIVE_PAD_IDS, HAT_1, KICK, SNARE_1};
use drumpad_trainer::sequencer::library::{default_patterns, find_pattern};
use drumpad_trainer::{
    Grade, HitAnalyzer, ManualTransport, Pattern, PatternScheduler, PracticeStats, StepGrid,
    TransportClock, midi, shared_output,
};

fn loaded_scheduler(pattern: Pattern) -> PatternScheduler {
    let mut scheduler = PatternScheduler::new();
    scheduler.load(pattern, &mut ManualTransport::new());
    scheduler
}

/// Window query runs on every pad hit
fn bench_window_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_query");

    for pattern in default_patterns() {
        let id = pattern.id.clone();
        let scheduler = loaded_scheduler(pattern);

        group.bench_with_input(BenchmarkId::from_parameter(id), &scheduler, |b, scheduler| {
            let mut now = 0.0;
            b.iter(|| {
                now += 0.013;
                black_box(scheduler.expected_events_in_window(now - 0.2, now + 0.2));
            });
        });
    }
    group.finish();
}

/// Grading a hit (window query + consumed-set bookkeeping)
fn bench_hit_analysis(c: &mut Criterion) {
    let scheduler = loaded_scheduler(find_pattern("basic-rock").unwrap());

    c.bench_function("analyze_hit", |b| {
        let mut analyzer = HitAnalyzer::default();
        let mut now = 0.0;
        let pads = [KICK, HAT_1, SNARE_1];
        let mut index = 0;
        b.iter(|| {
            now += 0.011;
            index = (index + 1) % pads.len();
            black_box(analyzer.analyze(pads[index], now, &scheduler));
        });
    });
}

fn bench_stats_reducer(c: &mut Criterion) {
    let grades = [Grade::Perfect, Grade::Good, Grade::Early, Grade::Late, Grade::Miss];

    c.bench_function("stats_1000_hits", |b| {
        b.iter(|| {
            black_box(PracticeStats::from_grades(
                grades.iter().copied().cycle().take(1000),
            ))
        });
    });
}

/// Pattern playback: one bar of 16th ticks at 120 BPM
fn bench_playback(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback");

    for pattern in default_patterns() {
        let id = pattern.id.clone();
        group.bench_function(BenchmarkId::from_parameter(id), |b| {
            let mut transport = ManualTransport::new();
            let mut scheduler = PatternScheduler::new();
            scheduler.load(pattern.clone(), &mut transport);
            scheduler.start(&mut transport, shared_output(SilentOutput));
            transport.start();

            b.iter(|| {
                black_box(transport.advance(0.125));
            });
        });
    }
    group.finish();
}

fn bench_midi_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("midi_file");

    for pattern in default_patterns() {
        let bytes = midi::encode(&pattern);

        group.bench_with_input(
            BenchmarkId::new("encode", &pattern.id),
            &pattern,
            |b, pattern| b.iter(|| black_box(midi::encode(pattern))),
        );
        group.bench_with_input(BenchmarkId::new("decode", &pattern.id), &bytes, |b, bytes| {
            b.iter(|| black_box(midi::decode(bytes)))
        });
    }
    group.finish();
}

fn bench_step_grid(c: &mut Criterion) {
    let pattern = default_patterns().remove(0);

    c.bench_function("grid_round_trip", |b| {
        b.iter(|| {
            let grid = StepGrid::from_pattern(&pattern, &ACTIVE_PAD_IDS);
            black_box(grid.to_events())
        });
    });
}

criterion_group!(
    benches,
    bench_window_query,
    bench_hit_analysis,
    bench_stats_reducer,
    bench_playback,
    bench_midi_file,
    bench_step_grid
);
criterion_main!(benches);
