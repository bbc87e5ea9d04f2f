// Practice session demo on a manual transport
// Run with: RUST_LOG=debug cargo run --bin practice_demo [-- pattern-id [out.mid]]

use drumpad_trainer::audio::{AudioError, LogOutput};
use drumpad_trainer::messaging::notification::describe_pattern;
use drumpad_trainer::sequencer::library::{default_patterns, find_pattern};
use drumpad_trainer::{
    AudioContextCell, EngineConfig, Grade, ManualTransport, Notification, PracticeEngine,
    SharedOutput, TransportClock, midi, shared_output,
};
use ringbuf::traits::Consumer;

/// Offsets applied to successive hits, in milliseconds
const HUMAN_TIMING_MS: [f64; 8] = [-12.0, 4.0, 31.0, -47.0, 8.0, 72.0, -3.0, 140.0];
const LOOPS: u32 = 4;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init(); // Log to stderr (if you run with RUST_LOG=debug)

    let mut args = std::env::args().skip(1);
    let pattern_id = args.next().unwrap_or_else(|| "basic-rock".to_string());
    let export_path = args.next();

    let Some(pattern) = find_pattern(&pattern_id) else {
        eprintln!("Unknown pattern '{}'. Available:", pattern_id);
        for pattern in default_patterns() {
            eprintln!("  {:<14} {}", pattern.id, describe_pattern(&pattern));
        }
        std::process::exit(1);
    };

    println!("🥁 Drumpad Trainer - Practice Demo");
    println!("==================================");
    println!("Pattern: {}", describe_pattern(&pattern));

    // Audio comes up on first use
    let audio: AudioContextCell<SharedOutput> = AudioContextCell::new();
    let output = audio
        .get_or_init(|| async { Ok::<_, AudioError>(shared_output(LogOutput)) })
        .await?
        .clone();

    let (mut engine, mut notifications) =
        PracticeEngine::new(ManualTransport::new(), output, EngineConfig::default())?;

    engine.load_pattern(pattern.clone());
    engine.set_metronome_tempo(pattern.tempo);
    engine.start_metronome();
    engine.start_pattern(true);
    engine.start_practice();

    // Every expected hit over a few loops, played slightly off the grid
    let duration = pattern.duration_seconds();
    let looped = &pattern;
    let mut hits: Vec<(f64, u8)> = (0..LOOPS)
        .flat_map(move |iteration| {
            looped.events().iter().map(move |event| {
                (looped.event_seconds(event) + iteration as f64 * duration, event.pad_id)
            })
        })
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (index, (expected, pad_id)) in hits.into_iter().enumerate() {
        let offset = HUMAN_TIMING_MS[index % HUMAN_TIMING_MS.len()] / 1000.0;
        let now = engine.transport().now();
        engine.advance((expected + offset - now).max(0.0));
        engine.trigger_pad(pad_id);
    }

    engine.stop_practice();
    engine.stop_pattern();
    engine.stop_metronome();

    let mut beats = 0;
    let mut graded = [0u32; 5];
    while let Some(notification) = notifications.try_pop() {
        match notification {
            Notification::Beat { .. } => beats += 1,
            Notification::Hit(hit) => {
                let slot = match hit.grade {
                    Grade::Perfect => 0,
                    Grade::Good => 1,
                    Grade::Early => 2,
                    Grade::Late => 3,
                    Grade::Miss => 4,
                };
                graded[slot] += 1;
            }
            _ => {}
        }
    }

    let stats = engine.stats();
    println!("\n📊 Results after {} loops ({} metronome beats)", LOOPS, beats);
    println!("   - Hits:     {}", stats.total_hits);
    println!(
        "   - Perfect {} / Good {} / Early {} / Late {} / Miss {}",
        graded[0], graded[1], graded[2], graded[3], graded[4]
    );
    println!("   - Accuracy: {}%", stats.accuracy_percent);
    println!("   - Best streak: {}", stats.best_streak);

    if let Some(path) = export_path {
        midi::export_file(&path, &pattern)?;
        let reloaded = midi::import_file(&path)?;
        println!("\n💾 Exported to {} ({} events read back)", path, reloaded.event_count());
    }

    engine.dispose();
    Ok(())
}
