//! strikejam CLI: headless strike-animation playback of a MIDI file.
//!
//! Usage:
//!   strikejam path/to/file.mid
//!   strikejam path/to/file.mid --fps 60 --from 12.5 --seconds 30
//!   strikejam path/to/file.mid --play

use sj_master::Controller;
use std::io::Write;
use std::{env, fs};
use tracing::Level;

const USAGE: &str = "Usage: strikejam <file.mid> [--fps N] [--from SECONDS] [--seconds SECONDS] [--play] [--verbose]";

fn main() {
    let args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let path = args.get(1).filter(|a| !a.starts_with('-')).unwrap_or_else(|| {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    });

    let fps: u32 = flag(&args, "--fps").unwrap_or(60);
    let from: f64 = flag(&args, "--from").unwrap_or(0.0);
    let max_seconds: f64 = flag(&args, "--seconds").unwrap_or(600.0);

    let data = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path, e);
        std::process::exit(1);
    });

    let mut ctrl = Controller::new();
    ctrl.load_midi(&data).unwrap_or_else(|e| {
        eprintln!("Failed to parse MIDI: {}", e);
        std::process::exit(1);
    });

    let timeline = ctrl.timeline();
    let assignment = ctrl.assignment();
    println!("Tracks:      {}", timeline.tracks.len());
    println!("Notes:       {}", timeline.note_count());
    println!("Duration:    {:.2}s", timeline.duration_seconds());
    println!("Tempo:       {:.1} BPM at start", timeline.tempo_map.tempo_at(0).bpm());
    println!("Kit pieces:  {}", assignment.kit.len());
    for part in &assignment.mallets {
        println!("Mallets:     {} (channel {})", part.kind.name(), part.channel + 1);
    }
    if assignment.skipped > 0 {
        println!("Skipped:     {} tracks with no instrument", assignment.skipped);
    }
    println!();

    if args.iter().any(|a| a == "--play") {
        play(&mut ctrl, from, fps);
    } else {
        render(&ctrl, from, fps, max_seconds);
    }
}

/// Value following `name`, parsed.
fn flag<T: std::str::FromStr>(args: &[String], name: &str) -> Option<T> {
    let value = args.iter().position(|a| a == name).and_then(|i| args.get(i + 1))?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("Invalid value for {}: {}", name, value);
            std::process::exit(1);
        }
    }
}

fn render(ctrl: &Controller, from: f64, fps: u32, max_seconds: f64) {
    println!("Rendering at {} fps from {:.2}s...", fps, from);
    let report = ctrl.render_from(from, fps, max_seconds).unwrap_or_else(|e| {
        eprintln!("Render failed: {}", e);
        std::process::exit(1);
    });

    println!("Frames:      {}", report.frames);
    println!("Played:      {:.2}s", report.seconds);
    println!("Strikes:     {}", report.events);
    println!("Peak parts:  {} visible, {} struck", report.peak_visible, report.peak_down);
}

fn play(ctrl: &mut Controller, from: f64, fps: u32) {
    ctrl.play(from, fps).unwrap_or_else(|e| {
        eprintln!("Playback failed: {}", e);
        std::process::exit(1);
    });
    println!("Playing...");
    println!();

    while ctrl.is_playing() {
        if let Some(time) = ctrl.position() {
            print!("\rTime: {:7.2}s", time);
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    println!("\rDone.          ");
}
