//! Cliff Diver entry point
//!
//! Headless native driver: runs one scripted dive on the interactive
//! profile, then evaluates a small batch of built-in heuristic policies on
//! the training profile and prints their reports as JSON lines.

use cliff_diver::harness::{Observation, evaluate_population};
use cliff_diver::sim::{Action, TickInput};
use cliff_diver::{Episode, EpisodeConfig};

/// Tick cap for a single episode; generous next to a real dive's length
const MAX_TICKS: u64 = 10_000;

fn main() {
    env_logger::init();
    log::info!("Cliff Diver (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match EpisodeConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load config from {path}: {e}");
                std::process::exit(2);
            }
        },
        None => EpisodeConfig::interactive(),
    };

    scripted_dive(&config);
    training_batch();
}

/// One fixed input script: launch, hold the tuck long enough for roughly
/// two flips, then open up and ride the entry in.
fn scripted_dive(config: &EpisodeConfig) {
    let target_flips = 2.0;
    let mut episode = Episode::new(config, target_flips);

    let tuck_ticks = (cliff_diver::target_angle(target_flips) / config.profile.tuck_spin) as u64;
    log::info!("scripted dive: target {target_flips} flips, tucking for {tuck_ticks} ticks");

    let mut tick_no = 0u64;
    while !episode.is_terminal() && tick_no < MAX_TICKS {
        let input = if tick_no == 0 {
            TickInput::launch()
        } else if tick_no <= tuck_ticks {
            TickInput {
                begin_fall: false,
                action: Action::Tuck,
            }
        } else if tick_no == tuck_ticks + 1 {
            TickInput {
                begin_fall: false,
                action: Action::Release,
            }
        } else {
            TickInput::default()
        };
        episode.step(&input);
        tick_no += 1;
    }

    let snapshot = episode.snapshot();
    log::info!(
        "scripted dive done after {} ticks: flips {:?}, angle {:.1}, win: {}",
        snapshot.tick,
        snapshot.flip_count,
        snapshot.diver.angle,
        episode.is_win()
    );
}

/// Evaluate a handful of spin-until-margin heuristics as a stand-in
/// population, the way an evolutionary run would grade its genomes.
fn training_batch() {
    let config = EpisodeConfig::training();
    let seed = 2024;

    let margins = [30.0f32, 60.0, 90.0, 120.0, 180.0];
    let mut policies: Vec<_> = margins
        .iter()
        .map(|&margin| {
            move |obs: &Observation| {
                if obs.current_angle < obs.target_angle - margin {
                    [1.0, 0.0, 0.0] // keep tucking
                } else {
                    [0.0, 1.0, 0.0] // open up
                }
            }
        })
        .collect();

    match evaluate_population(&mut policies, &config, seed, MAX_TICKS) {
        Ok(reports) => {
            for (margin, report) in margins.iter().zip(&reports) {
                log::info!(
                    "margin {margin}: flips {:?}, fitness delta {:?}",
                    report.flip_count,
                    report.fitness_delta
                );
                if let Ok(json) = serde_json::to_string(report) {
                    println!("{json}");
                }
            }
        }
        Err(e) => {
            log::error!("population evaluation failed: {e}");
            std::process::exit(1);
        }
    }
}
