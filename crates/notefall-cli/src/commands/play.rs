//! Play command: run one session end to end.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use notefall::session::LogFeedback;
use notefall::{
    DriveOutcome, GameConfig, HistoryLog, InputSource, ManualClock, NoteProducer, Pacing,
    PatternGenerator, Session, SessionConfig, SessionPorts, SessionResult, StopReason, StopSignal,
    SubmissionNotice, SystemClock, TickDriver, builtin_songs, find_song, submit_or_queue,
};
use tracing::{info, warn};

use super::leaderboard_client;
use crate::bot::{AutoplayBot, BotSkill};
use crate::cli::PlayArgs;
use crate::input::{KeyboardInput, RawModeGuard, spawn_keyboard_monitor};
use crate::paths::DataPaths;

pub fn run(
    paths: &DataPaths,
    config_path: Option<&Path>,
    endpoint: Option<&str>,
    args: &PlayArgs,
) -> Result<()> {
    let game = match config_path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let Some(song) = find_song(&args.song) else {
        let known: Vec<String> = builtin_songs().into_iter().map(|s| s.id).collect();
        bail!("Unknown song '{}' (available: {})", args.song, known.join(", "));
    };

    let mut profile = paths.load_profile();
    let speed = match args.speed {
        Some(speed) => speed,
        None => profile.note_speed(),
    };
    let session_config = SessionConfig::builder()
        .difficulty(args.difficulty)
        .song(&song)
        .note_speed(speed)
        .build()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let notes = PatternGenerator::new(seed).generate(
        args.difficulty,
        song.bpm,
        Some(song.duration_secs),
    );
    eprintln!(
        "{} [{}] seed {} - {} notes, speed {:.2}x",
        song.title,
        args.difficulty.expand_name(),
        seed,
        notes.len(),
        session_config.note_speed
    );

    let realtime = args.realtime || args.manual;
    let stop = Arc::new(StopSignal::new());
    let (ports, pacing) = if realtime {
        (SessionPorts::new(Arc::new(SystemClock::new())), Pacing::RealTime)
    } else {
        let clock = ManualClock::new();
        (
            SessionPorts::new(Arc::new(clock.clone())),
            Pacing::Simulated(clock),
        )
    };
    let ports = ports.feedback(Box::new(LogFeedback));

    // Raw mode must be on before the monitor reads keys
    let raw = if args.manual {
        let guard = RawModeGuard::enable().context("Failed to enable raw terminal mode")?;
        if !guard.reports_release() {
            eprintln!("Key releases are not reported by this terminal, long notes will miss");
        }
        Some(guard)
    } else {
        None
    };

    let mut input: Box<dyn InputSource> = if args.manual {
        let (tx, keyboard) = KeyboardInput::channel();
        spawn_keyboard_monitor(Arc::clone(&stop), Some(tx));
        Box::new(keyboard)
    } else {
        let skill = BotSkill {
            offset_ms: args.offset_ms,
            jitter_ms: args.jitter_ms,
            miss_rate: args.miss_rate,
        };
        if realtime {
            spawn_keyboard_monitor(Arc::clone(&stop), None);
        }
        Box::new(AutoplayBot::new(&notes, skill, seed))
    };

    if realtime {
        let handler_signal = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            handler_signal.stop(StopReason::Interrupted);
        })
        .context("Failed to install Ctrl+C handler")?;
        eprintln!("Press Esc or q to stop");
    }

    let outcome = {
        let mut session = Session::new(notes, &game, session_config, &mut profile, ports)?;
        let driver =
            TickDriver::new(game.timing.tick_ms, pacing).with_stop_signal(Arc::clone(&stop));
        let outcome = driver.run(&mut session, input.as_mut());
        if session.is_new_record() {
            eprintln!("New record!");
        }
        outcome
    };
    stop.stop(StopReason::Finished);
    drop(raw);

    let result = match outcome {
        DriveOutcome::Finished(result) => result,
        DriveOutcome::Stopped(reason) => {
            eprintln!("Play stopped ({}), no result recorded", reason);
            return Ok(());
        }
    };

    print_result(&result);
    record(paths, &result);

    if args.submit {
        let mut leaderboard = leaderboard_client(endpoint)?;
        match submit_or_queue(&mut profile, &mut leaderboard, &result)? {
            SubmissionNotice::Submitted => eprintln!("Score submitted"),
            SubmissionNotice::Queued { reason, .. } => {
                eprintln!("Leaderboard unreachable, score queued ({})", reason)
            }
        }
    }

    Ok(())
}

fn print_result(result: &SessionResult) {
    println!("{}", result.clear_label());
    println!("Score     {}", result.score);
    println!("Perfect   {}", result.perfect);
    println!("Good      {}", result.good);
    println!("Miss      {}", result.miss);
    println!("Max combo {}", result.max_combo);
}

/// Keep the result for later commands. Failures only cost history.
fn record(paths: &DataPaths, result: &SessionResult) {
    let mut history = HistoryLog::new(paths.history_dir());
    if let Err(e) = history.start().and_then(|_| history.append(result)) {
        warn!("Failed to append play history: {}", e);
    }
    match paths.save_last_result(result) {
        Ok(()) => info!("Saved result to {}", paths.last_result().display()),
        Err(e) => warn!("Failed to save last result: {:#}", e),
    }
}
