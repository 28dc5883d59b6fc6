//! hoverpod: a headless hover vehicle session.
//!
//! Generates terrain, spawns a player and flies a scripted route: summon a
//! pod, mount it, cruise and climb, dismount, walk off, recall it and finally
//! dismiss it. State transitions are logged.

mod config;
mod mobility;
mod player;
mod script;
mod seat;
mod session;
mod speed_zones;
mod terrain;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use config::GameConfig;
use script::Script;
use session::Session;

/// Render-loop rate the script feeds frames at.
const FRAME_RATE: f64 = 60.0;

#[derive(Debug, Parser)]
#[command(name = "hoverpod")]
#[command(about = "Headless hover vehicle session")]
struct Args {
    /// Session length in seconds (overrides config.ron)
    #[arg(long, value_parser = parse_seconds)]
    seconds: Option<f32>,
    /// World seed (overrides config.ron)
    #[arg(long)]
    seed: Option<u64>,
    /// Write the effective config to config.ron and exit
    #[arg(long)]
    write_config: bool,
}

fn parse_seconds(value: &str) -> Result<f32, String> {
    let seconds: f32 = value.parse().map_err(|e| format!("{}", e))?;
    if seconds > 0.0 && seconds.is_finite() {
        Ok(seconds)
    } else {
        Err(format!("must be positive, got {}", seconds))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let loaded = GameConfig::load();

    let debug_mode = loaded.as_ref().map(|c| c.debug_mode).unwrap_or(false);
    let filter = if debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!("{}, using defaults", e);
        GameConfig::default()
    });
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(seconds) = args.seconds {
        config.session_seconds = seconds;
    }
    if args.write_config {
        config.save();
        return Ok(());
    }

    log::info!("Starting hoverpod ({}s scripted session)", config.session_seconds);

    let seconds = config.session_seconds;
    let mut script = Script::demo(config.seed);
    let mut session = Session::new(config);
    let frame = Duration::from_secs_f64(1.0 / FRAME_RATE);
    let mut next_report = 1.0;

    while session.time.elapsed_seconds() < seconds {
        script.apply(session.time.elapsed_seconds(), &mut session.input);
        session.frame(frame);

        if session.time.elapsed_seconds() >= next_report {
            next_report += 1.0;
            report(&session);
        }
    }

    if !script.is_finished() {
        log::info!("Session ended before the script did");
    }
    session.shutdown();
    Ok(())
}

fn report(session: &Session) {
    let player = session.player_transform().position;
    match session.active_vehicle() {
        Some(id) => {
            let Some(pod) = session.vehicle_transform(id) else {
                return;
            };
            let clearance = pod.position.y - session.terrain.height_at(pod.position.x, pod.position.z);
            let telemetry = session.last_telemetry().unwrap_or_default();
            log::info!(
                "t={:.0}s {} at ({:.1}, {:.1}, {:.1}) clearance {:.2} pitch {:.1}° roll {:.1}°{}",
                session.time.elapsed_seconds(),
                id,
                pod.position.x,
                pod.position.y,
                pod.position.z,
                clearance,
                telemetry.pitch.to_degrees(),
                telemetry.roll.to_degrees(),
                if session.is_player_mounted() { " [mounted]" } else { "" }
            );
        }
        None => log::info!(
            "t={:.0}s on foot at ({:.1}, {:.1}, {:.1}) speed x{:.2}",
            session.time.elapsed_seconds(),
            player.x,
            player.y,
            player.z,
            session.modifiers.speed_multiplier()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("hoverpod").chain(list.iter().copied()))
    }

    #[test]
    fn parses_seconds_and_seed() {
        let parsed = args(&["--seconds", "12.5", "--seed", "42"]).unwrap();
        assert_eq!(parsed.seconds, Some(12.5));
        assert_eq!(parsed.seed, Some(42));
        assert!(!parsed.write_config);
        assert!(args(&["--write-config"]).unwrap().write_config);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(args(&["--seconds"]).is_err());
        assert!(args(&["--seconds=-1"]).is_err());
        assert!(args(&["--seconds", "0"]).is_err());
        assert!(args(&["--seed", "abc"]).is_err());
        assert!(args(&["--fly"]).is_err());
    }

    #[test]
    fn demo_script_flies_and_tears_down() {
        let mut config = GameConfig::default();
        config.terrain.resolution = 65;
        let mut script = Script::demo(config.seed);
        let mut session = Session::new(config);
        let frame = Duration::from_secs_f64(1.0 / FRAME_RATE);

        let mut was_mounted = false;
        while session.time.elapsed_seconds() < 12.0 {
            script.apply(session.time.elapsed_seconds(), &mut session.input);
            session.frame(frame);
            was_mounted |= session.is_player_mounted();
        }
        assert!(was_mounted);
        assert!(!session.is_player_mounted());
        assert!(session.active_vehicle().is_some());

        session.shutdown();
        assert!(session.vehicles.is_empty());
    }
}
