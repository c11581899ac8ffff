//! Cloud Gate headless runner
//!
//! Plays a level with the demo autopilot on a fixed timestep and prints a
//! JSON summary of the run.
//!
//! ```text
//! cloud-gate [--level FILE] [--settings FILE] [--seed N] [--seconds S] [--frame-ms MS]
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use cloud_gate::audio::AudioManager;
use cloud_gate::consts::*;
use cloud_gate::demo::autopilot;
use cloud_gate::sim::{GameEvent, GamePhase, GameState, tick};
use cloud_gate::{LevelConfig, Settings};

struct Args {
    level: Option<PathBuf>,
    settings: Option<PathBuf>,
    seed: u64,
    seconds: f32,
    frame_dt: f32,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            level: None,
            settings: None,
            seed: 12345,
            seconds: 120.0,
            frame_dt: SIM_DT,
        }
    }
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().with_context(|| format!("missing value for {flag}"));
        match flag.as_str() {
            "--level" => args.level = Some(PathBuf::from(value()?)),
            "--settings" => args.settings = Some(PathBuf::from(value()?)),
            "--seed" => args.seed = value()?.parse().context("--seed expects an integer")?,
            "--seconds" => args.seconds = value()?.parse().context("--seconds expects a number")?,
            "--frame-ms" => {
                let ms: f32 = value()?.parse().context("--frame-ms expects a number")?;
                args.frame_dt = ms / 1000.0;
            }
            other => bail!("unknown argument {other}"),
        }
    }
    if !(args.frame_dt > 0.0) {
        bail!("frame time must be positive");
    }
    Ok(args)
}

fn load_level(args: &Args, settings: &Settings) -> Result<LevelConfig> {
    let config = match &args.level {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading level {}", path.display()))?;
            LevelConfig::from_json(&json).with_context(|| format!("loading level {}", path.display()))?
        }
        None => LevelConfig::default(),
    };
    Ok(config.with_tolerance_scale(settings.landing_tolerance_scale()))
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    outcome: GamePhase,
    seconds: f32,
    health: u8,
    shield: u8,
    has_key: bool,
    gems_left: usize,
    projectiles_fired: u32,
    cues_played: u32,
}

/// Fixed-timestep driver around the simulation
struct Runner {
    state: GameState,
    audio: AudioManager,
    accumulator: f32,
    finished: bool,
    projectiles_fired: u32,
    cues_played: u32,
}

impl Runner {
    /// Run as many simulation steps as `frame_dt` covers
    fn frame(&mut self, frame_dt: f32) {
        let dt = frame_dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && !self.finished {
            let input = autopilot(&self.state.snapshot());
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.handle_events();
        }
    }

    fn handle_events(&mut self) {
        let events = self.state.drain_events();
        for cue in self.audio.cues(&events) {
            log::debug!("cue {} at {:.2}", cue.effect.asset(), cue.volume);
            self.cues_played += 1;
        }
        for event in &events {
            match event {
                GameEvent::ProjectileSpawned { .. } => self.projectiles_fired += 1,
                GameEvent::GameOverShown | GameEvent::LevelCompleteShown => self.finished = true,
                _ => {}
            }
        }
    }

    fn summary(&self) -> Summary {
        let state = &self.state;
        Summary {
            seed: state.seed,
            outcome: state.phase,
            seconds: state.time,
            health: state.player.health,
            shield: state.player.shield,
            has_key: state.player.has_key,
            gems_left: state.gems.len(),
            projectiles_fired: self.projectiles_fired,
            cues_played: self.cues_played,
        }
    }
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = parse_args()?;
    let settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let config = load_level(&args, &settings)?;

    log::info!("Cloud Gate starting (seed {})", args.seed);
    let mut runner = Runner {
        state: GameState::new(config, args.seed),
        audio: AudioManager::from_settings(&settings),
        accumulator: 0.0,
        finished: false,
        projectiles_fired: 0,
        cues_played: 0,
    };

    let mut elapsed = 0.0;
    while elapsed < args.seconds && !runner.finished {
        runner.frame(args.frame_dt);
        elapsed += args.frame_dt;
    }
    if !runner.finished {
        log::warn!("Run stopped after {:.0}s without an outcome", args.seconds);
    }

    let summary = serde_json::to_string_pretty(&runner.summary()).context("serializing summary")?;
    println!("{summary}");
    Ok(())
}
