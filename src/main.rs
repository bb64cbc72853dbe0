//! Neon Dash headless runner
//!
//! Plays levels with the autopilot at a fixed frame rate and reports the
//! outcome. Useful for balancing tuning files without a renderer.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::{Parser, ValueEnum};

    use neon_dash::sim::{GameEvent, LevelStyle, Outcome, autopilot};
    use neon_dash::{GameListener, Session, Tuning, TuningError, Viewport};

    #[derive(Debug, Clone, Copy, ValueEnum)]
    enum Style {
        Portal,
        Classic,
    }

    impl From<Style> for LevelStyle {
        fn from(style: Style) -> Self {
            match style {
                Style::Portal => LevelStyle::Portal,
                Style::Classic => LevelStyle::Classic,
            }
        }
    }

    #[derive(Debug, Parser)]
    #[command(name = "neon-dash", about = "Run Neon Dash levels headless with the autopilot")]
    struct Args {
        /// Level to start at
        #[arg(long, default_value_t = 1)]
        level: u32,
        /// Layout seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Layout family
        #[arg(long, value_enum, default_value_t = Style::Portal)]
        style: Style,
        /// Simulated frames per second
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Give up after this many frames per level
        #[arg(long, default_value_t = 20_000)]
        max_frames: u32,
        /// Keep going through the following levels after a win
        #[arg(long)]
        campaign: bool,
        /// JSON tuning file
        #[arg(long)]
        tuning: Option<PathBuf>,
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        #[arg(long, default_value_t = 620.0)]
        height: f32,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    }

    /// Counts what happened during a run
    #[derive(Debug, Default)]
    struct Report {
        jumps: u32,
        portals: u32,
        thrust_frames: u32,
    }

    impl GameListener for Report {
        fn on_death(&mut self, distance: f32) {
            println!("Died after {}m", distance.floor());
        }

        fn on_victory(&mut self, level: u32) {
            println!("Completed level {level}!");
        }

        fn on_event(&mut self, event: &GameEvent) {
            log::debug!("{event:?}");
            match event {
                GameEvent::Jumped => self.jumps += 1,
                GameEvent::PortalEntered { .. } => self.portals += 1,
                GameEvent::Thrust => self.thrust_frames += 1,
                _ => {}
            }
        }
    }

    fn play_level(session: &mut Session, args: &Args, report: &mut Report) -> Outcome {
        let frame_ms = 1000.0 / args.fps.max(1.0);
        let mut now = 0.0;
        let mut held = false;

        for _ in 0..args.max_frames {
            let press = autopilot::wants_press(session.state());
            if press && !held {
                session.press_start();
            } else if !press && held {
                session.press_end();
            }
            held = press;

            let outcome = session.frame(now, report);
            if outcome.is_terminal() {
                return outcome;
            }
            now += frame_ms;
        }

        log::warn!(
            "Level {} still running after {} frames",
            session.state().level,
            args.max_frames
        );
        Outcome::Continue
    }

    pub fn run() -> Result<(), TuningError> {
        env_logger::init();
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let viewport = Viewport::new(args.width, args.height);
        let session = match args.seed {
            Some(seed) => Session::with_seed(viewport, tuning, seed),
            None => Session::new(viewport, tuning),
        };
        let mut session = session.with_style(args.style.into());
        let mut report = Report::default();

        session.start_level(args.level);
        loop {
            let outcome = play_level(&mut session, &args, &mut report);
            let won = matches!(outcome, Outcome::Victory { .. });
            if !(won && args.campaign && session.next_level()) {
                break;
            }
        }

        println!(
            "Level {} | progress {:.0}% | jumps {} | portals {} | thrust frames {}",
            session.state().level,
            session.state().progress() * 100.0,
            report.jumps,
            report.portals,
            report.thrust_frames
        );

        if args.json {
            println!("{}", serde_json::to_string_pretty(session.state())?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), neon_dash::TuningError> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host shell on the web
}
