//! Shell-facing driver
//!
//! Owns the simulation state and the level RNG, turns wall-clock frame times
//! into time factors and forwards outcomes and events to a listener. The
//! shell keeps all rendering, audio and UI on its side of `GameListener`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Viewport;
use crate::consts::{FRAME_MS, LEVEL_COUNT, MAX_TIME_FACTOR};
use crate::sim::{
    GameEvent, LevelStyle, Outcome, SimulationState, clamp_level, generate, sanitize_time_factor,
    step,
};
use crate::tuning::Tuning;

/// Receives outcomes and events. Every method defaults to doing nothing.
pub trait GameListener {
    /// Player died after scrolling `distance`
    fn on_death(&mut self, _distance: f32) {}
    /// Level completed
    fn on_victory(&mut self, _level: u32) {}
    /// Any queued event (jumps, thrust, portals, level start, outcomes)
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// A listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl GameListener for NullListener {}

/// Converts frame timestamps to time factors relative to the reference frame
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    frame_ms: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FRAME_MS)
    }
}

impl FrameClock {
    pub fn new(frame_ms: f64) -> Self {
        Self {
            last_ms: None,
            frame_ms,
        }
    }

    /// Forget the previous frame; the next tick yields 0
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Time factor for a frame at `now_ms`, clamped to [0, MAX_TIME_FACTOR]
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            log::warn!("Ignoring non-finite frame time {now_ms}");
            return 0.0;
        }
        let factor = match self.last_ms {
            Some(last) if self.frame_ms > 0.0 => ((now_ms - last) / self.frame_ms) as f32,
            _ => 0.0,
        };
        self.last_ms = Some(now_ms);
        sanitize_time_factor(factor).min(MAX_TIME_FACTOR)
    }
}

/// A play session: level flow, input edges and frame scheduling
#[derive(Debug, Clone)]
pub struct Session {
    state: SimulationState,
    rng: Pcg32,
    style: LevelStyle,
    clock: FrameClock,
}

impl Session {
    /// Session with an unseeded (fresh every run) level RNG
    pub fn new(viewport: Viewport, tuning: Tuning) -> Self {
        Self::with_seed(viewport, tuning, rand::random())
    }

    /// Session whose levels are reproducible from `seed`
    pub fn with_seed(viewport: Viewport, tuning: Tuning, seed: u64) -> Self {
        log::info!("Session seed: {seed}");
        Self {
            state: SimulationState::new(viewport, tuning),
            rng: Pcg32::seed_from_u64(seed),
            style: LevelStyle::default(),
            clock: FrameClock::default(),
        }
    }

    /// Choose the layout family for subsequent level starts
    pub fn with_style(mut self, style: LevelStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> LevelStyle {
        self.style
    }

    /// Read access for rendering
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable access for tools and tests
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Reset state, generate `level` (0 is treated as 1) and start playing
    pub fn start_level(&mut self, level: u32) {
        let level = clamp_level(level);
        let layout = generate(
            level,
            self.style,
            self.state.viewport,
            &self.state.tuning,
            &mut self.rng,
        );
        self.state.start_level(level, layout);
        self.clock.reset();
    }

    /// Replay the current level with a fresh layout
    pub fn restart_level(&mut self) {
        self.start_level(self.state.level);
    }

    /// Advance to the next level. Past the last level, returns to the menu
    /// and reports false.
    pub fn next_level(&mut self) -> bool {
        let next = self.state.level + 1;
        if next <= LEVEL_COUNT {
            self.start_level(next);
            true
        } else {
            self.back_to_menu();
            false
        }
    }

    pub fn back_to_menu(&mut self) {
        self.state.back_to_menu();
        self.clock.reset();
    }

    /// Press began (tap, click, key down). Returns true if a jump was applied.
    pub fn press_start(&mut self) -> bool {
        self.state.press_start()
    }

    /// Press released
    pub fn press_end(&mut self) {
        self.state.press_end();
    }

    /// Run one frame at wall-clock time `now_ms`
    pub fn frame<L: GameListener + ?Sized>(&mut self, now_ms: f64, listener: &mut L) -> Outcome {
        if !self.state.is_playing() {
            return Outcome::Continue;
        }
        let time_factor = self.clock.tick(now_ms);
        self.advance(time_factor, listener)
    }

    /// Run one frame with a time factor computed by the caller
    pub fn advance<L: GameListener + ?Sized>(
        &mut self,
        time_factor: f32,
        listener: &mut L,
    ) -> Outcome {
        let input_active = self.state.input_active;
        let outcome = step(&mut self.state, time_factor, input_active);

        for event in self.state.drain_events() {
            listener.on_event(&event);
        }
        match outcome {
            Outcome::Death { distance } => listener.on_death(distance),
            Outcome::Victory { level } => listener.on_victory(level),
            Outcome::Continue => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, Obstacle, ObstacleKind};

    #[derive(Default)]
    struct Recorder {
        deaths: Vec<f32>,
        wins: Vec<u32>,
        events: Vec<GameEvent>,
    }

    impl GameListener for Recorder {
        fn on_death(&mut self, distance: f32) {
            self.deaths.push(distance);
        }
        fn on_victory(&mut self, level: u32) {
            self.wins.push(level);
        }
        fn on_event(&mut self, event: &GameEvent) {
            self.events.push(*event);
        }
    }

    fn session() -> Session {
        Session::with_seed(Viewport::default(), Tuning::default(), 7)
    }

    #[test]
    fn test_clock_first_tick_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(1000.0), 0.0);
        assert!((clock.tick(1016.5) - 1.0).abs() < 1e-6);
        assert!((clock.tick(1049.5) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_clock_clamps() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        assert_eq!(clock.tick(10_000.0), MAX_TIME_FACTOR);
        // Time going backwards yields no movement
        assert_eq!(clock.tick(5_000.0), 0.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
    }

    #[test]
    fn test_start_level_generates() {
        let mut s = session();
        s.start_level(0);
        assert_eq!(s.state().level, 1);
        assert!(s.state().is_playing());
        assert!(!s.state().obstacles.is_empty());
        assert_eq!(s.state().portals.len(), 1);
    }

    #[test]
    fn test_start_level_clamps_huge_level() {
        let mut s = session();
        s.start_level(u32::MAX);
        assert_eq!(s.state().level, crate::consts::MAX_LEVEL);
        assert!(s.state().is_playing());
        assert_eq!(
            s.state().level_length,
            crate::sim::level_length(crate::consts::MAX_LEVEL, &Tuning::default().generator)
        );
    }

    #[test]
    fn test_same_seed_same_levels() {
        let mut a = session();
        let mut b = session();
        a.start_level(2);
        b.start_level(2);
        assert_eq!(a.state().obstacles, b.state().obstacles);
    }

    #[test]
    fn test_victory_callback() {
        let mut s = session();
        s.start_level(1);
        s.state_mut().obstacles.clear();
        let length = s.state().level_length;
        s.state_mut().distance = length;

        let mut rec = Recorder::default();
        s.frame(0.0, &mut rec);
        assert_eq!(rec.wins, vec![1]);
        assert!(rec.events.contains(&GameEvent::Won { level: 1 }));
        assert_eq!(s.state().phase, GamePhase::Victory);

        // Not playing: frames are ignored
        assert_eq!(s.frame(16.5, &mut rec), Outcome::Continue);
        assert_eq!(rec.wins.len(), 1);
    }

    #[test]
    fn test_death_callback() {
        let mut s = session();
        s.start_level(1);
        let p = s.state().player.clone();
        let block = Obstacle::new(ObstacleKind::Cube, p.x, p.y, 38.0, 38.0);
        s.state_mut().obstacles.insert(0, block);

        let mut rec = Recorder::default();
        let outcome = s.advance(1.0, &mut rec);
        assert!(matches!(outcome, Outcome::Death { .. }));
        assert_eq!(rec.deaths.len(), 1);
        assert!(rec.wins.is_empty());
    }

    #[test]
    fn test_jump_event_reaches_listener() {
        let mut s = session();
        s.start_level(1);
        let mut rec = Recorder::default();
        s.frame(0.0, &mut rec);
        assert!(s.press_start());
        assert!(!s.press_start());
        s.press_end();
        s.frame(16.5, &mut rec);
        assert_eq!(rec.events.iter().filter(|e| **e == GameEvent::Jumped).count(), 1);
    }

    #[test]
    fn test_level_flow() {
        let mut s = session();
        s.start_level(2);
        assert!(s.next_level());
        assert_eq!(s.state().level, 3);
        assert!(!s.next_level());
        assert_eq!(s.state().phase, GamePhase::Menu);

        s.restart_level();
        assert_eq!(s.state().level, 3);
        assert!(s.state().is_playing());
    }

    #[test]
    fn test_classic_style() {
        let mut s = session().with_style(LevelStyle::Classic);
        s.start_level(1);
        assert!(s.state().portals.is_empty());
        assert_eq!(s.state().level_length, 3500.0);
    }
}
