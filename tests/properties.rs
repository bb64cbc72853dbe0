use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use neon_dash::consts::{SHIP_MAX_VELOCITY, SHIP_MIN_VELOCITY, colors};
use neon_dash::sim::{LevelLayout, LevelStyle, Mode, SimulationState, generate, step};
use neon_dash::{Tuning, Viewport};

proptest! {
    #[test]
    fn obstacles_never_spawn_on_screen(
        seed in any::<u64>(),
        level in 0u32..8,
        width in 320.0f32..2560.0,
        classic in any::<bool>(),
    ) {
        let style = if classic { LevelStyle::Classic } else { LevelStyle::Portal };
        let viewport = Viewport::new(width, 720.0);
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = generate(level, style, viewport, &Tuning::default(), &mut rng);

        prop_assert!(layout.obstacles.iter().all(|o| o.rect.x >= width));
        prop_assert!(layout.portals.iter().all(|p| p.x >= width));
        prop_assert!(layout.obstacles.iter().all(|o| o.rect.w > 0.0 && o.rect.h > 0.0));
    }

    #[test]
    fn cube_sections_run_to_the_end(seed in any::<u64>(), width in 320.0f32..2000.0) {
        // Level 2 returns to cube mode before the end, so every late slot is filled
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let viewport = Viewport::new(width, 720.0);
        let layout = generate(2, LevelStyle::Portal, viewport, &tuning, &mut rng);

        let last = layout.obstacles.iter().map(|o| o.rect.x).fold(f32::MIN, f32::max);
        prop_assert!(last >= layout.length - tuning.generator.max_step());
    }

    #[test]
    fn ship_velocity_stays_clamped(
        inputs in proptest::collection::vec((any::<bool>(), 0.0f32..6.0), 1..200),
        start_velocity in -50.0f32..50.0,
    ) {
        let mut state = SimulationState::new(Viewport::default(), Tuning::default());
        state.start_level(1, LevelLayout::empty(1.0e9));
        state.player.enter_mode(Mode::Ship, colors::SHIP);
        state.player.velocity_y = start_velocity;

        for (held, tf) in inputs {
            step(&mut state, tf, held);
            let v = state.player.velocity_y;
            prop_assert!((SHIP_MIN_VELOCITY..=SHIP_MAX_VELOCITY).contains(&v));
            prop_assert!(state.player.y >= 0.0 && state.player.y <= state.viewport.ship_floor());
        }
    }

    #[test]
    fn distance_never_decreases(tfs in proptest::collection::vec(prop_oneof![
        Just(f32::NAN),
        Just(f32::INFINITY),
        -5.0f32..5.0,
    ], 1..100)) {
        let mut state = SimulationState::new(Viewport::default(), Tuning::default());
        state.start_level(1, LevelLayout::empty(1.0e9));
        let mut last = state.distance;
        for tf in tfs {
            step(&mut state, tf, false);
            prop_assert!(state.distance >= last);
            prop_assert!(state.distance.is_finite());
            prop_assert!(state.player.y.is_finite() && state.player.velocity_y.is_finite());
            last = state.distance;
        }
    }

    #[test]
    fn airborne_jump_is_ignored(frames in 1usize..30) {
        let mut state = SimulationState::new(Viewport::default(), Tuning::default());
        state.start_level(1, LevelLayout::empty(1.0e9));
        prop_assert!(state.press_start());
        for _ in 0..frames {
            step(&mut state, 1.0, true);
        }
        let before = (state.player.velocity_y, state.player.y);
        prop_assume!(state.player.jumping);
        prop_assert!(!state.press_start());
        prop_assert_eq!((state.player.velocity_y, state.player.y), before);
    }
}
