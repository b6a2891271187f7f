use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use stellar_guardian::compute::{init_state, spawn_interval, tick, InputState};
use stellar_guardian::consts::*;

proptest! {
    /// The ship never leaves the canvas, whatever the input stream does,
    /// including holding both directions at once.
    #[test]
    fn player_never_leaves_the_canvas(
        seed in any::<u64>(),
        inputs in prop::collection::vec(any::<(bool, bool, bool)>(), 1..200),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = init_state();
        for (left, right, fire) in inputs {
            state = tick(&state, &InputState { left, right, fire }, &mut rng);
            prop_assert!(state.player.pos.x >= 0.0);
            prop_assert!(state.player.pos.x <= CANVAS_WIDTH - PLAYER_WIDTH);
        }
    }

    /// Score only ever grows, and the wave tracks it without slipping.
    #[test]
    fn score_and_wave_are_monotonic(seed in any::<u64>(), ticks in 1usize..300) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = init_state();
        let held_fire = InputState { left: false, right: false, fire: true };
        let mut prev_score = state.score;
        let mut prev_wave = state.wave;
        for _ in 0..ticks {
            state = tick(&state, &held_fire, &mut rng);
            prop_assert!(state.score >= prev_score);
            prop_assert!(state.wave >= prev_wave);
            prop_assert_eq!(state.wave, state.score / WAVE_SCORE_STEP + 1);
            prev_score = state.score;
            prev_wave = state.wave;
        }
    }

    /// The spawn interval stays pinned between its floor and its base.
    #[test]
    fn spawn_interval_stays_in_range(score in any::<u32>()) {
        let interval = spawn_interval(score);
        prop_assert!(interval >= SPAWN_INTERVAL_MIN);
        prop_assert!(interval <= SPAWN_INTERVAL_BASE);
    }
}
