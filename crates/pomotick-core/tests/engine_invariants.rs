//! Property tests for the timer engine invariants.
//!
//! Drives the engine through arbitrary command/tick sequences and checks
//! that the countdown and cycle-counter invariants hold in every reachable
//! state.

use proptest::prelude::*;

use pomotick_core::{Phase, Settings, TimerEngine};

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Reset,
    SetPhase(Phase),
    ApplySettings(Settings),
    Tick,
}

fn phase_strategy() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::Work),
        Just(Phase::ShortBreak),
        Just(Phase::LongBreak),
    ]
}

fn settings_strategy() -> impl Strategy<Value = Settings> {
    // Includes zero values on purpose; sanitization must absorb them.
    (0u32..4, 0u32..4, 0u32..4, 0u32..6, any::<bool>()).prop_map(
        |(work, short, long, cycles, auto)| Settings {
            work_minutes: work,
            short_break_minutes: short,
            long_break_minutes: long,
            cycles_before_long_break: cycles,
            sound_enabled: true,
            notifications_enabled: true,
            auto_start_enabled: auto,
        },
    )
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Start),
        1 => Just(Op::Pause),
        1 => Just(Op::Reset),
        1 => phase_strategy().prop_map(Op::SetPhase),
        1 => settings_strategy().prop_map(Op::ApplySettings),
        // Ticks dominate so countdowns actually run out.
        16 => Just(Op::Tick),
    ]
}

fn apply(engine: &mut TimerEngine, op: Op) {
    match op {
        Op::Start => {
            engine.start();
        }
        Op::Pause => engine.pause(),
        Op::Reset => engine.reset(),
        Op::SetPhase(phase) => engine.set_phase(phase),
        Op::ApplySettings(settings) => engine.apply_settings(settings),
        Op::Tick => {
            engine.tick();
        }
    }
}

proptest! {
    #[test]
    fn countdown_invariant_holds_under_any_op_sequence(
        ops in proptest::collection::vec(op_strategy(), 1..400)
    ) {
        let mut engine = TimerEngine::new(Settings {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            cycles_before_long_break: 2,
            ..Settings::default()
        });
        for op in ops {
            apply(&mut engine, op);
            prop_assert!(engine.remaining_seconds() <= engine.total_seconds());
            prop_assert!(engine.total_seconds() > 0);
        }
    }

    #[test]
    fn cycle_counter_stays_below_threshold(
        ops in proptest::collection::vec(op_strategy(), 1..400)
    ) {
        let mut engine = TimerEngine::new(Settings {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            cycles_before_long_break: 3,
            ..Settings::default()
        });
        for op in ops {
            apply(&mut engine, op);
            prop_assert!(
                engine.cycles_since_long_break()
                    < engine.settings().cycles_before_long_break
            );
        }
    }

    #[test]
    fn every_nth_work_completion_is_followed_by_a_long_break(
        cycles in 1u32..6
    ) {
        let mut engine = TimerEngine::new(Settings {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            cycles_before_long_break: cycles,
            auto_start_enabled: true,
            ..Settings::default()
        });
        engine.start();

        let mut work_completions = 0u32;
        let mut long_breaks_entered = 0u32;
        // Two full rounds of the cycle.
        for _ in 0..(2 * cycles * 2 * 60 + 4 * 60) {
            let before = engine.phase();
            engine.tick();
            if before == Phase::Work && engine.phase() != Phase::Work {
                work_completions += 1;
                if engine.phase() == Phase::LongBreak {
                    long_breaks_entered += 1;
                    prop_assert_eq!(engine.cycles_since_long_break(), 0);
                }
            }
        }
        prop_assert_eq!(long_breaks_entered, work_completions / cycles);
    }
}
