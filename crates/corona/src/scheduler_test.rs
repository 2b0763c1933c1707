use std::f64::consts::TAU;

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::config::{Range, SchedulerConfig};
use crate::scheduler::{Burst, EventScheduler, SolarActivity};

fn unit_clock() -> SchedulerConfig {
    SchedulerConfig {
        clock_step: 1.0,
        ..SchedulerConfig::default()
    }
}

fn run_until_burst(scheduler: &mut EventScheduler, rng: &mut ChaChaRng, limit: u32) -> Option<(u32, Vec<Burst>)> {
    (1..=limit).find_map(|tick| {
        let bursts = scheduler.tick(1, rng);
        (!bursts.is_empty()).then_some((tick, bursts))
    })
}

#[test]
fn test_initial_timers_fall_in_configured_ranges() {
    let config = SchedulerConfig::default();
    for seed in 0..50 {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let scheduler = EventScheduler::new(config, &mut rng);
        let activity = scheduler.activity();

        assert!(config.initial_flare_delay.contains(activity.next_flare_time));
        assert!(config.initial_cme_delay.contains(activity.next_cme_time));
        assert_eq!(activity.flare_intensity, 0.0);
        assert!(!activity.cme_active);
        assert_eq!(scheduler.clock(), 0.0);
    }
}

#[test]
fn test_flare_fires_when_clock_reaches_timer() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut scheduler = EventScheduler::with_activity(unit_clock(), SolarActivity::quiet(5.0, f64::INFINITY));

    for _ in 0..4 {
        assert!(scheduler.tick(1, &mut rng).is_empty());
    }

    let bursts = scheduler.tick(1, &mut rng);
    assert_eq!(bursts.len(), 1);
    match bursts[0] {
        Burst::Flare {
            direction,
            spread,
            count,
            jitter,
        } => {
            assert!((0.0..TAU).contains(&direction));
            assert_relative_eq!(spread, 0.5);
            assert_eq!(count, 15);
            assert_relative_eq!(jitter, 30.0);
        }
        other => panic!("expected a flare, got {:?}", other),
    }

    let activity = scheduler.activity();
    assert_relative_eq!(activity.flare_intensity, 1.0);
    assert!(activity.next_flare_time >= 5.0 + 2_000.0);
    assert!(activity.next_flare_time <= 5.0 + 5_000.0);
}

#[test]
fn test_flare_waits_for_previous_to_fade() {
    let config = SchedulerConfig {
        flare_interval: Range::new(1.0, 1.0),
        ..unit_clock()
    };
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut scheduler = EventScheduler::with_activity(config, SolarActivity::quiet(1.0, f64::INFINITY));

    let (first, _) = run_until_burst(&mut scheduler, &mut rng, 10).expect("first flare");
    assert_eq!(first, 1);

    // The timer is due on the very next tick, but intensity needs 50 ticks at 0.02
    let (gap, bursts) = run_until_burst(&mut scheduler, &mut rng, 100).expect("second flare");
    assert_eq!(gap, 50);
    assert!(matches!(bursts[0], Burst::Flare { .. }));
}

#[test]
fn test_flare_intensity_decays_to_exact_zero() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut scheduler = EventScheduler::with_activity(unit_clock(), SolarActivity::quiet(1.0, f64::INFINITY));
    scheduler.tick(1, &mut rng);

    scheduler.tick(25, &mut rng);
    assert_relative_eq!(scheduler.activity().flare_intensity, 0.5, epsilon = 1e-9);

    scheduler.tick(25, &mut rng);
    assert_eq!(scheduler.activity().flare_intensity, 0.0);
    assert!(!scheduler.activity().flare_decaying());
}

#[test]
fn test_cme_fires_full_burst_and_reschedules() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut scheduler = EventScheduler::with_activity(unit_clock(), SolarActivity::quiet(f64::INFINITY, 10.0));

    let (tick, bursts) = run_until_burst(&mut scheduler, &mut rng, 20).expect("CME");
    assert_eq!(tick, 10);
    assert_eq!(bursts, vec![Burst::CoronalMassEjection { count: 80, jitter: 60.0 }]);
    assert_eq!(bursts[0].count(), 80);

    let activity = scheduler.activity();
    let clock = scheduler.clock();
    assert!(activity.cme_active);
    assert_relative_eq!(activity.cme_intensity, 1.0);
    assert!(activity.next_cme_time >= clock + 10_000.0);
    assert!(activity.next_cme_time <= clock + 25_000.0);
}

#[test]
fn test_cme_clears_after_125_ticks() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut scheduler = EventScheduler::with_activity(unit_clock(), SolarActivity::quiet(f64::INFINITY, 1.0));
    scheduler.tick(1, &mut rng);
    assert!(scheduler.activity().cme_active);

    scheduler.tick(124, &mut rng);
    let activity = scheduler.activity();
    assert!(activity.cme_active);
    assert_relative_eq!(activity.cme_intensity, 0.008, epsilon = 1e-9);

    scheduler.tick(1, &mut rng);
    let activity = scheduler.activity();
    assert!(!activity.cme_active);
    assert_eq!(activity.cme_intensity, 0.0);
}

#[test]
fn test_no_second_cme_while_active() {
    let config = SchedulerConfig {
        cme_interval: Range::new(1.0, 1.0),
        ..unit_clock()
    };
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut scheduler = EventScheduler::with_activity(config, SolarActivity::quiet(f64::INFINITY, 1.0));

    let (first, _) = run_until_burst(&mut scheduler, &mut rng, 5).expect("first CME");
    assert_eq!(first, 1);
    let (gap, _) = run_until_burst(&mut scheduler, &mut rng, 500).expect("second CME");
    assert_eq!(gap, 125);
}

#[test]
fn test_flare_and_cme_can_share_a_tick() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut scheduler = EventScheduler::with_activity(unit_clock(), SolarActivity::quiet(3.0, 3.0));

    let (tick, bursts) = run_until_burst(&mut scheduler, &mut rng, 5).expect("bursts");
    assert_eq!(tick, 3);
    assert_eq!(bursts.len(), 2);
    assert!(matches!(bursts[0], Burst::Flare { .. }));
    assert!(matches!(bursts[1], Burst::CoronalMassEjection { .. }));
}

#[test]
fn test_zero_delta_changes_nothing() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut scheduler = EventScheduler::with_activity(unit_clock(), SolarActivity::quiet(0.0, 0.0));
    let before = *scheduler.activity();

    assert!(scheduler.tick(0, &mut rng).is_empty());
    assert_eq!(*scheduler.activity(), before);
    assert_eq!(scheduler.clock(), 0.0);
}

#[test]
fn test_multi_tick_delta_matches_single_steps() {
    let config = SchedulerConfig::default();
    let mut rng_a = ChaChaRng::seed_from_u64(9);
    let mut rng_b = ChaChaRng::seed_from_u64(9);
    let mut a = EventScheduler::new(config, &mut rng_a);
    let mut b = EventScheduler::new(config, &mut rng_b);

    let batched = a.tick(2_000, &mut rng_a);
    let stepped: Vec<Burst> = (0..2_000).flat_map(|_| b.tick(1, &mut rng_b)).collect();

    assert!(!batched.is_empty());
    assert_eq!(batched, stepped);
    assert_eq!(a.activity(), b.activity());
    assert_relative_eq!(a.clock(), 32_000.0);
}

#[test]
fn test_intensities_stay_in_unit_interval() {
    let mut rng = ChaChaRng::seed_from_u64(1234);
    let mut scheduler = EventScheduler::new(SchedulerConfig::default(), &mut rng);

    for _ in 0..10_000 {
        scheduler.tick(1, &mut rng);
        let activity = scheduler.activity();
        assert!((0.0..=1.0).contains(&activity.flare_intensity));
        assert!((0.0..=1.0).contains(&activity.cme_intensity));
        if !activity.cme_active {
            assert_eq!(activity.cme_intensity, 0.0);
        }
    }
}
