//! Statistical checks on the simulation draws.

use chrono::Utc;
use std::collections::HashMap;

use opsfeed_core::constants::simulation::SEVERITY_WEIGHTS;
use opsfeed_core::models::AlertSeverity;
use opsfeed_core::simulation::{draw_metric, draw_severity, draw_task, StdRandom};
use opsfeed_core::state_machine::TaskStatus;

const DRAWS: usize = 10_000;
const TOLERANCE: f64 = 0.03;

#[test]
fn test_severity_frequencies_follow_weights() {
    let mut rng = StdRandom::seeded(2024);
    let mut counts: HashMap<AlertSeverity, usize> = HashMap::new();

    for _ in 0..DRAWS {
        *counts.entry(draw_severity(&mut rng, &SEVERITY_WEIGHTS)).or_default() += 1;
    }

    let expected = [
        (AlertSeverity::Low, 0.40),
        (AlertSeverity::Medium, 0.30),
        (AlertSeverity::High, 0.20),
        (AlertSeverity::Critical, 0.10),
    ];
    for (severity, share) in expected {
        let observed = counts.get(&severity).copied().unwrap_or(0) as f64 / DRAWS as f64;
        assert!(
            (observed - share).abs() < TOLERANCE,
            "{severity}: observed {observed:.3}, expected {share:.2}"
        );
    }
}

#[test]
fn test_task_statuses_are_uniform() {
    let mut rng = StdRandom::seeded(31);
    let now = Utc::now();
    let mut counts: HashMap<TaskStatus, usize> = HashMap::new();

    for _ in 0..DRAWS {
        *counts.entry(draw_task(&mut rng, now).status).or_default() += 1;
    }

    for status in TaskStatus::ALL {
        let observed = counts.get(&status).copied().unwrap_or(0) as f64 / DRAWS as f64;
        assert!(
            (observed - 0.25).abs() < TOLERANCE,
            "{status}: observed {observed:.3}"
        );
    }
}

#[test]
fn test_metric_cpu_mean_is_centered() {
    let mut rng = StdRandom::seeded(77);
    let now = Utc::now();
    let mean = (0..DRAWS)
        .map(|_| draw_metric(&mut rng, now).cpu_usage)
        .sum::<f64>()
        / DRAWS as f64;

    // Uniform over [20, 80)
    assert!((mean - 50.0).abs() < 1.5, "mean cpu {mean:.2}");
}
