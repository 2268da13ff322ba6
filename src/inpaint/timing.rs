use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// Wall-clock durations of the phases of one inpainting run.
#[derive(Debug, Default)]
pub struct InpaintTimings {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, Duration>,
}

impl InpaintTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        *self.step_map.entry(name.clone()).or_insert(Duration::ZERO) += duration;
        self.steps.push(StepTiming { name, duration });
    }

    pub fn record(&mut self, timer: Timer) {
        let (name, duration) = timer.stop();
        self.add_step(name, duration);
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).copied()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        for step in &self.steps {
            info!(
                step = %step.name,
                ms = step.duration.as_secs_f64() * 1000.0,
                "Inpaint phase"
            );
        }
    }

    /// Prints one line per distinct phase, repeated phases merged, in first-run order.
    pub fn print_summary(&self) {
        let total_ms = self.total_duration().as_secs_f64() * 1000.0;
        let mut seen: Vec<&str> = Vec::new();

        println!("\n{:<24} {:>6} {:>12} {:>7}", "phase", "runs", "ms", "share");
        for step in &self.steps {
            if seen.contains(&step.name.as_str()) {
                continue;
            }
            seen.push(&step.name);

            let runs = self.steps.iter().filter(|s| s.name == step.name).count();
            let ms = self.get_step(&step.name).unwrap_or_default().as_secs_f64() * 1000.0;
            let share = if total_ms > 0.0 { ms / total_ms * 100.0 } else { 0.0 };
            println!("{:<24} {:>6} {:>12.3} {:>6.1}%", step.name, runs, ms, share);
        }
        println!("{:<24} {:>6} {:>12.3}", "total", self.steps.len(), total_ms);
    }
}

/// Measures one named phase; hand it to [`InpaintTimings::record`] when done.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn stop(self) -> (String, Duration) {
        let elapsed = self.elapsed();
        (self.name, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_steps_accumulate() {
        let mut timings = InpaintTimings::new();
        timings.add_step("level_1", Duration::from_millis(3));
        timings.add_step("level_1", Duration::from_millis(4));
        timings.add_step("build_pyramid", Duration::from_millis(1));

        assert_eq!(timings.steps().len(), 3);
        assert_eq!(timings.get_step("level_1"), Some(Duration::from_millis(7)));
        assert_eq!(timings.total_duration(), Duration::from_millis(8));
        assert_eq!(timings.get_step("missing"), None);
    }
}
