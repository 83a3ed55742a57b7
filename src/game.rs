use crate::config::GameConfig;
use crate::export;
use crate::target::{BoxColor, Target};
use crate::timer::Clock;
use rand::Rng;
use std::path::Path;

/// One recorded click-response measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub color: BoxColor,
    pub x: u32,
    pub y: u32,
    pub response_ms: u64,
}

/// Owns all session state: the in-progress flag, the single live
/// target, the trial log and the pending respawn deadline.
///
/// Generic over the clock and the RNG so tests can drive time manually
/// and seed target generation. Sessions run Idle -> Running -> Idle;
/// inside Running the target alternates visible/absent around the
/// configured inter-round delay.
pub struct GameController<C: Clock, R: Rng> {
    clock: C,
    rng: R,
    config: GameConfig,
    viewport: (u32, u32),
    in_progress: bool,
    target: Option<Target>,
    trials: Vec<TrialRecord>,
    respawn_at_ns: Option<u64>,
}

impl<C: Clock, R: Rng> GameController<C, R> {
    pub fn new(config: GameConfig, clock: C, rng: R) -> Self {
        Self {
            clock,
            rng,
            config,
            viewport: (0, 0),
            in_progress: false,
            target: None,
            trials: Vec::new(),
            respawn_at_ns: None,
        }
    }

    /// Starts a session and spawns the first target. Ignored if a
    /// session is already running.
    pub fn start(&mut self) {
        if self.in_progress {
            return;
        }
        self.in_progress = true;
        self.respawn_at_ns = None;
        self.spawn_target();
        println!("Session started");
    }

    /// Stops the session, exports the trial log if configured, and
    /// clears it. Ignored while idle.
    pub fn stop(&mut self) {
        if !self.in_progress {
            return;
        }
        self.in_progress = false;
        self.target = None;
        // The respawn deadline is left armed on purpose: poll() gates
        // on in_progress at expiry, so the pending round never fires.

        if self.config.export_results {
            match export::write_results(Path::new("."), &self.trials) {
                Ok(path) => println!("Results saved to {}", path.display()),
                Err(e) => eprintln!("Failed to export results: {}", e),
            }
        }
        println!("Session stopped after {} trial(s)", self.trials.len());
        self.trials.clear();
    }

    /// Handles a click at physical pixel coordinates. Clicks while
    /// idle, with no target visible, or outside the target bounds are
    /// ignored.
    pub fn handle_click(&mut self, x: u32, y: u32) {
        if !self.in_progress {
            return;
        }
        let Some(target) = &self.target else {
            return;
        };
        if !target.contains(x, y) {
            return;
        }

        let now_ns = self.clock.now();
        let response_ms = now_ns.saturating_sub(target.spawned_ns) / 1_000_000;
        let record = TrialRecord {
            color: target.color,
            x: target.x,
            y: target.y,
            response_ms,
        };
        println!(
            "Trial {}: {} at ({}, {}), response {} ms",
            self.trials.len() + 1,
            record.color.name(),
            record.x,
            record.y,
            record.response_ms
        );
        self.trials.push(record);
        self.target = None;
        self.respawn_at_ns = Some(now_ns + self.config.delay_ms * 1_000_000);
    }

    /// Called once per frame: spawns the next target when the
    /// inter-round delay has elapsed. The in-progress check happens
    /// here, at expiry, so a stop during the delay wins the race.
    pub fn poll(&mut self) {
        if !self.in_progress {
            return;
        }
        if let Some(deadline_ns) = self.respawn_at_ns {
            if self.clock.now() >= deadline_ns {
                self.respawn_at_ns = None;
                self.spawn_target();
            }
        }
    }

    fn spawn_target(&mut self) {
        let (vw, vh) = self.viewport;
        // Degenerate viewports collapse the spawn range to x = y = 0.
        let x_bound = vw.saturating_sub(self.config.width).max(1);
        let y_bound = vh.saturating_sub(self.config.height).max(1);

        let target = Target {
            color: BoxColor::random(&mut self.rng),
            x: self.rng.random_range(0..x_bound),
            y: self.rng.random_range(0..y_bound),
            width: self.config.width,
            height: self.config.height,
            spawned_ns: self.clock.now(),
        };
        self.target = Some(target);
    }

    /// Updates the spawn bounds when the window size changes.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn is_running(&self) -> bool {
        self.in_progress
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::testing::ManualClock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn controller(
        export_results: bool,
    ) -> (GameController<ManualClock, StdRng>, ManualClock) {
        let config = GameConfig {
            width: 100,
            height: 100,
            delay_ms: 500,
            export_results,
        };
        let clock = ManualClock::new();
        let mut game = GameController::new(config, clock.clone(), StdRng::seed_from_u64(7));
        game.set_viewport(800, 600);
        (game, clock)
    }

    fn click_current_target(game: &mut GameController<ManualClock, StdRng>) {
        let (x, y) = {
            let target = game.target().expect("target should be visible");
            (target.x, target.y)
        };
        game.handle_click(x, y);
    }

    #[test]
    fn start_spawns_exactly_one_target() {
        let (mut game, _clock) = controller(false);
        assert!(game.target().is_none());
        game.start();
        assert!(game.is_running());
        assert!(game.target().is_some());
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (mut game, clock) = controller(false);
        game.start();
        clock.advance_ms(100);
        let first = game.target().unwrap().clone();
        game.start();
        let second = game.target().unwrap();
        assert_eq!(second.spawned_ns, first.spawned_ns);
        assert_eq!((second.x, second.y), (first.x, first.y));
    }

    #[test]
    fn stop_while_idle_is_ignored() {
        let (mut game, _clock) = controller(false);
        game.stop();
        assert!(!game.is_running());
        assert!(game.trials().is_empty());
    }

    #[test]
    fn response_time_matches_clock_delta() {
        let (mut game, clock) = controller(false);
        game.start();
        clock.advance_ms(200);
        click_current_target(&mut game);
        assert_eq!(game.trials().len(), 1);
        assert_eq!(game.trials()[0].response_ms, 200);
        assert!(game.target().is_none());
    }

    #[test]
    fn click_outside_target_records_nothing() {
        let (mut game, clock) = controller(false);
        game.start();
        clock.advance_ms(50);
        let target = game.target().unwrap().clone();
        game.handle_click(target.x + target.width, target.y + target.height);
        assert!(game.trials().is_empty());
        assert!(game.target().is_some());
    }

    #[test]
    fn click_while_idle_records_nothing() {
        let (mut game, _clock) = controller(false);
        game.handle_click(10, 10);
        assert!(game.trials().is_empty());
    }

    #[test]
    fn next_target_appears_only_after_delay() {
        let (mut game, clock) = controller(false);
        game.start();
        click_current_target(&mut game);
        assert!(game.target().is_none());

        clock.advance_ms(499);
        game.poll();
        assert!(game.target().is_none());

        clock.advance_ms(1);
        game.poll();
        assert!(game.target().is_some());
    }

    #[test]
    fn stop_during_delay_blocks_respawn() {
        let (mut game, clock) = controller(false);
        game.start();
        click_current_target(&mut game);
        game.stop();

        clock.advance_ms(600);
        game.poll();
        assert!(game.target().is_none());
        assert!(!game.is_running());
    }

    #[test]
    fn restart_after_stop_begins_fresh_session() {
        let (mut game, clock) = controller(false);
        game.start();
        clock.advance_ms(100);
        click_current_target(&mut game);
        game.stop();

        game.start();
        assert!(game.is_running());
        assert!(game.target().is_some());
        assert!(game.trials().is_empty());
    }

    #[test]
    fn spawn_positions_stay_inside_viewport_bounds() {
        let (mut game, clock) = controller(false);
        game.set_viewport(150, 120);
        for _ in 0..200 {
            game.start();
            let target = game.target().unwrap();
            assert!(target.x < 50, "x = {}", target.x);
            assert!(target.y < 20, "y = {}", target.y);
            clock.advance_ms(10);
            game.stop();
        }
    }

    #[test]
    fn viewport_smaller_than_target_pins_spawn_to_origin() {
        let (mut game, _clock) = controller(false);
        game.set_viewport(50, 50);
        game.start();
        let target = game.target().unwrap();
        assert_eq!((target.x, target.y), (0, 0));
    }

    #[test]
    fn stop_clears_trial_log_and_csv_counts_rows() {
        let (mut game, clock) = controller(false);
        game.start();
        clock.advance_ms(150);
        click_current_target(&mut game);
        clock.advance_ms(500);
        game.poll();
        clock.advance_ms(220);
        click_current_target(&mut game);

        assert_eq!(game.trials().len(), 2);
        let csv = export::to_csv(game.trials());
        assert_eq!(csv.lines().count(), 3);

        game.stop();
        assert!(game.trials().is_empty());
    }
}
