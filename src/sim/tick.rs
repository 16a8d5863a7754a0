//! Session tick
//!
//! The host calls [`Session::tick`] once per frame. A step runs when the
//! accumulated time reaches the current step interval; a step in `Running`
//! moves food, then the snake, then applies field effects, advances shots,
//! resolves collisions and finally consumption.

use super::autopilot::steer;
use super::effects::{Activation, EffectKind};
use super::food::{FoodKind, Rainbow};
use super::grid::Direction;
use super::intro::hue_tag;
use super::state::{GameEvent, Session, SessionStatus, Snapshot};
use crate::consts::*;
use crate::report::ScoreSubmission;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Direction intent as pressed; inversion is applied on the step
    pub direction: Option<Direction>,
    /// Fire the laser
    pub shoot: bool,
    /// Host is not visible
    pub hidden: bool,
    /// Let the autopilot steer
    pub autopilot: bool,
}

impl Session {
    /// Advance by `elapsed_ms` of host time and return the new view
    pub fn tick(&mut self, elapsed_ms: u64, input: &TickInput) -> Snapshot {
        self.events.clear();

        match self.status {
            SessionStatus::Stopped => return self.snapshot(),
            SessionStatus::GameOver => {
                // The final frame has been shown
                self.status = SessionStatus::Stopped;
                log::info!("Session stopped");
                return self.snapshot();
            }
            SessionStatus::Paused => {
                if !input.hidden {
                    self.status = SessionStatus::Running;
                    self.accumulator_ms = 0;
                    log::info!("Session resumed");
                }
                return self.snapshot();
            }
            SessionStatus::Running if input.hidden => {
                self.status = SessionStatus::Paused;
                log::info!("Session paused");
                return self.snapshot();
            }
            SessionStatus::Running | SessionStatus::Intro => {}
        }

        if let Some(dir) = input.direction {
            self.pending_direction = Some(dir);
        }
        if input.shoot {
            self.shoot();
        }

        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        if self.accumulator_ms >= self.current_tick_ms() {
            self.accumulator_ms = 0;
            if input.autopilot && self.status == SessionStatus::Running {
                let inverted = self.effects.controls_inverted(self.clock.now_ms());
                if let Some(dir) = steer(&self.snake, self.food.pos, self.grid, inverted) {
                    self.pending_direction = Some(dir);
                }
            }
            self.step();
        }

        self.snapshot()
    }

    /// One simulation step regardless of timing
    pub fn step(&mut self) {
        let now = self.clock.now_ms();
        match self.status {
            SessionStatus::Intro => self.step_intro(now),
            SessionStatus::Running => self.step_running(now),
            SessionStatus::Paused | SessionStatus::GameOver | SessionStatus::Stopped => return,
        }
        self.steps += 1;
    }

    fn step_intro(&mut self, now: u64) {
        let next = self.intro.next_cell();
        self.snake.push_head(next, self.intro.target_len());
        self.snake.retag(|i| Some(hue_tag(i, now)));
    }

    fn step_running(&mut self, now: u64) {
        self.snake.decay_emphasis();
        if let Some(dir) = self.pending_direction.take() {
            let dir = if self.effects.controls_inverted(now) {
                dir.opposite()
            } else {
                dir
            };
            self.snake.change_direction(dir);
        }

        let snake = &self.snake;
        self.food
            .tick_move(&self.spawn_rules, |c| snake.occupies(c), &mut self.rng, now);

        self.snake.advance();

        let field = self
            .effects
            .on_tick(now, self.snake.head(), self.food.pos, self.grid);
        self.food.pos = field.food;
        if field.teleported {
            log::debug!("Head teleported to ({}, {})", field.head.x, field.head.y);
            self.snake.set_head(field.head);
        }

        self.projectiles.advance(self.food.pos.center(), self.grid);

        if !self.resolve_collision(now) {
            return;
        }

        if self.snake.head() == self.food.pos {
            self.consume(now, true);
        } else if field.auto_consume {
            log::debug!("Turret took food at ({}, {})", self.food.pos.x, self.food.pos.y);
            self.consume(now, true);
        }
    }

    /// Returns false when the collision ended the run
    fn resolve_collision(&mut self, now: u64) -> bool {
        let head = self.snake.head();
        let off_board = !self.grid.contains(head);
        if !off_board && (self.effects.is_ghost(now) || !self.snake.hits_self()) {
            return true;
        }

        if self.effects.is_active(EffectKind::Sprint, now) {
            log::debug!("Collision ignored during sprint");
        } else if self.effects.consume_shield(now) {
            log::info!("Shield absorbed a collision");
            self.events.push(GameEvent::ShieldAbsorbed);
        } else {
            self.enter_game_over();
            return false;
        }

        if off_board {
            self.snake.set_head(self.grid.wrap(head));
        }
        true
    }

    /// Score the current food; `grow` unless a laser shot took it
    fn consume(&mut self, now: u64, grow: bool) {
        let kind = self.food.kind;
        let points = self.effects.score_multiplier(now);
        self.score += points;
        if grow {
            self.snake.grow(Some(kind.segment_tag()));
        }
        self.events.push(GameEvent::FoodEaten { kind, points });
        self.apply_food(kind, now);

        if self.snake.len() >= self.grid.cells() {
            self.won = true;
            self.enter_game_over();
            return;
        }

        let snake = &self.snake;
        self.food
            .respawn(&self.spawn_rules, |c| snake.occupies(c), &mut self.rng, now);
    }

    fn apply_food(&mut self, kind: FoodKind, now: u64) {
        match kind {
            FoodKind::Plain(Rainbow::Red) => self.speed_factor *= RED_SPEED,
            FoodKind::Plain(Rainbow::Green) => self.speed_factor *= GREEN_SPEED,
            FoodKind::Plain(Rainbow::Yellow) => self.effects.charge_laser(),
            FoodKind::Plain(Rainbow::Violet) => {
                self.effects.discharge_laser();
            }
            FoodKind::Plain(Rainbow::Orange | Rainbow::Blue) => {}
            FoodKind::PowerUp(power_up) => {
                let activation =
                    self.effects
                        .apply_power_up(power_up, now, self.grid, &mut self.rng);
                if let Activation::Bonus(bonus) = activation {
                    self.score += bonus;
                }
                log::info!("Power-up {:?} activated: {:?}", power_up, activation);
                self.events.push(GameEvent::PowerUpActivated { power_up });
            }
        }
    }

    /// Fire the laser along the heading
    ///
    /// Needs a charge, which the shot spends. The food is taken at once if it
    /// lies ahead in the head's row or column; the projectile is only drawn.
    pub fn shoot(&mut self) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        if !self.effects.discharge_laser() {
            log::debug!("Shot ignored: laser not charged");
            return false;
        }

        let now = self.clock.now_ms();
        let head = self.snake.head();
        let dir = self.snake.direction();
        self.projectiles.spawn(head.center(), dir.as_vec2());

        let food = self.food.pos;
        let hit = match dir {
            Direction::Right => head.y == food.y && food.x > head.x,
            Direction::Left => head.y == food.y && food.x < head.x,
            Direction::Up => head.x == food.x && food.y < head.y,
            Direction::Down => head.x == food.x && food.y > head.y,
        };
        self.events.push(GameEvent::ShotFired { hit });
        if hit {
            self.consume(now, false);
        }
        hit
    }

    fn enter_game_over(&mut self) {
        self.status = SessionStatus::GameOver;
        self.pending_direction = None;
        log::info!(
            "Game over after {} steps: score {}{}",
            self.steps,
            self.score,
            if self.won { " (board filled)" } else { "" }
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            won: self.won,
        });
        self.report_score();
    }

    /// Submit the final score, at most once per run
    fn report_score(&mut self) {
        if self.score_reported {
            return;
        }
        self.score_reported = true;

        let Some(reporter) = self.reporter.as_mut() else {
            log::debug!("No score reporter attached");
            return;
        };
        let Some(init_data) = self.settings.init_data.clone() else {
            log::warn!("No init data, score {} not submitted", self.score);
            return;
        };
        let submission = ScoreSubmission {
            score: self.score,
            init_data,
        };
        if let Err(err) = reporter.submit(&submission) {
            log::warn!("Score submission failed: {}", err);
        }
    }

    /// Leave the intro and start a run on a fresh board
    pub fn begin(&mut self) {
        if self.status != SessionStatus::Intro {
            log::debug!("begin() ignored in {:?}", self.status);
            return;
        }
        self.rebuild_board();
        self.status = SessionStatus::Running;
        log::info!("Run started");
    }

    /// Start over on a fresh board; ignored while a run is active
    pub fn reset(&mut self) {
        if self.status == SessionStatus::Running {
            log::debug!("reset() ignored while running");
            return;
        }
        self.rebuild_board();
        self.status = SessionStatus::Running;
        log::info!("Run restarted");
    }

    /// End the run now; does nothing unless running
    pub fn force_game_over(&mut self) {
        if self.status == SessionStatus::Running {
            self.enter_game_over();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::report::{Leaderboard, LeaderboardEntry, RecordingReporter};
    use crate::settings::Settings;
    use crate::sim::food::{Food, PowerUp};
    use crate::sim::grid::Coord;
    use crate::sim::snake::{SegmentTag, Snake};

    fn settings(seed: u64) -> Settings {
        Settings {
            init_data: Some("init".into()),
            ..Settings::deterministic(seed)
        }
    }

    fn session_with(settings: Settings) -> (Session, ManualClock, RecordingReporter) {
        let clock = ManualClock::new(0);
        let reporter = RecordingReporter::new();
        let session = Session::new(settings, Box::new(clock.clone()))
            .unwrap()
            .with_reporter(Box::new(reporter.clone()));
        (session, clock, reporter)
    }

    fn running() -> (Session, ManualClock, RecordingReporter) {
        let (mut session, clock, reporter) = session_with(settings(7));
        session.begin();
        // Keep food out of the way unless a test places it
        session.food = Food::placed(Coord::new(10, 2), FoodKind::Plain(Rainbow::Orange));
        (session, clock, reporter)
    }

    fn step_with(session: &mut Session, clock: &ManualClock, input: TickInput) -> Snapshot {
        let ms = session.current_tick_ms();
        clock.advance(ms);
        session.tick(ms, &input)
    }

    fn step(session: &mut Session, clock: &ManualClock) -> Snapshot {
        step_with(session, clock, TickInput::default())
    }

    fn at_right_wall() -> Snake {
        Snake::from_cells(
            [
                Coord::new(15, 8),
                Coord::new(14, 8),
                Coord::new(13, 8),
                Coord::new(12, 8),
            ],
            Direction::Right,
        )
    }

    #[test]
    fn test_eat_food_one_cell_ahead() {
        let (mut session, clock, _) = running();
        session.food = Food::placed(Coord::new(4, 8), FoodKind::Plain(Rainbow::Red));

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::Running);
        assert_eq!(snap.score, 1);
        assert_eq!(snap.segments.len(), 5);
        assert!(!session.snake().occupies(snap.food.pos));
        assert_eq!(
            snap.segments.last().and_then(|s| s.tag),
            Some(SegmentTag::Color(Rainbow::Red))
        );
        assert!(snap.events.contains(&GameEvent::FoodEaten {
            kind: FoodKind::Plain(Rainbow::Red),
            points: 1,
        }));
        // Red food speeds the snake up for good
        assert_eq!(snap.tick_ms, 137);
    }

    #[test]
    fn test_wall_collision_ends_run_and_reports_once() {
        let (mut session, clock, reporter) = running();
        session.snake = at_right_wall();

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::GameOver);
        assert!(snap.events.contains(&GameEvent::GameOver { score: 0, won: false }));
        assert_eq!(reporter.submissions().len(), 1);
        assert_eq!(reporter.submissions()[0].init_data, "init");

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::Stopped);
        session.force_game_over();
        step(&mut session, &clock);
        assert_eq!(session.status(), SessionStatus::Stopped);
        assert_eq!(reporter.submissions().len(), 1);
    }

    #[test]
    fn test_self_collision_ends_run() {
        let (mut session, clock, _) = running();
        session.snake = Snake::new(5, 8);
        for dir in [Direction::Up, Direction::Left, Direction::Down] {
            step_with(
                &mut session,
                &clock,
                TickInput {
                    direction: Some(dir),
                    ..Default::default()
                },
            );
        }
        assert_eq!(session.status(), SessionStatus::GameOver);
    }

    #[test]
    fn test_shield_absorbs_exactly_one_collision() {
        let (mut session, clock, reporter) = running();
        session.effects.activate(EffectKind::Shield, clock.now_ms());
        session.snake = at_right_wall();

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::Running);
        assert_eq!(snap.shield_charge, 0);
        assert!(snap.events.contains(&GameEvent::ShieldAbsorbed));
        assert_eq!(session.snake().head(), Coord::new(0, 8));

        session.snake = at_right_wall();
        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::GameOver);
        assert_eq!(reporter.submissions().len(), 1);
    }

    #[test]
    fn test_sprint_passes_wall_without_spending_shield() {
        let (mut session, clock, _) = running();
        let now = clock.now_ms();
        session.effects.activate(EffectKind::Shield, now);
        session.effects.activate(EffectKind::Sprint, now);
        session.snake = at_right_wall();

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::Running);
        assert_eq!(snap.shield_charge, 1);
        assert_eq!(session.snake().head(), Coord::new(0, 8));
    }

    #[test]
    fn test_ghost_ignores_own_body() {
        let folded = || {
            Snake::from_cells(
                [
                    Coord::new(5, 5),
                    Coord::new(5, 6),
                    Coord::new(6, 6),
                    Coord::new(6, 5),
                    Coord::new(6, 4),
                    Coord::new(5, 4),
                    Coord::new(4, 4),
                    Coord::new(4, 3),
                ],
                Direction::Up,
            )
        };

        let (mut session, clock, _) = running();
        session.effects.activate(EffectKind::Ghost, clock.now_ms());
        session.snake = folded();
        step(&mut session, &clock);
        assert_eq!(session.status(), SessionStatus::Running);

        let (mut session, clock, _) = running();
        session.snake = folded();
        step(&mut session, &clock);
        assert_eq!(session.status(), SessionStatus::GameOver);
    }

    #[test]
    fn test_multiplier_doubles_then_reverts() {
        let (mut session, clock, _) = running();
        session.effects.activate(EffectKind::ScoreMultiplier, clock.now_ms());
        session.food = Food::placed(Coord::new(4, 8), FoodKind::Plain(Rainbow::Orange));
        step(&mut session, &clock);
        assert_eq!(session.score(), 2);

        clock.advance(10_000);
        session.food = Food::placed(Coord::new(5, 8), FoodKind::Plain(Rainbow::Orange));
        step(&mut session, &clock);
        assert_eq!(session.score(), 3);
    }

    #[test]
    fn test_slow_and_boost_compose() {
        let (mut session, clock, _) = running();
        let now = clock.now_ms();
        session.effects.activate(EffectKind::Slow, now);
        session.effects.activate(EffectKind::SpeedBoost, now);
        assert_eq!(session.current_tick_ms(), 192);
        assert_eq!(session.snapshot().tick_ms, 192);
    }

    #[test]
    fn test_step_waits_for_interval() {
        let (mut session, _clock, _) = running();
        session.tick(100, &TickInput::default());
        assert_eq!(session.steps(), 0);
        session.tick(44, &TickInput::default());
        assert_eq!(session.steps(), 1);
        session.tick(143, &TickInput::default());
        assert_eq!(session.steps(), 1);
        session.tick(1, &TickInput::default());
        assert_eq!(session.steps(), 2);
    }

    #[test]
    fn test_inverted_controls_flip_intent() {
        let (mut session, clock, _) = running();
        session.effects.activate(EffectKind::InvertControls, clock.now_ms());
        let snap = step_with(
            &mut session,
            &clock,
            TickInput {
                direction: Some(Direction::Up),
                ..Default::default()
            },
        );
        assert!(snap.controls_inverted);
        assert_eq!(session.snake().head(), Coord::new(3, 9));
        assert_eq!(snap.direction, Direction::Down);
    }

    #[test]
    fn test_shoot_aligned_food() {
        let (mut session, _clock, _) = running();
        session.effects.charge_laser();
        session.food = Food::placed(Coord::new(10, 8), FoodKind::Plain(Rainbow::Orange));

        assert!(session.shoot());
        assert_eq!(session.score(), 1);
        assert_eq!(session.snake().len(), 4);
        assert!(!session.effects().laser_charged());
        assert_eq!(session.projectiles().len(), 1);
    }

    #[test]
    fn test_shoot_under_multiplier() {
        let (mut session, clock, _) = running();
        session.effects.activate(EffectKind::ScoreMultiplier, clock.now_ms());
        session.effects.charge_laser();
        session.food = Food::placed(Coord::new(15, 8), FoodKind::Plain(Rainbow::Orange));
        assert!(session.shoot());
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn test_shoot_misses_off_axis_food() {
        let (mut session, _clock, _) = running();
        session.effects.charge_laser();
        session.food = Food::placed(Coord::new(3, 2), FoodKind::Plain(Rainbow::Orange));
        assert!(!session.shoot());
        assert_eq!(session.score(), 0);
        assert!(!session.effects().laser_charged());
        assert_eq!(session.food().pos, Coord::new(3, 2));
    }

    #[test]
    fn test_shoot_needs_charge() {
        let (mut session, _clock, _) = running();
        session.food = Food::placed(Coord::new(10, 8), FoodKind::Plain(Rainbow::Orange));
        assert!(!session.shoot());
        assert!(session.projectiles().is_empty());
    }

    #[test]
    fn test_shot_event_through_tick() {
        let (mut session, _clock, _) = running();
        session.effects.charge_laser();
        session.food = Food::placed(Coord::new(12, 8), FoodKind::Plain(Rainbow::Orange));
        let snap = session.tick(
            0,
            &TickInput {
                shoot: true,
                ..Default::default()
            },
        );
        assert_eq!(snap.events[0], GameEvent::ShotFired { hit: true });
        assert_eq!(snap.score, 1);
        assert_eq!(snap.projectiles.len(), 1);
    }

    #[test]
    fn test_yellow_charges_and_violet_drains_laser() {
        let (mut session, clock, _) = running();
        session.food = Food::placed(Coord::new(4, 8), FoodKind::Plain(Rainbow::Yellow));
        let snap = step(&mut session, &clock);
        assert!(snap.laser_charged);

        session.food = Food::placed(Coord::new(5, 8), FoodKind::Plain(Rainbow::Violet));
        let snap = step(&mut session, &clock);
        assert!(!snap.laser_charged);
    }

    #[test]
    fn test_turret_takes_aligned_food() {
        let (mut session, clock, _) = running();
        session.effects.activate(EffectKind::AutoConsume, clock.now_ms());
        session.food = Food::placed(Coord::new(10, 8), FoodKind::Plain(Rainbow::Orange));
        let snap = step(&mut session, &clock);
        assert_eq!(snap.score, 1);
        assert_eq!(snap.segments.len(), 5);
        assert_eq!(
            snap.segments.last().and_then(|s| s.tag),
            Some(SegmentTag::Color(Rainbow::Orange))
        );
    }

    #[test]
    fn test_turret_can_fill_the_board() {
        let settings = Settings {
            width: 5,
            height: 1,
            ..settings(4)
        };
        let (mut session, clock, _) = session_with(settings);
        session.begin();
        session.effects.activate(EffectKind::AutoConsume, clock.now_ms());
        // The tail leaves (0,0) as the head reaches (4,0); the turret takes the food there
        session.food = Food::placed(Coord::new(0, 0), FoodKind::Plain(Rainbow::Orange));
        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::GameOver);
        assert!(snap.won);
    }

    #[test]
    fn test_magnet_keeps_food_on_board_while_sprinting_through_wall() {
        let (mut session, clock, _) = running();
        let now = clock.now_ms();
        session.effects.activate(EffectKind::Sprint, now);
        session.effects.activate(EffectKind::Attraction, now);
        session.snake = at_right_wall();
        session.food = Food::placed(Coord::new(15, 10), FoodKind::Plain(Rainbow::Orange));

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::Running);
        assert_eq!(session.snake().head(), Coord::new(0, 8));
        assert!(session.grid().contains(snap.food.pos));
        assert_eq!(snap.food.pos, Coord::new(15, 9));
    }

    #[test]
    fn test_leaderboard_in_snapshot() {
        let (mut session, clock, _) = running();
        session.set_leaderboard(Leaderboard::from_entries(vec![
            LeaderboardEntry {
                name: "ann".into(),
                score: 3,
            },
            LeaderboardEntry {
                name: "bob".into(),
                score: 9,
            },
        ]));
        let snap = step(&mut session, &clock);
        assert_eq!(snap.leaderboard.top_score(), Some(9));
        assert_eq!(snap.leaderboard.entries[1].name, "ann");
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["leaderboard"]["entries"][0]["name"], "bob");
    }

    #[test]
    fn test_gold_rush_bonus() {
        let (mut session, clock, _) = running();
        session.food = Food::placed(Coord::new(4, 8), FoodKind::PowerUp(PowerUp::GoldRush));
        let snap = step(&mut session, &clock);
        assert_eq!(snap.score, 1 + GOLD_RUSH_BONUS);
        assert!(snap.events.contains(&GameEvent::PowerUpActivated {
            power_up: PowerUp::GoldRush,
        }));
    }

    #[test]
    fn test_power_up_effect_seen_next_step() {
        let (mut session, clock, _) = running();
        session.food = Food::placed(Coord::new(4, 8), FoodKind::PowerUp(PowerUp::Ice));
        let snap = step(&mut session, &clock);
        assert_eq!(snap.tick_ms, 288);
        assert!(snap.effects.iter().any(|e| e.kind == EffectKind::Slow));
    }

    #[test]
    fn test_filling_board_wins() {
        let settings = Settings {
            width: 5,
            height: 1,
            ..settings(3)
        };
        let (mut session, clock, reporter) = session_with(settings);
        session.begin();
        assert_eq!(session.food().pos, Coord::new(4, 0));

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::GameOver);
        assert!(snap.won);
        assert!(snap.events.contains(&GameEvent::GameOver { score: 1, won: true }));
        assert!(session.won());
        assert_eq!(reporter.submissions()[0].score, 1);
    }

    #[test]
    fn test_force_game_over_is_idempotent() {
        let (mut session, _clock, reporter) = session_with(settings(1));
        session.force_game_over();
        assert_eq!(session.status(), SessionStatus::Intro);

        session.begin();
        session.force_game_over();
        session.force_game_over();
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert_eq!(reporter.submissions().len(), 1);
    }

    #[test]
    fn test_failed_submission_is_swallowed() {
        let clock = ManualClock::new(0);
        let reporter = RecordingReporter::failing();
        let mut session = Session::new(settings(2), Box::new(clock.clone()))
            .unwrap()
            .with_reporter(Box::new(reporter.clone()));
        session.begin();
        session.snake = at_right_wall();
        session.food = Food::placed(Coord::new(1, 1), FoodKind::Plain(Rainbow::Orange));

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::GameOver);
        assert_eq!(reporter.submissions().len(), 1);
    }

    #[test]
    fn test_no_init_data_skips_submission() {
        let (mut session, _clock, reporter) = session_with(Settings::deterministic(2));
        session.begin();
        session.force_game_over();
        assert!(reporter.submissions().is_empty());
    }

    #[test]
    fn test_reset_rebuilds_board() {
        let (mut session, clock, reporter) = running();
        session.effects.activate(EffectKind::Ghost, clock.now_ms());
        session.food = Food::placed(Coord::new(4, 8), FoodKind::Plain(Rainbow::Red));
        step(&mut session, &clock);
        assert_eq!(session.score(), 1);

        // Ignored while running
        session.reset();
        assert_eq!(session.score(), 1);

        session.force_game_over();
        session.reset();
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake().len(), 4);
        assert_eq!(session.snake().head(), Coord::new(3, 8));
        assert!(session.effects().active(clock.now_ms()).is_empty());
        assert_eq!(session.current_tick_ms(), BASE_TICK_MS);

        // A new run reports again
        session.force_game_over();
        assert_eq!(reporter.submissions().len(), 2);
    }

    #[test]
    fn test_intro_demo_then_begin() {
        let (mut session, clock, _) = session_with(settings(5));
        for _ in 0..20 {
            step(&mut session, &clock);
        }
        let snap = session.snapshot();
        assert_eq!(snap.status, SessionStatus::Intro);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.segments.len(), 10);
        assert!(
            snap.segments
                .iter()
                .all(|s| matches!(s.tag, Some(SegmentTag::Hue(_))))
        );
        assert!(!session.shoot());

        session.begin();
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.snake().len(), 4);
        assert_eq!(session.snake().head(), Coord::new(3, 8));
    }

    #[test]
    fn test_hidden_pauses_and_resumes() {
        let (mut session, clock, _) = running();
        let hidden = TickInput {
            hidden: true,
            ..Default::default()
        };
        let snap = step_with(&mut session, &clock, hidden);
        assert_eq!(snap.status, SessionStatus::Paused);
        for _ in 0..5 {
            step_with(&mut session, &clock, hidden);
        }
        assert_eq!(session.steps(), 0);

        let snap = step(&mut session, &clock);
        assert_eq!(snap.status, SessionStatus::Running);
        step(&mut session, &clock);
        assert_eq!(session.steps(), 1);
    }

    #[test]
    fn test_autopilot_eats() {
        let (mut session, clock, _) = running();
        session.food = Food::placed(Coord::new(8, 3), FoodKind::Plain(Rainbow::Orange));
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..12 {
            step_with(&mut session, &clock, autopilot);
        }
        assert!(session.score() >= 1);
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let settings = Settings {
                seed: Some(99),
                ..Settings::default()
            };
            let (mut session, clock, _) = session_with(settings);
            session.begin();
            let input = TickInput {
                autopilot: true,
                shoot: true,
                ..Default::default()
            };
            let mut frames = Vec::new();
            for _ in 0..300 {
                let snap = step_with(&mut session, &clock, input);
                frames.push(serde_json::to_string(&snap).unwrap());
            }
            frames
        };
        assert_eq!(run(), run());
    }
}
