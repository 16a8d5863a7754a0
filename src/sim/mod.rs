//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same settings, seed, clock and
//! inputs, a session replays identically:
//! - Seeded RNG only
//! - Time read through the injected clock only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod effects;
pub mod food;
pub mod grid;
pub mod intro;
pub mod projectile;
pub mod snake;
pub mod state;
pub mod tick;

pub use autopilot::steer;
pub use effects::{Activation, ActiveEffect, EffectKind, EffectLedger, FieldOutcome, Portals};
pub use food::{Food, FoodKind, Motion, PowerUp, Rainbow, SpawnRules, place};
pub use grid::{Coord, Direction, Grid};
pub use intro::IntroPath;
pub use projectile::{Projectile, Projectiles};
pub use snake::{Segment, SegmentTag, Snake};
pub use state::{FoodView, GameEvent, Session, SessionStatus, Snapshot};
pub use tick::TickInput;
