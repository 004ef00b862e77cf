//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `tick`
//! - Randomness only through the RNG handed in by the caller
//! - Stable iteration order (by entity handle)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lifecycle;
pub mod motion;
pub mod rect;
pub mod registry;
pub mod state;
pub mod tick;

pub use collision::{Body, Contact, RemovalPolicy, find_contacts, hits, resolve, resolve_sequential};
pub use rect::{BoundsCheck, Field, Rect};
pub use registry::{Handle, Registry};
pub use state::{
    Beam, Enemy, EnemyPhase, EntityKind, EntityRef, GameEvent, GamePhase, GameState, Obstacle,
    Shield, SpiralBall, Sprite, Tank,
};
pub use tick::{TickInput, tick};
