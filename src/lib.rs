//! Duel Arena Core
//!
//! Deterministic simulation core for a two-player melee duel in a bounded
//! arena: movement with exponential friction, sphere collisions with
//! restitution, melee hits with cooldowns and stagger, knockouts with a
//! deferred round reset, and a stream of effect events for presentation.
//!
//! The core never renders or plays audio. Hosts feed [`game::input`] control
//! frames in, tick a [`game::simulator::CombatSimulator`] (directly or through
//! the fixed-step [`game::session::DuelSession`]) and read snapshots and
//! events back out.

pub mod config;
pub mod game;
pub mod util;
