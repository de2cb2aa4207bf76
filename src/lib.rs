//! Skyline Runner - arcade flight simulation core
//!
//! - `game`: vehicle simulation, collision, NPC traffic and the tick loop
//! - `input`: control intent sources
//! - `feed`: ambient radio chatter from a text-generation collaborator
//! - `hud`: stat and minimap readouts derived from telemetry

pub mod config;
pub mod feed;
pub mod game;
pub mod hud;
pub mod input;
pub mod util;
