//! Core of a side-scrolling dinosaur runner.
//!
//! The library owns the simulation only: jump physics, speed ramp, the
//! obstacle field, collision, and score persistence. It never draws; the
//! binary renders [`entities::RenderSnapshot`] values produced by
//! [`session::GameSession`].

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod jump;
pub mod obstacles;
pub mod score_store;
pub mod session;
pub mod speed;
