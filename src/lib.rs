//! Stable-fluids coffee cup: milk stirred into a round cup of coffee.
//!
//! [`cup::Cup`] is the entry point. Everything else is either solver
//! internals or the interactive front end built on top of it.

pub mod config;
pub mod cup;
pub mod input;
pub mod overlay;
pub mod renderer;
pub mod solver;
pub mod state;
