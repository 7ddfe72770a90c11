//! Application lifecycle: wiring the store and services at startup.

pub mod lifetime;
