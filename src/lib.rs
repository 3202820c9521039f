// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod game;
pub mod generate;
pub mod hints;
pub mod round;
pub mod runtime;
pub mod session;
pub mod supply;
pub mod wordbank;
