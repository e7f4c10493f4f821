#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stdio adapter that connects the funnel algo to the game engine.
//!
//! The engine streams one JSON document per line: the game configuration
//! first, then a frame per deploy phase and per action frame. Every deploy
//! frame is answered with two lines, the build stack followed by the deploy
//! stack.

mod session;
mod tuning;

pub use session::{run, Session, SessionSummary, Step};
pub use tuning::load_tuning;
