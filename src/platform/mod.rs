//! Platform abstraction layer
//!
//! What the frame loop consumes from the outside world:
//! - Time (`clock`): monotonic timestamps, turned into per-frame deltas
//! - Input (`input`): directional key state and the scanner toggle

pub mod clock;
pub mod input;

pub use clock::{Clock, FixedClock, FrameTimer, SystemClock};
pub use input::{Autopilot, IdleInput, InputSource};
