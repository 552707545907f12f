//! Motor domain: kinematic movement of a character box through the level.

mod motor;


pub use motor::{Motor, Touch};
