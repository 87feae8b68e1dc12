pub mod mem;
pub mod scratch;

pub use mem::*;
pub use scratch::Scratch;
