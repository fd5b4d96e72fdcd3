mod identity;
mod tweet;

pub use identity::*;
pub use tweet::*;
