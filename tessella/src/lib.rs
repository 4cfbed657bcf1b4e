mod abst;
mod misc;

pub use abst::*;
pub use misc::*;

pub mod perm;
pub mod primes;
pub mod util;
