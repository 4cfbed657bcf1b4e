mod mat;
mod snf;
mod grid;

pub use mat::*;
pub use snf::*;
pub use grid::*;
