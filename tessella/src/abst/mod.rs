mod elem;
mod add_mon;
mod mon;
mod ring;
mod euc_ring;

pub use elem::*;
pub use add_mon::*;
pub use mon::*;
pub use ring::*;
pub use euc_ring::*;
