mod sign;
mod int_ext;
mod union_find;

pub use sign::*;
pub use int_ext::*;
pub use union_find::*;
