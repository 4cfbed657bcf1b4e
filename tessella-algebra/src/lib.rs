mod unmarked;
mod marked;
mod hom;
mod form;
mod poly;
mod pres;

pub use unmarked::*;
pub use marked::*;
pub use hom::*;
pub use form::*;
pub use poly::*;
pub use pres::*;
