//! Public data types shared by the matrix, state and behaviors.

mod cell;
mod change;
mod id;
mod model;
mod selection;

pub use cell::*;
pub use change::*;
pub use id::*;
pub use model::*;
pub use selection::*;
