pub use self::{block::*, grid::*, piece::*, render::*};

pub(crate) mod block;
pub(crate) mod grid;
pub(crate) mod piece;
pub(crate) mod render;
