//! Sheet state and logic.

mod ops;
mod print;
mod state;
mod view;

pub use state::Sheet;
pub use view::{CellView, CellViewMut};
