pub use mirror::*;
pub use view::*;

mod mirror;
mod view;
