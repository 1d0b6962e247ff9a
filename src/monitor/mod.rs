pub mod controller;
pub mod interrupt;

pub use controller::*;
pub use interrupt::*;
