pub mod executor;
pub mod parse;

pub use executor::*;
pub use parse::*;
