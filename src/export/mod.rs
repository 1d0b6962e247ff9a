pub mod chart;
pub mod csv;
pub mod report;

pub use chart::*;
pub use csv::*;
pub use report::*;
