mod generator;
mod payload;
mod reading;

pub use generator::*;
pub use payload::*;
pub use reading::*;
