pub mod enums;
pub mod risk;
pub mod scan;

pub use enums::*;
pub use risk::*;
pub use scan::*;
