pub mod catchers;
pub mod comparison;
pub mod snapshot;

pub use catchers::*;
pub use comparison::*;
pub use snapshot::*;
