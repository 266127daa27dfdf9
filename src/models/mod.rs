pub mod outcome;
pub mod package;
pub mod proxy;

pub use outcome::*;
pub use package::*;
pub use proxy::*;
