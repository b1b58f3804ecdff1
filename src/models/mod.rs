pub mod drug;
pub mod finding;
pub mod outbreak;
pub mod treatment;

pub use drug::*;
pub use finding::*;
pub use outbreak::*;
pub use treatment::*;
