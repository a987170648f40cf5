mod identity;
mod series;
mod source;

pub use identity::*;
pub use series::*;
pub use source::*;
