mod buf;
mod crockford;
mod error;

pub use buf::*;
pub(crate) use crockford::*;
pub use error::*;
