mod interface;
mod system;
mod zone;

pub use interface::*;
pub use system::*;
pub use zone::*;
