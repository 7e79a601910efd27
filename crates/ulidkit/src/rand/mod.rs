mod fn_random;
mod interface;
mod lock_random;
mod thread_random;

pub use fn_random::*;
pub use interface::*;
pub use lock_random::*;
pub use thread_random::*;
