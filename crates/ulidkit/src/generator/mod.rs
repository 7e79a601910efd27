mod basic_mono;
mod interface;
mod lock_mono;
mod mutex;
mod status;
#[cfg(test)]
mod tests;
#[cfg(feature = "thread-local")]
mod thread_local;

pub use basic_mono::*;
pub use interface::*;
pub use lock_mono::*;
pub use mutex::*;
pub use status::*;
#[cfg_attr(docsrs, doc(cfg(feature = "thread-local")))]
#[cfg(feature = "thread-local")]
pub use thread_local::*;
