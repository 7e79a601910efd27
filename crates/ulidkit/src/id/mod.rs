mod randomness;
mod timestamp;
mod ulid;

pub use randomness::*;
pub use timestamp::*;
pub use ulid::*;
