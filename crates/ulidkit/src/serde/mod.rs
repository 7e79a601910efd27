mod ulid;

pub use ulid::*;
