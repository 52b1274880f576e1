pub mod storage;
pub mod registry;

pub use self::storage::{BodyStorage, LinkStorage, Storage};
pub use self::registry::{BackendId, LinkConstructor, LinkRegistry};

/// A unique identifier for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

/// A unique identifier for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkHandle(pub(crate) u32);
