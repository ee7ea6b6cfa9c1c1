pub mod policy;

pub use policy::authorize;
pub use policy::Actor;
pub use policy::Decision;
pub use policy::DenyReason;
pub use policy::Operation;
