pub mod authorization;
pub mod job;
pub mod user;
