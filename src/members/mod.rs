//! Host-owned member data and the member entity that logs its own logins.

pub mod directory;
pub mod entity;

pub use directory::{InMemoryMemberDirectory, MemberDirectory};
pub use entity::Member;
