//! Data models for Braindrop

mod collection;
mod raindrop;
mod tag;
mod user;

pub use collection::{Collection, CollectionId, SpecialCollection};
pub use raindrop::{Raindrop, RaindropId, RaindropType};
pub use tag::Tag;
pub use user::User;
