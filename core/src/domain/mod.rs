// bazaar/src/domain/mod.rs

pub mod actor;
pub mod product;
pub mod user;

pub use actor::Actor;
pub use product::{OwnerSummary, Product, ProductDraft, ProductListing, ProductPatch};
pub use user::{ParseRoleError, Role, User, UserDraft, UserField, UserPatch};
