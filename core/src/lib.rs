// src/lib.rs

//! Bazaar: the core of a small marketplace administration dashboard.
//!
//! The crate holds everything that does not depend on a transport or a database:
//!  - Domain types for accounts and product listings.
//!  - The ownership rule deciding who may change a product.
//!  - The `DataStore` seam with an in-memory implementation.
//!  - The action layer, the single read and mutation path into a store.
//!  - A step-ordered async workflow engine (`flow`).
//!  - Headless user and product management pages driven by injected dialogs.

pub mod actions;
pub mod config;
pub mod domain;
pub mod error;
pub mod flow;
pub mod pages;
pub mod paging;
pub mod passwords;
pub mod policy;
pub mod session;
pub mod store;
pub mod ui;

pub use crate::actions::{ActionLayer, Actions};
pub use crate::domain::{
  Actor, OwnerSummary, Product, ProductDraft, ProductListing, ProductPatch, Role, User, UserDraft, UserField,
  UserPatch,
};
pub use crate::error::{ActionError, ActionResult, StoreError, StoreResult};
pub use crate::flow::{Flow, FlowContext, FlowError, FlowOutcome, StepControl};
pub use crate::pages::{Mount, PageError, ProductManagementPage, UserManagementPage};
pub use crate::paging::{Page, PageRequest, Pager};
pub use crate::session::{Session, SessionUser};
pub use crate::store::{DataStore, MemoryStore};
pub use crate::ui::{Dialogs, NoticeKind, Prompt, UploadError, UploadFile, Uploader};
