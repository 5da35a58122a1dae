// bazaar/src/pages/mod.rs

//! Headless view-models for the two dashboard screens.
//!
//! A page owns its list, search term, page cursor and edit buffer. It reaches
//! data only through an `ActionLayer` and speaks to the person through
//! `Dialogs`. Rendering is left to the host.

mod product_flows;
pub mod products;
pub mod users;

pub use products::{FormPhase, FormProblem, PhaseWatch, ProductForm, ProductManagementPage, TaskOutcome};
pub use users::{RowState, UserManagementPage};

use crate::error::ActionError;
use crate::flow::FlowError;
use crate::ui::UploadError;
use thiserror::Error;

/// Result of mounting a page behind its route guard.
#[derive(Debug)]
pub enum Mount<P> {
  Ready(P),
  /// The visitor may not see the page and is sent to this path instead.
  Redirect(&'static str),
}

impl<P> Mount<P> {
  pub fn ready(self) -> Option<P> {
    match self {
      Mount::Ready(page) => Some(page),
      Mount::Redirect(_) => None,
    }
  }

  pub fn redirect_target(&self) -> Option<&'static str> {
    match self {
      Mount::Ready(_) => None,
      Mount::Redirect(path) => Some(*path),
    }
  }
}

#[derive(Error, Debug)]
pub enum PageError {
  #[error(transparent)]
  Action(#[from] ActionError),

  #[error(transparent)]
  Upload(#[from] UploadError),

  #[error(transparent)]
  Flow(#[from] FlowError),
}
