// bazaar/src/ui.rs

//! Capabilities the pages use to talk to the person in front of the screen.
//! The hosting UI provides the implementations.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Info,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
  pub title: String,
  pub confirm_label: String,
  pub cancel_label: String,
}

impl Prompt {
  pub fn new(title: impl Into<String>, confirm_label: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      confirm_label: confirm_label.into(),
      cancel_label: "Cancel".to_string(),
    }
  }
}

#[async_trait]
pub trait Dialogs: Send + Sync {
  /// Resolves to `true` when the person confirms.
  async fn confirm(&self, prompt: &Prompt) -> bool;

  /// A dialog or toast. Pages do not wait for it to be dismissed.
  fn notify(&self, kind: NoticeKind, message: &str);

  /// A non-dismissible busy indicator, shown until `close`.
  fn show_processing(&self, message: &str);

  /// Closes whatever indicator or dialog is open.
  fn close(&self);
}

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
  pub file_name: String,
  pub content_type: String,
  pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("UploadFile")
      .field("file_name", &self.file_name)
      .field("content_type", &self.content_type)
      .field("len", &self.bytes.len())
      .finish()
  }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
  #[error("upload rejected: {0}")]
  Rejected(String),

  #[error("upload service unavailable: {0}")]
  Unavailable(String),
}

/// Stores a file somewhere and returns its public URL.
#[async_trait]
pub trait Uploader: Send + Sync {
  async fn upload(&self, file: UploadFile) -> Result<String, UploadError>;
}
