// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use bazaar::{
  ActionLayer, Actions, FlowContext, FlowError, MemoryStore, NoticeKind, Prompt, Role, Session, StepControl,
  UploadError, UploadFile, Uploader, User, UserDraft,
};
use bazaar::pages::{FormPhase, PhaseWatch};
use bazaar::ui::Dialogs;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::Level;

// --- Flow test context and error ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow engine error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> bazaar::flow::Handler<TestContext, TestError> {
  Box::new(move |ctx: FlowContext<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(StepControl::Stop);
      }
      Ok(StepControl::Continue)
    })
  })
}

// --- Tracing ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Dialogs double ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
  Confirm(String),
  Notice(NoticeKind, String),
  Processing(String),
  Closed,
}

/// Answers confirmations from a script (default: yes) and records everything shown.
#[derive(Default)]
pub struct ScriptedDialogs {
  answers: Mutex<VecDeque<bool>>,
  events: Mutex<Vec<DialogEvent>>,
  watched: Mutex<Option<PhaseWatch>>,
  phases: Mutex<Vec<(&'static str, FormPhase)>>,
}

impl ScriptedDialogs {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn answer_next(&self, answer: bool) {
    self.answers.lock().push_back(answer);
  }

  pub fn events(&self) -> Vec<DialogEvent> {
    self.events.lock().clone()
  }

  pub fn notices(&self) -> Vec<(NoticeKind, String)> {
    self
      .events()
      .into_iter()
      .filter_map(|e| match e {
        DialogEvent::Notice(kind, msg) => Some((kind, msg)),
        _ => None,
      })
      .collect()
  }

  pub fn last_notice(&self) -> Option<(NoticeKind, String)> {
    self.notices().pop()
  }

  pub fn count(&self, wanted: fn(&DialogEvent) -> bool) -> usize {
    self.events.lock().iter().filter(|e| wanted(e)).count()
  }

  /// Records the page phase each time a confirmation or the busy indicator is shown.
  pub fn watch_phase(&self, watch: PhaseWatch) {
    *self.watched.lock() = Some(watch);
  }

  pub fn phases_seen(&self) -> Vec<(&'static str, FormPhase)> {
    self.phases.lock().clone()
  }

  fn record_phase(&self, at: &'static str) {
    let watched = self.watched.lock().clone();
    if let Some(watch) = watched {
      self.phases.lock().push((at, watch.get()));
    }
  }

  pub fn clear(&self) {
    self.events.lock().clear();
  }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
  async fn confirm(&self, prompt: &Prompt) -> bool {
    self.events.lock().push(DialogEvent::Confirm(prompt.title.clone()));
    self.record_phase("confirm");
    self.answers.lock().pop_front().unwrap_or(true)
  }

  fn notify(&self, kind: NoticeKind, message: &str) {
    self.events.lock().push(DialogEvent::Notice(kind, message.to_string()));
  }

  fn show_processing(&self, message: &str) {
    self.events.lock().push(DialogEvent::Processing(message.to_string()));
    self.record_phase("processing");
  }

  fn close(&self) {
    self.events.lock().push(DialogEvent::Closed);
  }
}

// --- Uploader double ---
pub struct FakeUploader {
  pub result: Result<String, UploadError>,
}

#[async_trait]
impl Uploader for FakeUploader {
  async fn upload(&self, _file: UploadFile) -> Result<String, UploadError> {
    self.result.clone()
  }
}

pub fn sample_file() -> UploadFile {
  UploadFile {
    file_name: "chaise.jpg".to_string(),
    content_type: "image/jpeg".to_string(),
    bytes: vec![0xFF, 0xD8, 0xFF],
  }
}

// --- Fixtures ---
pub struct Fixture {
  pub store: Arc<MemoryStore>,
  pub actions: Arc<Actions>,
  pub dialogs: Arc<ScriptedDialogs>,
  pub admin: User,
  pub alice: User,
  pub bob: User,
}

impl Fixture {
  pub async fn new() -> Self {
    let store = Arc::new(MemoryStore::new());
    let actions = Arc::new(Actions::new(store.clone()));
    let admin = create_user(&actions, "Admin", "20000000", Role::Admin).await;
    let alice = create_user(&actions, "Alice", "22110001", Role::User).await;
    let bob = create_user(&actions, "Bob", "22110002", Role::User).await;
    Self {
      store,
      actions,
      dialogs: ScriptedDialogs::new(),
      admin,
      alice,
      bob,
    }
  }

  pub fn layer(&self) -> Arc<dyn ActionLayer> {
    self.actions.clone()
  }

  pub fn dialogs(&self) -> Arc<dyn Dialogs> {
    self.dialogs.clone()
  }

  pub fn session_for(&self, user: &User) -> Session {
    Session::signed_in(user.id, user.name.clone(), user.role)
  }
}

pub async fn create_user(actions: &Actions, name: &str, nni: &str, role: Role) -> User {
  actions
    .create_user(UserDraft {
      name: name.to_string(),
      nni: nni.to_string(),
      password: "password123".to_string(),
      role,
      photo: None,
    })
    .await
    .expect("fixture user")
}
