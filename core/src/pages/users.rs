// bazaar/src/pages/users.rs

use super::Mount;
use crate::actions::ActionLayer;
use crate::config::{HOME_PATH, USERS_PER_PAGE};
use crate::domain::{Actor, User, UserField, UserPatch};
use crate::paging::Pager;
use crate::session::Session;
use crate::ui::{Dialogs, NoticeKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
  #[default]
  Viewing,
  /// A committed edit is in flight.
  Editing,
  /// The last commit for this row failed. Local values are unchanged.
  Failed,
}

/// Administrator screen listing every account.
///
/// The full list is fetched once on mount and paged locally. Edits are
/// applied to the local copy only after the action layer accepts them.
pub struct UserManagementPage {
  actions: Arc<dyn ActionLayer>,
  dialogs: Arc<dyn Dialogs>,
  actor: Actor,
  users: Vec<User>,
  pager: Pager,
  search: String,
  row_states: HashMap<Uuid, RowState>,
}

impl UserManagementPage {
  /// Anyone but an administrator is redirected home without a fetch.
  #[instrument(name = "UserManagementPage::mount", skip_all)]
  pub async fn mount(session: &Session, actions: Arc<dyn ActionLayer>, dialogs: Arc<dyn Dialogs>) -> Mount<Self> {
    let actor = match session.actor() {
      Some(actor) if actor.is_admin() => actor,
      _ => {
        info!("Visitor is not an administrator, redirecting.");
        return Mount::Redirect(HOME_PATH);
      }
    };

    let mut page = Self {
      actions,
      dialogs,
      actor,
      users: Vec::new(),
      pager: Pager::new(USERS_PER_PAGE),
      search: String::new(),
      row_states: HashMap::new(),
    };
    page.refresh().await;
    Mount::Ready(page)
  }

  /// Replaces the local list. On failure the list is emptied.
  pub async fn refresh(&mut self) -> bool {
    match self.actions.get_all_users().await {
      Ok(users) => {
        self.users = users;
        self.pager.clamp(self.users.len());
        true
      }
      Err(e) => {
        warn!(error = %e, "Loading users failed.");
        self.users.clear();
        self.pager.reset();
        self.dialogs.notify(NoticeKind::Error, "Failed to load users");
        false
      }
    }
  }

  pub fn users(&self) -> &[User] {
    &self.users
  }

  pub fn total(&self) -> usize {
    self.users.len()
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  pub fn set_search(&mut self, term: impl Into<String>) {
    self.search = term.into();
  }

  /// The current page's rows, narrowed by the search term.
  ///
  /// The search only sees the rows of the current page.
  pub fn visible_users(&self) -> Vec<&User> {
    self.users[self.pager.range(self.users.len())]
      .iter()
      .filter(|u| u.nni.contains(self.search.as_str()))
      .collect()
  }

  pub fn current_page(&self) -> usize {
    self.pager.current()
  }

  pub fn total_pages(&self) -> usize {
    self.pager.total_pages(self.users.len())
  }

  pub fn page_label(&self) -> String {
    self.pager.label(self.users.len())
  }

  pub fn has_previous(&self) -> bool {
    self.pager.has_previous()
  }

  pub fn has_next(&self) -> bool {
    self.pager.has_next(self.users.len())
  }

  pub fn next_page(&mut self) -> bool {
    self.pager.next(self.users.len())
  }

  pub fn previous_page(&mut self) -> bool {
    self.pager.previous()
  }

  pub fn row_state(&self, id: Uuid) -> RowState {
    self.row_states.get(&id).copied().unwrap_or_default()
  }

  /// Sends one edited column to the action layer and merges it on success.
  #[instrument(name = "UserManagementPage::commit_edit", skip(self, field), fields(user_id = %id, column = field.column()))]
  pub async fn commit_edit(&mut self, id: Uuid, field: UserField) -> bool {
    self.row_states.insert(id, RowState::Editing);
    let patch: UserPatch = field.into();

    match self.actions.update_user(&self.actor, id, patch.clone()).await {
      Ok(()) => {
        if let Some(user) = self.users.iter_mut().find(|u| u.id == id) {
          user.merge(&patch);
        }
        self.row_states.insert(id, RowState::Viewing);
        self.dialogs.notify(NoticeKind::Success, "User updated successfully");
        true
      }
      Err(e) => {
        warn!(error = %e, "User update failed.");
        self.row_states.insert(id, RowState::Failed);
        self.dialogs.notify(NoticeKind::Error, "Failed to update user");
        false
      }
    }
  }

  #[instrument(name = "UserManagementPage::delete", skip(self), fields(user_id = %id))]
  pub async fn delete(&mut self, id: Uuid) -> bool {
    match self.actions.delete_user(&self.actor, id).await {
      Ok(()) => {
        self.users.retain(|u| u.id != id);
        self.row_states.remove(&id);
        self.pager.clamp(self.users.len());
        self.dialogs.notify(NoticeKind::Success, "User deleted successfully");
        true
      }
      Err(e) => {
        warn!(error = %e, "User deletion failed.");
        self.dialogs.notify(NoticeKind::Error, "Failed to delete user");
        false
      }
    }
  }
}
