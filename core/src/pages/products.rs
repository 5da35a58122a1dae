// bazaar/src/pages/products.rs

use super::product_flows::{self, Intent, ProductTask};
use super::{Mount, PageError};
use crate::actions::ActionLayer;
use crate::config::{HOME_PATH, PRODUCTS_PER_PAGE, PRODUCT_IMAGE_BROKEN};
use crate::domain::{ProductDraft, ProductListing};
use crate::flow::{Flow, FlowContext, FlowOutcome};
use crate::paging::Pager;
use crate::policy;
use crate::session::Session;
use crate::ui::{Dialogs, NoticeKind, UploadFile, Uploader};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
  #[default]
  Idle,
  Composing,
  Confirming,
  Submitting,
}

/// Shared view of the form phase.
///
/// The page and its running flow hold the same cell, so a host can read the
/// phase while a submit is still awaiting a dialog.
#[derive(Debug, Clone, Default)]
pub struct PhaseWatch(Arc<RwLock<FormPhase>>);

impl PhaseWatch {
  pub fn get(&self) -> FormPhase {
    *self.0.read()
  }

  pub(crate) fn set(&self, phase: FormPhase) {
    *self.0.write() = phase;
  }
}

/// Raw form inputs, kept as typed so a failed submit loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
  pub name: String,
  pub quantity: String,
  pub price_v: String,
  pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormProblem {
  MissingFields,
  InvalidNumbers,
}

impl FormProblem {
  pub fn message(self) -> &'static str {
    match self {
      FormProblem::MissingFields => "Please fill in all fields",
      FormProblem::InvalidNumbers => "Quantity must be 0 or more and price must be greater than 0",
    }
  }

  pub fn kind(self) -> NoticeKind {
    match self {
      FormProblem::MissingFields => NoticeKind::Warning,
      FormProblem::InvalidNumbers => NoticeKind::Error,
    }
  }
}

impl ProductForm {
  pub fn from_listing(listing: &ProductListing) -> Self {
    let product = &listing.product;
    Self {
      name: product.name.clone(),
      quantity: product.quantity.to_string(),
      price_v: product.price_v.to_string(),
      image_url: product.image_url.clone().unwrap_or_default(),
    }
  }

  pub fn is_blank(&self) -> bool {
    *self == ProductForm::default()
  }

  /// Checks the inputs and converts them. Nothing is sent anywhere.
  pub fn parse(&self) -> Result<ProductDraft, FormProblem> {
    let name = self.name.trim();
    let quantity = self.quantity.trim();
    let price_v = self.price_v.trim();
    if name.is_empty() || quantity.is_empty() || price_v.is_empty() {
      return Err(FormProblem::MissingFields);
    }

    let quantity: i32 = quantity.parse().map_err(|_| FormProblem::InvalidNumbers)?;
    let price_v: f64 = price_v.parse().map_err(|_| FormProblem::InvalidNumbers)?;
    if quantity < 0 || !price_v.is_finite() || price_v <= 0.0 {
      return Err(FormProblem::InvalidNumbers);
    }

    Ok(ProductDraft {
      name: name.to_string(),
      quantity,
      price_v,
      image_url: Some(self.image_url.clone()).filter(|u| !u.is_empty()),
    })
  }
}

/// How a submit or delete ended, from the page's point of view.
#[derive(Debug)]
pub enum TaskOutcome {
  /// The mutation went through and the list was reloaded.
  Saved,
  /// A guard, a validation rule or the person halted it before any mutation.
  Halted,
  /// The action layer or the flow itself failed. The person saw a generic error.
  Failed(PageError),
}

impl TaskOutcome {
  pub fn is_saved(&self) -> bool {
    matches!(self, TaskOutcome::Saved)
  }
}

/// Catalogue screen for any signed-in user.
///
/// Create, update and delete each run as a step flow: session check,
/// validation, confirmation, a local permission check, the mutating call
/// and a single reload. The list is always re-fetched after a mutation.
pub struct ProductManagementPage {
  actions: Arc<dyn ActionLayer>,
  dialogs: Arc<dyn Dialogs>,
  session: Session,
  products: Vec<ProductListing>,
  form: ProductForm,
  editing: Option<Uuid>,
  phase: PhaseWatch,
  search: String,
  pager: Pager,
  broken_images: HashSet<Uuid>,
  submit_flow: Flow<ProductTask, PageError>,
  delete_flow: Flow<ProductTask, PageError>,
}

impl ProductManagementPage {
  #[instrument(name = "ProductManagementPage::mount", skip_all)]
  pub async fn mount(session: Session, actions: Arc<dyn ActionLayer>, dialogs: Arc<dyn Dialogs>) -> Mount<Self> {
    if !session.is_authenticated() {
      info!("Visitor is not signed in, redirecting.");
      return Mount::Redirect(HOME_PATH);
    }

    let mut page = Self {
      actions,
      dialogs,
      session,
      products: Vec::new(),
      form: ProductForm::default(),
      editing: None,
      phase: PhaseWatch::default(),
      search: String::new(),
      pager: Pager::new(PRODUCTS_PER_PAGE),
      broken_images: HashSet::new(),
      submit_flow: product_flows::submit_flow(),
      delete_flow: product_flows::delete_flow(),
    };
    page.load_products().await;
    Mount::Ready(page)
  }

  pub async fn load_products(&mut self) -> bool {
    match self.actions.get_products().await {
      Ok(products) => {
        self.replace_products(products);
        true
      }
      Err(e) => {
        warn!(error = %e, "Loading products failed.");
        self.dialogs.notify(NoticeKind::Error, "Failed to load products");
        false
      }
    }
  }

  fn replace_products(&mut self, products: Vec<ProductListing>) {
    self.products = products;
    let filtered = self.filtered_count();
    self.pager.clamp(filtered);
  }

  pub fn products(&self) -> &[ProductListing] {
    &self.products
  }

  pub fn form(&self) -> &ProductForm {
    &self.form
  }

  pub fn phase(&self) -> FormPhase {
    self.phase.get()
  }

  pub fn phase_watch(&self) -> PhaseWatch {
    self.phase.clone()
  }

  pub fn editing(&self) -> Option<Uuid> {
    self.editing
  }

  fn touch_form(&mut self) {
    if self.phase.get() == FormPhase::Idle {
      self.phase.set(FormPhase::Composing);
    }
  }

  pub fn set_name(&mut self, value: impl Into<String>) {
    self.form.name = value.into();
    self.touch_form();
  }

  pub fn set_quantity(&mut self, value: impl Into<String>) {
    self.form.quantity = value.into();
    self.touch_form();
  }

  pub fn set_price(&mut self, value: impl Into<String>) {
    self.form.price_v = value.into();
    self.touch_form();
  }

  pub fn set_image_url(&mut self, value: impl Into<String>) {
    self.form.image_url = value.into();
    self.touch_form();
  }

  /// Pre-fills the form from a listed product. Returns `false` for an unknown id.
  pub fn begin_edit(&mut self, product_id: Uuid) -> bool {
    let Some(listing) = self.products.iter().find(|p| p.id() == product_id) else {
      return false;
    };
    self.form = ProductForm::from_listing(listing);
    self.editing = Some(product_id);
    self.phase.set(FormPhase::Composing);
    true
  }

  pub fn clear_form(&mut self) {
    self.form = ProductForm::default();
    self.editing = None;
    self.phase.set(FormPhase::Idle);
  }

  /// Uploads `file` and stores the returned URL in the form as-is.
  #[instrument(name = "ProductManagementPage::attach_image", skip_all, fields(file_name = %file.file_name))]
  pub async fn attach_image(&mut self, uploader: &dyn Uploader, file: UploadFile) -> bool {
    match uploader.upload(file).await {
      Ok(url) => {
        self.set_image_url(url);
        true
      }
      Err(e) => {
        warn!(error = %e, "Image upload failed.");
        self.dialogs.notify(NoticeKind::Error, "Image upload failed");
        false
      }
    }
  }

  /// Creates a product, or updates the one being edited.
  pub async fn submit(&mut self) -> TaskOutcome {
    let intent = match self.editing {
      Some(id) => Intent::Update(id),
      None => Intent::Create,
    };
    self.run_task(intent).await
  }

  pub async fn delete(&mut self, product_id: Uuid) -> TaskOutcome {
    self.run_task(Intent::Delete(product_id)).await
  }

  #[instrument(name = "ProductManagementPage::run_task", skip(self))]
  async fn run_task(&mut self, intent: Intent) -> TaskOutcome {
    let task = ProductTask::new(
      intent,
      Arc::clone(&self.actions),
      Arc::clone(&self.dialogs),
      self.session.clone(),
      self.form.clone(),
      self.products.clone(),
      self.phase.clone(),
    );
    let ctx = FlowContext::new(task);
    let flow = match intent {
      Intent::Delete(_) => &self.delete_flow,
      Intent::Create | Intent::Update(_) => &self.submit_flow,
    };
    let result = flow.run(ctx.clone()).await;
    let refreshed = ctx.write().refreshed.take();

    match result {
      Ok(FlowOutcome::Completed) => {
        if let Some(products) = refreshed {
          self.replace_products(products);
        }
        match intent {
          Intent::Delete(id) if self.editing != Some(id) => self.settle_phase(),
          _ => self.clear_form(),
        }
        TaskOutcome::Saved
      }
      Ok(FlowOutcome::Stopped) => {
        self.settle_phase();
        TaskOutcome::Halted
      }
      Err(e) => {
        warn!(error = %e, "Product task failed.");
        self.dialogs.close();
        self.dialogs.notify(NoticeKind::Error, "An error occurred");
        self.settle_phase();
        TaskOutcome::Failed(e)
      }
    }
  }

  /// Back to composing while there is something in the form, idle otherwise.
  fn settle_phase(&mut self) {
    self.phase.set(if self.editing.is_some() || !self.form.is_blank() {
      FormPhase::Composing
    } else {
      FormPhase::Idle
    });
  }

  /// Whether the signed-in user may edit or delete `listing`.
  pub fn can_mutate(&self, listing: &ProductListing) -> bool {
    self
      .session
      .actor()
      .is_some_and(|actor| policy::can_mutate(listing.product.user_id, &actor))
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  /// Every change of the term sends the cursor back to page 1.
  pub fn set_search(&mut self, term: impl Into<String>) {
    self.search = term.into();
    self.pager.reset();
  }

  pub fn filtered_products(&self) -> Vec<&ProductListing> {
    let needle = self.search.to_lowercase();
    self
      .products
      .iter()
      .filter(|p| p.product.name.to_lowercase().contains(&needle))
      .collect()
  }

  fn filtered_count(&self) -> usize {
    self.filtered_products().len()
  }

  pub fn visible_products(&self) -> Vec<&ProductListing> {
    let filtered = self.filtered_products();
    let range = self.pager.range(filtered.len());
    filtered[range].to_vec()
  }

  pub fn current_page(&self) -> usize {
    self.pager.current()
  }

  pub fn total_pages(&self) -> usize {
    self.pager.total_pages(self.filtered_count())
  }

  pub fn page_label(&self) -> String {
    self.pager.label(self.filtered_count())
  }

  /// Out-of-range pages are ignored.
  pub fn go_to_page(&mut self, page: usize) -> bool {
    let total = self.filtered_count();
    self.pager.go_to(page, total)
  }

  pub fn next_page(&mut self) -> bool {
    let total = self.filtered_count();
    self.pager.next(total)
  }

  pub fn previous_page(&mut self) -> bool {
    self.pager.previous()
  }

  pub fn mark_image_broken(&mut self, product_id: Uuid) {
    self.broken_images.insert(product_id);
  }

  pub fn display_image<'a>(&self, listing: &'a ProductListing) -> &'a str {
    if self.broken_images.contains(&listing.id()) {
      return PRODUCT_IMAGE_BROKEN;
    }
    listing.image_or_placeholder()
  }
}
