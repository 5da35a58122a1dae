// bazaar/src/pages/product_flows.rs

//! Step flows behind the product page's submit and delete buttons.
//!
//! Each guard handler that halts the flow tells the person why before
//! returning `StepControl::Stop`. Handler errors bubble up to the page, which
//! closes any open indicator and shows a generic error.

use super::products::{FormPhase, PhaseWatch, ProductForm};
use super::PageError;
use crate::actions::ActionLayer;
use crate::domain::{Actor, ProductDraft, ProductListing, ProductPatch};
use crate::flow::{Flow, FlowContext, SkipCondition, StepControl};
use crate::policy;
use crate::session::Session;
use crate::ui::{Dialogs, NoticeKind, Prompt};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
  Create,
  Update(Uuid),
  Delete(Uuid),
}

impl Intent {
  fn target(self) -> Option<Uuid> {
    match self {
      Intent::Create => None,
      Intent::Update(id) | Intent::Delete(id) => Some(id),
    }
  }
}

pub(crate) struct ProductTask {
  pub intent: Intent,
  pub actions: Arc<dyn ActionLayer>,
  pub dialogs: Arc<dyn Dialogs>,
  pub session: Session,
  pub form: ProductForm,
  /// The page's list at the time the task started, used for local lookups.
  pub known: Vec<ProductListing>,
  /// The page's phase cell. Steps move it to confirming and submitting.
  pub phase: PhaseWatch,
  pub actor: Option<Actor>,
  pub draft: Option<ProductDraft>,
  pub target: Option<ProductListing>,
  pub refreshed: Option<Vec<ProductListing>>,
}

impl ProductTask {
  pub fn new(
    intent: Intent,
    actions: Arc<dyn ActionLayer>,
    dialogs: Arc<dyn Dialogs>,
    session: Session,
    form: ProductForm,
    known: Vec<ProductListing>,
    phase: PhaseWatch,
  ) -> Self {
    Self {
      intent,
      actions,
      dialogs,
      session,
      form,
      known,
      phase,
      actor: None,
      draft: None,
      target: None,
      refreshed: None,
    }
  }
}

type Ctx = FlowContext<ProductTask>;
type StepResult = Result<StepControl, PageError>;

const STEPS: &[&str] = &[
  "require_session",
  "validate_form",
  "confirm",
  "locate_target",
  "check_permission",
  "persist",
  "refresh",
];

fn creating() -> SkipCondition<ProductTask> {
  Arc::new(|ctx: Ctx| ctx.read().intent == Intent::Create)
}

fn build(name: &str) -> Flow<ProductTask, PageError> {
  let defs: Vec<(&str, bool, Option<SkipCondition<ProductTask>>)> = STEPS
    .iter()
    .map(|step| match *step {
      "locate_target" | "check_permission" => (*step, false, Some(creating())),
      _ => (*step, false, None),
    })
    .collect();

  let mut flow = Flow::new(name, &defs);
  flow.on_root("require_session", require_session);
  flow.on_root("validate_form", validate_form);
  flow.on_root("confirm", confirm);
  flow.on_root("locate_target", locate_target);
  flow.on_root("check_permission", check_permission);
  flow.before_root("persist", begin_processing);
  flow.on_root("persist", persist);
  flow.after_root("persist", announce_success);
  flow.on_root("refresh", refresh);
  flow
}

pub(crate) fn submit_flow() -> Flow<ProductTask, PageError> {
  build("product_submit")
}

/// Deleting asks first and has no form to validate.
pub(crate) fn delete_flow() -> Flow<ProductTask, PageError> {
  let mut flow = build("product_delete");
  flow.remove_step("validate_form");
  flow.remove_step("confirm");
  flow.insert_before_step("require_session", "confirm", false, None);
  flow.on_root("confirm", confirm);
  flow
}

fn notify(ctx: &Ctx, kind: NoticeKind, message: &str) {
  let dialogs = Arc::clone(&ctx.read().dialogs);
  dialogs.notify(kind, message);
}

async fn require_session(ctx: Ctx) -> StepResult {
  let actor = ctx.read().session.actor();
  match actor {
    Some(actor) => {
      ctx.write().actor = Some(actor);
      Ok(StepControl::Continue)
    }
    None => {
      notify(&ctx, NoticeKind::Error, "You must be signed in");
      Ok(StepControl::Stop)
    }
  }
}

async fn validate_form(ctx: Ctx) -> StepResult {
  let parsed = ctx.read().form.parse();
  match parsed {
    Ok(draft) => {
      ctx.write().draft = Some(draft);
      Ok(StepControl::Continue)
    }
    Err(problem) => {
      debug!(?problem, "Form rejected.");
      notify(&ctx, problem.kind(), problem.message());
      Ok(StepControl::Stop)
    }
  }
}

async fn confirm(ctx: Ctx) -> StepResult {
  let (dialogs, prompt) = {
    let task = ctx.read();
    task.phase.set(FormPhase::Confirming);
    let prompt = match task.intent {
      Intent::Create => Prompt::new("Add this product?", "Add"),
      Intent::Update(_) => Prompt::new("Update this product?", "Update"),
      Intent::Delete(_) => Prompt::new("Delete this product?", "Delete"),
    };
    (Arc::clone(&task.dialogs), prompt)
  };

  if dialogs.confirm(&prompt).await {
    Ok(StepControl::Continue)
  } else {
    debug!("Confirmation declined.");
    Ok(StepControl::Stop)
  }
}

async fn locate_target(ctx: Ctx) -> StepResult {
  let found = {
    let task = ctx.read();
    task
      .intent
      .target()
      .and_then(|id| task.known.iter().find(|p| p.id() == id).cloned())
  };
  match found {
    Some(listing) => {
      ctx.write().target = Some(listing);
      Ok(StepControl::Continue)
    }
    None => {
      notify(&ctx, NoticeKind::Error, "Product not found");
      Ok(StepControl::Stop)
    }
  }
}

async fn check_permission(ctx: Ctx) -> StepResult {
  let allowed = {
    let task = ctx.read();
    match (&task.target, &task.actor) {
      (Some(target), Some(actor)) => policy::can_mutate(target.product.user_id, actor),
      _ => false,
    }
  };
  if allowed {
    Ok(StepControl::Continue)
  } else {
    notify(&ctx, NoticeKind::Error, "You are not allowed to modify this product");
    Ok(StepControl::Stop)
  }
}

async fn begin_processing(ctx: Ctx) -> StepResult {
  let dialogs = {
    let task = ctx.read();
    task.phase.set(FormPhase::Submitting);
    Arc::clone(&task.dialogs)
  };
  dialogs.show_processing("Processing...");
  Ok(StepControl::Continue)
}

async fn persist(ctx: Ctx) -> StepResult {
  let (intent, actions, actor, draft) = {
    let task = ctx.read();
    (task.intent, Arc::clone(&task.actions), task.actor, task.draft.clone())
  };
  let Some(actor) = actor else {
    return Ok(StepControl::Stop);
  };

  match (intent, draft) {
    (Intent::Create, Some(draft)) => {
      let product = actions.create_product(draft, actor.id).await?;
      info!(product_id = %product.id, "Product created from form.");
    }
    (Intent::Update(id), Some(draft)) => {
      let patch = ProductPatch {
        name: Some(draft.name),
        quantity: Some(draft.quantity),
        price_v: Some(draft.price_v),
        image_url: Some(draft.image_url.unwrap_or_default()),
      };
      actions.update_product(id, patch, actor.id, actor.role).await?;
    }
    (Intent::Delete(id), _) => {
      actions.delete_product(id, actor.id, actor.role).await?;
    }
    (_, None) => return Ok(StepControl::Stop),
  }
  Ok(StepControl::Continue)
}

async fn announce_success(ctx: Ctx) -> StepResult {
  let (dialogs, intent) = {
    let task = ctx.read();
    (Arc::clone(&task.dialogs), task.intent)
  };
  dialogs.close();
  let message = match intent {
    Intent::Create => "Product added successfully",
    Intent::Update(_) => "Product updated successfully",
    Intent::Delete(_) => "Product deleted successfully",
  };
  dialogs.notify(NoticeKind::Success, message);
  Ok(StepControl::Continue)
}

/// A failed reload leaves the old list in place. The mutation already happened.
async fn refresh(ctx: Ctx) -> StepResult {
  let actions = Arc::clone(&ctx.read().actions);
  match actions.get_products().await {
    Ok(products) => ctx.write().refreshed = Some(products),
    Err(e) => {
      tracing::warn!(error = %e, "Reload after mutation failed.");
      notify(&ctx, NoticeKind::Error, "Failed to reload products");
    }
  }
  Ok(StepControl::Continue)
}
