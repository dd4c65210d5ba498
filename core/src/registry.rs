// kedai_flow/src/registry.rs

//! `FlowRegistry<E>`: flows keyed by the type of data they run on.
//! Each flow keeps its own handler error type; the registry converts it into
//! the application-level error `E` on the way out.

use crate::core::context_data::FlowContext;
use crate::core::control::FlowOutcome;
use crate::error::FlowError;
use crate::flow::definition::Flow;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[async_trait]
trait AnyFlowRunner<ApplicationError>: Send + Sync
where
  ApplicationError: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `FlowContext<TData>` for the wrapped flow's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<FlowOutcome, ApplicationError>;

  fn flow_context_type(&self) -> &'static str;
}

struct FlowRunner<TData, FlowErr, ApplicationError>
where
  TData: 'static + Send + Sync,
  FlowErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  ApplicationError: std::error::Error + From<FlowErr> + From<FlowError> + Send + Sync + 'static,
{
  flow: Arc<Flow<TData, FlowErr>>,
  _phantom_app_err: PhantomData<fn() -> ApplicationError>,
}

#[async_trait]
impl<TData, FlowErr, ApplicationError> AnyFlowRunner<ApplicationError> for FlowRunner<TData, FlowErr, ApplicationError>
where
  TData: 'static + Send + Sync,
  FlowErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  ApplicationError: std::error::Error + From<FlowErr> + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<FlowOutcome, ApplicationError> {
    let typed_ctx = match ctx_obj.downcast::<FlowContext<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<FlowContext<TData>>();
        event!(Level::ERROR, expected_type, "Flow context type mismatch.");
        return Err(ApplicationError::from(FlowError::TypeMismatch {
          expected_type: expected_type.to_string(),
        }));
      }
    };

    self.flow.run(typed_ctx).await.map_err(ApplicationError::from)
  }

  fn flow_context_type(&self) -> &'static str {
    std::any::type_name::<TData>()
  }
}

/// Registry of flows. One flow per context data type.
pub struct FlowRegistry<ApplicationError = FlowError>
where
  ApplicationError: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flows: RwLock<HashMap<TypeId, Arc<dyn AnyFlowRunner<ApplicationError>>>>,
}

impl<ApplicationError> FlowRegistry<ApplicationError>
where
  ApplicationError: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      flows: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `flow`, replacing any flow previously registered for `TData`.
  pub fn register<TData, FlowErr>(&self, flow: Flow<TData, FlowErr>)
  where
    TData: 'static + Send + Sync,
    FlowErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    ApplicationError: From<FlowErr>,
  {
    event!(
      Level::DEBUG,
      context_type = %std::any::type_name::<TData>(),
      steps = ?flow.step_names(),
      "Registering flow."
    );
    let runner = FlowRunner::<TData, FlowErr, ApplicationError> {
      flow: Arc::new(flow),
      _phantom_app_err: PhantomData,
    };
    let previous = self.flows.write().insert(TypeId::of::<TData>(), Arc::new(runner));
    if let Some(previous) = previous {
      event!(
        Level::WARN,
        context_type = previous.flow_context_type(),
        "Replaced an already registered flow."
      );
    }
  }

  pub fn is_registered<TData: 'static + Send + Sync>(&self) -> bool {
    self.flows.read().contains_key(&TypeId::of::<TData>())
  }

  pub fn len(&self) -> usize {
    self.flows.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.flows.read().is_empty()
  }

  /// Runs the flow registered for `TData`.
  #[instrument(name = "FlowRegistry::run", skip_all, fields(context_type = %std::any::type_name::<TData>()))]
  pub async fn run<TData>(&self, ctx: FlowContext<TData>) -> Result<FlowOutcome, ApplicationError>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.flows.read().get(&TypeId::of::<TData>()).cloned();
    let Some(runner) = runner else {
      let context_type = std::any::type_name::<TData>();
      event!(Level::ERROR, context_type, "No flow registered for context type.");
      return Err(ApplicationError::from(FlowError::NotRegistered {
        context_type: context_type.to_string(),
      }));
    };

    runner.run_erased(Box::new(ctx)).await
  }
}

impl<ApplicationError> Default for FlowRegistry<ApplicationError>
where
  ApplicationError: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
