use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, info};

use crate::engine::{ReasoningEngine, ReasoningOptions};
use crate::ontology::Ontology;
use crate::result::ReasoningResult;

/// Runs an injected engine against an ontology and never fails.
///
/// Errors, inconsistency, poisoned locks and engine panics all come back as
/// a [`ReasoningResult`] with failure status.
pub struct ReasoningGateway {
    engine: Box<dyn ReasoningEngine>,
    options: ReasoningOptions,
}

impl ReasoningGateway {
    pub fn new(engine: Box<dyn ReasoningEngine>) -> Self {
        Self::with_options(engine, ReasoningOptions::default())
    }

    pub fn with_options(engine: Box<dyn ReasoningEngine>, options: ReasoningOptions) -> Self {
        Self { engine, options }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn options(&self) -> &ReasoningOptions {
        &self.options
    }

    pub fn check_consistency(&self, ontology: &Ontology) -> ReasoningResult {
        let engine = self.engine.name().to_string();
        let mut context = match ontology.lock() {
            Ok(context) => context,
            Err(err) => {
                error!("An error occurred during reasoning: {}", err);
                return ReasoningResult::failure(engine, err.to_string()).for_ontology(ontology.id());
            }
        };

        info!("Starting reasoning on the ontology...");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.engine.reason(&mut context, &self.options)
        }));

        match outcome {
            Ok(Ok(())) => {
                info!("End reasoning on the ontology...");
                ReasoningResult::success(engine, context.id(), context.inferred_count())
            }
            Ok(Err(err)) => {
                error!("An error occurred during reasoning: {}", err);
                ReasoningResult::failure(engine, err.to_string()).for_ontology(context.id())
            }
            Err(payload) => {
                let message = format!("Reasoner panicked: {}", panic_message(payload.as_ref()));
                error!("An error occurred during reasoning: {}", message);
                ReasoningResult::failure(engine, message).for_ontology(context.id())
            }
        }
    }
}

impl std::fmt::Debug for ReasoningGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningGateway")
            .field("engine", &self.engine.name())
            .field("options", &self.options)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
