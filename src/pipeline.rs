//! Invocation orchestrator.
//!
//! One invocation handles one uploaded object:
//!
//! ```text
//! Fetching -> Parsing -> Aggregating -> Dispatching(store) -> Dispatching(notify) -> Done
//! ```
//!
//! Any failure stops the invocation at that stage. Dispatch steps run in a
//! fixed order and a failed step skips every step after it. Nothing is
//! retried and nothing is logged here; the caller receives every error with
//! its stage attached.

use crate::error::{DispatchTarget, InvocationError, PipelineError, Stage};
use crate::parser;
use crate::sink::Sink;
use crate::source::Source;
use crate::summary::{aggregate, SummaryData};
use crate::trigger::ObjectRef;

/// Parses and aggregates a transaction file in one step.
///
/// No summary is produced if any row is invalid or a total overflows.
pub fn summarize(text: &str) -> Result<SummaryData, PipelineError> {
    let records = parser::parse(text)?;
    Ok(aggregate(records)?)
}

/// Wires an input source to the store and notify sinks.
pub struct Pipeline<'a> {
    source: &'a dyn Source,
    store: &'a dyn Sink,
    notify: &'a dyn Sink,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn Source, store: &'a dyn Sink, notify: &'a dyn Sink) -> Self {
        Pipeline {
            source,
            store,
            notify,
        }
    }

    /// Dispatch steps in the order they run.
    fn dispatch_steps(&self) -> [(DispatchTarget, &'a dyn Sink); 2] {
        [
            (DispatchTarget::Store, self.store),
            (DispatchTarget::Notify, self.notify),
        ]
    }

    /// Runs one invocation end to end and returns the summary it delivered.
    pub fn run(&self, object: &ObjectRef) -> Result<SummaryData, InvocationError> {
        let fail = |stage: Stage, source: PipelineError| InvocationError {
            object: object.clone(),
            stage,
            source,
        };

        let text = self
            .source
            .fetch(object)
            .map_err(|e| fail(Stage::Fetching, e.into()))?;

        let records = parser::parse(&text).map_err(|e| fail(Stage::Parsing, e.into()))?;
        let summary = aggregate(records).map_err(|e| fail(Stage::Aggregating, e.into()))?;

        for (target, sink) in self.dispatch_steps() {
            sink.deliver(&summary).map_err(|source| {
                fail(
                    Stage::Dispatching(target),
                    PipelineError::Dispatch { target, source },
                )
            })?;
        }

        Ok(summary)
    }

    /// Runs one independent invocation per object.
    ///
    /// A failed invocation does not stop the ones after it; every outcome is
    /// reported, in input order.
    pub fn run_batch<'o, I>(&self, objects: I) -> BatchReport
    where
        I: IntoIterator<Item = &'o ObjectRef>,
    {
        let outcomes = objects
            .into_iter()
            .map(|object| Outcome {
                object: object.clone(),
                result: self.run(object),
            })
            .collect();

        BatchReport { outcomes }
    }
}

/// Result of a single invocation within a batch.
#[derive(Debug)]
pub struct Outcome {
    pub object: ObjectRef,
    pub result: Result<SummaryData, InvocationError>,
}

/// Outcomes of every invocation in a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.total() - self.failed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}
