//! Downstream consumers of a finished summary.

use crate::error::SinkError;
use crate::summary::SummaryData;

/// A consumer that stores or forwards a [`SummaryData`].
///
/// Delivery is a blocking call. Implementations decide where the summary
/// goes; the pipeline only cares whether it got there.
pub trait Sink {
    fn deliver(&self, summary: &SummaryData) -> Result<(), SinkError>;
}

impl<S: Sink + ?Sized> Sink for &S {
    fn deliver(&self, summary: &SummaryData) -> Result<(), SinkError> {
        (**self).deliver(summary)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn deliver(&self, summary: &SummaryData) -> Result<(), SinkError> {
        (**self).deliver(summary)
    }
}
