// self
use crate::{_prelude::*, obs::EvaluationPath};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedEvaluation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedEvaluation<F> = F;

/// Span wrapping one coordinator evaluation.
#[derive(Clone, Debug)]
pub struct EvaluationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl EvaluationSpan {
	/// Creates a new span tagged with the evaluation path.
	pub fn new(path: EvaluationPath) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_session.evaluate", path = path.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = path;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedEvaluation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
