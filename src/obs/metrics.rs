// self
use crate::obs::{EvaluationPath, FlowOutcome};

/// Records an evaluation outcome via the global metrics recorder (when enabled).
pub fn record_evaluation(path: EvaluationPath, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_session_evaluation_total",
			"path" => path.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (path, outcome);
	}
}
