// self
use crate::{
	_prelude::*,
	obs::{OpKind, OpOutcome},
};

/// Future type returned by [`OpSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Future type returned by [`OpSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// `blog_client.op` span around one client operation.
///
/// The span carries `op` and `stage` from creation, `path` when the operation targets a single
/// endpoint, and `outcome` once [`OpSpan::record_outcome`] is called.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Opens a span for `kind` at the given call site.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		Self::with_path(kind, stage, None)
	}

	/// Opens a span for a call against one API-relative `path`.
	pub fn for_path(kind: OpKind, stage: &'static str, path: &str) -> Self {
		Self::with_path(kind, stage, Some(path))
	}

	fn with_path(kind: OpKind, stage: &'static str, path: Option<&str>) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"blog_client.op",
				op = kind.as_str(),
				stage,
				path = path,
				outcome = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage, path);

			Self {}
		}
	}

	/// Runs `fut` inside the span without holding an entered guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
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

	/// Fills the span's `outcome` field.
	pub fn record_outcome(&self, outcome: OpOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());
		#[cfg(not(feature = "tracing"))]
		let _ = outcome;
	}
}

/// Runs `fut` under `span`, counting the attempt and its outcome for `kind`.
pub(crate) async fn observe<T, E, Fut>(kind: OpKind, span: OpSpan, fut: Fut) -> Result<T, E>
where
	Fut: Future<Output = Result<T, E>>,
{
	crate::obs::record_op_outcome(kind, OpOutcome::Attempt);

	let result = span.instrument(fut).await;
	let outcome = OpOutcome::of(&result);

	span.record_outcome(outcome);
	crate::obs::record_op_outcome(kind, outcome);

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn observe_passes_results_through() {
		let ok: Result<u8, ()> =
			observe(OpKind::Send, OpSpan::for_path(OpKind::Send, "test", "posts"), async {
				Ok(42)
			})
			.await;

		assert_eq!(ok, Ok(42));

		let err: Result<u8, &str> =
			observe(OpKind::Refresh, OpSpan::new(OpKind::Refresh, "test"), async { Err("boom") })
				.await;

		assert_eq!(err, Err("boom"));
	}
}
