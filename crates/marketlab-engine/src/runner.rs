//! Parallel multi-instrument runner.

use std::sync::Arc;

use marketlab_config::EngineConfig;
use marketlab_core::error::EngineError;
use marketlab_core::types::EquityCurve;
use tracing::warn;

use crate::pipeline::{run_instrument, InstrumentData, InstrumentResult};

/// Merged outcome of a universe run.
///
/// Instruments are independent; one failure never hides another
/// instrument's result, and a failed instrument contributes no partial
/// curve.
#[derive(Debug, Default)]
pub struct UniverseRun {
    pub completed: Vec<InstrumentResult>,
    pub failed: Vec<(String, EngineError)>,
}

/// Run every instrument pipeline on blocking worker tasks.
///
/// Each worker owns its instrument's series, frame, position, and curve
/// exclusively; the only shared values are the read-only config and
/// benchmark. Results are appended here after each pipeline completes.
pub async fn run_universe(
    instruments: Vec<InstrumentData>,
    config: EngineConfig,
    benchmark: Option<EquityCurve>,
) -> UniverseRun {
    let config = Arc::new(config);
    let benchmark = Arc::new(benchmark);

    let mut handles = Vec::with_capacity(instruments.len());
    for data in instruments {
        let config = Arc::clone(&config);
        let benchmark = Arc::clone(&benchmark);
        let symbol = data.symbol.clone();

        let handle = tokio::task::spawn_blocking(move || {
            run_instrument(&data, &config, (*benchmark).as_ref())
        });
        handles.push((symbol, handle));
    }

    let mut run = UniverseRun::default();
    for (symbol, handle) in handles {
        match handle.await {
            Ok(Ok(result)) => run.completed.push(result),
            Ok(Err(error)) => {
                warn!(%symbol, %error, "instrument pipeline failed");
                run.failed.push((symbol, error));
            }
            Err(join_error) => {
                warn!(%symbol, %join_error, "instrument worker aborted");
                run.failed.push((
                    symbol,
                    EngineError::Config(format!("instrument worker aborted: {join_error}")),
                ));
            }
        }
    }

    run
}
