use crate::core::Pipeline;
use crate::domain::model::AuroraReport;
use crate::utils::error::Result;
use std::time::Instant;

pub struct SkywatchEngine<P: Pipeline> {
    pipeline: P,
}

/// What a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output_path: String,
    pub report: AuroraReport,
}

impl<P: Pipeline> SkywatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let started = Instant::now();
        tracing::info!("Starting aurora scoring run...");

        tracing::info!("Fetching space-weather feeds...");
        let feeds = self.pipeline.extract().await?;

        tracing::info!("Scoring location...");
        let report = self.pipeline.transform(feeds).await?;
        tracing::info!(
            "Aurora chance {:.0}/100 for {} ({})",
            report.result.chance,
            report.location.label(),
            report.result.note
        );

        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(report.clone()).await?;
        tracing::info!("Output saved to: {} in {:?}", output_path, started.elapsed());

        Ok(RunOutcome {
            output_path,
            report,
        })
    }
}
