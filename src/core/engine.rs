use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting dashboard export");

        // Extract
        let snapshot = self.pipeline.extract().await?;
        let counts = snapshot.row_counts();
        tracing::info!(
            "📥 Snapshot loaded: {} transactions, {} students, {} teacher sessions",
            counts.transactions,
            counts.demographics,
            counts.teacher_sessions
        );

        // Transform
        let bundle = self.pipeline.transform(snapshot).await?;
        tracing::info!("📊 Rendered {} charts", bundle.charts.len());

        // Load
        let output_path = self.pipeline.load(bundle).await?;
        tracing::info!("💾 Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(output_path)
    }
}
