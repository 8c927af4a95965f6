use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;

/// Drives one run: load the calendar, pick today's events, publish them.
pub struct BotEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BotEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Loading calendar...");
        let events = self.pipeline.extract().await?;
        let loaded = events.len();
        tracing::info!("Loaded {} events", loaded);

        let digest = self.pipeline.transform(events).await?;
        let today_key = digest.today_key.clone();
        let matched = digest.matched.len();

        if matched == 0 {
            tracing::info!("No events found for today.");
            return Ok(RunSummary {
                today_key,
                loaded,
                matched,
                published: 0,
            });
        }

        tracing::info!("{} event(s) for {}, publishing...", matched, today_key);
        let published = self.pipeline.load(digest).await?;
        tracing::info!("Published {} post(s)", published);

        Ok(RunSummary {
            today_key,
            loaded,
            matched,
            published,
        })
    }
}
