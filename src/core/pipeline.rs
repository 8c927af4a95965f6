use crate::core::calendar;
use crate::core::matcher::{match_today, resolve_timezone, today_key};
use crate::core::post::PostFormatter;
use crate::core::{CalendarSource, ConfigProvider, DailyDigest, HistoricalEvent, Pipeline, Publisher};
use crate::utils::error::Result;
use chrono::Utc;

/// Calendar file in, one post per event of the day out.
pub struct DailyPipeline<S: CalendarSource, P: Publisher, C: ConfigProvider> {
    source: S,
    publisher: P,
    config: C,
    formatter: PostFormatter,
}

impl<S: CalendarSource, P: Publisher, C: ConfigProvider> DailyPipeline<S, P, C> {
    pub fn new(source: S, publisher: P, config: C) -> Self {
        let formatter = PostFormatter::new(config.hashtag(), config.max_graphemes());
        Self {
            source,
            publisher,
            config,
            formatter,
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

#[async_trait::async_trait]
impl<S: CalendarSource, P: Publisher, C: ConfigProvider> Pipeline for DailyPipeline<S, P, C> {
    async fn extract(&self) -> Result<Vec<HistoricalEvent>> {
        tracing::debug!("Reading calendar from {}", self.config.calendar_path());
        let text = self.source.read_calendar().await?;
        Ok(calendar::load(&text))
    }

    async fn transform(&self, events: Vec<HistoricalEvent>) -> Result<DailyDigest> {
        let tz = resolve_timezone(self.config.timezone())?;
        let instant = self.config.reference_instant().unwrap_or_else(Utc::now);
        let key = today_key(&tz, instant);
        tracing::debug!("Matching events for {} in {}", key, self.config.timezone());

        let matched = match_today(&events, &tz, Some(instant));
        let posts = matched.iter().map(|e| self.formatter.format(e)).collect();

        Ok(DailyDigest {
            today_key: key,
            matched,
            posts,
        })
    }

    async fn load(&self, digest: DailyDigest) -> Result<usize> {
        let mut published = 0;
        for text in &digest.posts {
            self.publisher.publish(text).await?;
            published += 1;
            tracing::debug!("Published post {}/{}", published, digest.posts.len());
        }
        Ok(published)
    }
}
