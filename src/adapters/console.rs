use crate::core::Publisher;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Prints posts instead of sending them. Used for dry runs and previews.
#[derive(Debug, Clone, Default)]
pub struct ConsolePublisher;

impl ConsolePublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Publisher for ConsolePublisher {
    async fn publish(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}
