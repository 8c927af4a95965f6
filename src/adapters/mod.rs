// Adapters layer: concrete implementations of the domain ports.

pub mod bluesky;
pub mod console;
pub mod storage;

pub use bluesky::BlueskyPublisher;
pub use console::ConsolePublisher;
pub use storage::LocalCalendar;
