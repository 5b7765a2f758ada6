//! Data model shared by the crawler, the monitor and the output sinks

mod item;
mod record;

pub use item::{ContactFields, EnrichedItem, EnrichmentOutcome, Item};
pub use record::{ContactRecord, SocialHandles};
