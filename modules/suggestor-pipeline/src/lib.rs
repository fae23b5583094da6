pub mod clean;
pub mod coerce;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod router;
pub mod score;
pub mod scrape;
pub mod select;
pub mod storage;
pub mod task_store;

pub use clean::clean;
pub use coerce::{safe_int, RawRecord};
pub use pipeline::Pipeline;
pub use router::{route_records, RouteOptions, RouteOutcome};
pub use score::{engagement_score, score_item};
pub use scrape::{ScrapeConfig, SocialScraper};
pub use select::{plan_target, select_top_content, Selection, SelectionPlan};
pub use storage::RawBuffer;
pub use task_store::{FileTaskStore, MemoryTaskStore, TaskStore};
