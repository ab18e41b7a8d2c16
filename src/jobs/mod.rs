pub mod executor;
pub mod queue;
pub mod record;

pub use executor::JobExecutor;
pub use queue::{JobMessage, JobQueue};
pub use record::{JobRecord, JobStatus, JobType};
