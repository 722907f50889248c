mod bits_log;
mod frequency_scanner;
mod orchestrator;
mod sample_source;
mod stats;
mod worker;

pub use bits_log::BitsLog;
pub use frequency_scanner::{FrequencyScanner, DEFAULT_FREQUENCIES_MHZ};
pub use orchestrator::PipelineOrchestrator;
pub use sample_source::{FileSampleSource, SampleSource};
pub use stats::{PipelineStats, StatsSnapshot};
