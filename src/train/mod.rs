pub mod epoch_record;
pub mod fit_config;
pub mod harness;
pub mod loop_fn;

pub use epoch_record::{EpochRecord, Evaluation};
pub use fit_config::FitConfig;
pub use harness::{EpochObserver, NoopObserver, Predictor, TrainingHarness};
pub use loop_fn::Sequential;
