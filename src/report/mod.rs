pub mod chart;
pub mod live;
pub mod message;
pub mod pacer;
pub mod publisher;

pub use chart::{ChartReporter, ChartSeries, ChartSink, PngChart, DEFAULT_CHART_FILE};
pub use live::LiveReporter;
pub use message::{DoneMessage, EpochLogs, UpdateMessage, DONE_EVENT, UPDATE_EVENT};
pub use pacer::{Pacer, DEFAULT_DELAY};
pub use publisher::Publisher;
