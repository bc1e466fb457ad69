use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::dataset::generator::DatasetMode;
use crate::dataset::grid::Grid;
use crate::dataset::region::Rect;
use crate::dataset::sample::Dataset;
use crate::error::{Error, Result};
use crate::report::message::{DoneMessage, EpochLogs, UpdateMessage, DONE_EVENT, UPDATE_EVENT};
use crate::report::pacer::Pacer;
use crate::report::publisher::Publisher;
use crate::train::epoch_record::EpochRecord;
use crate::train::harness::{EpochObserver, Predictor};

/// Training points sent along with every frame so the page can overlay them.
struct SampleEcho {
    xs: Vec<[f64; 2]>,
    ys: Vec<f64>,
}

/// Live-mode reporter.
///
/// Per epoch: lay out the grid, predict every grid point on the current
/// weights, publish one `update` frame, then hold the training thread in
/// the pacer.
pub struct LiveReporter {
    publisher: Arc<dyn Publisher>,
    mode: DatasetMode,
    region: Rect,
    resolution: u32,
    pacer: Pacer,
    echo: Option<SampleEcho>,
    started: Instant,
    frames: usize,
}

impl LiveReporter {
    /// Fails when the dataset mode has no planar grid to render, or the
    /// resolution is zero.
    pub fn new(
        publisher: Arc<dyn Publisher>,
        mode: DatasetMode,
        region: Rect,
        resolution: u32,
        pacer: Pacer,
    ) -> Result<LiveReporter> {
        if !mode.is_planar() {
            return Err(Error::InvalidConfig(format!(
                "live output needs a 2-D dataset, '{}' is not one",
                mode.name()
            )));
        }
        if resolution == 0 {
            return Err(Error::InvalidConfig("grid resolution must be at least 1".into()));
        }
        Ok(LiveReporter {
            publisher,
            mode,
            region,
            resolution,
            pacer,
            echo: None,
            started: Instant::now(),
            frames: 0,
        })
    }

    /// Attaches the training points to every frame. Only 2-D datasets can
    /// be overlaid on the plane.
    pub fn with_samples(mut self, data: &Dataset) -> Result<LiveReporter> {
        if data.dim() != 2 {
            return Err(Error::Shape { expected: 2, actual: data.dim() });
        }
        let xs = data
            .samples()
            .iter()
            .map(|s| [s.features[0], s.features[1]])
            .collect();
        self.echo = Some(SampleEcho { xs, ys: data.labels() });
        Ok(self)
    }

    /// Number of `update` frames published so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Publishes the closing `done` frame.
    pub fn finish(&self) -> Result<()> {
        let done = DoneMessage {
            epochs: self.frames,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        };
        self.publisher.publish(DONE_EVENT, &serde_json::to_string(&done)?);
        info!(epochs = self.frames, "training completed");
        Ok(())
    }
}

impl EpochObserver for LiveReporter {
    fn on_epoch_end(&mut self, record: &EpochRecord, model: &dyn Predictor) -> Result<()> {
        info!("{}", record.summary());

        // Deterministic, so every epoch sees the same coordinates at the
        // same indices.
        let grid = Grid::new(self.resolution, self.region);
        let predictions = model.predict(&grid.inputs())?;
        if predictions.len() != grid.len() {
            return Err(Error::Shape { expected: grid.len(), actual: predictions.len() });
        }
        let coordinates = grid.coordinates();

        let msg = UpdateMessage {
            dataset: self.mode.name(),
            epoch: record.epoch,
            total_epochs: record.total_epochs,
            logs: EpochLogs::from_record(record),
            grid_resolution: grid.resolution(),
            region: grid.region(),
            grid_data: &coordinates,
            predictions: &predictions,
            c: self.mode.parameter(),
            xs_array: self.echo.as_ref().map(|e| e.xs.as_slice()),
            ys_array: self.echo.as_ref().map(|e| e.ys.as_slice()),
        };
        let json = serde_json::to_string(&msg)?;
        self.publisher.publish(UPDATE_EVENT, &json);
        self.frames += 1;
        debug!(epoch = record.epoch, bytes = json.len(), "published update");

        self.pacer.wait();
        Ok(())
    }
}
