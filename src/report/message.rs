use serde::Serialize;

use crate::dataset::region::Rect;
use crate::fractal::complex::ComplexPoint;
use crate::loss::loss_type::MetricKind;
use crate::train::epoch_record::EpochRecord;

/// Event name of per-epoch frames.
pub const UPDATE_EVENT: &str = "update";
/// Event name of the end-of-training frame.
pub const DONE_EVENT: &str = "done";

/// Per-epoch statistics under the keys the viewer reads. Exactly one of
/// `accuracy` / `mse` is set, matching the run's metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EpochLogs {
    pub loss: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mse: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val_mse: Option<f64>,
}

impl EpochLogs {
    pub fn from_record(record: &EpochRecord) -> EpochLogs {
        let mut logs = EpochLogs { loss: record.train.loss, ..Default::default() };
        match record.metric_kind {
            MetricKind::Accuracy => logs.accuracy = Some(record.train.metric),
            MetricKind::Mse => logs.mse = Some(record.train.metric),
        }
        if let Some(val) = record.validation {
            logs.val_loss = Some(val.loss);
            match record.metric_kind {
                MetricKind::Accuracy => logs.val_accuracy = Some(val.metric),
                MetricKind::Mse => logs.val_mse = Some(val.metric),
            }
        }
        logs
    }
}

/// One live frame: the epoch's statistics plus the model's prediction for
/// every grid point, index-aligned with `grid_data`.
///
/// Exists only as a wire payload; borrows everything it sends.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessage<'a> {
    pub dataset: &'a str,
    pub epoch: usize,
    pub total_epochs: usize,
    pub logs: EpochLogs,
    pub grid_resolution: u32,
    pub region: &'a Rect,
    pub grid_data: &'a [[f64; 2]],
    pub predictions: &'a [f64],
    /// Julia parameter; absent for every other dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<ComplexPoint>,
    /// Training points echoed for overlay, when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xs_array: Option<&'a [[f64; 2]]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ys_array: Option<&'a [f64]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoneMessage {
    pub epochs: usize,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::epoch_record::Evaluation;
    use serde_json::Value;

    fn record(kind: MetricKind, validation: bool) -> EpochRecord {
        EpochRecord {
            epoch: 2,
            total_epochs: 20,
            metric_kind: kind,
            train: Evaluation { loss: 0.5, metric: 0.75 },
            validation: validation.then_some(Evaluation { loss: 0.6, metric: 0.7 }),
            elapsed_ms: 5,
        }
    }

    #[test]
    fn test_logs_use_metric_key() {
        let v = serde_json::to_value(EpochLogs::from_record(&record(MetricKind::Accuracy, false))).unwrap();
        assert_eq!(v["loss"], 0.5);
        assert_eq!(v["accuracy"], 0.75);
        assert!(v.get("mse").is_none());
        assert!(v.get("val_loss").is_none());

        let v = serde_json::to_value(EpochLogs::from_record(&record(MetricKind::Mse, true))).unwrap();
        assert_eq!(v["mse"], 0.75);
        assert_eq!(v["val_loss"], 0.6);
        assert_eq!(v["val_mse"], 0.7);
        assert!(v.get("accuracy").is_none());
    }

    #[test]
    fn test_update_wire_shape() {
        let region = Rect::unit_square();
        let grid = [[-1.0, -1.0], [0.0, -1.0]];
        let preds = [0.25, 0.75];
        let msg = UpdateMessage {
            dataset: "julia",
            epoch: 2,
            total_epochs: 20,
            logs: EpochLogs::from_record(&record(MetricKind::Accuracy, true)),
            grid_resolution: 2,
            region: &region,
            grid_data: &grid,
            predictions: &preds,
            c: Some(ComplexPoint::new(-0.8, 0.156)),
            xs_array: None,
            ys_array: None,
        };
        let v: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["epoch"], 2);
        assert_eq!(v["totalEpochs"], 20);
        assert_eq!(v["gridResolution"], 2);
        assert_eq!(v["region"]["reStart"], -1.0);
        assert_eq!(v["gridData"][1][0], 0.0);
        assert_eq!(v["predictions"][1], 0.75);
        assert_eq!(v["c"]["re"], -0.8);
        assert_eq!(v["c"]["im"], 0.156);
        assert_eq!(v["logs"]["val_accuracy"], 0.7);
        assert!(v.get("xsArray").is_none());
    }
}
