//! Serializable summary of one analysis run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::PlayEvent;
use crate::params::AnalysisParams;

/// Everything an `analyze` invocation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Path or name of the analyzed video.
    pub source: String,

    /// Effective parameters after coercion.
    pub params: AnalysisParams,

    /// Frame rate used for all time conversions.
    pub fps: f64,

    /// Frames read from the stream.
    pub frames_processed: u64,

    /// Whether the run was aborted before the stream ended.
    pub cancelled: bool,

    /// When the analysis finished.
    pub analyzed_at: DateTime<Utc>,

    /// Events in timestamp order.
    pub events: Vec<PlayEvent>,

    /// Per-event coaching feedback, index-aligned with `events`, when requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<String>,
}

impl AnalysisReport {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rally::RallyInterval;

    #[test]
    fn test_report_serializes_events_in_order() {
        let report = AnalysisReport {
            source: "match.mp4".into(),
            params: AnalysisParams::default(),
            fps: 30.0,
            frames_processed: 180,
            cancelled: false,
            analyzed_at: Utc::now(),
            events: vec![
                PlayEvent::rally(RallyInterval::new(30, 90), 30.0, "first"),
                PlayEvent::rally(RallyInterval::new(120, 170), 30.0, "second"),
            ],
            feedback: vec![],
        };

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["events"][0]["label"], "first");
        assert_eq!(json["events"][1]["start_frame"], 120);
        assert_eq!(json["params"]["mode"], "interval");
        assert!(json.get("feedback").is_none());
    }
}
