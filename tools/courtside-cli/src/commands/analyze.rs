//! Detect play events in a video.

use std::path::PathBuf;

use clap::Args;

use courtside_coach_feedback::{
    CoachingContext, DisabledFeedback, FeedbackService, OpenAiFeedback,
};
use courtside_common::config::AppConfig;
use courtside_media::{analyze_stream, CancelToken, DecodeQueue, FfmpegFrameSource};
use courtside_play_model::params::{AnalysisParams, RawAnalysisParams};
use courtside_play_model::report::AnalysisReport;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the video file
    pub path: PathBuf,

    /// Acquisition mode: clip|interval samples frames, match|rally segments rallies
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Seconds between samples in interval mode (minimum 1)
    #[arg(long)]
    pub interval_sec: Option<f64>,

    /// Smoothed motion level that counts as active play
    #[arg(long)]
    pub motion_threshold: Option<f64>,

    /// Seconds of low motion that end a rally
    #[arg(long)]
    pub gap_sec: Option<f64>,

    /// Smoothing weight of the previous value, in [0, 1)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Working width for frame differencing
    #[arg(long)]
    pub downscale_width: Option<u32>,

    /// Frames buffered between the decoder and the analyzer
    #[arg(long)]
    pub queue_depth: Option<usize>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Request coaching feedback for each event
    #[arg(long)]
    pub feedback: bool,

    /// Player jersey number
    #[arg(long)]
    pub jersey: Option<String>,

    /// Player role or position
    #[arg(long)]
    pub position: Option<String>,

    /// Focus areas for the feedback
    #[arg(long)]
    pub notes: Option<String>,
}

impl AnalyzeArgs {
    /// Command-line values over configured defaults.
    fn raw_params(&self, config: &AppConfig) -> RawAnalysisParams {
        let defaults = &config.analysis;
        RawAnalysisParams {
            mode: Some(self.mode.clone().unwrap_or_else(|| defaults.mode.clone())),
            interval_sec: Some(self.interval_sec.unwrap_or(defaults.interval_sec)),
            motion_threshold: Some(self.motion_threshold.unwrap_or(defaults.motion_threshold)),
            gap_sec: Some(self.gap_sec.unwrap_or(defaults.gap_sec)),
            alpha: Some(self.alpha.unwrap_or(defaults.alpha)),
            downscale_width: Some(self.downscale_width.unwrap_or(defaults.downscale_width)),
        }
    }

    fn context(&self) -> CoachingContext {
        CoachingContext {
            jersey_number: self.jersey.clone(),
            position: self.position.clone(),
            notes: self.notes.clone(),
        }
    }
}

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let params = AnalysisParams::coerce(&args.raw_params(config));
    let queue_depth = args
        .queue_depth
        .unwrap_or(config.analysis.decode_queue_depth);

    if !args.json {
        println!("Analyzing {} ({} mode)", args.path.display(), params.mode.as_str());
    }

    let cancel = CancelToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping analysis");
            interrupt.cancel();
        }
    });

    let path = args.path.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let source = FfmpegFrameSource::open(&path)?;
        let mut queue = DecodeQueue::spawn(source, queue_depth)?;
        analyze_stream(&mut queue, &params, &cancel)
    })
    .await??;

    let feedback = if args.feedback || config.feedback.enabled {
        let service: Box<dyn FeedbackService> = if config.feedback.api_key().is_some() {
            Box::new(OpenAiFeedback::from_config(&config.feedback)?)
        } else {
            tracing::warn!(
                env = %config.feedback.api_key_env,
                "No feedback API key set; feedback will be placeholders"
            );
            Box::new(DisabledFeedback)
        };

        let context = args.context().render();
        let mut feedback = Vec::with_capacity(outcome.events.len());
        for event in &outcome.events {
            feedback.push(service.feedback(event.label(), &context).await.into_text());
        }
        feedback
    } else {
        Vec::new()
    };

    let report = AnalysisReport {
        source: args.path.display().to_string(),
        params,
        fps: outcome.fps,
        frames_processed: outcome.frames_processed,
        cancelled: outcome.cancelled,
        analyzed_at: chrono::Utc::now(),
        events: outcome.events,
        feedback,
    };

    if args.json {
        println!("{}", report.to_json_pretty()?);
        return Ok(());
    }

    println!(
        "  {} frames at {:.3} fps",
        report.frames_processed, report.fps
    );
    if report.events.is_empty() {
        println!("  No play events detected.");
    }
    for (i, event) in report.events.iter().enumerate() {
        println!("  {event}");
        if let Some(text) = report.feedback.get(i) {
            for line in text.lines() {
                println!("      {line}");
            }
        }
    }

    if report.cancelled {
        println!("\nAnalysis cancelled; results cover the frames read so far.");
    } else {
        println!("\nAnalysis complete: {} events.", report.events.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use courtside_play_model::params::AnalysisMode;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: AnalyzeArgs,
    }

    #[test]
    fn test_flags_override_config() {
        let cli = TestCli::parse_from(["courtside", "match.mp4", "--mode", "match", "--gap-sec", "3"]);
        let mut config = AppConfig::default();
        config.analysis.motion_threshold = 6.0;

        let params = AnalysisParams::coerce(&cli.args.raw_params(&config));
        assert_eq!(params.mode, AnalysisMode::Rally);
        assert_eq!(params.gap_sec, 3.0);
        assert_eq!(params.motion_threshold, 6.0);
        assert_eq!(params.alpha, 0.9);
    }

    #[test]
    fn test_context_from_flags() {
        let cli = TestCli::parse_from(["courtside", "clip.mp4", "--jersey", "9", "--position", "OH"]);
        assert_eq!(
            cli.args.context().render(),
            "Player jersey number: 9\nPlayer role/position: OH"
        );
    }
}
