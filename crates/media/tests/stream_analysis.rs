use courtside_common::error::{CourtsideError, CourtsideResult};
use courtside_media::{analyze_stream, CancelToken, DecodeQueue, FrameSource, MemoryFrameSource};
use courtside_play_model::event::PlayEventKind;
use courtside_play_model::frame::VideoFrame;
use courtside_play_model::params::{AnalysisMode, AnalysisParams, RawAnalysisParams};
use courtside_play_model::rally::RallyInterval;

const W: u32 = 8;
const H: u32 = 4;

fn solid(index: u64, value: u8) -> VideoFrame {
    VideoFrame::gray(index, W, H, vec![value; (W * H) as usize])
}

/// 180 frames whose frame-to-frame difference is 0 for frames 1..30,
/// 10 for frames 30..90, and 0 afterwards.
fn fixture_frames() -> Vec<VideoFrame> {
    (0..180u64)
        .map(|i| {
            let value = if (30..90).contains(&i) && (i - 30) % 2 == 0 {
                10
            } else {
                0
            };
            solid(i, value)
        })
        .collect()
}

fn fixture_params() -> AnalysisParams {
    AnalysisParams {
        mode: AnalysisMode::Rally,
        alpha: 0.0,
        motion_threshold: 4.0,
        gap_sec: 2.0,
        ..AnalysisParams::default()
    }
}

/// Yields `good` frames, then fails on every call.
struct BrokenAfter {
    inner: MemoryFrameSource,
    good: u64,
    read: u64,
}

impl FrameSource for BrokenAfter {
    fn fps(&self) -> Option<f64> {
        self.inner.fps()
    }

    fn next_frame(&mut self) -> CourtsideResult<Option<VideoFrame>> {
        if self.read == self.good {
            return Err(CourtsideError::decode("invalid NAL unit"));
        }
        self.read += 1;
        self.inner.next_frame()
    }
}

/// Trips a cancel token once `after` frames have been handed out.
struct CancelAfter {
    inner: MemoryFrameSource,
    cancel: CancelToken,
    after: u64,
    read: u64,
}

impl FrameSource for CancelAfter {
    fn fps(&self) -> Option<f64> {
        self.inner.fps()
    }

    fn next_frame(&mut self) -> CourtsideResult<Option<VideoFrame>> {
        self.read += 1;
        if self.read == self.after {
            self.cancel.cancel();
        }
        self.inner.next_frame()
    }
}

/// Trips a cancel token once `after` frames are out and stops in the same
/// call, the way a decoder does when the interrupt reaches it too.
struct EndsOnInterrupt {
    inner: MemoryFrameSource,
    cancel: CancelToken,
    after: u64,
    read: u64,
    fail: bool,
}

impl FrameSource for EndsOnInterrupt {
    fn fps(&self) -> Option<f64> {
        self.inner.fps()
    }

    fn next_frame(&mut self) -> CourtsideResult<Option<VideoFrame>> {
        if self.read == self.after {
            self.cancel.cancel();
            if self.fail {
                return Err(CourtsideError::decode("ffmpeg exited on signal 2"));
            }
            return Ok(None);
        }
        self.read += 1;
        self.inner.next_frame()
    }
}

fn flicker(count: u64) -> Vec<VideoFrame> {
    (0..count)
        .map(|i| solid(i, if i % 2 == 0 { 0 } else { 90 }))
        .collect()
}

#[test]
fn rally_fixture_through_frames() {
    let mut source = MemoryFrameSource::new(Some(30.0), fixture_frames());
    let outcome = analyze_stream(&mut source, &fixture_params(), &CancelToken::new()).unwrap();

    assert_eq!(outcome.frames_processed, 180);
    assert_eq!(outcome.rallies, vec![RallyInterval::new(30, 90)]);
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].formatted_timestamp(), "00:02.000");
    assert_eq!(outcome.events[0].label(), "Rally (2.0s) — analyze key sequence");
}

#[test]
fn rally_fixture_through_decode_queue() {
    let source = MemoryFrameSource::new(Some(30.0), fixture_frames());
    let mut queue = DecodeQueue::spawn(source, 4).unwrap();
    let outcome = analyze_stream(&mut queue, &fixture_params(), &CancelToken::new()).unwrap();
    assert_eq!(outcome.rallies, vec![RallyInterval::new(30, 90)]);
}

#[test]
fn missing_fps_defaults_to_thirty() {
    let mut source = MemoryFrameSource::new(None, fixture_frames());
    let outcome = analyze_stream(&mut source, &fixture_params(), &CancelToken::new()).unwrap();
    assert_eq!(outcome.fps, 30.0);
    assert_eq!(outcome.events[0].formatted_timestamp(), "00:02.000");
}

#[test]
fn mid_stream_failure_closes_open_rally_at_last_good_frame() {
    let frames = (0..120u64).map(|i| solid(i, if i % 2 == 0 { 0 } else { 90 }));
    let mut source = BrokenAfter {
        inner: MemoryFrameSource::new(Some(30.0), frames),
        good: 75,
        read: 0,
    };
    let outcome = analyze_stream(&mut source, &fixture_params(), &CancelToken::new()).unwrap();

    assert!(!outcome.cancelled);
    assert_eq!(outcome.frames_processed, 75);
    assert_eq!(outcome.rallies, vec![RallyInterval::new(1, 74)]);
    assert_eq!(outcome.events.len(), 1);
}

#[test]
fn failure_before_first_frame_is_fatal() {
    let mut source = BrokenAfter {
        inner: MemoryFrameSource::new(Some(30.0), fixture_frames()),
        good: 0,
        read: 0,
    };
    let err = analyze_stream(&mut source, &fixture_params(), &CancelToken::new()).unwrap_err();
    assert!(matches!(err, CourtsideError::Decode { .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn cancellation_discards_open_rally() {
    let cancel = CancelToken::new();
    // Motion for the first 60 frames opens a rally that never closes.
    let frames = (0..300u64).map(|i| solid(i, if i < 60 && i % 2 == 1 { 80 } else { 0 }));
    let mut source = CancelAfter {
        inner: MemoryFrameSource::new(Some(30.0), frames),
        cancel: cancel.clone(),
        after: 100,
        read: 0,
    };
    let outcome = analyze_stream(&mut source, &fixture_params(), &cancel).unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.frames_processed, 100);
    assert!(outcome.rallies.is_empty());
    assert!(outcome.events.is_empty());
}

#[test]
fn cancellation_keeps_closed_rallies() {
    let cancel = CancelToken::new();
    let mut source = CancelAfter {
        inner: MemoryFrameSource::new(Some(30.0), fixture_frames()),
        cancel: cancel.clone(),
        after: 170,
        read: 0,
    };
    let outcome = analyze_stream(&mut source, &fixture_params(), &cancel).unwrap();
    assert!(outcome.cancelled);
    assert_eq!(outcome.rallies, vec![RallyInterval::new(30, 90)]);
}

#[test]
fn interval_mode_follows_count_law() {
    let raw = RawAnalysisParams {
        mode: Some("clip".into()),
        interval_sec: Some(0.5),
        ..RawAnalysisParams::default()
    };
    let params = AnalysisParams::coerce(&raw);
    assert_eq!(params.interval_sec, 1.0);

    // 25 fps, 1 s cadence over 101 frames: floor(100 / 25) + 1 = 5.
    let frames = (0..101u64).map(|i| solid(i, (i % 251) as u8));
    let mut source = MemoryFrameSource::new(Some(25.0), frames);
    let outcome = analyze_stream(&mut source, &params, &CancelToken::new()).unwrap();

    let sampled: Vec<u64> = outcome
        .events
        .iter()
        .map(|event| match event.kind() {
            PlayEventKind::Sample { frame_index } => frame_index,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(sampled, vec![0, 25, 50, 75, 100]);
    assert!(outcome
        .events
        .iter()
        .all(|event| event.label() == "Frame sample — analyze moment"));
    assert_eq!(outcome.events[4].formatted_timestamp(), "00:04.000");
}

#[test]
fn interrupt_that_also_ends_the_stream_discards_open_rally() {
    let cancel = CancelToken::new();
    let mut source = EndsOnInterrupt {
        inner: MemoryFrameSource::new(Some(30.0), flicker(200)),
        cancel: cancel.clone(),
        after: 60,
        read: 0,
        fail: false,
    };
    let outcome = analyze_stream(&mut source, &fixture_params(), &cancel).unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.frames_processed, 60);
    assert!(outcome.rallies.is_empty());
    assert!(outcome.events.is_empty());
}

#[test]
fn interrupt_that_also_fails_the_decoder_discards_open_rally() {
    let cancel = CancelToken::new();
    let mut source = EndsOnInterrupt {
        inner: MemoryFrameSource::new(Some(30.0), flicker(200)),
        cancel: cancel.clone(),
        after: 60,
        read: 0,
        fail: true,
    };
    let outcome = analyze_stream(&mut source, &fixture_params(), &cancel).unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.frames_processed, 60);
    assert!(outcome.rallies.is_empty());
}

#[test]
fn unusable_frame_mid_stream_ends_the_stream() {
    let mut frames = flicker(99);
    frames.push(VideoFrame::gray(99, W, H, vec![0; 3]));
    frames.extend((100..140).map(|i| solid(i, 0)));
    let mut source = MemoryFrameSource::new(Some(30.0), frames);

    let outcome = analyze_stream(&mut source, &fixture_params(), &CancelToken::new()).unwrap();

    assert!(!outcome.cancelled);
    assert_eq!(outcome.frames_processed, 99);
    assert_eq!(outcome.rallies, vec![RallyInterval::new(1, 98)]);
    assert_eq!(outcome.events.len(), 1);
}

#[test]
fn unusable_first_frame_is_an_error() {
    let mut frames = vec![VideoFrame::gray(0, W, H, vec![0; 3])];
    frames.extend(flicker(10).into_iter().skip(1));
    let mut source = MemoryFrameSource::new(Some(30.0), frames);

    let err = analyze_stream(&mut source, &fixture_params(), &CancelToken::new()).unwrap_err();
    assert!(matches!(err, CourtsideError::Processing { .. }));
}
