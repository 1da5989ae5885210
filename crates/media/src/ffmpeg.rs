//! Video probing and decoding through the ffmpeg command-line tools.
//!
//! `ffprobe` reports geometry and frame rate; `ffmpeg` decodes the first
//! video stream to raw 8-bit grayscale on stdout, one frame after another.

use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use serde::Deserialize;

use courtside_common::error::{CourtsideError, CourtsideResult};
use courtside_play_model::frame::{FrameIndex, StreamInfo, VideoFrame};

use crate::source::FrameSource;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Whether a binary can be found on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Read stream properties of the first video stream.
pub fn probe_stream(path: &Path) -> CourtsideResult<StreamInfo> {
    if !path.is_file() {
        return Err(CourtsideError::decode(format!(
            "Video file not found: {}",
            path.display()
        )));
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate,nb_frames:format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| CourtsideError::decode(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(CourtsideError::decode(format!(
            "ffprobe could not read {} ({}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&raw).map_err(|e| {
        CourtsideError::decode(format!("Unusable ffprobe output for {}: {e}", path.display()))
    })
}

fn parse_probe_output(raw: &str) -> Result<StreamInfo, String> {
    let probe: ProbeOutput = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let stream = probe
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| "no video stream".to_string())?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err("video stream has no dimensions".to_string()),
    };

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rational)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rational));

    Ok(StreamInfo {
        width,
        height,
        fps,
        duration_secs: probe
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0),
        frame_count: stream.nb_frames.and_then(|n| n.parse::<u64>().ok()),
    })
}

/// Parse an ffmpeg rational such as `30000/1001`; zero and malformed values are `None`.
fn parse_rational(value: &str) -> Option<f64> {
    let (num, den) = match value.split_once('/') {
        Some((n, d)) => (n.trim().parse::<f64>().ok()?, d.trim().parse::<f64>().ok()?),
        None => (value.trim().parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 {
        return None;
    }
    let rate = num / den;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Decodes a video file into grayscale frames with an `ffmpeg` child process.
pub struct FfmpegFrameSource {
    path: PathBuf,
    info: StreamInfo,
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr_task: Option<JoinHandle<String>>,
    frame_len: usize,
    next_index: FrameIndex,
    finished: bool,
}

impl FfmpegFrameSource {
    /// Probe the file and start decoding.
    ///
    /// Fails with a decode error when the file is missing, unreadable, or
    /// when the ffmpeg tools cannot be started.
    pub fn open(path: impl AsRef<Path>) -> CourtsideResult<Self> {
        let path = path.as_ref().to_path_buf();
        let info = probe_stream(&path)?;

        let mut command = Command::new("ffmpeg");
        command
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(&path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "gray", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Keep a terminal Ctrl-C away from the decoder; cancellation goes
        // through the analysis loop and `Drop` stops the child.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| CourtsideError::decode(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CourtsideError::decode("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CourtsideError::decode("Failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently so ffmpeg never blocks on a full pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        tracing::info!(
            path = %path.display(),
            pid = child.id(),
            width = info.width,
            height = info.height,
            fps = ?info.fps,
            "ffmpeg decoder started"
        );

        Ok(Self {
            frame_len: info.width as usize * info.height as usize,
            path,
            info,
            child,
            stdout: BufReader::with_capacity(1 << 20, stdout),
            stderr_task: Some(stderr_task),
            next_index: 0,
            finished: false,
        })
    }

    /// Reap the child process once stdout is exhausted.
    fn finish(&mut self) -> CourtsideResult<()> {
        self.finished = true;
        let status = self
            .child
            .wait()
            .map_err(|e| CourtsideError::decode(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_output = self
            .stderr_task
            .take()
            .and_then(|task| task.join().ok())
            .unwrap_or_default();

        if status.success() {
            tracing::debug!(frames = self.next_index, "ffmpeg decoder finished");
            return Ok(());
        }

        let message = format!(
            "ffmpeg failed on {} (status {}): {}",
            self.path.display(),
            status,
            stderr_output.trim()
        );
        if self.next_index == 0 {
            return Err(CourtsideError::decode(message));
        }
        tracing::warn!(frames = self.next_index, "{message}");
        Ok(())
    }
}

impl FrameSource for FfmpegFrameSource {
    fn fps(&self) -> Option<f64> {
        self.info.fps
    }

    fn next_frame(&mut self) -> CourtsideResult<Option<VideoFrame>> {
        if self.finished {
            return Ok(None);
        }

        let mut data = vec![0u8; self.frame_len];
        match self.stdout.read_exact(&mut data) {
            Ok(()) => {
                let frame = VideoFrame::gray(self.next_index, self.info.width, self.info.height, data);
                self.next_index += 1;
                Ok(Some(frame))
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.finish()?;
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                Err(CourtsideError::decode(format!(
                    "Failed reading frame {} from ffmpeg: {e}",
                    self.next_index
                )))
            }
        }
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
