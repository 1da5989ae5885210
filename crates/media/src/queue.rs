//! Bounded read-ahead between the decoder and the analysis loop.
//!
//! A dedicated thread pulls frames from the wrapped source into a bounded
//! channel so decoding overlaps with motion extraction. Frame order is
//! preserved; the consumer sees the same sequence the source produced.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::JoinHandle;

use courtside_common::error::{CourtsideError, CourtsideResult};
use courtside_play_model::frame::VideoFrame;

use crate::source::FrameSource;

enum DecodeMessage {
    Frame(VideoFrame),
    Failed(CourtsideError),
}

/// A [`FrameSource`] backed by a decoder thread and a bounded queue.
pub struct DecodeQueue {
    fps: Option<f64>,
    receiver: Option<Receiver<DecodeMessage>>,
    worker: Option<JoinHandle<()>>,
}

impl DecodeQueue {
    /// Move `source` onto a decode thread that keeps at most `depth` frames buffered.
    pub fn spawn<S>(mut source: S, depth: usize) -> CourtsideResult<Self>
    where
        S: FrameSource + Send + 'static,
    {
        let fps = source.fps();
        let (sender, receiver) = mpsc::sync_channel(depth.max(1));

        let worker = std::thread::Builder::new()
            .name("courtside-decode".to_string())
            .spawn(move || decode_loop(&mut source, &sender))
            .map_err(|e| CourtsideError::decode(format!("Failed to start decode thread: {e}")))?;

        Ok(Self {
            fps,
            receiver: Some(receiver),
            worker: Some(worker),
        })
    }

    fn shutdown(&mut self) {
        // Dropping the receiver unblocks a sender waiting on a full queue.
        self.receiver = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("Decode thread panicked");
            }
        }
    }
}

fn decode_loop<S: FrameSource>(source: &mut S, sender: &SyncSender<DecodeMessage>) {
    loop {
        let message = match source.next_frame() {
            Ok(Some(frame)) => DecodeMessage::Frame(frame),
            Ok(None) => break,
            Err(err) => DecodeMessage::Failed(err),
        };
        let failed = matches!(message, DecodeMessage::Failed(_));
        if sender.send(message).is_err() || failed {
            break;
        }
    }
    tracing::trace!("Decode thread exiting");
}

impl FrameSource for DecodeQueue {
    fn fps(&self) -> Option<f64> {
        self.fps
    }

    fn next_frame(&mut self) -> CourtsideResult<Option<VideoFrame>> {
        let Some(receiver) = self.receiver.as_ref() else {
            return Ok(None);
        };
        match receiver.recv() {
            Ok(DecodeMessage::Frame(frame)) => Ok(Some(frame)),
            Ok(DecodeMessage::Failed(err)) => {
                self.shutdown();
                Err(err)
            }
            Err(_) => {
                self.shutdown();
                Ok(None)
            }
        }
    }
}

impl Drop for DecodeQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}
