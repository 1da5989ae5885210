//! Show stream properties of a video.

use std::path::PathBuf;

use courtside_media::probe_stream;
use courtside_play_model::timecode::format_time;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let info = probe_stream(&path)?;

    println!("Video: {}", path.display());
    println!("  Resolution: {}x{}", info.width, info.height);
    match info.fps {
        Some(fps) => println!("  Frame rate: {fps:.3} fps"),
        None => println!(
            "  Frame rate: unknown (analysis assumes {:.0} fps)",
            info.effective_fps()
        ),
    }
    match info.duration_secs {
        Some(secs) => println!("  Duration:   {}", format_time(secs)),
        None => println!("  Duration:   unknown"),
    }
    if let Some(frames) = info.frame_count {
        println!("  Frames:     {frames}");
    }

    Ok(())
}
