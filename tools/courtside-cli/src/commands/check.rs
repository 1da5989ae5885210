//! Check external tools and credentials.

use courtside_common::config::AppConfig;
use courtside_media::ffmpeg::command_exists;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Courtside System Check");
    println!("{}", "=".repeat(50));

    let mut ready = true;
    for tool in ["ffmpeg", "ffprobe"] {
        if command_exists(tool) {
            println!("[OK] {tool} found");
        } else {
            println!("[MISSING] {tool} not found on PATH");
            ready = false;
        }
    }

    if config.feedback.api_key().is_some() {
        println!(
            "[OK] Feedback key set ({}, model {})",
            config.feedback.api_key_env, config.feedback.model
        );
    } else {
        println!(
            "[WARN] {} not set; coaching feedback will show setup placeholders",
            config.feedback.api_key_env
        );
    }

    println!();
    if ready {
        println!("Video analysis is ready.");
    } else {
        println!("Install ffmpeg (which provides ffprobe) to analyze videos.");
    }

    Ok(())
}
