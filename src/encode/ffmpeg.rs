use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{GlyphreelError, GlyphreelResult};

/// Frame rate of every progress video.
pub const DEFAULT_FPS: u32 = 10;
/// Video codec passed to `ffmpeg -vcodec`.
pub const DEFAULT_CODEC: &str = "mpeg4";

/// One image-sequence to MP4 encode.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// printf-style input pattern, e.g. `out/wo.%02d.png`.
    pub input_pattern: PathBuf,
    /// Number of the first frame in the sequence.
    pub start_number: u32,
    pub fps: u32,
    pub codec: String,
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> GlyphreelResult<()> {
        if self.fps == 0 {
            return Err(GlyphreelError::validation("encode fps must be non-zero"));
        }
        if self.codec.trim().is_empty() {
            return Err(GlyphreelError::validation("encode codec must be set"));
        }
        if self.input_pattern.as_os_str().is_empty() {
            return Err(GlyphreelError::validation(
                "encode input pattern must be set",
            ));
        }
        Ok(())
    }

    /// The `ffmpeg` invocation for this encode, not yet spawned.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-framerate",
            &self.fps.to_string(),
            "-start_number",
            &self.start_number.to_string(),
            "-i",
        ])
        .arg(&self.input_pattern)
        .args([
            // Crops rendered at odd pixel sizes would be rejected for 4:2:0 output.
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-vcodec",
            &self.codec,
        ])
        .arg(&self.out_path);
        cmd
    }
}

/// Defaults for a worksheet progress video.
pub fn default_mp4_config(
    input_pattern: impl Into<PathBuf>,
    out_path: impl Into<PathBuf>,
) -> EncodeConfig {
    EncodeConfig {
        input_pattern: input_pattern.into(),
        start_number: 0,
        fps: DEFAULT_FPS,
        codec: DEFAULT_CODEC.to_owned(),
        out_path: out_path.into(),
        overwrite: true,
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> GlyphreelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Join a numbered PNG sequence into a video with the system `ffmpeg`.
///
/// A non-zero exit status is reported as [`GlyphreelError::Encode`] with ffmpeg's stderr.
#[tracing::instrument(skip(cfg), fields(out = %cfg.out_path.display()))]
pub fn encode_image_sequence(cfg: &EncodeConfig) -> GlyphreelResult<()> {
    cfg.validate()?;
    ensure_parent_dir(&cfg.out_path)?;

    if !cfg.overwrite && cfg.out_path.exists() {
        return Err(GlyphreelError::validation(format!(
            "output file '{}' already exists",
            cfg.out_path.display()
        )));
    }

    if !is_ffmpeg_on_path() {
        return Err(GlyphreelError::encode(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    let output = cfg.command().output().map_err(|e| {
        GlyphreelError::encode(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GlyphreelError::encode(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    tracing::info!("wrote video");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
