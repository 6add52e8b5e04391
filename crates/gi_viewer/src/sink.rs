//! Frame sinks for the headless viewer.

use std::path::{Path, PathBuf};

use gi_renderer::{sink_error, CameraCommand, Frame, FrameSink, RenderResult};

use crate::script::CommandScript;

/// Writes every frame to `<dir>/frame_NNNN.png` and replays a command script.
pub struct PngSequenceSink {
    dir: PathBuf,
    script: CommandScript,
    /// Index of the next frame to be rendered
    next_frame: u64,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    pub fn new<P: AsRef<Path>>(dir: P, script: CommandScript) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            script,
            next_frame: 1,
            written: Vec::new(),
        })
    }

    /// Files written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:04}.png", index))
    }
}

impl FrameSink for PngSequenceSink {
    fn deliver(&mut self, frame: &Frame<'_>) -> RenderResult<()> {
        let path = self.frame_path(frame.index);
        let width = u32::try_from(frame.width).map_err(sink_error)?;
        let height = u32::try_from(frame.height).map_err(sink_error)?;
        image::save_buffer(&path, frame.bytes, width, height, image::ColorType::Rgba8).map_err(sink_error)?;

        log::debug!("Wrote {}", path.display());
        self.written.push(path);
        self.next_frame = frame.index + 1;
        Ok(())
    }

    fn poll_commands(&mut self) -> Vec<CameraCommand> {
        self.script.take(self.next_frame)
    }
}
