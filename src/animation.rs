//! Animated GIF decoding and compositing.
//!
//! Frames in a GIF are patches placed somewhere on a logical screen, each
//! with a disposal method describing what happens to the screen before the
//! next patch is drawn. This module replays those patches onto a persistent
//! canvas and renders every composited canvas with the static renderer.
//!
//! The canvas is the size of the first frame. Later patches are clipped to
//! it, so a file declaring a huge screen costs no more than its frames.
//!
//! At most [`MAX_FRAMES`] frames are decoded; the rest of the file is never
//! read.

use image::{Rgba, RgbaImage};

use crate::render::{render, RenderRequest};

/// Hard cap on decoded frames per animation.
pub const MAX_FRAMES: usize = 50;

/// What happens to the canvas after a frame has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    /// No disposal specified; the canvas is kept
    Unspecified,
    /// Leave the frame in place and draw the next one on top
    Combine,
    /// Clear the canvas to transparent
    RestoreBackground,
    /// Put back the canvas as it was before this frame was drawn
    RestorePrevious,
}

impl From<gif::DisposalMethod> for Disposal {
    fn from(method: gif::DisposalMethod) -> Self {
        match method {
            gif::DisposalMethod::Any => Disposal::Unspecified,
            gif::DisposalMethod::Keep => Disposal::Combine,
            gif::DisposalMethod::Background => Disposal::RestoreBackground,
            gif::DisposalMethod::Previous => Disposal::RestorePrevious,
        }
    }
}

/// Errors from decoding an animation.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("failed to parse GIF: {0}")]
    Parse(#[from] gif::DecodingError),

    #[error("animation contains no frames")]
    NoFrames,

    #[error("all {0} frames failed to render")]
    AllFramesFailed(usize),
}

/// One frame as stored in the container: an RGBA patch and its placement.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// RGBA pixels, `width * height * 4` bytes
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub top: u32,
    pub disposal: Disposal,
}

/// A parsed container: canvas size (the first frame's) and up to `limit`
/// raw frames.
#[derive(Debug, Clone)]
pub struct ParsedAnimation {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<RawFrame>,
}

/// Parse a GIF into raw frames, stopping after `limit` frames.
pub fn parse_frames(bytes: &[u8], limit: usize) -> Result<ParsedAnimation, AnimationError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(bytes)?;

    let mut frames = Vec::new();

    while frames.len() < limit {
        let Some(frame) = decoder.read_next_frame()? else {
            break;
        };
        frames.push(RawFrame {
            pixels: frame.buffer.to_vec(),
            width: frame.width as u32,
            height: frame.height as u32,
            left: frame.left as u32,
            top: frame.top as u32,
            disposal: frame.dispose.into(),
        });
    }

    if frames.len() == limit {
        log::info!("Frame cap of {} reached, remaining frames dropped", limit);
    }

    // The canvas follows the first frame; the declared screen size is ignored
    let (width, height) = frames
        .first()
        .map(|first| (first.width, first.height))
        .unwrap_or((0, 0));

    Ok(ParsedAnimation {
        width,
        height,
        frames,
    })
}

/// Replays raw frames onto a persistent canvas.
#[derive(Debug, Clone)]
pub struct Compositor {
    canvas: RgbaImage,
    /// Canvas as it was before the most recent frame was painted
    snapshot: Option<RgbaImage>,
    pending: Option<Disposal>,
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            snapshot: None,
            pending: None,
        }
    }

    /// Apply the previous frame's disposal, paint `frame`, and return the
    /// composited canvas.
    pub fn composite(&mut self, frame: &RawFrame) -> &RgbaImage {
        match self.pending {
            Some(Disposal::RestoreBackground) => {
                self.canvas.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
            }
            Some(Disposal::RestorePrevious) => {
                if let Some(snapshot) = &self.snapshot {
                    self.canvas.clone_from(snapshot);
                }
            }
            _ => {}
        }

        self.snapshot = Some(self.canvas.clone());
        self.paint(frame);
        self.pending = Some(frame.disposal);

        &self.canvas
    }

    /// Copy the patch onto the canvas, leaving transparent pixels alone.
    fn paint(&mut self, frame: &RawFrame) {
        let canvas_width = self.canvas.width();
        let canvas_height = self.canvas.height();
        let row_len = frame.width as usize * 4;
        if row_len == 0 {
            return;
        }

        for (row, line) in frame.pixels.chunks_exact(row_len).enumerate() {
            let y = frame.top + row as u32;
            if y >= canvas_height {
                break;
            }
            for (col, px) in line.chunks_exact(4).enumerate() {
                let x = frame.left + col as u32;
                if x >= canvas_width {
                    break;
                }
                if px[3] == 0 {
                    continue;
                }
                self.canvas.put_pixel(x, y, Rgba([px[0], px[1], px[2], px[3]]));
            }
        }
    }
}

/// Result of decoding and rendering an animation.
#[derive(Debug, Clone)]
pub struct DecodedAnimation {
    /// Rendered frames in source order
    pub frames: Vec<String>,
    /// Number of raw frames read from the container (capped)
    pub source_frames: usize,
}

/// Decode a GIF and render each composited frame.
///
/// Yields to the runtime after every frame. A frame that fails to render is
/// logged and skipped.
pub async fn decode_frames(
    bytes: &[u8],
    request: &RenderRequest,
) -> Result<DecodedAnimation, AnimationError> {
    let parsed = parse_frames(bytes, MAX_FRAMES)?;
    if parsed.frames.is_empty() {
        return Err(AnimationError::NoFrames);
    }
    tokio::task::yield_now().await;

    let total = parsed.frames.len();
    log::info!("Processing {} frames from GIF", total);

    let mut compositor = Compositor::new(parsed.width, parsed.height);
    let mut frames = Vec::with_capacity(total);

    for (i, frame) in parsed.frames.iter().enumerate() {
        let canvas = compositor.composite(frame);
        match render(canvas, request) {
            Ok(text) => {
                frames.push(text);
                log::debug!("Processed frame {}/{}", i + 1, total);
            }
            Err(e) => log::error!("Error processing frame {}: {}", i, e),
        }
        tokio::task::yield_now().await;
    }

    if frames.is_empty() {
        return Err(AnimationError::AllFramesFailed(total));
    }

    log::info!("Completed processing {} frames", frames.len());
    Ok(DecodedAnimation {
        frames,
        source_frames: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(width: u32, height: u32, rgba: [u8; 4], left: u32, top: u32, disposal: Disposal) -> RawFrame {
        RawFrame {
            pixels: rgba.repeat((width * height) as usize),
            width,
            height,
            left,
            top,
            disposal,
        }
    }

    #[test]
    fn test_paint_places_patch_at_offset() {
        let mut compositor = Compositor::new(4, 4);
        let canvas = compositor.composite(&patch(2, 2, [255, 0, 0, 255], 1, 2, Disposal::Combine));
        assert_eq!(canvas.get_pixel(1, 2).0, [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(2, 3).0, [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(3, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_transparent_pixels_show_through() {
        let mut compositor = Compositor::new(2, 1);
        compositor.composite(&patch(2, 1, [9, 9, 9, 255], 0, 0, Disposal::Combine));
        let mut overlay = patch(2, 1, [200, 200, 200, 255], 0, 0, Disposal::Combine);
        overlay.pixels[3] = 0; // first pixel transparent
        let canvas = compositor.composite(&overlay);
        assert_eq!(canvas.get_pixel(0, 0).0, [9, 9, 9, 255]);
        assert_eq!(canvas.get_pixel(1, 0).0, [200, 200, 200, 255]);
    }

    #[test]
    fn test_patch_clipped_to_canvas() {
        let mut compositor = Compositor::new(2, 2);
        let canvas = compositor.composite(&patch(3, 3, [1, 2, 3, 255], 1, 1, Disposal::Combine));
        assert_eq!(canvas.get_pixel(1, 1).0, [1, 2, 3, 255]);
        assert_eq!(canvas.dimensions(), (2, 2));
    }

    #[test]
    fn test_restore_background_clears_before_next_frame() {
        let mut compositor = Compositor::new(2, 1);
        compositor.composite(&patch(1, 1, [50, 50, 50, 255], 0, 0, Disposal::RestoreBackground));
        let canvas = compositor.composite(&patch(1, 1, [70, 70, 70, 255], 1, 0, Disposal::Combine));
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(1, 0).0, [70, 70, 70, 255]);
    }

    #[test]
    fn test_combine_and_unspecified_keep_canvas() {
        for disposal in [Disposal::Combine, Disposal::Unspecified] {
            let mut compositor = Compositor::new(2, 1);
            compositor.composite(&patch(1, 1, [50, 50, 50, 255], 0, 0, disposal));
            let canvas = compositor.composite(&patch(1, 1, [70, 70, 70, 255], 1, 0, Disposal::Combine));
            assert_eq!(canvas.get_pixel(0, 0).0, [50, 50, 50, 255]);
        }
    }

    #[test]
    fn test_restore_previous_undoes_last_frame() {
        let mut compositor = Compositor::new(2, 1);
        compositor.composite(&patch(1, 1, [10, 10, 10, 255], 0, 0, Disposal::Combine));
        compositor.composite(&patch(1, 1, [99, 99, 99, 255], 1, 0, Disposal::RestorePrevious));
        let canvas = compositor.composite(&patch(1, 1, [30, 30, 30, 255], 0, 0, Disposal::Combine));
        assert_eq!(canvas.get_pixel(0, 0).0, [30, 30, 30, 255]);
        // The right pixel from the restore-previous frame is gone again
        assert_eq!(canvas.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_disposal_from_gif() {
        assert_eq!(Disposal::from(gif::DisposalMethod::Any), Disposal::Unspecified);
        assert_eq!(Disposal::from(gif::DisposalMethod::Keep), Disposal::Combine);
        assert_eq!(Disposal::from(gif::DisposalMethod::Background), Disposal::RestoreBackground);
        assert_eq!(Disposal::from(gif::DisposalMethod::Previous), Disposal::RestorePrevious);
    }

    #[test]
    fn test_parse_rejects_non_gif() {
        let err = parse_frames(b"definitely not a gif", MAX_FRAMES).unwrap_err();
        assert!(matches!(err, AnimationError::Parse(_)));
    }
}
