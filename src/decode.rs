use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Set of palette bit depths (1 through 8) a frame representation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitDepths(u8);

impl BitDepths {
    pub const ALL: Self = Self(0xFF);

    pub fn only(depths: &[u8]) -> Self {
        let mut mask = 0u8;
        for &depth in depths {
            if (1..=8).contains(&depth) {
                mask |= 1 << (depth - 1);
            }
        }
        Self(mask)
    }

    pub fn allows(self, depth: u8) -> bool {
        (1..=8).contains(&depth) && self.0 & (1 << (depth - 1)) != 0
    }
}

/// Number of times an animation repeats, from the Netscape loop extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iterations {
    Finite(u16),
    Infinite,
}

impl fmt::Display for Iterations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Iterations::Finite(n) => write!(f, "{n}"),
            Iterations::Infinite => write!(f, "infinite"),
        }
    }
}

impl From<gif::Repeat> for Iterations {
    fn from(repeat: gif::Repeat) -> Self {
        match repeat {
            gif::Repeat::Infinite => Iterations::Infinite,
            gif::Repeat::Finite(n) => Iterations::Finite(n),
        }
    }
}

/// One fully composited frame: logical-screen RGBA pixels plus its display
/// duration in milliseconds.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<u8>,
    pub duration_ms: u32,
}

#[derive(Debug, Clone)]
pub struct GifAnimation {
    pub iterations: Iterations,
    pub width: u16,
    pub height: u16,
    pub frames: Vec<Frame>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("IO error reading gif stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed gif data: {0}")]
    Format(String),
    #[error("unsupported palette bit depth: {depth}")]
    UnsupportedBitDepth { depth: u8 },
}

impl From<gif::DecodingError> for DecodeError {
    fn from(err: gif::DecodingError) -> Self {
        match err {
            gif::DecodingError::Io(e) => DecodeError::Io(e),
            gif::DecodingError::Format(e) => DecodeError::Format(e.to_string()),
        }
    }
}

/// Decoding capability the inspector is wired against. Implementations
/// consume a byte stream and produce the animation's iteration count,
/// logical-screen size and frame sequence.
pub trait DecodeGif {
    fn decode(
        &self,
        reader: &mut dyn Read,
        depths: BitDepths,
    ) -> Result<GifAnimation, DecodeError>;
}

/// Decoder backed by the `gif` crate. Frames are expanded to RGBA and
/// composited onto the logical screen, honoring per-frame offsets,
/// transparency and disposal methods, so every produced frame is a complete
/// image of the animation at that point.
pub struct RgbaDecoder;

impl DecodeGif for RgbaDecoder {
    fn decode(
        &self,
        reader: &mut dyn Read,
        depths: BitDepths,
    ) -> Result<GifAnimation, DecodeError> {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = options.read_info(reader)?;

        let width = decoder.width();
        let height = decoder.height();

        if let Some(palette) = decoder.global_palette() {
            check_depth(palette, depths)?;
        }

        let mut canvas = vec![0u8; usize::from(width) * usize::from(height) * 4];
        let mut frames = Vec::new();

        while let Some(frame) = decoder.read_next_frame()? {
            if let Some(palette) = &frame.palette {
                check_depth(palette, depths)?;
            }

            let backup = match frame.dispose {
                gif::DisposalMethod::Previous => Some(canvas.clone()),
                _ => None,
            };

            blit(&mut canvas, width, height, frame);

            frames.push(Frame {
                width,
                height,
                pixels: canvas.clone(),
                duration_ms: u32::from(frame.delay) * 10,
            });

            match frame.dispose {
                gif::DisposalMethod::Background => clear_region(&mut canvas, width, height, frame),
                gif::DisposalMethod::Previous => {
                    if let Some(previous) = backup {
                        canvas = previous;
                    }
                }
                _ => {}
            }
        }

        Ok(GifAnimation {
            iterations: decoder.repeat().into(),
            width,
            height,
            frames,
        })
    }
}

/// Opens `path` for reading and decodes it with the given decoder.
pub fn load_gif_file(
    path: &Path,
    decoder: &dyn DecodeGif,
    depths: BitDepths,
) -> crate::Result<GifAnimation> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    Ok(decoder.decode(&mut reader, depths)?)
}

fn palette_depth(palette: &[u8]) -> u8 {
    let colors = (palette.len() / 3).max(2);
    (colors.next_power_of_two().trailing_zeros() as u8).min(8)
}

fn check_depth(palette: &[u8], depths: BitDepths) -> Result<(), DecodeError> {
    let depth = palette_depth(palette);
    if depths.allows(depth) {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedBitDepth { depth })
    }
}

// Copies the frame's non-transparent pixels into the canvas at the frame's
// offset. Pixels falling outside the logical screen are dropped.
fn blit(canvas: &mut [u8], width: u16, height: u16, frame: &gif::Frame<'_>) {
    let canvas_w = usize::from(width);
    let canvas_h = usize::from(height);
    let frame_w = usize::from(frame.width);

    for row in 0..usize::from(frame.height) {
        let y = usize::from(frame.top) + row;
        if y >= canvas_h {
            break;
        }
        for col in 0..frame_w {
            let x = usize::from(frame.left) + col;
            if x >= canvas_w {
                break;
            }
            let src = (row * frame_w + col) * 4;
            if frame.buffer[src + 3] == 0 {
                continue;
            }
            let dst = (y * canvas_w + x) * 4;
            canvas[dst..dst + 4].copy_from_slice(&frame.buffer[src..src + 4]);
        }
    }
}

fn clear_region(canvas: &mut [u8], width: u16, height: u16, frame: &gif::Frame<'_>) {
    let canvas_w = usize::from(width);
    let canvas_h = usize::from(height);

    for row in 0..usize::from(frame.height) {
        let y = usize::from(frame.top) + row;
        if y >= canvas_h {
            break;
        }
        for col in 0..usize::from(frame.width) {
            let x = usize::from(frame.left) + col;
            if x >= canvas_w {
                break;
            }
            let dst = (y * canvas_w + x) * 4;
            canvas[dst..dst + 4].fill(0);
        }
    }
}
