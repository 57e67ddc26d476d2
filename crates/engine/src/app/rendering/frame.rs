use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::compositor::RenderSink;
use super::texture::Texture;

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// CPU framebuffer presenter. The buffer is kept at the compositor's
/// logical resolution; `pixels` scales it to the window surface.
pub struct FramePresenter {
    window: &'static Window,
    pixels: Pixels<'static>,
    logical_width: u32,
    logical_height: u32,
}

impl FramePresenter {
    pub fn new(
        window: &'static Window,
        logical_width: u32,
        logical_height: u32,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = build_pixels(
            window,
            size.width.max(1),
            size.height.max(1),
            logical_width,
            logical_height,
        )?;
        Ok(Self {
            window,
            pixels,
            logical_width,
            logical_height,
        })
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = build_pixels(
            self.window,
            width,
            height,
            self.logical_width,
            self.logical_height,
        )?;
        Ok(())
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    pub fn set_logical_size(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if (width, height) == (self.logical_width, self.logical_height) {
            return Ok(());
        }
        let size = self.window.inner_size();
        self.pixels = build_pixels(
            self.window,
            size.width.max(1),
            size.height.max(1),
            width,
            height,
        )?;
        self.logical_width = width;
        self.logical_height = height;
        Ok(())
    }

    pub fn clear(&mut self) {
        for chunk in self.pixels.frame_mut().chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }
    }

    pub fn present(&mut self) -> Result<(), Error> {
        self.pixels.render()
    }
}

fn build_pixels(
    window: &'static Window,
    surface_width: u32,
    surface_height: u32,
    logical_width: u32,
    logical_height: u32,
) -> Result<Pixels<'static>, Error> {
    let surface = SurfaceTexture::new(surface_width, surface_height, window);
    Pixels::new(logical_width, logical_height, surface)
}

impl RenderSink for FramePresenter {
    fn blit(
        &mut self,
        texture: &Texture,
        x: i32,
        y: i32,
        flip_vertical: bool,
        flip_horizontal: bool,
    ) {
        let width = self.logical_width;
        let height = self.logical_height;
        blit_rgba(
            self.pixels.frame_mut(),
            width,
            height,
            texture.rgba(),
            texture.width(),
            texture.height(),
            x,
            y,
            flip_vertical,
            flip_horizontal,
        );
    }
}

/// Copies an RGBA image onto the frame at top-left (x, y), clipped to the
/// frame bounds. Fully transparent source pixels are skipped so sprites
/// composite over whatever is already drawn.
#[allow(clippy::too_many_arguments)]
pub(crate) fn blit_rgba(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    src: &[u8],
    src_width: u32,
    src_height: u32,
    x: i32,
    y: i32,
    flip_vertical: bool,
    flip_horizontal: bool,
) {
    if src_width == 0 || src_height == 0 || frame_width == 0 || frame_height == 0 {
        return;
    }
    let expected_len = src_width as usize * src_height as usize * 4;
    if src.len() < expected_len {
        return;
    }

    let left = x.max(0);
    let top = y.max(0);
    let right = (x + src_width as i32).min(frame_width as i32);
    let bottom = (y + src_height as i32).min(frame_height as i32);
    if left >= right || top >= bottom {
        return;
    }

    let frame_row_stride = frame_width as usize * 4;
    let src_row_stride = src_width as usize * 4;

    for out_y in top..bottom {
        let dy = (out_y - y) as u32;
        let src_y = if flip_vertical { src_height - 1 - dy } else { dy };
        let src_row = src_y as usize * src_row_stride;
        let dst_row = out_y as usize * frame_row_stride;
        for out_x in left..right {
            let dx = (out_x - x) as u32;
            let src_x = if flip_horizontal { src_width - 1 - dx } else { dx };
            let src_offset = src_row + src_x as usize * 4;
            if src[src_offset + 3] == 0 {
                continue;
            }
            let dst_offset = dst_row + out_x as usize * 4;
            frame[dst_offset..dst_offset + 4].copy_from_slice(&src[src_offset..src_offset + 4]);
        }
    }
}
