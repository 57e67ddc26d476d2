use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::texture::{Texture, TextureHandle};

/// One queued draw. `layer` alone decides draw order; items on the same
/// layer come out in unspecified order. `overlay` items bypass the camera
/// transform and draw at their raw position.
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub texture: TextureHandle,
    pub x: i32,
    pub y: i32,
    pub flip_vertical: bool,
    pub flip_horizontal: bool,
    pub layer: i32,
    pub overlay: bool,
}

impl PartialEq for DrawItem {
    fn eq(&self, other: &Self) -> bool {
        self.layer == other.layer
    }
}

impl Eq for DrawItem {}

impl PartialOrd for DrawItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DrawItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.layer.cmp(&other.layer)
    }
}

/// Destination for flushed draw items. The loop runner hands the compositor
/// a framebuffer presenter; tests hand it a recording sink.
pub trait RenderSink {
    fn blit(&mut self, texture: &Texture, x: i32, y: i32, flip_vertical: bool, flip_horizontal: bool);
}

/// Per-frame draw queue plus the camera state used to place world items on
/// screen. The queue never carries items across frames; `flush` drains it.
pub struct Compositor {
    queue: BinaryHeap<Reverse<DrawItem>>,
    center_x: i32,
    center_y: i32,
    logical_width: u32,
    logical_height: u32,
}

impl Compositor {
    pub fn new(logical_width: u32, logical_height: u32) -> Self {
        Self {
            queue: BinaryHeap::new(),
            center_x: 0,
            center_y: 0,
            logical_width,
            logical_height,
        }
    }

    pub fn enqueue(&mut self, item: DrawItem) {
        self.queue.push(Reverse(item));
    }

    /// Point in world pixels the viewport is centered on.
    pub fn set_center(&mut self, x: i32, y: i32) {
        self.center_x = x;
        self.center_y = y;
    }

    pub fn center(&self) -> (i32, i32) {
        (self.center_x, self.center_y)
    }

    pub fn set_logical_size(&mut self, width: u32, height: u32) {
        self.logical_width = width;
        self.logical_height = height;
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Draws and drops every queued item in ascending layer order. World
    /// items land at `item - center + viewport / 2`; overlay items keep
    /// their raw position.
    pub fn flush(&mut self, sink: &mut dyn RenderSink) {
        let half_w = self.logical_width as i32 / 2;
        let half_h = self.logical_height as i32 / 2;
        while let Some(Reverse(item)) = self.queue.pop() {
            let (x, y) = if item.overlay {
                (item.x, item.y)
            } else {
                (item.x - self.center_x + half_w, item.y - self.center_y + half_h)
            };
            sink.blit(
                item.texture.texture(),
                x,
                y,
                item.flip_vertical,
                item.flip_horizontal,
            );
        }
    }
}
