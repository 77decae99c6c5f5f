//! Viewport and coordinate transformation for diagram rendering.
//!
//! Handles conversion between pixel coordinates (screen space) and world
//! coordinates (diagram space). Both use a top-left origin with y growing
//! downward, so the mapping is a plain scale and offset.

use std::fmt;

use flowkit_core::constants::{MAX_ZOOM, MIN_ZOOM, VIEW_PADDING};
use flowkit_core::{InteractionOptions, Point, Rect};

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl Viewport {
    /// Creates a viewport showing world (0,0) at the top-left pixel.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: 1.2,
        }
    }

    /// Takes zoom limits and step from the interaction options.
    pub fn with_options(canvas_width: f64, canvas_height: f64, options: &InteractionOptions) -> Self {
        let mut viewport = Self::new(canvas_width, canvas_height);
        viewport.min_zoom = options.min_zoom;
        viewport.max_zoom = options.max_zoom;
        viewport.zoom_step = options.zoom_step;
        viewport
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when window resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the configured limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / self.zoom_step);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a delta in pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn reset_pan(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Converts pixel coordinates to world coordinates.
    ///
    /// ```text
    /// world = (pixel - pan) / zoom
    /// ```
    pub fn pixel_to_world(&self, pixel_x: f64, pixel_y: f64) -> Point {
        Point::new(
            (pixel_x - self.pan_x) / self.zoom,
            (pixel_y - self.pan_y) / self.zoom,
        )
    }

    /// Converts world coordinates to pixel coordinates.
    ///
    /// ```text
    /// pixel = world * zoom + pan
    /// ```
    pub fn world_to_pixel(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (
            world_x * self.zoom + self.pan_x,
            world_y * self.zoom + self.pan_y,
        )
    }

    pub fn world_point_to_pixel(&self, point: &Point) -> (f64, f64) {
        self.world_to_pixel(point.x, point.y)
    }

    /// World rectangle currently visible on the canvas.
    pub fn visible_world(&self) -> Rect {
        let a = self.pixel_to_world(0.0, 0.0);
        let b = self.pixel_to_world(self.canvas_width, self.canvas_height);
        Rect::from_points(a, b)
    }

    /// Fits `bounds` into the viewport, keeping `padding` (fraction of the
    /// canvas, 0.0 - 0.5) free on each side, and centres it.
    pub fn fit_to_bounds(&mut self, bounds: &Rect, padding: f64) {
        let bounds = bounds.normalized();
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
            let c = bounds.center();
            self.center_on(c.x, c.y);
            return;
        }

        let padding_factor = (1.0 - padding * 2.0).max(0.0);
        let zoom_x = (self.canvas_width * padding_factor) / bounds.width;
        let zoom_y = (self.canvas_height * padding_factor) / bounds.height;
        let new_zoom = zoom_x.min(zoom_y);
        if !new_zoom.is_finite() || new_zoom <= 0.0 {
            return;
        }

        self.zoom = new_zoom.clamp(self.min_zoom, self.max_zoom);
        let c = bounds.center();
        self.center_on(c.x, c.y);
    }

    /// Zooms so that the world rectangle `rect` fills the canvas.
    pub fn zoom_to_rect(&mut self, rect: &Rect) {
        self.fit_to_bounds(rect, 0.0);
    }

    /// Fits the viewport to show `extent` with the default padding.
    pub fn fit_to_items(&mut self, extent: Option<Rect>) {
        match extent {
            Some(extent) => self.fit_to_bounds(&extent, VIEW_PADDING),
            None => self.reset(),
        }
    }

    /// Zooms to a point, maintaining that point's screen position.
    pub fn zoom_to_point(&mut self, world_point: &Point, new_zoom: f64) {
        if !new_zoom.is_finite() || new_zoom <= 0.0 {
            return;
        }
        let new_zoom = new_zoom.clamp(self.min_zoom, self.max_zoom);
        let (pixel_x, pixel_y) = self.world_point_to_pixel(world_point);
        self.zoom = new_zoom;
        self.pan_x = pixel_x - world_point.x * new_zoom;
        self.pan_y = pixel_y - world_point.y * new_zoom;
    }

    /// Zooms in at a specific world point (maintaining cursor position).
    pub fn zoom_in_at(&mut self, world_point: &Point) {
        self.zoom_to_point(world_point, self.zoom * self.zoom_step);
    }

    /// Zooms out at a specific world point (maintaining cursor position).
    pub fn zoom_out_at(&mut self, world_point: &Point) {
        self.zoom_to_point(world_point, self.zoom / self.zoom_step);
    }

    /// Centers the viewport on a world coordinate.
    pub fn center_on(&mut self, world_x: f64, world_y: f64) {
        self.pan_x = self.canvas_width / 2.0 - world_x * self.zoom;
        self.pan_y = self.canvas_height / 2.0 - world_y * self.zoom;
    }

    /// Resets viewport to default state (1:1 zoom, no pan).
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport(zoom: {:.2}x, pan: ({:.1}, {:.1}), canvas: {}x{})",
            self.zoom, self.pan_x, self.pan_y, self.canvas_width, self.canvas_height
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
