//! Viewport camera: the screen <-> canvas affine mapping and zoom bounds.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default zoom bounds. Hosts can widen or narrow these per canvas.
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;
pub const DEFAULT_MAX_ZOOM: f64 = 8.0;

/// Camera manages the view transform for one canvas.
///
/// It owns the pan offset and uniform scale that map canvas coordinates
/// to screen coordinates. The scale is always kept within
/// `[min_zoom, max_zoom]`; requests outside the bounds are clamped,
/// never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen units.
    pub offset: Vec2,
    /// Current uniform scale.
    zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a camera with the identity transform and default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom bounds.
    pub fn with_zoom_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    /// The forward transform: canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// The inverse transform: screen coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Current uniform scale.
    pub fn report_zoom(&self) -> f64 {
        self.zoom
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the pan offset and zoom directly, clamping zoom to bounds.
    /// Used by the transition driver; non-finite values are ignored.
    pub fn set_view(&mut self, offset: Vec2, zoom: f64) {
        if !offset.x.is_finite() || !offset.y.is_finite() || !zoom.is_finite() {
            return;
        }
        self.offset = offset;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Zoom to an absolute scale, keeping the canvas point currently
    /// under `screen_anchor` fixed under it.
    ///
    /// `target_scale` is clamped to the zoom bounds. A non-finite scale
    /// or one that clamps to the current zoom leaves the camera
    /// unchanged.
    pub fn zoom_to_point(&mut self, screen_anchor: Point, target_scale: f64) {
        if !target_scale.is_finite() {
            log::debug!("zoom_to_point ignored non-finite scale");
            return;
        }
        let new_zoom = target_scale.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Anchor point in canvas space before the zoom changes.
        let anchor_canvas = self.screen_to_canvas(screen_anchor);

        self.zoom = new_zoom;

        // Adjust the offset so anchor_canvas maps back onto the anchor.
        let new_screen = self.canvas_to_screen(anchor_canvas);
        self.offset += Vec2::new(
            screen_anchor.x - new_screen.x,
            screen_anchor.y - new_screen.y,
        );
    }

    /// Zoom by a multiplicative factor about `screen_anchor`.
    pub fn zoom_by(&mut self, screen_anchor: Point, factor: f64) {
        self.zoom_to_point(screen_anchor, self.zoom * factor);
    }

    /// Fit `content_bounds`, inflated by `padding` on every side, inside
    /// `viewport` at the maximal scale the zoom bounds allow, centered.
    ///
    /// Degenerate bounds (zero or negative area, non-finite) leave the
    /// camera unchanged.
    pub fn zoom_to_fit(&mut self, content_bounds: Rect, viewport: Size, padding: f64) {
        if !is_fittable(content_bounds) || viewport.width <= 0.0 || viewport.height <= 0.0 {
            log::debug!("zoom_to_fit ignored degenerate bounds {content_bounds:?}");
            return;
        }

        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / content_bounds.width();
        let scale_y = padded_viewport.height / content_bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        // Center the bounds in the viewport.
        let bounds_center = content_bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

        self.offset = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }

    /// The view a `zoom_to_fit` call would produce, without mutating.
    /// Returns `None` for degenerate input. Used to build animated fits.
    pub fn fitted_view(&self, content_bounds: Rect, viewport: Size, padding: f64) -> Option<(Vec2, f64)> {
        let mut probe = self.clone();
        probe.zoom_to_fit(content_bounds, viewport, padding);
        if probe == *self {
            // Either degenerate input or the camera already fits exactly.
            if !is_fittable(content_bounds) || viewport.width <= 0.0 || viewport.height <= 0.0 {
                return None;
            }
        }
        Some((probe.offset, probe.zoom))
    }

    /// The view a `zoom_to_point` call would produce, without mutating.
    pub fn zoomed_view(&self, screen_anchor: Point, target_scale: f64) -> (Vec2, f64) {
        let mut probe = self.clone();
        probe.zoom_to_point(screen_anchor, target_scale);
        (probe.offset, probe.zoom)
    }

    /// Reset to the identity view.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
    }
}

fn is_fittable(bounds: Rect) -> bool {
    bounds.width() > 0.0
        && bounds.height() > 0.0
        && bounds.x0.is_finite()
        && bounds.y0.is_finite()
        && bounds.x1.is_finite()
        && bounds.y1.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let camera = Camera::new();
        let p = Point::new(123.0, 456.0);
        let q = camera.canvas_to_screen(p);
        assert!((q.x - p.x).abs() < f64::EPSILON);
        assert!((q.y - p.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom_to_point(Point::ZERO, 1.5);

        let original = Point::new(123.0, 456.0);
        let canvas = camera.screen_to_canvas(original);
        let back = camera.canvas_to_screen(canvas);

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_to_point(Point::ZERO, 0.0001);
        assert!((camera.report_zoom() - camera.min_zoom).abs() < f64::EPSILON);

        camera.zoom_to_point(Point::ZERO, 1000.0);
        assert!((camera.report_zoom() - camera.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_preserves_anchor() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(40.0, -10.0);

        let anchor = Point::new(200.0, 150.0);
        let before = camera.screen_to_canvas(anchor);
        camera.zoom_to_point(anchor, 2.5);
        let after = camera.screen_to_canvas(anchor);

        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_to_same_scale_is_noop() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(5.0, 7.0);
        let before = camera.clone();
        camera.zoom_to_point(Point::new(100.0, 100.0), camera.report_zoom());
        assert_eq!(camera, before);
    }

    #[test]
    fn test_non_finite_scale_is_noop() {
        let mut camera = Camera::new();
        let before = camera.clone();
        camera.zoom_to_point(Point::ZERO, f64::NAN);
        camera.zoom_to_point(Point::ZERO, f64::INFINITY);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_zoom_to_fit_scale_and_centering() {
        let mut camera = Camera::new();
        camera.zoom_to_fit(
            Rect::new(0.0, 0.0, 400.0, 300.0),
            Size::new(800.0, 600.0),
            50.0,
        );

        // min((800-100)/400, (600-100)/300) = min(1.75, 1.6667)
        assert!((camera.report_zoom() - 500.0 / 300.0).abs() < 1e-9);

        // Content center (200, 150) lands on the viewport center (400, 300).
        let center_on_screen = camera.canvas_to_screen(Point::new(200.0, 150.0));
        assert!((center_on_screen.x - 400.0).abs() < 1e-9);
        assert!((center_on_screen.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_to_fit_degenerate_bounds_is_noop() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(12.0, 34.0);
        camera.zoom_to_point(Point::ZERO, 2.0);
        let before = camera.clone();

        camera.zoom_to_fit(Rect::new(10.0, 10.0, 10.0, 50.0), Size::new(800.0, 600.0), 0.0);
        assert_eq!(camera, before);

        camera.zoom_to_fit(Rect::new(10.0, 10.0, 50.0, 10.0), Size::new(800.0, 600.0), 0.0);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_zoom_to_fit_respects_zoom_bounds() {
        let mut camera = Camera::with_zoom_bounds(0.5, 1.2);
        camera.zoom_to_fit(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Size::new(1000.0, 1000.0),
            0.0,
        );
        assert!((camera.report_zoom() - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        let p = camera.canvas_to_screen(Point::ZERO);
        assert!((p.x - 10.0).abs() < f64::EPSILON);
        assert!((p.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fitted_view_matches_fit() {
        let camera = Camera::new();
        let bounds = Rect::new(-50.0, -20.0, 350.0, 280.0);
        let viewport = Size::new(640.0, 480.0);
        let (offset, zoom) = camera.fitted_view(bounds, viewport, 16.0).unwrap();

        let mut fitted = camera.clone();
        fitted.zoom_to_fit(bounds, viewport, 16.0);
        assert!((fitted.offset.x - offset.x).abs() < 1e-12);
        assert!((fitted.offset.y - offset.y).abs() < 1e-12);
        assert!((fitted.report_zoom() - zoom).abs() < 1e-12);
    }

    #[test]
    fn test_fitted_view_degenerate_is_none() {
        let camera = Camera::new();
        assert!(camera
            .fitted_view(Rect::new(0.0, 0.0, 0.0, 0.0), Size::new(800.0, 600.0), 0.0)
            .is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut camera = Camera::with_zoom_bounds(0.25, 4.0);
        camera.pan(Vec2::new(-30.0, 12.5));
        camera.zoom_to_point(Point::new(100.0, 100.0), 1.75);

        let json = serde_json::to_string(&camera).unwrap();
        let back: Camera = serde_json::from_str(&json).unwrap();
        assert_eq!(back, camera);
    }
}
