use serde::Serialize;

/// Pixel rectangle inside the window that the scene is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Largest rectangle with the design aspect ratio that fits in the
    /// window, centered. Wider windows get bars left and right, taller
    /// windows get bars top and bottom.
    ///
    /// Returns `None` for a zero-sized window or design; the frame should
    /// be skipped.
    pub fn fit(design: (u32, u32), window: (u32, u32)) -> Option<Viewport> {
        let (dw, dh) = design;
        let (ww, wh) = window;
        if dw == 0 || dh == 0 || ww == 0 || wh == 0 {
            return None;
        }
        // Compare ww/wh against dw/dh without floats.
        let (width, height) = if u64::from(ww) * u64::from(dh) > u64::from(wh) * u64::from(dw) {
            let width = (u64::from(wh) * u64::from(dw) / u64::from(dh)) as u32;
            (width.max(1), wh)
        } else {
            let height = (u64::from(ww) * u64::from(dh) / u64::from(dw)) as u32;
            (ww, height.max(1))
        };
        Some(Viewport {
            x: (ww - width) / 2,
            y: (wh - height) / 2,
            width,
            height,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESIGN: (u32, u32) = (800, 600);

    #[test]
    fn wide_window_is_pillarboxed() {
        let vp = Viewport::fit(DESIGN, (1600, 600)).unwrap();
        assert_eq!(vp, Viewport { x: 400, y: 0, width: 800, height: 600 });
    }

    #[test]
    fn tall_window_is_letterboxed() {
        let vp = Viewport::fit(DESIGN, (800, 1000)).unwrap();
        assert_eq!(vp, Viewport { x: 0, y: 200, width: 800, height: 600 });
    }

    #[test]
    fn matching_aspect_fills_window() {
        let vp = Viewport::fit(DESIGN, (1024, 768)).unwrap();
        assert_eq!(vp, Viewport { x: 0, y: 0, width: 1024, height: 768 });
        assert!((vp.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_window_skips_frame() {
        assert_eq!(Viewport::fit(DESIGN, (0, 600)), None);
        assert_eq!(Viewport::fit(DESIGN, (800, 0)), None);
        assert_eq!(Viewport::fit((0, 0), (800, 600)), None);
    }

    #[test]
    fn always_inside_window() {
        for window in [(1, 1), (3, 1000), (1000, 3), (1920, 1080), (1366, 768)] {
            let vp = Viewport::fit(DESIGN, window).unwrap();
            assert!(vp.x + vp.width <= window.0);
            assert!(vp.y + vp.height <= window.1);
            assert!(vp.width >= 1 && vp.height >= 1);
        }
    }
}
