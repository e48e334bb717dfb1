use crate::frame::FrameView;
use crate::raster::DrawKind;
use glam::Vec3;
use std::fmt::Write as _;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads a captured [`FrameView`] and produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameView) -> Self::Output;
}

/// Text renderer for headless runs: describes each frame instead of drawing it.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameView) -> String {
        let mut out = String::new();
        let p = frame.view_position;
        let w = frame.layers.wind;
        let vp = frame.viewport;
        let _ = writeln!(out, "=== Frame {} (t={:.3}s) ===", frame.frame, frame.time);
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) fov={:.0}{}",
            p.x,
            p.y,
            p.z,
            frame.fov_degrees,
            if frame.modes.use_debug_camera { " [debug]" } else { "" }
        );
        let _ = writeln!(
            out,
            "Viewport: {}x{} at ({}, {})",
            vp.width, vp.height, vp.x, vp.y
        );
        let _ = writeln!(
            out,
            "Wind: ({:.3}, {:.3}, {:.3}) |w|={:.3}",
            w.x,
            w.y,
            w.z,
            w.length()
        );
        let layers = &frame.layers;
        let tip = layers.displacement(layers.layer_count, Vec3::Y);
        let _ = writeln!(
            out,
            "Fur: layers={} length={:.3} tip=({:.3}, {:.3}, {:.3})",
            layers.layer_count, layers.fur_length, tip.x, tip.y, tip.z
        );
        let _ = writeln!(
            out,
            "Flashlight: {}  Wireframe: {}  UI: {}",
            on_off(frame.lights.spot.enabled),
            on_off(frame.modes.wireframe),
            on_off(frame.modes.ui_mode)
        );
        for step in &frame.plan.steps {
            let (name, instances) = match step.kind {
                DrawKind::ShellLayers { instances } => ("shells", instances),
                DrawKind::LightMarkers { instances } => ("markers", instances),
            };
            let _ = writeln!(
                out,
                "  draw {name} x{instances} depth_write={} blend={:?} fill={:?}",
                step.state.depth_write, step.state.blend, step.state.fill
            );
        }
        if !frame.plan.restores_depth_writes() {
            let _ = writeln!(out, "  warning: opaque pass without depth writes");
        }
        out
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
