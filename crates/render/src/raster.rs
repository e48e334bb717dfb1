//! Fixed-function state for each draw of a frame, expressed as data so the
//! ordering rules can be checked without a graphics device.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Blend {
    /// Overwrite the target.
    Replace,
    /// `src * src_alpha + dst * (1 - src_alpha)` for color and alpha.
    SourceOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FillMode {
    Fill,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RasterState {
    pub cull_back_faces: bool,
    pub depth_test: bool,
    pub depth_write: bool,
    pub blend: Blend,
    pub fill: FillMode,
}

impl RasterState {
    /// Translucent shells: every layer is visible from both sides and none
    /// may occlude the layers drawn after it.
    pub const SHELL: RasterState = RasterState {
        cull_back_faces: false,
        depth_test: true,
        depth_write: false,
        blend: Blend::SourceOver,
        fill: FillMode::Fill,
    };

    pub const OPAQUE: RasterState = RasterState {
        cull_back_faces: true,
        depth_test: true,
        depth_write: true,
        blend: Blend::Replace,
        fill: FillMode::Fill,
    };

    pub fn with_fill(self, fill: FillMode) -> RasterState {
        RasterState { fill, ..self }
    }

    pub fn is_translucent(&self) -> bool {
        self.blend != Blend::Replace
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawKind {
    /// All shell layers of the mesh in one instanced draw.
    ShellLayers { instances: u32 },
    /// One small cube per point light.
    LightMarkers { instances: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawStep {
    pub kind: DrawKind,
    pub state: RasterState,
}

/// Ordered draws of one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FramePlan {
    pub steps: Vec<DrawStep>,
}

impl FramePlan {
    /// Shells first, then the opaque light markers with depth writes restored.
    pub fn new(layer_count: u32, wireframe: bool, marker_count: u32) -> Self {
        let fill = if wireframe { FillMode::Line } else { FillMode::Fill };
        let mut steps = vec![DrawStep {
            kind: DrawKind::ShellLayers {
                instances: layer_count.max(1),
            },
            state: RasterState::SHELL.with_fill(fill),
        }];
        if marker_count > 0 {
            steps.push(DrawStep {
                kind: DrawKind::LightMarkers {
                    instances: marker_count,
                },
                state: RasterState::OPAQUE,
            });
        }
        Self { steps }
    }

    /// Every opaque step writes depth again, whatever the translucent
    /// steps before it disabled.
    pub fn restores_depth_writes(&self) -> bool {
        self.steps
            .iter()
            .filter(|s| !s.state.is_translucent())
            .all(|s| s.state.depth_write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_state_protocol() {
        let s = RasterState::SHELL;
        assert!(!s.cull_back_faces);
        assert!(s.depth_test);
        assert!(!s.depth_write);
        assert_eq!(s.blend, Blend::SourceOver);
    }

    #[test]
    fn plan_draws_shells_before_markers() {
        let plan = FramePlan::new(80, false, 4);
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].kind, DrawKind::ShellLayers { instances: 80 });
        assert_eq!(plan.steps[0].state, RasterState::SHELL);
        assert_eq!(plan.steps[1].kind, DrawKind::LightMarkers { instances: 4 });
        assert!(plan.steps[1].state.depth_write);
        assert_eq!(plan.steps[1].state.blend, Blend::Replace);
        assert!(plan.restores_depth_writes());
    }

    #[test]
    fn wireframe_only_changes_fill() {
        let plan = FramePlan::new(80, true, 4);
        let shell = plan.steps[0].state;
        assert_eq!(shell.fill, FillMode::Line);
        assert_eq!(shell.with_fill(FillMode::Fill), RasterState::SHELL);
        assert_eq!(plan.steps[1].state.fill, FillMode::Fill);
    }

    #[test]
    fn plan_without_markers() {
        let plan = FramePlan::new(0, false, 0);
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].kind, DrawKind::ShellLayers { instances: 1 });
        assert!(plan.restores_depth_writes());
    }

    #[test]
    fn opaque_draw_without_depth_writes_is_flagged() {
        let plan = FramePlan {
            steps: vec![
                DrawStep {
                    kind: DrawKind::ShellLayers { instances: 8 },
                    state: RasterState::SHELL,
                },
                DrawStep {
                    kind: DrawKind::LightMarkers { instances: 4 },
                    state: RasterState {
                        depth_write: false,
                        ..RasterState::OPAQUE
                    },
                },
            ],
        };
        assert!(!plan.restores_depth_writes());
    }
}
