//! Pointer-driven 3-D tilt for a single block.
//!
//! Stateless math: every pointer move is mapped straight to a transform
//! from the pointer position inside the block's bounding rectangle. No
//! throttling; callers invoke it on every event.

use serde::{Deserialize, Serialize};

/// Maximum rotation on either axis, in degrees.
pub const MAX_TILT_DEG: f32 = 10.0;
/// Scale applied while the pointer is over the block.
pub const HOVER_SCALE: f32 = 1.02;
/// Shadow offset per degree of rotation, in px.
pub const SHADOW_PER_DEG: f32 = 1.5;
const PERSPECTIVE_PX: u32 = 800;
const ACTIVE_TRANSITION_S: f32 = 0.1;
const RESET_TRANSITION_S: f32 = 0.5;

/// Bounding rectangle in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TiltTransform {
    /// Rotation around the horizontal axis, degrees.
    pub rotate_x: f32,
    /// Rotation around the vertical axis, degrees.
    pub rotate_y: f32,
    pub scale: f32,
    /// Glare highlight position, percent of the rectangle.
    pub glare_x: f32,
    pub glare_y: f32,
    pub shadow_x: f32,
    pub shadow_y: f32,
    pub active: bool,
}

impl TiltTransform {
    pub fn neutral() -> Self {
        Self {
            rotate_x: 0.0,
            rotate_y: 0.0,
            scale: 1.0,
            glare_x: 50.0,
            glare_y: 50.0,
            shadow_x: 0.0,
            shadow_y: 0.0,
            active: false,
        }
    }

    /// Transform for a pointer at client position `(client_x, client_y)`.
    /// A degenerate rectangle yields the neutral transform.
    pub fn from_pointer(rect: Rect, client_x: f32, client_y: f32) -> Self {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Self::neutral();
        }
        let x = client_x - rect.left;
        let y = client_y - rect.top;
        let center_x = rect.width / 2.0;
        let center_y = rect.height / 2.0;

        let rotate_x = ((y - center_y) / center_y) * -MAX_TILT_DEG;
        let rotate_y = ((x - center_x) / center_x) * MAX_TILT_DEG;

        Self {
            rotate_x,
            rotate_y,
            scale: HOVER_SCALE,
            glare_x: (x / rect.width) * 100.0,
            glare_y: (y / rect.height) * 100.0,
            shadow_x: rotate_y * SHADOW_PER_DEG,
            shadow_y: rotate_x * -SHADOW_PER_DEG,
            active: true,
        }
    }

    pub fn to_style(&self) -> TiltStyle {
        let s = self.scale;
        if self.active {
            TiltStyle {
                transform: format!(
                    "perspective({PERSPECTIVE_PX}px) rotateX({:.2}deg) rotateY({:.2}deg) scale3d({s}, {s}, {s})",
                    self.rotate_x, self.rotate_y
                ),
                box_shadow: format!(
                    "{:.2}px {:.2}px 25px rgba(0,0,0,0.15), 0 8px 30px rgba(0,0,0,0.1)",
                    self.shadow_x, self.shadow_y
                ),
                transition: format!(
                    "transform {ACTIVE_TRANSITION_S}s ease-out, box-shadow {ACTIVE_TRANSITION_S}s ease-out"
                ),
                glare_x: format!("{:.1}%", self.glare_x),
                glare_y: format!("{:.1}%", self.glare_y),
            }
        } else {
            TiltStyle {
                transform: format!("perspective({PERSPECTIVE_PX}px) rotateX(0deg) rotateY(0deg) scale3d({s}, {s}, {s})"),
                box_shadow: "0 4px 6px -1px rgba(0, 0, 0, 0.1)".to_string(),
                transition: format!(
                    "transform {RESET_TRANSITION_S}s ease-out, box-shadow {RESET_TRANSITION_S}s ease-out"
                ),
                glare_x: "50%".to_string(),
                glare_y: "50%".to_string(),
            }
        }
    }
}

impl Default for TiltTransform {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Inline style fragments for the tilted element.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TiltStyle {
    pub transform: String,
    pub box_shadow: String,
    pub transition: String,
    pub glare_x: String,
    pub glare_y: String,
}

impl TiltStyle {
    pub fn to_css(&self) -> String {
        format!(
            "transform:{};box-shadow:{};transition:{};--glare-x:{};--glare-y:{};",
            self.transform, self.box_shadow, self.transition, self.glare_x, self.glare_y
        )
    }
}

/// Per-block tilt state. Disabled trackers ignore every event.
#[derive(Clone, Copy, Debug)]
pub struct TiltTracker {
    enabled: bool,
    current: TiltTransform,
}

impl TiltTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current: TiltTransform::neutral(),
        }
    }

    pub fn pointer_move(&mut self, rect: Rect, client_x: f32, client_y: f32) -> TiltTransform {
        if self.enabled {
            self.current = TiltTransform::from_pointer(rect, client_x, client_y);
        }
        self.current
    }

    pub fn pointer_leave(&mut self) -> TiltTransform {
        if self.enabled {
            self.current = TiltTransform::neutral();
        }
        self.current
    }

    pub fn current(&self) -> TiltTransform {
        self.current
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}
