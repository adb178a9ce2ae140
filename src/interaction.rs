//! Pointer-driven editing of boxes.
//!
//! [`Interaction`] turns pointer and wheel events into [`Effect`]s. It never
//! owns the label collection: callers pass the current labels as a slice and
//! apply the returned effects themselves. At most one gesture is active at a
//! time; the gesture lives in a single [`Session`] value.

use crate::coords::ContentFrame;
use crate::model::{Label, MIN_EXTENT, NormPoint};
use crate::viewport::{ScaleBounds, Viewport, WHEEL_SENSITIVITY, wheel_factor};

/// Default grab radius around box corners, in screen pixels.
pub const HANDLE_HIT_RADIUS: f32 = 8.0;

/// Part of a box grabbed by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
    /// Whole-box move (pointer on the border or fill).
    Move,
}

impl Handle {
    /// The four corner handles.
    pub fn corners() -> &'static [Handle] {
        &[
            Handle::NorthWest,
            Handle::NorthEast,
            Handle::SouthWest,
            Handle::SouthEast,
        ]
    }

    /// Normalized position of this corner on `label`. `None` for `Move`.
    pub fn corner_of(&self, label: &Label) -> Option<NormPoint> {
        match self {
            Handle::NorthWest => Some(NormPoint::new(label.left(), label.top())),
            Handle::NorthEast => Some(NormPoint::new(label.right(), label.top())),
            Handle::SouthWest => Some(NormPoint::new(label.left(), label.bottom())),
            Handle::SouthEast => Some(NormPoint::new(label.right(), label.bottom())),
            Handle::Move => None,
        }
    }
}

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Press/move/release of the primary button at a screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: (f32, f32),
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Down,
            position: (x, y),
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Move,
            position: (x, y),
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Up,
            position: (x, y),
        }
    }
}

/// Mouse wheel event. `modifier` is set when the zoom modifier key is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub position: (f32, f32),
    pub delta: f32,
    pub modifier: bool,
}

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Idle,
    Panning {
        /// Screen position at pointer-down.
        anchor: (f32, f32),
        /// Viewport at pointer-down, restored by `cancel`.
        anchor_viewport: Viewport,
        /// Pointer position at the previous move.
        last: (f32, f32),
    },
    Resizing {
        handle: Handle,
        index: usize,
        /// The label as it was at pointer-down.
        anchor_label: Label,
        /// Normalized pointer position at pointer-down.
        anchor_point: NormPoint,
    },
    Creating {
        anchor: NormPoint,
        current: NormPoint,
    },
}

impl Session {
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Session::Idle => "idle",
            Session::Panning { .. } => "panning",
            Session::Resizing { .. } => "resizing",
            Session::Creating { .. } => "creating",
        }
    }
}

/// Change requested by the interaction engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Set (or clear) the current label index.
    Select(Option<usize>),
    /// Replace the label at `index`.
    Update { index: usize, label: Label },
    /// Append a new label.
    Create(Label),
    /// The main viewport changed.
    ViewportChanged(Viewport),
    /// Event is not handled here (unmodified wheel scrolls the page).
    Passthrough,
}

/// Tunables for the interaction engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    pub handle_radius: f32,
    pub min_extent: f32,
    pub wheel_sensitivity: f32,
    pub bounds: ScaleBounds,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            handle_radius: HANDLE_HIT_RADIUS,
            min_extent: MIN_EXTENT,
            wheel_sensitivity: WHEEL_SENSITIVITY,
            bounds: ScaleBounds::MAIN,
        }
    }
}

/// Find the label and handle under a screen point.
///
/// Corners of the selected label win, then labels are searched top-most
/// first (last in order), corners before interiors.
pub fn hit_test(
    labels: &[Label],
    screen: (f32, f32),
    frame: &ContentFrame,
    viewport: &Viewport,
    selected: Option<usize>,
    radius: f32,
) -> Option<(usize, Handle)> {
    let corner_hit = |label: &Label| {
        Handle::corners().iter().copied().find(|handle| {
            handle.corner_of(label).is_some_and(|corner| {
                let (cx, cy) = frame.normalized_to_screen(corner, viewport);
                let dx = cx - screen.0;
                let dy = cy - screen.1;
                (dx * dx + dy * dy).sqrt() <= radius
            })
        })
    };

    if let Some(idx) = selected
        && let Some(label) = labels.get(idx)
        && let Some(handle) = corner_hit(label)
    {
        return Some((idx, handle));
    }

    let point = frame.screen_to_normalized(screen, viewport);
    labels.iter().enumerate().rev().find_map(|(idx, label)| {
        if let Some(handle) = corner_hit(label) {
            Some((idx, handle))
        } else if label.contains(point) {
            Some((idx, Handle::Move))
        } else {
            None
        }
    })
}

/// Move one edge of an axis while the other stays put.
///
/// `direction` is `1.0` when the moving edge is the far edge (right/bottom)
/// and `-1.0` for the near edge. Returns `(center, size)` with `size` never
/// below `min`.
fn resize_axis(fixed: f32, moving: f32, direction: f32, min: f32) -> (f32, f32) {
    let size = ((moving - fixed) * direction).max(min);
    (fixed + direction * size / 2.0, size)
}

/// Apply a normalized pointer delta to a grabbed handle of `anchor`.
pub fn apply_handle_drag(anchor: &Label, handle: Handle, dx: f32, dy: f32, min: f32) -> Label {
    let e = anchor.edges();
    let (x_axis, y_axis) = match handle {
        Handle::NorthWest => (
            resize_axis(e.right, e.left + dx, -1.0, min),
            resize_axis(e.bottom, e.top + dy, -1.0, min),
        ),
        Handle::NorthEast => (
            resize_axis(e.left, e.right + dx, 1.0, min),
            resize_axis(e.bottom, e.top + dy, -1.0, min),
        ),
        Handle::SouthWest => (
            resize_axis(e.right, e.left + dx, -1.0, min),
            resize_axis(e.top, e.bottom + dy, 1.0, min),
        ),
        Handle::SouthEast => (
            resize_axis(e.left, e.right + dx, 1.0, min),
            resize_axis(e.top, e.bottom + dy, 1.0, min),
        ),
        Handle::Move => {
            return Label {
                x: (anchor.x + dx).clamp(0.0, 1.0),
                y: (anchor.y + dy).clamp(0.0, 1.0),
                ..*anchor
            };
        }
    };

    Label {
        x: x_axis.0,
        w: x_axis.1,
        y: y_axis.0,
        h: y_axis.1,
        ..*anchor
    }
}

/// Box spanned by two corners, independent of drag direction.
pub fn ghost_box(class_id: u32, anchor: NormPoint, current: NormPoint) -> Label {
    let top_left = NormPoint::new(anchor.x.min(current.x), anchor.y.min(current.y));
    let w = (current.x - anchor.x).abs();
    let h = (current.y - anchor.y).abs();
    Label::from_top_left(class_id, top_left, w, h)
}

fn clamp_unit(point: NormPoint) -> NormPoint {
    NormPoint::new(point.x.clamp(0.0, 1.0), point.y.clamp(0.0, 1.0))
}

/// Interaction state for one view.
#[derive(Debug, Clone)]
pub struct Interaction {
    session: Session,
    viewport: Viewport,
    frame: ContentFrame,
    selected: Option<usize>,
    create_mode: bool,
    active_class: u32,
    settings: InteractionSettings,
}

impl Interaction {
    pub fn new(frame: ContentFrame, settings: InteractionSettings) -> Self {
        Self {
            session: Session::Idle,
            viewport: Viewport::new(settings.bounds),
            frame,
            selected: None,
            create_mode: false,
            active_class: 0,
            settings,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn frame(&self) -> &ContentFrame {
        &self.frame
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn create_mode(&self) -> bool {
        self.create_mode
    }

    pub fn active_class(&self) -> u32 {
        self.active_class
    }

    /// Toggle create mode. Takes effect on the next pointer-down.
    pub fn set_create_mode(&mut self, enabled: bool) {
        self.create_mode = enabled;
    }

    /// Class id given to newly created boxes.
    pub fn set_active_class(&mut self, class_id: u32) {
        self.active_class = class_id;
    }

    /// Update the frame when the view is resized.
    pub fn set_frame(&mut self, frame: ContentFrame) {
        self.frame = frame;
    }

    /// Provisional box of a create gesture in progress.
    pub fn ghost_box(&self) -> Option<Label> {
        match self.session {
            Session::Creating { anchor, current } => {
                Some(ghost_box(self.active_class, anchor, current))
            }
            _ => None,
        }
    }

    /// Return the main viewport to identity.
    pub fn reset_view(&mut self) -> Effect {
        self.viewport.reset();
        Effect::ViewportChanged(self.viewport)
    }

    /// A different image became active: drop selection, gesture and zoom.
    pub fn on_image_changed(&mut self, frame: ContentFrame) {
        log::debug!(
            "Image changed ({}x{}), resetting interaction",
            frame.image_width,
            frame.image_height
        );
        self.frame = frame;
        self.session = Session::Idle;
        self.selected = None;
        self.viewport.reset();
    }

    /// The label collection now holds `len` labels.
    ///
    /// Clears a selection or resize gesture that no longer addresses a label.
    pub fn on_labels_changed(&mut self, len: usize) -> Option<Effect> {
        if let Session::Resizing { index, .. } = self.session
            && index >= len
        {
            log::debug!("Label {} removed during resize, abandoning gesture", index);
            self.session = Session::Idle;
        }

        match self.selected {
            Some(idx) if idx >= len => {
                self.selected = None;
                Some(Effect::Select(None))
            }
            _ => None,
        }
    }

    /// Select a label directly (list click, keyboard).
    pub fn select(&mut self, index: Option<usize>, len: usize) -> Effect {
        self.selected = index.filter(|&i| i < len);
        Effect::Select(self.selected)
    }

    /// Select the next label, wrapping around.
    pub fn next_label(&mut self, len: usize) -> Effect {
        let next = match (self.selected, len) {
            (_, 0) => None,
            (Some(i), _) => Some((i + 1) % len),
            (None, _) => Some(0),
        };
        self.select(next, len)
    }

    /// Select the previous label, wrapping around.
    pub fn prev_label(&mut self, len: usize) -> Effect {
        let prev = match (self.selected, len) {
            (_, 0) => None,
            (Some(i), _) => Some((i + len - 1) % len),
            (None, _) => Some(len - 1),
        };
        self.select(prev, len)
    }

    /// Abandon the current gesture, restoring what it changed.
    pub fn cancel(&mut self) -> Vec<Effect> {
        let session = std::mem::replace(&mut self.session, Session::Idle);
        match session {
            Session::Resizing {
                index,
                anchor_label,
                ..
            } => vec![Effect::Update {
                index,
                label: anchor_label,
            }],
            Session::Panning {
                anchor_viewport, ..
            } => {
                self.viewport = anchor_viewport;
                vec![Effect::ViewportChanged(self.viewport)]
            }
            Session::Creating { .. } | Session::Idle => Vec::new(),
        }
    }

    /// Handle a wheel event: zoom with the modifier held, otherwise pass it on.
    pub fn wheel(&mut self, event: WheelEvent) -> Effect {
        if !event.modifier {
            return Effect::Passthrough;
        }
        let factor = wheel_factor(event.delta, self.settings.wheel_sensitivity);
        self.viewport = self
            .viewport
            .zoomed_at(event.position, self.frame.center, factor);
        log::trace!("Zoom to {:.3} at {:?}", self.viewport.scale, event.position);
        Effect::ViewportChanged(self.viewport)
    }

    /// Handle a pointer event against the current labels.
    pub fn pointer(&mut self, event: PointerEvent, labels: &[Label]) -> Vec<Effect> {
        match event.kind {
            PointerKind::Down => self.pointer_down(event.position, labels),
            PointerKind::Move => self.pointer_move(event.position),
            PointerKind::Up => self.pointer_up(event.position),
        }
    }

    fn pointer_down(&mut self, position: (f32, f32), labels: &[Label]) -> Vec<Effect> {
        if !self.session.is_idle() {
            log::warn!("Pointer down while {}, ignoring", self.session.name());
            return Vec::new();
        }

        let point = self.frame.screen_to_normalized(position, &self.viewport);

        if self.create_mode {
            let anchor = clamp_unit(point);
            log::debug!("Create: started at ({:.4}, {:.4})", anchor.x, anchor.y);
            self.session = Session::Creating {
                anchor,
                current: anchor,
            };
            return Vec::new();
        }

        match hit_test(
            labels,
            position,
            &self.frame,
            &self.viewport,
            self.selected,
            self.settings.handle_radius,
        ) {
            Some((index, handle)) => {
                log::debug!("Grabbed label {} by {:?}", index, handle);
                self.selected = Some(index);
                self.session = Session::Resizing {
                    handle,
                    index,
                    anchor_label: labels[index],
                    anchor_point: point,
                };
                vec![Effect::Select(Some(index))]
            }
            None => {
                log::debug!("Pan started, selection cleared");
                self.selected = None;
                self.session = Session::Panning {
                    anchor: position,
                    anchor_viewport: self.viewport,
                    last: position,
                };
                vec![Effect::Select(None)]
            }
        }
    }

    fn pointer_move(&mut self, position: (f32, f32)) -> Vec<Effect> {
        match &mut self.session {
            Session::Idle => Vec::new(),
            Session::Panning { last, .. } => {
                // Incremental on the live viewport; zoom applied mid-pan persists
                self.viewport = self.viewport.panned(*last, position);
                *last = position;
                vec![Effect::ViewportChanged(self.viewport)]
            }
            Session::Resizing {
                handle,
                index,
                anchor_label,
                anchor_point,
            } => {
                // Grab point projected through the current viewport
                let grab = self.frame.normalized_to_screen(*anchor_point, &self.viewport);
                let (dx, dy) = self.frame.screen_delta_to_normalized(
                    (position.0 - grab.0, position.1 - grab.1),
                    &self.viewport,
                );
                let label =
                    apply_handle_drag(anchor_label, *handle, dx, dy, self.settings.min_extent);
                log::trace!("Resize {:?}: d=({:.4}, {:.4})", handle, dx, dy);
                vec![Effect::Update {
                    index: *index,
                    label,
                }]
            }
            Session::Creating { current, .. } => {
                *current = clamp_unit(self.frame.screen_to_normalized(position, &self.viewport));
                Vec::new()
            }
        }
    }

    fn pointer_up(&mut self, position: (f32, f32)) -> Vec<Effect> {
        // A click without travel must not rewrite the grabbed label
        let travelled = match &self.session {
            Session::Panning { last, .. } => *last != position,
            Session::Resizing { anchor_point, .. } => {
                *anchor_point != self.frame.screen_to_normalized(position, &self.viewport)
            }
            Session::Idle | Session::Creating { .. } => false,
        };
        let mut effects = if travelled {
            self.pointer_move(position)
        } else {
            Vec::new()
        };

        let session = std::mem::replace(&mut self.session, Session::Idle);
        if let Session::Creating { anchor, .. } = session {
            let current = clamp_unit(self.frame.screen_to_normalized(position, &self.viewport));
            let label = ghost_box(self.active_class, anchor, current);
            if label.w > self.settings.min_extent && label.h > self.settings.min_extent {
                log::info!(
                    "Created label class={} at ({:.4}, {:.4}) size ({:.4}, {:.4})",
                    label.class_id,
                    label.x,
                    label.y,
                    label.w,
                    label.h
                );
                effects.push(Effect::Create(label));
            } else {
                log::debug!("Create: drag too small, discarded");
            }
        } else {
            log::debug!("Gesture {} finished", session.name());
        }

        effects
    }
}
