//! Pan, zoom and node-drag handling for the flow surface.
//!
//! Coordinates come in three spaces: screen (raw pointer positions),
//! surface-local (screen mapped through the inverse surface transform) and
//! model (surface-local mapped through the inverse view transform). Node
//! positions are stored in model space.

use crate::config::ViewportConfig;
use crate::layout::{Point, ResolvedLayout};
use crate::model::{FlowNodeLayout, SceneId};

/// Uniform scale followed by a translation: `p * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub offset: Point,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        offset: Point::new(0.0, 0.0),
        scale: 1.0,
    };

    pub const fn new(offset: Point, scale: f64) -> Self {
        Self { offset, scale }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    pub fn invert(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({:.2} {:.2}) scale({:.3})",
            self.offset.x, self.offset.y, self.scale
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTarget {
    Surface,
    Node(SceneId),
    EdgeLabel(String),
}

/// A pointer event as seen by the handler registered on `current_target`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub target: EventTarget,
    pub current_target: EventTarget,
}

impl PointerEvent {
    /// Event delivered straight to the surface.
    pub fn on_surface(position: Point) -> Self {
        Self {
            position,
            target: EventTarget::Surface,
            current_target: EventTarget::Surface,
        }
    }
}

/// Whether an event should keep bubbling to enclosing handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging { scene_id: SceneId, grab_offset: Point },
    Panning { last: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Ignored,
    Panned,
    /// Complete layout with the dragged scene moved; replaces the stored list.
    Dragged(Vec<FlowNodeLayout>),
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    view: Transform,
    surface: Transform,
    gesture: Gesture,
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        let view = Self::default_view(&config);
        Self {
            config,
            view,
            surface: Transform::IDENTITY,
            gesture: Gesture::Idle,
        }
    }

    fn default_view(config: &ViewportConfig) -> Transform {
        let (x, y) = config.default_offset;
        Transform::new(Point::new(x, y), 1.0)
    }

    pub fn view(&self) -> Transform {
        self.view
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Placement of the host surface on screen, mapping surface-local to screen.
    pub fn set_surface_transform(&mut self, surface: Transform) {
        self.surface = surface;
    }

    fn to_local(&self, screen: Point) -> Point {
        self.surface.invert(screen)
    }

    pub fn begin_node_drag(
        &mut self,
        scene_id: impl Into<SceneId>,
        pointer: Point,
        node: Point,
    ) -> Propagation {
        let local = self.to_local(pointer);
        let grab_offset = local - self.view.apply(node);
        let scene_id = scene_id.into();
        tracing::trace!(scene = %scene_id, "node drag started");
        self.gesture = Gesture::Dragging {
            scene_id,
            grab_offset,
        };
        Propagation::Stop
    }

    /// Start panning; only a pointer-down on the surface itself qualifies.
    pub fn begin_pan(&mut self, event: &PointerEvent) -> bool {
        if event.current_target != EventTarget::Surface || event.target != event.current_target {
            return false;
        }
        self.gesture = Gesture::Panning {
            last: event.position,
        };
        true
    }

    pub fn pointer_move(&mut self, pointer: Point, layout: &ResolvedLayout) -> MoveOutcome {
        match &mut self.gesture {
            Gesture::Idle => MoveOutcome::Ignored,
            Gesture::Panning { last } => {
                let delta = pointer - *last;
                *last = pointer;
                self.view.offset = self.view.offset + delta;
                MoveOutcome::Panned
            }
            Gesture::Dragging {
                scene_id,
                grab_offset,
            } => {
                let local = self.surface.invert(pointer);
                let model = self.view.invert(local - *grab_offset);
                let mut next = layout.clone();
                next.insert(FlowNodeLayout::new(scene_id.clone(), model.x, model.y));
                MoveOutcome::Dragged(next.into_entries())
            }
        }
    }

    /// Pointer-up and pointer-leave both end whatever gesture is active.
    pub fn end_gesture(&mut self) {
        if !matches!(self.gesture, Gesture::Idle) {
            tracing::trace!(gesture = ?self.gesture, "gesture ended");
        }
        self.gesture = Gesture::Idle;
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.view.scale + self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.view.scale - self.config.zoom_step);
    }

    fn set_scale(&mut self, scale: f64) {
        self.view.scale = scale.clamp(self.config.min_scale, self.config.max_scale);
    }

    pub fn reset(&mut self) {
        self.view = Self::default_view(&self.config);
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    fn layout() -> ResolvedLayout {
        [
            FlowNodeLayout::new("a", 0.0, 0.0),
            FlowNodeLayout::new("b", 100.0, 40.0),
            FlowNodeLayout::new("c", 300.0, -20.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn transform_invert_undoes_apply() {
        let t = Transform::new(Point::new(12.0, -7.0), 1.5);
        let p = Point::new(33.0, 4.0);
        assert!(approx(t.invert(t.apply(p)), p));
    }

    #[test]
    fn drag_moves_node_by_delta_over_scale() {
        let mut vp = ViewportController::default();
        vp.zoom_in();
        vp.zoom_in();
        let scale = vp.view().scale;
        let node = Point::new(100.0, 40.0);
        let start = vp.view().apply(node) + Point::new(5.0, 3.0);

        assert_eq!(vp.begin_node_drag("b", start, node), Propagation::Stop);
        let delta = Point::new(24.0, -36.0);
        let MoveOutcome::Dragged(entries) = vp.pointer_move(start + delta, &layout()) else {
            panic!("expected a drag");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].scene_id, "b");
        let moved = Point::new(entries[1].x, entries[1].y);
        let expected = Point::new(node.x + delta.x / scale, node.y + delta.y / scale);
        assert!(approx(moved, expected), "{moved:?} != {expected:?}");
        assert_eq!(entries[0], FlowNodeLayout::new("a", 0.0, 0.0));
    }

    #[test]
    fn drag_accounts_for_surface_placement() {
        let mut vp = ViewportController::default();
        vp.set_surface_transform(Transform::new(Point::new(200.0, 50.0), 1.0));
        let node = Point::new(0.0, 0.0);
        vp.begin_node_drag("a", Point::new(215.0, 65.0), node);
        let MoveOutcome::Dragged(entries) = vp.pointer_move(Point::new(225.0, 65.0), &layout()) else {
            panic!("expected a drag");
        };
        assert!(approx(Point::new(entries[0].x, entries[0].y), Point::new(10.0, 0.0)));
    }

    #[test]
    fn pan_adds_raw_screen_delta() {
        let mut vp = ViewportController::default();
        vp.zoom_out();
        assert!(vp.begin_pan(&PointerEvent::on_surface(Point::new(50.0, 50.0))));
        assert_eq!(vp.pointer_move(Point::new(70.0, 45.0), &layout()), MoveOutcome::Panned);
        assert_eq!(vp.pointer_move(Point::new(80.0, 45.0), &layout()), MoveOutcome::Panned);
        assert!(approx(vp.view().offset, Point::new(40.0, 5.0)));
    }

    #[test]
    fn pan_only_starts_on_the_surface() {
        let mut vp = ViewportController::default();
        let event = PointerEvent {
            position: Point::new(0.0, 0.0),
            target: EventTarget::Node("a".to_string()),
            current_target: EventTarget::Surface,
        };
        assert!(!vp.begin_pan(&event));
        assert_eq!(vp.gesture(), &Gesture::Idle);

        let node_handler = PointerEvent {
            position: Point::new(0.0, 0.0),
            target: EventTarget::Node("a".to_string()),
            current_target: EventTarget::Node("a".to_string()),
        };
        assert!(!vp.begin_pan(&node_handler));
        assert_eq!(vp.gesture(), &Gesture::Idle);
    }

    #[test]
    fn leave_ends_any_gesture() {
        let mut vp = ViewportController::default();
        vp.begin_node_drag("a", Point::new(10.0, 10.0), Point::new(0.0, 0.0));
        vp.end_gesture();
        assert_eq!(vp.gesture(), &Gesture::Idle);
        assert_eq!(vp.pointer_move(Point::new(99.0, 99.0), &layout()), MoveOutcome::Ignored);
    }

    #[test]
    fn zoom_is_clamped_and_reset_restores_defaults() {
        let mut vp = ViewportController::default();
        for _ in 0..30 {
            vp.zoom_in();
        }
        assert_eq!(vp.view().scale, 2.0);
        for _ in 0..30 {
            vp.zoom_out();
        }
        assert_eq!(vp.view().scale, 0.6);

        vp.begin_pan(&PointerEvent::on_surface(Point::new(0.0, 0.0)));
        vp.pointer_move(Point::new(300.0, 300.0), &layout());
        vp.reset();
        assert_eq!(vp.view(), Transform::new(Point::new(10.0, 10.0), 1.0));
    }
}
