use super::geometry::Rect;
use super::signal::{SignalHandle, SignalRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tile,
    Door,
    Button,
    Platform,
}

/// Optional signal bindings for an entity's state flags.
///
/// `solid` and `visible` are inhibit bindings: a raised signal clears the flag.
/// `movable` mirrors its signal directly. `pressed` is written, never read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bindings {
    pub solid: Option<SignalHandle>,
    pub visible: Option<SignalHandle>,
    pub pressed: Option<SignalHandle>,
    pub movable: Option<SignalHandle>,
}

impl Bindings {
    pub fn is_empty(&self) -> bool {
        self.solid.is_none()
            && self.visible.is_none()
            && self.pressed.is_none()
            && self.movable.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    bounds: Rect,
    solid: bool,
    visible: bool,
    movable: bool,
    bindings: Bindings,
}

impl Entity {
    pub fn new(kind: EntityKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            solid: kind != EntityKind::Button,
            visible: true,
            movable: false,
            bindings: Bindings::default(),
        }
    }

    pub fn tile(bounds: Rect) -> Self {
        Self::new(EntityKind::Tile, bounds)
    }

    pub fn door(bounds: Rect) -> Self {
        Self::new(EntityKind::Door, bounds)
    }

    pub fn button(bounds: Rect) -> Self {
        Self::new(EntityKind::Button, bounds)
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_solid(&self) -> bool {
        self.solid
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Refreshes bound flags from `signals` and raises the pressed signal when
    /// `query` overlaps this entity.
    pub fn update(&mut self, signals: &mut SignalRegistry, query: &Rect) {
        if let Some(handle) = self.bindings.solid {
            self.solid = !signals.value(handle);
        }
        if let Some(handle) = self.bindings.visible {
            self.visible = !signals.value(handle);
        }
        if let Some(handle) = self.bindings.pressed {
            if self.bounds.intersects(query) {
                signals.set(handle, true);
            }
        }
        if let Some(handle) = self.bindings.movable {
            self.movable = signals.value(handle);
        }
    }
}
