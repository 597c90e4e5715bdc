/// Keys the camera responds to, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    W,
    A,
    S,
    D,
    Q,
    E,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    /// Anything without a binding.
    Other,
}

/// Camera-space translation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Negative,
    Positive,
}

impl Sign {
    pub fn value(self) -> f32 {
        match self {
            Sign::Negative => -1.0,
            Sign::Positive => 1.0,
        }
    }
}

/// One key-down or key-up event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: LogicalKey,
    pub pressed: bool,
    /// Modifier state at the time of the event; selects the fast multiplier.
    pub shift: bool,
    /// Set by the platform for auto-repeated key-downs.
    pub repeat: bool,
}

impl KeyInput {
    pub fn down(key: LogicalKey) -> Self {
        Self {
            key,
            pressed: true,
            shift: false,
            repeat: false,
        }
    }

    pub fn up(key: LogicalKey) -> Self {
        Self {
            pressed: false,
            ..Self::down(key)
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// What a bound key does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    /// Translate along `axis` in direction `sign`.
    Move { axis: Axis, sign: Sign },
    /// Turn about the vertical axis.
    Rotate(Sign),
}

impl LogicalKey {
    /// Binding for this key, if any.
    pub fn action(self) -> Option<CameraAction> {
        use CameraAction::{Move, Rotate};
        let action = match self {
            LogicalKey::W | LogicalKey::ArrowUp => Move {
                axis: Axis::Y,
                sign: Sign::Positive,
            },
            LogicalKey::S | LogicalKey::ArrowDown => Move {
                axis: Axis::Y,
                sign: Sign::Negative,
            },
            LogicalKey::A | LogicalKey::ArrowLeft => Move {
                axis: Axis::X,
                sign: Sign::Negative,
            },
            LogicalKey::D | LogicalKey::ArrowRight => Move {
                axis: Axis::X,
                sign: Sign::Positive,
            },
            LogicalKey::PageUp => Move {
                axis: Axis::Z,
                sign: Sign::Positive,
            },
            LogicalKey::PageDown => Move {
                axis: Axis::Z,
                sign: Sign::Negative,
            },
            LogicalKey::Q => Rotate(Sign::Positive),
            LogicalKey::E => Rotate(Sign::Negative),
            LogicalKey::Other => return None,
        };
        Some(action)
    }
}
