//! Control abstraction
//!
//! The manager never knows what a concrete control is. It only needs three
//! things from every node of the UI tree:
//!
//! - the management marker ([`Control::settings_key`]), which doubles as the
//!   snapshot-store key,
//! - the node's children ([`Control::children`]) so the tree can be walked,
//! - the node's runtime type ([`TypeTag`]) so a handler can be resolved.
//!
//! Controls are shared as [`ControlRef`] (`Arc<dyn Control>`) and mutated through
//! interior mutability, because the UI layer, the handlers and the change
//! listeners all hold on to the same instance.

use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Shared handle to a control in the UI tree
pub type ControlRef = Arc<dyn Control>;

/// Upcast to [`Any`], implemented for every `'static` type.
///
/// This is a supertrait of [`Control`] so that `&dyn Control` can be downcast
/// to its concrete type and so that its exact runtime type can be read.
pub trait AsAny: Any {
    /// View as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type, for logs and error messages
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A node in a UI containment tree.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, RwLock};
/// use wsman::{Control, ControlRef};
///
/// struct ColorPicker {
///     key: Option<String>,
///     rgb: RwLock<[u8; 3]>,
/// }
///
/// impl Control for ColorPicker {
///     fn settings_key(&self) -> Option<String> {
///         self.key.clone()
///     }
/// }
///
/// let picker: ControlRef = Arc::new(ColorPicker {
///     key: Some("accent".into()),
///     rgb: RwLock::new([0, 128, 255]),
/// });
/// assert_eq!(picker.settings_key().as_deref(), Some("accent"));
/// ```
pub trait Control: AsAny + Send + Sync {
    /// Management marker: the snapshot-store identifier of this control.
    ///
    /// `None` or an empty string means the control is not managed. Its children
    /// are still visited.
    fn settings_key(&self) -> Option<String>;

    /// Direct children in document order
    fn children(&self) -> Vec<ControlRef> {
        Vec::new()
    }
}

/// The marker value if present and non-empty
pub(crate) fn managed_key(control: &dyn Control) -> Option<String> {
    control.settings_key().filter(|key| !key.is_empty())
}

/// Downcast a control to the concrete type a handler expects.
///
/// # Errors
///
/// Returns [`crate::Error::HandlerMismatch`] if `control` is not a `T`.
pub fn downcast<'a, T: Control>(control: &'a dyn Control, key: &str) -> crate::Result<&'a T> {
    control
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| crate::Error::HandlerMismatch {
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
            actual: control.type_name(),
        })
}

// =============================================================================
// Type Tags
// =============================================================================

/// Stable identifier of a control type, used as the handler registry key.
///
/// Equality and hashing use the [`TypeId`] only; the name is kept for logging.
#[derive(Debug, Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag for the concrete type `T`
    #[must_use]
    pub fn of<T: Control>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Tag for the most specific runtime type of `control`
    #[must_use]
    pub fn of_control(control: &dyn Control) -> Self {
        Self {
            id: control.as_any().type_id(),
            name: control.type_name(),
        }
    }

    /// Full type name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// =============================================================================
// Reference Identity
// =============================================================================

/// Reference identity of a control (address of the shared allocation).
///
/// Two `ControlRef`s have the same id exactly when they point at the same
/// control. Ids of dropped controls may be reused, so long-lived tables pair
/// the id with a [`Weak`] handle and check it is still alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(usize);

impl ControlId {
    /// Identity of a shared control
    #[must_use]
    pub fn of(control: &ControlRef) -> Self {
        Self(Arc::as_ptr(control).cast::<()>() as usize)
    }

    /// Identity of a weakly held control
    #[must_use]
    pub fn of_weak(control: &Weak<dyn Control>) -> Self {
        Self(Weak::as_ptr(control).cast::<()>() as usize)
    }
}
