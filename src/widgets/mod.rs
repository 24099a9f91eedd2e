//! Built-in widget models and their default handlers
//!
//! These are toolkit-neutral models of the common form controls: each keeps
//! its state behind interior mutability and announces changes through
//! [`Signal`]s, the way a real toolkit widget would. Applications embedding a
//! real toolkit implement [`Control`] for their own widget wrappers and register
//! handlers for them; the types here serve headless use, tests and as templates.
//!
//! | Widget | Stored keys | Monitored signals |
//! |---|---|---|
//! | [`Window`] | `<key>/geometry`, `<key>/state` (bytes) | none |
//! | [`GroupBox`] | `<key>` (bool, checkable only) | `toggled` |
//! | [`CheckBox`] | `<key>` (bool) | `state_changed` |
//! | [`RadioButton`] | `<key>` (bool) | `toggled` |
//! | [`PushButton`] | `<key>` (bool, checkable only) | `toggled` |
//! | [`LineEdit`] | `<key>` (string) | `text_changed` |
//! | [`TextEdit`] | `<key>` (string) | `text_changed` |
//! | [`ComboBox`] | `<key>/currentIndex`, `<key>/currentText` (editable only) | `current_index_changed`, `current_text_changed` |
//! | [`SpinBox`] | `<key>` (int) | `value_changed` |
//! | [`DoubleSpinBox`] | `<key>` (float) | `value_changed` |
//! | [`Slider`] | `<key>` (int) | `value_changed` |
//! | [`TabWidget`] | `<key>` (int) | `current_changed` |
//!
//! [`Container`] has no handler: it is only walked through.

mod button;
mod choice;
mod container;
mod numeric;
mod text;
mod window;

pub use button::{
    CheckBox, CheckBoxHandler, PushButton, PushButtonHandler, RadioButton, RadioButtonHandler,
};
pub use choice::{ComboBox, ComboBoxHandler, TabWidget, TabWidgetHandler};
pub use container::{Container, GroupBox, GroupBoxHandler};
pub use numeric::{
    DoubleSpinBox, DoubleSpinBoxHandler, Slider, SliderHandler, SpinBox, SpinBoxHandler,
};
pub use text::{LineEdit, LineEditHandler, TextEdit, TextEditHandler};
pub use window::{Window, WindowGeometry, WindowHandler};

use crate::control::{Control, ControlRef, TypeTag};
use crate::handler::StateHandler;
use crate::signal::{ChangeSource, Signal};
use crate::sync::RwLockExt;
use std::sync::{Arc, RwLock};

/// Built-in handler table used by [`HandlerRegistry::with_defaults`](crate::HandlerRegistry::with_defaults)
pub(crate) fn default_handlers(float_tolerance: f64) -> Vec<(TypeTag, Arc<dyn StateHandler>)> {
    vec![
        entry::<Window>(WindowHandler),
        entry::<GroupBox>(GroupBoxHandler),
        entry::<CheckBox>(CheckBoxHandler),
        entry::<RadioButton>(RadioButtonHandler),
        entry::<PushButton>(PushButtonHandler),
        entry::<LineEdit>(LineEditHandler),
        entry::<TextEdit>(TextEditHandler),
        entry::<ComboBox>(ComboBoxHandler),
        entry::<SpinBox>(SpinBoxHandler),
        entry::<DoubleSpinBox>(DoubleSpinBoxHandler::new(float_tolerance)),
        entry::<Slider>(SliderHandler),
        entry::<TabWidget>(TabWidgetHandler),
    ]
}

fn entry<C: Control>(handler: impl StateHandler + 'static) -> (TypeTag, Arc<dyn StateHandler>) {
    (TypeTag::of::<C>(), Arc::new(handler))
}

// =============================================================================
// Shared Building Blocks
// =============================================================================

/// Settable management marker
#[derive(Default)]
pub(crate) struct Marker(RwLock<Option<String>>);

impl Marker {
    pub(crate) fn get(&self) -> Option<String> {
        self.0.read_recovered().clone()
    }

    pub(crate) fn set(&self, key: Option<String>) {
        *self.0.write_recovered() = key;
    }
}

/// Ordered child list of a container widget
#[derive(Default)]
pub(crate) struct Children(RwLock<Vec<ControlRef>>);

impl Children {
    pub(crate) fn push(&self, child: ControlRef) {
        self.0.write_recovered().push(child);
    }

    pub(crate) fn remove(&self, child: &ControlRef) -> bool {
        let mut children = self.0.write_recovered();
        let before = children.len();
        children.retain(|existing| !Arc::ptr_eq(existing, child));
        children.len() != before
    }

    pub(crate) fn list(&self) -> Vec<ControlRef> {
        self.0.read_recovered().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.read_recovered().len()
    }
}

/// A value plus the signal fired when it changes.
///
/// `set` only emits when the new value differs; the lock is released before
/// listeners run.
pub(crate) struct Observable<T> {
    value: RwLock<T>,
    changed: Arc<Signal<T>>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Observable<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            changed: Arc::new(Signal::new()),
        }
    }

    pub(crate) fn get(&self) -> T {
        self.value.read_recovered().clone()
    }

    pub(crate) fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.write_recovered();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        self.changed.emit(&value);
        true
    }

    pub(crate) fn signal(&self) -> &Arc<Signal<T>> {
        &self.changed
    }
}

/// Upcast a widget signal for [`StateHandler::signals_to_monitor`]
pub(crate) fn source<T: 'static>(signal: &Arc<Signal<T>>) -> Arc<dyn ChangeSource> {
    signal.clone()
}

/// Implements [`Control`](crate::Control) plus the marker accessors for a widget
/// with a `marker` field (and optionally a `children` field).
macro_rules! managed_widget {
    (@accessors $ty:ty) => {
        impl $ty {
            /// Set the management marker (builder style)
            #[must_use]
            pub fn with_key(self, key: impl Into<String>) -> Self {
                self.marker.set(Some(key.into()));
                self
            }

            /// Set or clear the management marker
            pub fn set_settings_key(&self, key: Option<String>) {
                self.marker.set(key);
            }
        }
    };
    ($ty:ty, children) => {
        $crate::widgets::managed_widget!(@accessors $ty);

        impl $crate::control::Control for $ty {
            fn settings_key(&self) -> Option<String> {
                self.marker.get()
            }

            fn children(&self) -> Vec<$crate::control::ControlRef> {
                self.children.list()
            }
        }
    };
    ($ty:ty) => {
        $crate::widgets::managed_widget!(@accessors $ty);

        impl $crate::control::Control for $ty {
            fn settings_key(&self) -> Option<String> {
                self.marker.get()
            }
        }
    };
}

pub(crate) use managed_widget;
