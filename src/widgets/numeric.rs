//! Ranged numeric inputs

use super::{Marker, Observable, managed_widget, source};
use crate::control::{Control, downcast};
use crate::error::Result;
use crate::handler::StateHandler;
use crate::signal::{ChangeSource, Signal};
use crate::store::{SnapshotStore, StoreValue};
use crate::sync::RwLockExt;
use log::warn;
use std::sync::{Arc, RwLock};

const DEFAULT_INT_RANGE: (i64, i64) = (0, 99);
const DEFAULT_FLOAT_RANGE: (f64, f64) = (0.0, 99.99);

/// Integer spin box. Values are clamped to the range.
pub struct SpinBox {
    marker: Marker,
    range: RwLock<(i64, i64)>,
    value: Observable<i64>,
}

impl SpinBox {
    /// Spin box over `0..=99` holding 0
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: Marker::default(),
            range: RwLock::new(DEFAULT_INT_RANGE),
            value: Observable::new(0),
        }
    }

    /// Set the range (builder style)
    #[must_use]
    pub fn with_range(self, minimum: i64, maximum: i64) -> Self {
        self.set_range(minimum, maximum);
        self
    }

    /// Set the range, clamping the current value into it. A reversed range
    /// collapses to `minimum`.
    pub fn set_range(&self, minimum: i64, maximum: i64) {
        *self.range.write_recovered() = (minimum, maximum.max(minimum));
        self.set_value(self.value());
    }

    pub fn minimum(&self) -> i64 {
        self.range.read_recovered().0
    }

    pub fn maximum(&self) -> i64 {
        self.range.read_recovered().1
    }

    pub fn value(&self) -> i64 {
        self.value.get()
    }

    pub fn set_value(&self, value: i64) {
        self.value.set(self.clamp(value));
    }

    pub fn value_changed(&self) -> &Arc<Signal<i64>> {
        self.value.signal()
    }

    fn clamp(&self, value: i64) -> i64 {
        let (minimum, maximum) = *self.range.read_recovered();
        value.clamp(minimum, maximum)
    }
}

impl Default for SpinBox {
    fn default() -> Self {
        Self::new()
    }
}

managed_widget!(SpinBox);

/// Floating-point spin box. Values are clamped to the range.
pub struct DoubleSpinBox {
    marker: Marker,
    range: RwLock<(f64, f64)>,
    value: Observable<f64>,
}

impl DoubleSpinBox {
    /// Spin box over `0.0..=99.99` holding 0.0
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: Marker::default(),
            range: RwLock::new(DEFAULT_FLOAT_RANGE),
            value: Observable::new(0.0),
        }
    }

    #[must_use]
    pub fn with_range(self, minimum: f64, maximum: f64) -> Self {
        self.set_range(minimum, maximum);
        self
    }

    /// A NaN bound leaves the range unchanged
    pub fn set_range(&self, minimum: f64, maximum: f64) {
        if minimum.is_nan() || maximum.is_nan() {
            warn!("Ignoring double spin box range with a NaN bound");
            return;
        }
        *self.range.write_recovered() = (minimum, maximum.max(minimum));
        self.set_value(self.value());
    }

    pub fn minimum(&self) -> f64 {
        self.range.read_recovered().0
    }

    pub fn maximum(&self) -> f64 {
        self.range.read_recovered().1
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// NaN is ignored
    pub fn set_value(&self, value: f64) {
        if !value.is_nan() {
            self.value.set(self.clamp(value));
        }
    }

    pub fn value_changed(&self) -> &Arc<Signal<f64>> {
        self.value.signal()
    }

    fn clamp(&self, value: f64) -> f64 {
        let (minimum, maximum) = *self.range.read_recovered();
        value.clamp(minimum, maximum)
    }
}

impl Default for DoubleSpinBox {
    fn default() -> Self {
        Self::new()
    }
}

managed_widget!(DoubleSpinBox);

/// Integer slider. Unlike a spin box, out-of-range values are rejected
/// rather than clamped.
pub struct Slider {
    marker: Marker,
    range: RwLock<(i64, i64)>,
    value: Observable<i64>,
}

impl Slider {
    /// Slider over `0..=99` at 0
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: Marker::default(),
            range: RwLock::new(DEFAULT_INT_RANGE),
            value: Observable::new(0),
        }
    }

    #[must_use]
    pub fn with_range(self, minimum: i64, maximum: i64) -> Self {
        let maximum = maximum.max(minimum);
        *self.range.write_recovered() = (minimum, maximum);
        self.value.set(self.value().clamp(minimum, maximum));
        self
    }

    pub fn minimum(&self) -> i64 {
        self.range.read_recovered().0
    }

    pub fn maximum(&self) -> i64 {
        self.range.read_recovered().1
    }

    pub fn contains(&self, value: i64) -> bool {
        let (minimum, maximum) = *self.range.read_recovered();
        (minimum..=maximum).contains(&value)
    }

    pub fn value(&self) -> i64 {
        self.value.get()
    }

    /// Returns false (and changes nothing) if `value` is outside the range
    pub fn set_value(&self, value: i64) -> bool {
        if !self.contains(value) {
            return false;
        }
        self.value.set(value);
        true
    }

    pub fn value_changed(&self) -> &Arc<Signal<i64>> {
        self.value.signal()
    }
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

managed_widget!(Slider);

// =============================================================================
// Handlers
// =============================================================================

pub struct SpinBoxHandler;

impl StateHandler for SpinBoxHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let spin = downcast::<SpinBox>(control, key)?;
        store.set(key, StoreValue::Int(spin.value()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let spin = downcast::<SpinBox>(control, key)?;
        if let Some(value) = store.get_int(key)? {
            spin.set_value(value);
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let spin = downcast::<SpinBox>(control, key)?;
        let stored = spin.clamp(store.get_int(key)?.unwrap_or(0));
        Ok(spin.value() != stored)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<SpinBox>()
            .map(|spin| vec![source(spin.value_changed())])
            .unwrap_or_default()
    }
}

/// Compares with an absolute tolerance
pub struct DoubleSpinBoxHandler {
    tolerance: f64,
}

impl DoubleSpinBoxHandler {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl StateHandler for DoubleSpinBoxHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let spin = downcast::<DoubleSpinBox>(control, key)?;
        store.set(key, StoreValue::Float(spin.value()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let spin = downcast::<DoubleSpinBox>(control, key)?;
        if let Some(value) = store.get_float(key)? {
            spin.set_value(value);
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let spin = downcast::<DoubleSpinBox>(control, key)?;
        let stored = match store.get_float(key)? {
            Some(value) if value.is_nan() => return Ok(true),
            Some(value) => spin.clamp(value),
            None => spin.clamp(0.0),
        };
        Ok((spin.value() - stored).abs() > self.tolerance)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<DoubleSpinBox>()
            .map(|spin| vec![source(spin.value_changed())])
            .unwrap_or_default()
    }
}

pub struct SliderHandler;

impl StateHandler for SliderHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let slider = downcast::<Slider>(control, key)?;
        store.set(key, StoreValue::Int(slider.value()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let slider = downcast::<Slider>(control, key)?;
        let rejected = store
            .get_int(key)?
            .filter(|value| !slider.set_value(*value));
        if let Some(value) = rejected {
            warn!(
                "Ignoring stored value {} for slider '{}': outside {}..={}",
                value,
                key,
                slider.minimum(),
                slider.maximum()
            );
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let slider = downcast::<Slider>(control, key)?;
        let stored = store
            .get_int(key)?
            .unwrap_or_else(|| 0_i64.clamp(slider.minimum(), slider.maximum()));
        Ok(slider.value() != stored)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<Slider>()
            .map(|slider| vec![source(slider.value_changed())])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_spin_box_clamps() {
        let spin = SpinBox::new().with_range(1, 10);
        assert_eq!(spin.value(), 1);

        spin.set_value(50);
        assert_eq!(spin.value(), 10);
    }

    #[test]
    fn test_spin_box_round_trip() {
        let store = MemoryStore::new();
        let spin = SpinBox::new().with_range(0, 100);
        spin.set_value(42);

        SpinBoxHandler.save(&spin, "count", &store).unwrap();
        let restored = SpinBox::new().with_range(0, 100);
        SpinBoxHandler.load(&restored, "count", &store).unwrap();

        assert_eq!(restored.value(), 42);
        assert!(!SpinBoxHandler.compare(&restored, "count", &store).unwrap());
    }

    #[test]
    fn test_spin_box_empty_state_is_clamped_zero() {
        let store = MemoryStore::new();
        let spin = SpinBox::new().with_range(5, 10);
        assert!(!SpinBoxHandler.compare(&spin, "count", &store).unwrap());
    }

    #[test]
    fn test_double_spin_box_tolerance() {
        let store = MemoryStore::new();
        store.set("ratio", StoreValue::Float(0.5)).unwrap();

        let spin = DoubleSpinBox::new();
        spin.set_value(0.500_000_1);

        let loose = DoubleSpinBoxHandler::new(1e-6);
        let strict = DoubleSpinBoxHandler::new(0.0);
        assert!(!loose.compare(&spin, "ratio", &store).unwrap());
        assert!(strict.compare(&spin, "ratio", &store).unwrap());
    }

    #[test]
    fn test_double_spin_box_ignores_nan_bounds() {
        let spin = DoubleSpinBox::new().with_range(0.0, 1.0);
        spin.set_value(0.5);

        spin.set_range(f64::NAN, 1.0);
        spin.set_range(0.0, f64::NAN);
        assert_eq!((spin.minimum(), spin.maximum()), (0.0, 1.0));

        spin.set_value(7.0);
        assert_eq!(spin.value(), 1.0);
    }

    #[test]
    fn test_double_spin_box_reads_int_values() {
        let store = MemoryStore::new();
        store.set("ratio", StoreValue::Int(3)).unwrap();

        let spin = DoubleSpinBox::new();
        DoubleSpinBoxHandler::new(1e-6)
            .load(&spin, "ratio", &store)
            .unwrap();
        assert_eq!(spin.value(), 3.0);
    }

    #[test]
    fn test_slider_ignores_out_of_range_load() {
        let store = MemoryStore::new();
        store.set("volume", StoreValue::Int(500)).unwrap();

        let slider = Slider::new().with_range(0, 100);
        slider.set_value(30);
        SliderHandler.load(&slider, "volume", &store).unwrap();

        assert_eq!(slider.value(), 30);
        assert!(SliderHandler.compare(&slider, "volume", &store).unwrap());
    }

    #[test]
    fn test_slider_round_trip() {
        let store = MemoryStore::new();
        let slider = Slider::new().with_range(-10, 10);
        assert!(slider.set_value(-4));

        SliderHandler.save(&slider, "balance", &store).unwrap();
        let restored = Slider::new().with_range(-10, 10);
        SliderHandler.load(&restored, "balance", &store).unwrap();
        assert_eq!(restored.value(), -4);
    }
}
