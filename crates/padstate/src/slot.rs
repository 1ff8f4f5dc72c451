use std::marker::PhantomData;

/// A closed set of values with a fixed slot index and a canonical name.
///
/// Implemented through `#[derive(Slot)]`.
pub trait SlotMapped: Sized + Copy + 'static {
    /// Number of variants.
    const COUNT: usize;
    /// All variants in slot order.
    const ALL: &'static [Self];

    /// Slot index of the value.
    fn slot(&self) -> usize;
    /// Value for a slot index, `None` when the slot is unmapped.
    fn from_slot(slot: usize) -> Option<Self>;
    /// Canonical name of the value.
    fn name(&self) -> &'static str;
    /// Case-insensitive lookup by canonical name.
    fn from_name(name: &str) -> Option<Self>;

    #[inline]
    fn bit(&self) -> u64 {
        1u64 << self.slot()
    }
}

/// Set of slot-mapped values packed into a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotSet<T: SlotMapped>(u64, PhantomData<T>);

impl<T: SlotMapped> Default for SlotSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: SlotMapped> SlotSet<T> {
    /// Create a new set from a slice of values.
    pub fn new(values: &[T]) -> Self {
        let mut bits = 0;
        for value in values {
            bits |= value.bit();
        }
        Self(bits, PhantomData)
    }

    /// Create an empty set.
    pub const fn empty() -> Self {
        Self(0, PhantomData)
    }

    /// Raw bits of the set.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn contains(&self, value: T) -> bool {
        (self.0 & value.bit()) != 0
    }

    #[inline]
    pub fn insert(&mut self, value: T) {
        self.0 |= value.bit();
    }

    #[inline]
    pub fn remove(&mut self, value: T) {
        self.0 &= !value.bit();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Check if every value of this set is in `other`.
    #[inline]
    pub fn is_subset(&self, other: &SlotSet<T>) -> bool {
        self.0 & other.0 == self.0
    }

    #[inline]
    pub fn is_superset(&self, other: &SlotSet<T>) -> bool {
        other.is_subset(self)
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate the values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        T::ALL.iter().copied().filter(|v| self.contains(*v))
    }
}

impl<T: SlotMapped> FromIterator<T> for SlotSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::empty();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::{SlotMapped, SlotSet};
    use crate::Button;

    #[test]
    fn empty_creates_no_bits_set() {
        let set = SlotSet::<Button>::empty();
        assert!(set.is_empty());
        assert!(Button::ALL.iter().all(|b| !set.contains(*b)));
    }

    #[test]
    fn new_handles_duplicates() {
        let set = SlotSet::new(&[Button::B, Button::B, Button::Start]);
        assert_eq!(set.count(), 2);
        assert!(set.contains(Button::B));
        assert!(set.contains(Button::Start));
        assert!(!set.contains(Button::A));
    }

    #[test]
    fn insert_and_remove_toggle_bits() {
        let mut set = SlotSet::empty();
        set.insert(Button::LeftTrigger);
        set.insert(Button::Option);
        assert!(set.contains(Button::LeftTrigger));
        assert!(set.contains(Button::Option));

        set.remove(Button::LeftTrigger);
        assert!(!set.contains(Button::LeftTrigger));
        assert_eq!(set.bits(), Button::Option.bit());
    }

    #[test]
    fn subset_and_superset() {
        let a = SlotSet::new(&[Button::A]);
        let ab = SlotSet::new(&[Button::A, Button::B]);
        assert!(SlotSet::<Button>::empty().is_subset(&a));
        assert!(a.is_subset(&ab));
        assert!(ab.is_superset(&a));
        assert!(!ab.is_subset(&a));
    }

    #[test]
    fn iter_yields_slot_order() {
        let set: SlotSet<Button> =
            [Button::Home, Button::A, Button::DPadUp].into_iter().collect();
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![Button::A, Button::DPadUp, Button::Home]);
    }
}
