use padstate::{Slot, SlotMapped, SlotSet};

#[derive(Slot, Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Pedal {
    Clutch,
    #[slot(name = "BRAKE")]
    Brake,
    #[slot(name = "GAS")]
    Throttle,
}

fn main() {
    assert_eq!(Pedal::COUNT, 3);
    assert_eq!(Pedal::ALL, &[Pedal::Clutch, Pedal::Brake, Pedal::Throttle]);
    assert_eq!(Pedal::Throttle.slot(), 2);
    assert_eq!(Pedal::Throttle.bit(), 1u64 << 2);
    assert_eq!(Pedal::Clutch.name(), "CLUTCH");
    assert_eq!(Pedal::from_name("gas"), Some(Pedal::Throttle));
    assert_eq!(Pedal::from_name("Throttle"), None);
    assert_eq!(Pedal::from_slot(3), None);

    let set: SlotSet<Pedal> = [Pedal::Brake, Pedal::Throttle].into_iter().collect();
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![Pedal::Brake, Pedal::Throttle]);
}
