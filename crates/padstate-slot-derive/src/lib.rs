mod derive;

use proc_macro::TokenStream;

use crate::derive::handle_derive_slot;

/// Derives `padstate::SlotMapped` for a fieldless enum.
///
/// Variants get slots in declaration order. The name of a variant is its
/// identifier in upper case unless overridden with `#[slot(name = "...")]`.
#[proc_macro_derive(Slot, attributes(slot))]
pub fn derive_slot(input: TokenStream) -> TokenStream {
    handle_derive_slot(input)
}
