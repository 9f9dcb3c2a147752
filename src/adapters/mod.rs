// Adapters layer: concrete implementations of the presentation ports.

pub mod terminal;
