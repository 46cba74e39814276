#![doc = include_str!("../README.md")]
// Allow non_local_definitions from derive macros (proptest_derive)
// until upstream crates are updated.
#![allow(non_local_definitions)]

pub use blueprint_utils;

pub mod circuits;
pub mod error;

#[cfg(test)]
mod tests;

pub use circuits::{
    builder::CircuitBuilder,
    component::{Component, Instance, InstanceState},
    config::TableConfig,
};
