pub mod allocator;
pub mod assignment;
pub mod builder;
pub mod component;
pub mod config;
pub mod constraints;
pub mod expr;
pub mod gate;
pub mod lookup;
pub mod manifest;
pub mod permutation;
pub mod polynomials;
pub mod variable;
pub mod window;
pub mod witness;
