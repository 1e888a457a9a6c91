// Domain layer - models, geometry invariants, drag resolution

pub mod drag;
pub mod geometry;
pub mod model;
