//! Domain layer: entities and the turn state machine

pub mod entities;
pub mod state;
