//! Application domain entities.

pub mod model;

pub use model::{Application, CreateApplication, UpdateApplication};
