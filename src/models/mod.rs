//! Domain model module declarations.

pub mod billing;
pub mod class;
pub mod clock;
pub mod dashboard;
pub mod health;
pub mod member;
pub mod room;
pub mod trainer;
pub mod training;
