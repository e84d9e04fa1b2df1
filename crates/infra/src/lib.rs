//! Infrastructure layer: in-memory collaborator arenas and the
//! composition root.
//!
//! Real persistence lives outside this workspace; the arenas here
//! implement the `kitloan-booking` store traits for tests and development
//! processes, and [`compose`] wires them into the services.

pub mod compose;
pub mod memory;


pub use compose::{build_in_memory_services, Services};
pub use memory::{
    InMemoryEquipmentDirectory, InMemoryMemberDirectory, InMemoryReservationStore,
    InMemorySportDirectory,
};
