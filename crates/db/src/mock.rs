mod memory;

pub use crate::store::MockAgendaStore;
pub use memory::MemoryStore;
