mod memory;
mod registry;

pub use memory::MemorySession;
pub use registry::SessionRegistry;
