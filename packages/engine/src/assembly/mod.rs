//! Weapon assemblies: persisted part lists plus the composer that
//! validates them on write and resolves them on read.

mod composer;
mod store;
mod types;

pub mod filesystem;
pub mod memory;

pub use composer::AssemblyComposer;
pub use filesystem::FilesystemAssemblyStore;
pub use memory::MemoryAssemblyStore;
pub use store::{AssemblyFilter, AssemblyStore};
pub use types::{
    Assembly, AssemblyId, AssemblyPart, AssemblyUpdate, ComposedAssembly, NewAssembly,
    PartResolution,
};
