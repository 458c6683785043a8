//! Reading and writing volumes and detector stacks.

pub mod raw;
