pub mod supervisor;

pub use common::actors::*;
