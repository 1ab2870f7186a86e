pub use scoop_core::*;
