//! Operation and dependency data types shared by every stage of the
//! pipeline.

pub mod dependency;
pub mod kind;
pub mod operation;

pub use dependency::{Dependency, Verified};
pub use kind::DependencyKind;
pub use operation::Operation;
