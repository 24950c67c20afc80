pub mod cycle;

pub use cycle::{CycleEventRecord, CycleProfileRecord};
