//! Assignee selector implementations, one per strategy variant.

mod manual;
mod previous_owner;
mod random_pick;
mod round_robin;
mod supervisor;
mod workload;

pub use manual::ManualSelector;
pub use previous_owner::PreviousOwnerSelector;
pub use random_pick::RandomSelector;
pub use round_robin::RoundRobinSelector;
pub use supervisor::SupervisorSelector;
pub use workload::WorkloadSelector;
