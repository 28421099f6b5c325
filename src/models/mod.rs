//! Planning domain models.
//!
//! Plain value types for both engines. Problems are built by the caller and
//! borrowed by the solvers; results are freshly constructed per call.
//!
//! # Domain Mappings
//!
//! | u-plan | Supply chain | Construction | Manufacturing |
//! |--------|--------------|--------------|---------------|
//! | DeliveryProblem | Stock replenishment | Material staging | Buffer feeding |
//! | Job | Work package | Activity | Operation |
//! | Resource capacity | Dock slots | Crew size | Machine count |
//! | Schedule | Dispatch plan | Project timeline | Production plan |

mod delivery;
mod job;
mod problem;
mod schedule;

pub use delivery::{
    DeliveryPlan, DeliveryProblem, DeviationStats, DirectResult, UniformityResult,
    FEASIBILITY_TOLERANCE,
};
pub use job::Job;
pub use problem::SchedulingProblem;
pub use schedule::{Schedule, Violation, ViolationType};
