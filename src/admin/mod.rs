/// Admin System
///
/// Static admin capabilities and the employment verification workflow
/// they gate.

pub mod gate;
pub mod verification;

pub use gate::{AdminGate, AdminPermission};
pub use verification::{
    NewVerificationRequest, ReviewDecision, ReviewPolicy, VerificationRegistry,
    VerificationRequest, VerificationStatus,
};
