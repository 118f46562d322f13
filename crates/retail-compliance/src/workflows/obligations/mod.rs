mod lifecycle;

pub use lifecycle::{
    obligation_status, resolve_lifecycle_state, LifecycleState, ObligationSchedule,
    ObligationStatus,
};
