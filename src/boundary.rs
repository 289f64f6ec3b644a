//! Boundary conditions.
//!
//! `BoundaryKind` holds one sum type per category, each variant carrying only
//! the inputs its subtype uses. The flat `BoundarySubtype` keys index the schema
//! registry (`get_boundary_ui_spec`) and the legacy config format.

mod kinds;
mod schema;
mod turbulence;
mod condition;
mod proc_errors;

pub use kinds::{
    BoundaryCategory,
    BoundarySubtype,
};
pub use schema::{
    BoundaryInput,
    BoundaryUiSpec,
    ThermalType,
    ThermalInput,
    get_boundary_ui_spec,
    thermal_rows,
};
pub use turbulence::{
    InletModeKey,
    InletMode,
    TurbulenceInletSpec,
    TurbulenceInlet,
    get_turbulence_inlet_spec,
};
pub use condition::{
    BoundaryCondition,
    BoundaryKind,
    WallBc,
    InletBc,
    OutletBc,
    OpenBc,
    ConstraintBc,
    BaffleBc,
    PorousMethod,
    VelocitySpec,
    ThermalBc,
    InputValue,
    ValidationContext,
};
pub use proc_errors::{
    BoundaryError,
    ProcResult,
    err_str,
};
