//! Cosmetic placement of visible markers.
//!
//! Nothing here changes a post's true coordinate. The two calculators only
//! decide *where* a marker is drawn and *how opaque* it is:
//!
//! - [`PositionAdjuster`] fans out markers that would otherwise overlap.
//! - [`OpacityCalculator`] fades markers in crowded neighbourhoods.

mod coincidence;
mod neighbours;
mod opacity;

pub use coincidence::{
    CoincidenceIndex, PositionAdjuster, DEFAULT_COINCIDENCE_RATIO, DEFAULT_OFFSET_RATIO,
    MIN_COINCIDENCE_RADIUS,
};
pub use opacity::{
    local_density, OpacityCalculator, DEFAULT_DENSITY_RATIO, DEFAULT_DENSITY_THRESHOLD,
    DEFAULT_OPACITY_FLOOR, DEFAULT_OPACITY_STEP,
};
