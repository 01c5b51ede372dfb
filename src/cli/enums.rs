//! CLI enum types for resampling options.

use clap::ValueEnum;

use crate::render::ResampleFilter;

/// Scaling algorithm used to fit the image to the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Resample {
    #[default]
    Area,
    Bilinear,
    Nearest,
}

impl From<Resample> for ResampleFilter {
    fn from(r: Resample) -> Self {
        match r {
            Resample::Area => ResampleFilter::Area,
            Resample::Bilinear => ResampleFilter::Bilinear,
            Resample::Nearest => ResampleFilter::Nearest,
        }
    }
}
