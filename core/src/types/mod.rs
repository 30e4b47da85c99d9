//! Core type definitions for echocardiography metadata
//!
//! This module provides the fundamental types used throughout the echocat library:
//! - [`EchoCategory`]: The ten display categories
//! - [`ImageType`]: Tokenized DICOM ImageType field with bounds-checked access
//! - [`Region`], [`RegionKind`], [`RegionBounds`], [`PhysicalScale`]: Ultrasound region geometry and calibration
//! - [`MetadataRecord`]: Normalized per-file header view consumed by the classifier
//! - [`CardiacTiming`]: R-wave and frame timing used for phase detection

mod category;
mod image_type;
mod record;
mod region;

pub use category::EchoCategory;
pub use image_type::{ImageType, VENDOR_CODE_INDEX};
pub use record::{CardiacTiming, MetadataRecord};
pub use region::{
    PhysicalScale, PhysicalUnits, Region, RegionBounds, RegionKind, REGION_KIND_TABLE,
};
