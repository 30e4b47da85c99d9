pub mod record;
pub mod regions;
pub mod tags;
pub mod timing;

pub use record::{
    extract_color_data_present, extract_image_type, extract_metadata_record, has_overlay_data,
};
pub use regions::extract_regions;
pub use tags::*;
pub use timing::extract_cardiac_timing;
