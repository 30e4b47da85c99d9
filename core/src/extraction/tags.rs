use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Core Image Tags
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
pub const ULTRASOUND_COLOR_DATA_PRESENT: Tag = Tag(0x0028, 0x0014);
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

// Ultrasound Region Tags
pub const SEQUENCE_OF_ULTRASOUND_REGIONS: Tag = Tag(0x0018, 0x6011);
pub const REGION_SPATIAL_FORMAT: Tag = Tag(0x0018, 0x6012);
pub const REGION_DATA_TYPE: Tag = Tag(0x0018, 0x6014);
pub const REGION_FLAGS: Tag = Tag(0x0018, 0x6016);
pub const REGION_LOCATION_MIN_X0: Tag = Tag(0x0018, 0x6018);
pub const REGION_LOCATION_MIN_Y0: Tag = Tag(0x0018, 0x601A);
pub const REGION_LOCATION_MAX_X1: Tag = Tag(0x0018, 0x601C);
pub const REGION_LOCATION_MAX_Y1: Tag = Tag(0x0018, 0x601E);
pub const REFERENCE_PIXEL_X0: Tag = Tag(0x0018, 0x6020);
pub const REFERENCE_PIXEL_Y0: Tag = Tag(0x0018, 0x6022);
pub const PHYSICAL_UNITS_X_DIRECTION: Tag = Tag(0x0018, 0x6024);
pub const PHYSICAL_UNITS_Y_DIRECTION: Tag = Tag(0x0018, 0x6026);
pub const REFERENCE_PIXEL_PHYSICAL_VALUE_X: Tag = Tag(0x0018, 0x6028);
pub const REFERENCE_PIXEL_PHYSICAL_VALUE_Y: Tag = Tag(0x0018, 0x602A);
pub const PHYSICAL_DELTA_X: Tag = Tag(0x0018, 0x602C);
pub const PHYSICAL_DELTA_Y: Tag = Tag(0x0018, 0x602E);

// Cardiac Timing Tags
pub const R_WAVE_TIME_VECTOR: Tag = Tag(0x0018, 0x6060);
pub const FRAME_TIME: Tag = Tag(0x0018, 0x1063);
pub const HEART_RATE: Tag = Tag(0x0018, 0x1088);
pub const CINE_RATE: Tag = Tag(0x0018, 0x0040);

// Annotation Tags
pub const GRAPHIC_ANNOTATION_SEQUENCE: Tag = Tag(0x0070, 0x0001);
pub const TEXT_OBJECT_SEQUENCE: Tag = Tag(0x0070, 0x0008);
/// Overlay Data of the first overlay group; groups repeat in steps of 2 up to 0x60FE
pub const OVERLAY_DATA: Tag = Tag(0x6000, 0x3000);

// Device/Manufacturer Tags
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);

// Description Tags
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get floating point value from DICOM tag
///
/// Works for FD, FL and decimal strings alike
pub fn get_float_value(dcm: &InMemDicomObject, tag: Tag) -> Option<f64> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_float64().ok())
}

/// Helper to get all floating point values of a multi-valued tag
pub fn get_multi_float_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<f64>> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_multi_float64().ok())
}

/// Helper to get multi-string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to Vec<String>
pub fn get_multi_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<String>> {
    dcm.element(tag).ok().and_then(|elem| {
        // Try to get as multi-string
        if let Ok(strs) = elem.to_multi_str() {
            Some(strs.iter().map(|s| s.to_string()).collect())
        } else {
            // Fallback: try to get as single string and split by backslash
            elem.to_str()
                .ok()
                .map(|s| s.split('\\').map(|part| part.trim().to_string()).collect())
        }
    })
}

/// Whether the tag is present at all
pub fn has_tag(dcm: &InMemDicomObject, tag: Tag) -> bool {
    dcm.element(tag).is_ok()
}
