use crate::types::CardiacTiming;
use dicom_object::InMemDicomObject;

use super::tags::{
    get_float_value, get_int_value, get_multi_float_value, CINE_RATE, FRAME_TIME, HEART_RATE,
    R_WAVE_TIME_VECTOR,
};

/// Extracts cine timing
///
/// Returns `None` when the header carries none of the timing tags.
pub fn extract_cardiac_timing(dcm: &InMemDicomObject) -> Option<CardiacTiming> {
    let timing = CardiacTiming {
        r_wave_times: get_multi_float_value(dcm, R_WAVE_TIME_VECTOR).unwrap_or_default(),
        frame_time: get_float_value(dcm, FRAME_TIME),
        heart_rate: get_int_value(dcm, HEART_RATE),
        cine_rate: get_int_value(dcm, CINE_RATE),
    };

    let empty = timing.r_wave_times.is_empty()
        && timing.frame_time.is_none()
        && timing.heart_rate.is_none()
        && timing.cine_rate.is_none();
    (!empty).then_some(timing)
}
