use crate::types::{PhysicalScale, PhysicalUnits, Region, RegionBounds, RegionKind};
use dicom_object::InMemDicomObject;
use log::debug;

use super::tags::{
    get_float_value, get_int_value, PHYSICAL_DELTA_X, PHYSICAL_DELTA_Y,
    PHYSICAL_UNITS_X_DIRECTION, PHYSICAL_UNITS_Y_DIRECTION, REFERENCE_PIXEL_PHYSICAL_VALUE_X,
    REFERENCE_PIXEL_PHYSICAL_VALUE_Y, REFERENCE_PIXEL_X0, REFERENCE_PIXEL_Y0, REGION_DATA_TYPE,
    REGION_FLAGS, REGION_LOCATION_MAX_X1, REGION_LOCATION_MAX_Y1, REGION_LOCATION_MIN_X0,
    REGION_LOCATION_MIN_Y0, REGION_SPATIAL_FORMAT, SEQUENCE_OF_ULTRASOUND_REGIONS,
};

/// Extracts all regions from SequenceOfUltrasoundRegions, in sequence order
///
/// Every item yields a region so the count matches the header; location
/// fields that are missing read as 0. A missing sequence yields an empty list.
pub fn extract_regions(dcm: &InMemDicomObject) -> Vec<Region> {
    let Some(items) = dcm
        .element(SEQUENCE_OF_ULTRASOUND_REGIONS)
        .ok()
        .and_then(|seq| seq.items())
    else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_region(i, item))
        .collect()
}

/// Parses one sequence item
fn parse_region(index: usize, item: &InMemDicomObject) -> Region {
    let location = [
        REGION_LOCATION_MIN_X0,
        REGION_LOCATION_MIN_Y0,
        REGION_LOCATION_MAX_X1,
        REGION_LOCATION_MAX_Y1,
    ]
    .map(|tag| get_int_value(item, tag));
    if location.iter().any(Option::is_none) {
        debug!("ultrasound region {} has an incomplete location", index);
    }
    let [min_x, min_y, max_x, max_y] = location.map(|v| v.unwrap_or(0));

    let data_type = get_int_value(item, REGION_DATA_TYPE);
    let kind = data_type.map(RegionKind::from_code).unwrap_or(RegionKind::Other);

    let mut region = Region::new(kind, RegionBounds::new(min_x, min_y, max_x, max_y))
        .with_scale(parse_scale(item));
    region.data_type = data_type;
    region.spatial_format = get_int_value(item, REGION_SPATIAL_FORMAT);
    region.flags = get_int_value(item, REGION_FLAGS);
    region
}

fn parse_scale(item: &InMemDicomObject) -> PhysicalScale {
    PhysicalScale {
        reference_pixel_x: get_int_value(item, REFERENCE_PIXEL_X0),
        reference_pixel_y: get_int_value(item, REFERENCE_PIXEL_Y0),
        reference_physical_x: get_float_value(item, REFERENCE_PIXEL_PHYSICAL_VALUE_X),
        reference_physical_y: get_float_value(item, REFERENCE_PIXEL_PHYSICAL_VALUE_Y),
        delta_x: get_float_value(item, PHYSICAL_DELTA_X),
        delta_y: get_float_value(item, PHYSICAL_DELTA_Y),
        units_x: get_int_value(item, PHYSICAL_UNITS_X_DIRECTION).map(PhysicalUnits::from_code),
        units_y: get_int_value(item, PHYSICAL_UNITS_Y_DIRECTION).map(PhysicalUnits::from_code),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dicom_core::value::DataSetSequence;
    use dicom_core::{DataElement, PrimitiveValue, Tag, VR};

    fn ul(tag: Tag, value: u32) -> DataElement<InMemDicomObject> {
        DataElement::new(tag, VR::UL, PrimitiveValue::from(value))
    }

    fn us(tag: Tag, value: u16) -> DataElement<InMemDicomObject> {
        DataElement::new(tag, VR::US, PrimitiveValue::from(value))
    }

    fn fd(tag: Tag, value: f64) -> DataElement<InMemDicomObject> {
        DataElement::new(tag, VR::FD, PrimitiveValue::from(value))
    }

    /// Region sequence item with location and data type
    pub(crate) fn region_item(data_type: u16, bounds: [u32; 4]) -> InMemDicomObject {
        InMemDicomObject::from_element_iter([
            us(REGION_SPATIAL_FORMAT, 1),
            us(REGION_DATA_TYPE, data_type),
            ul(REGION_LOCATION_MIN_X0, bounds[0]),
            ul(REGION_LOCATION_MIN_Y0, bounds[1]),
            ul(REGION_LOCATION_MAX_X1, bounds[2]),
            ul(REGION_LOCATION_MAX_Y1, bounds[3]),
        ])
    }

    pub(crate) fn region_sequence(items: Vec<InMemDicomObject>) -> DataElement<InMemDicomObject> {
        DataElement::new(
            SEQUENCE_OF_ULTRASOUND_REGIONS,
            VR::SQ,
            DataSetSequence::from(items),
        )
    }

    #[test]
    fn test_no_sequence() {
        let dcm = InMemDicomObject::new_empty();
        assert!(extract_regions(&dcm).is_empty());
    }

    #[test]
    fn test_regions_in_sequence_order() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(region_sequence(vec![
            region_item(1, [10, 50, 390, 450]),
            region_item(2, [431, 50, 811, 450]),
        ]));

        let regions = extract_regions(&dcm);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].kind, RegionKind::BMode);
        assert_eq!(regions[1].kind, RegionKind::ColorDoppler);
        assert_eq!(regions[1].bounds, RegionBounds::new(431, 50, 811, 450));
        assert_eq!(regions[0].data_type, Some(1));
        assert_eq!(regions[0].spatial_format, Some(1));
        assert!(regions[0].scale.is_empty());
    }

    #[test]
    fn test_calibration_fields() {
        let mut item = region_item(3, [0, 300, 800, 600]);
        item.put(us(PHYSICAL_UNITS_X_DIRECTION, 4));
        item.put(us(PHYSICAL_UNITS_Y_DIRECTION, 7));
        item.put(DataElement::new(
            REFERENCE_PIXEL_X0,
            VR::SL,
            PrimitiveValue::from(0_i32),
        ));
        item.put(DataElement::new(
            REFERENCE_PIXEL_Y0,
            VR::SL,
            PrimitiveValue::from(90_i32),
        ));
        item.put(fd(REFERENCE_PIXEL_PHYSICAL_VALUE_Y, 0.0));
        item.put(fd(PHYSICAL_DELTA_X, 0.004));
        item.put(fd(PHYSICAL_DELTA_Y, -0.351));

        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(region_sequence(vec![item]));

        let region = &extract_regions(&dcm)[0];
        assert_eq!(region.kind, RegionKind::PwSpectralDoppler);
        assert_eq!(region.scale.reference_pixel_y, Some(90));
        assert_eq!(region.scale.delta_y, Some(-0.351));
        assert_eq!(region.scale.units_x, Some(PhysicalUnits::Seconds));
        assert_eq!(
            region.scale.units_y,
            Some(PhysicalUnits::CentimeterPerSecond)
        );
        assert_eq!(region.scale.reference_physical_x, None);
    }

    #[test]
    fn test_incomplete_location_kept() {
        let partial = InMemDicomObject::from_element_iter([
            us(REGION_DATA_TYPE, 1),
            ul(REGION_LOCATION_MIN_X0, 7),
        ]);
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(region_sequence(vec![partial, region_item(2, [0, 0, 10, 10])]));

        let regions = extract_regions(&dcm);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].kind, RegionKind::BMode);
        assert_eq!(regions[0].bounds, RegionBounds::new(7, 0, 0, 0));
        assert_eq!(regions[1].kind, RegionKind::ColorDoppler);
    }

    #[test]
    fn test_region_flags() {
        let mut item = region_item(1, [0, 0, 10, 10]);
        item.put(ul(REGION_FLAGS, 0b10));
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(region_sequence(vec![item, region_item(2, [0, 0, 10, 10])]));

        let regions = extract_regions(&dcm);
        assert_eq!(regions[0].flags, Some(2));
        assert_eq!(regions[1].flags, None);
    }

    #[test]
    fn test_unknown_data_type() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(region_sequence(vec![region_item(0x15, [0, 0, 10, 10])]));
        assert_eq!(extract_regions(&dcm)[0].kind, RegionKind::Other);
    }
}
