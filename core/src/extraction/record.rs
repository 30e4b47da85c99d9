use crate::types::{ImageType, MetadataRecord};
use dicom_core::Tag;
use dicom_object::InMemDicomObject;

use super::regions::extract_regions;
use super::tags::{
    get_int_value, get_multi_string_value, get_string_value, has_tag, GRAPHIC_ANNOTATION_SEQUENCE,
    IMAGE_TYPE, MANUFACTURER, MODALITY, NUMBER_OF_FRAMES, OVERLAY_DATA, SERIES_DESCRIPTION,
    STUDY_DESCRIPTION, TEXT_OBJECT_SEQUENCE, ULTRASOUND_COLOR_DATA_PRESENT,
};
use super::timing::extract_cardiac_timing;

/// Extracts the parsed ImageType field
pub fn extract_image_type(dcm: &InMemDicomObject) -> ImageType {
    get_multi_string_value(dcm, IMAGE_TYPE)
        .map(ImageType::new)
        .unwrap_or_default()
}

/// UltrasoundColorDataPresent as a flag; any non-zero value means color
pub fn extract_color_data_present(dcm: &InMemDicomObject) -> Option<bool> {
    get_int_value(dcm, ULTRASOUND_COLOR_DATA_PRESENT).map(|v| v != 0)
}

/// Whether any overlay group 6000-60FE carries overlay data
pub fn has_overlay_data(dcm: &InMemDicomObject) -> bool {
    (OVERLAY_DATA.group()..=0x60FE)
        .step_by(2)
        .any(|group| has_tag(dcm, Tag(group, OVERLAY_DATA.element())))
}

/// Builds a [`MetadataRecord`] from a DICOM header
///
/// Every field is optional in the source; absent tags stay absent in the
/// record and are never defaulted to a guess.
pub fn extract_metadata_record(dcm: &InMemDicomObject) -> MetadataRecord {
    let non_empty = |s: String| (!s.is_empty()).then_some(s);

    MetadataRecord {
        modality: get_string_value(dcm, MODALITY).and_then(non_empty),
        image_type: extract_image_type(dcm),
        number_of_frames: get_int_value(dcm, NUMBER_OF_FRAMES),
        color_data_present: extract_color_data_present(dcm),
        regions: extract_regions(dcm),
        has_graphic_annotation: has_tag(dcm, GRAPHIC_ANNOTATION_SEQUENCE),
        has_text_object: has_tag(dcm, TEXT_OBJECT_SEQUENCE),
        has_overlay: has_overlay_data(dcm),
        series_description: get_string_value(dcm, SERIES_DESCRIPTION).and_then(non_empty),
        study_description: get_string_value(dcm, STUDY_DESCRIPTION).and_then(non_empty),
        manufacturer: get_string_value(dcm, MANUFACTURER).and_then(non_empty),
        cardiac_timing: extract_cardiac_timing(dcm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::regions::tests::{region_item, region_sequence};
    use crate::types::RegionKind;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    fn us_header() -> InMemDicomObject {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("US")));
        dcm.put(DataElement::new(
            IMAGE_TYPE,
            VR::CS,
            PrimitiveValue::Strs(
                vec![
                    "ORIGINAL".to_string(),
                    "PRIMARY".to_string(),
                    "".to_string(),
                    "0011".to_string(),
                ]
                .into(),
            ),
        ));
        dcm.put(DataElement::new(
            NUMBER_OF_FRAMES,
            VR::IS,
            PrimitiveValue::from("1"),
        ));
        dcm
    }

    #[test]
    fn test_empty_header() {
        let record = extract_metadata_record(&InMemDicomObject::new_empty());
        assert_eq!(record, MetadataRecord::default());
    }

    #[test]
    fn test_basic_fields() {
        let mut dcm = us_header();
        dcm.put(DataElement::new(
            ULTRASOUND_COLOR_DATA_PRESENT,
            VR::US,
            PrimitiveValue::from(1_u16),
        ));
        dcm.put(DataElement::new(
            STUDY_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from("ECHO TTE "),
        ));
        dcm.put(DataElement::new(
            SERIES_DESCRIPTION,
            VR::LO,
            PrimitiveValue::from(""),
        ));

        let record = extract_metadata_record(&dcm);
        assert_eq!(record.modality.as_deref(), Some("US"));
        assert_eq!(record.image_type.vendor_code(), Some("0011"));
        assert_eq!(record.image_type.get(2), Some(""));
        assert_eq!(record.number_of_frames, Some(1));
        assert_eq!(record.color_data_present, Some(true));
        assert_eq!(record.study_description.as_deref(), Some("ECHO TTE"));
        assert_eq!(record.series_description, None);
        assert!(record.is_echo_study());
        assert!(!record.has_annotations());
        assert_eq!(record.cardiac_timing, None);
    }

    #[test]
    fn test_regions_and_annotations() {
        let mut dcm = us_header();
        dcm.put(region_sequence(vec![
            region_item(1, [10, 50, 390, 450]),
            region_item(2, [431, 50, 811, 450]),
        ]));
        dcm.put(DataElement::new(
            Tag(0x6002, 0x3000),
            VR::OW,
            PrimitiveValue::U16(vec![0_u16; 4].into()),
        ));

        let record = extract_metadata_record(&dcm);
        assert_eq!(record.regions.len(), 2);
        assert_eq!(record.regions[1].kind, RegionKind::ColorDoppler);
        assert!(record.has_overlay);
        assert!(!record.has_graphic_annotation);
        assert!(record.has_annotations());
    }

    #[test]
    fn test_partial_third_region_blocks_side_by_side() {
        let pair = || {
            vec![
                region_item(1, [0, 50, 456, 686]),
                region_item(2, [497, 50, 954, 686]),
            ]
        };

        let mut dcm = us_header();
        dcm.put(region_sequence(pair()));
        let record = extract_metadata_record(&dcm);
        assert_eq!(
            crate::classify(&record).category,
            crate::EchoCategory::SideBySideDoppler
        );

        let mut items = pair();
        items.push(InMemDicomObject::from_element_iter([DataElement::new(
            crate::extraction::tags::REGION_DATA_TYPE,
            VR::US,
            PrimitiveValue::from(1_u16),
        )]));
        let mut dcm = us_header();
        dcm.put(region_sequence(items));

        let record = extract_metadata_record(&dcm);
        assert_eq!(record.regions.len(), 3);
        assert_ne!(
            crate::classify(&record).category,
            crate::EchoCategory::SideBySideDoppler
        );
    }

    #[test]
    fn test_overlay_outside_range_ignored() {
        let mut dcm = us_header();
        dcm.put(DataElement::new(
            Tag(0x6100, 0x3000),
            VR::OW,
            PrimitiveValue::U16(vec![0_u16; 4].into()),
        ));
        assert!(!has_overlay_data(&dcm));
    }
}
