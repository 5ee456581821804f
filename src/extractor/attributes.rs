use dicom::core::dictionary::DataDictionary;
use dicom::core::header::Header;
use dicom::core::value::Value;
use dicom::core::Tag;
use dicom::dictionary_std::StandardDataDictionary;
use dicom::object::mem::InMemElement;
use dicom::object::{DefaultDicomObject, InMemDicomObject};

use crate::model::{Attribute, AttributeValue};
use crate::utils::{format_tag, pixel_data_summary, primitive_to_string};

/// Walks every element of the data set into the attribute tree, recursing
/// through sequence items with increasing depth.
pub fn collect_attributes(object: &DefaultDicomObject) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    for element in object.iter() {
        attributes.push(convert_element(element, 0));
    }
    attributes
}

fn collect_item_attributes(item: &InMemDicomObject, depth: i32, out: &mut Vec<Attribute>) {
    for element in item.iter() {
        out.push(convert_element(element, depth));
    }
}

fn convert_element(element: &InMemElement, depth: i32) -> Attribute {
    let tag = element.tag();
    let value = match element.value() {
        Value::Sequence(sequence) => {
            let mut items = Vec::new();
            for item in sequence.items() {
                collect_item_attributes(item, depth + 1, &mut items);
            }
            AttributeValue::Sequence(items)
        }
        Value::PixelSequence(sequence) => AttributeValue::String(pixel_data_summary(
            sequence.fragments().len(),
            sequence.offset_table().len(),
        )),
        Value::Primitive(primitive) => {
            AttributeValue::String(primitive_to_string(primitive, element.vr()))
        }
    };

    Attribute {
        depth,
        tag: format_tag(tag),
        name: tag_alias(tag),
        vr: element.vr().to_string().to_owned(),
        value,
    }
}

fn tag_alias(tag: Tag) -> String {
    StandardDataDictionary
        .by_tag(tag)
        .map(|entry| entry.alias)
        .unwrap_or("Unknown")
        .to_string()
}
