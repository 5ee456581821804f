use dicom::core::value::PrimitiveValue;
use dicom::core::{Tag, VR};

const MAX_VALUE_LEN: usize = 120;

pub fn format_tag(tag: Tag) -> String {
    format!("({:04X},{:04X})", tag.group(), tag.element())
}

/// Renders a primitive element value for display, truncating very long
/// values and summarizing binary payloads by size.
pub fn primitive_to_string(value: &PrimitiveValue, vr: VR) -> String {
    let mut rendered = match value {
        PrimitiveValue::Empty => String::new(),
        PrimitiveValue::Str(_)
        | PrimitiveValue::Strs(_)
        | PrimitiveValue::Date(_)
        | PrimitiveValue::Time(_)
        | PrimitiveValue::DateTime(_)
        | PrimitiveValue::I16(_)
        | PrimitiveValue::I32(_)
        | PrimitiveValue::I64(_)
        | PrimitiveValue::U16(_)
        | PrimitiveValue::U32(_)
        | PrimitiveValue::U64(_)
        | PrimitiveValue::F32(_)
        | PrimitiveValue::F64(_) => value.to_str().into_owned(),
        PrimitiveValue::Tags(values) => values
            .iter()
            .map(|tag| format_tag(*tag))
            .collect::<Vec<_>>()
            .join("\\"),
        PrimitiveValue::U8(_) => {
            if is_binary_vr(vr) {
                format!("Binary data ({} bytes)", value.calculate_byte_len())
            } else {
                value.to_str().into_owned()
            }
        }
    };

    if rendered.is_empty() && matches!(value, PrimitiveValue::Empty) {
        rendered.push_str("(empty)");
    }

    truncate(rendered)
}

/// Summary line for encapsulated pixel data fragments.
pub fn pixel_data_summary(fragments: usize, offset_entries: usize) -> String {
    let fragment_suffix = if fragments == 1 { "" } else { "s" };
    if offset_entries > 0 {
        let offset_suffix = if offset_entries == 1 { "" } else { "s" };
        format!(
            "Pixel data ({fragments} fragment{fragment_suffix}, offset table {offset_entries} entry{offset_suffix})"
        )
    } else {
        format!("Pixel data ({fragments} fragment{fragment_suffix})")
    }
}

fn truncate(rendered: String) -> String {
    if rendered.len() > MAX_VALUE_LEN {
        let mut truncated = rendered.chars().take(MAX_VALUE_LEN).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        rendered
    }
}

fn is_binary_vr(vr: VR) -> bool {
    matches!(
        vr,
        VR::OB | VR::OD | VR::OF | VR::OL | VR::OV | VR::OW | VR::UN
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_tags_in_group_element_notation() {
        assert_eq!(format_tag(Tag(0x0010, 0x0010)), "(0010,0010)");
        assert_eq!(format_tag(Tag(0x7FE0, 0x0010)), "(7FE0,0010)");
    }

    #[test]
    fn empty_primitive_renders_a_placeholder() {
        assert_eq!(primitive_to_string(&PrimitiveValue::Empty, VR::LO), "(empty)");
    }

    #[test]
    fn binary_values_render_as_byte_counts() {
        let value = PrimitiveValue::U8(vec![0u8; 16].into());
        assert_eq!(
            primitive_to_string(&value, VR::OB),
            "Binary data (16 bytes)"
        );
    }

    #[test]
    fn pixel_data_summary_pluralizes() {
        assert_eq!(pixel_data_summary(1, 0), "Pixel data (1 fragment)");
        assert_eq!(
            pixel_data_summary(3, 2),
            "Pixel data (3 fragments, offset table 2 entries)"
        );
    }
}
