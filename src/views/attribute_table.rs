use std::fmt::Write as _;

use crate::model::{Attribute, AttributeValue};
use crate::utils::escape_html;

/// Indent unit repeated once per nesting level in the value cell.
const INDENT_UNIT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Renders the body rows of the attribute table.
pub fn attribute_rows(attributes: &[Attribute]) -> String {
    let mut rows = String::new();
    for attribute in attributes {
        rows.push_str(&attribute_row(attribute));
    }
    rows
}

/// Renders one table row. A leaf renders its escaped text; a sequence
/// renders a default-collapsed toggle labeled with the item count plus a
/// nested table built by recursing over its items.
pub fn attribute_row(attribute: &Attribute) -> String {
    let indent = INDENT_UNIT.repeat(attribute.depth.max(0) as usize);
    let value_html = match &attribute.value {
        AttributeValue::String(text) => escape_html(text),
        AttributeValue::Sequence(items) => {
            let mut nested = String::new();
            for item in items {
                nested.push_str(&attribute_row(item));
            }
            format!(
                "<div class=\"sequence\">\n\
                 <button class=\"sequence-toggle\" onclick=\"toggleSequence(this)\">▶ Sequence [{count} items]</button>\n\
                 <div class=\"sequence-content\" style=\"display: none;\">\n\
                 <table class=\"nested-table\">\n<tbody>\n{nested}</tbody>\n</table>\n\
                 </div>\n</div>",
                count = items.len()
            )
        }
    };

    let mut row = String::new();
    let _ = write!(
        row,
        "<tr>\n<td class=\"tag-id\">{tag}</td>\n<td class=\"tag-name\">{name}</td>\n\
         <td class=\"vr\">{vr}</td>\n<td class=\"value\">{indent}{value_html}</td>\n</tr>\n",
        tag = escape_html(&attribute.tag),
        name = escape_html(&attribute.name),
        vr = escape_html(&attribute.vr),
    );
    row
}
