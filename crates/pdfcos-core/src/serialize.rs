//! PDF-syntax serialization.
//!
//! Walks an object graph through the abstract contract only and emits PDF
//! object syntax: `null`, `true`/`false`, decimal integers, formatted reals,
//! string and name tokens, `[ ... ]` arrays, `<< ... >>` dictionaries, and
//! `N G R` indirect-reference shorthand.
//!
//! Children inside composites always serialize with the reference shorthand
//! enabled, so an object reached through an indirect reference emits
//! `N G R` rather than its body. On top of that, traversal carries a
//! visited set of reference identities plus a depth cap, so documents with
//! cross-referential or even reference-free cycles terminate instead of
//! recursing forever.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::encoding::{encode_pdf_name, encode_pdf_string};
use crate::numeric::round_if_close;
use crate::object::{CosArray, CosDict, CosObject, ObjectKind, ObjectRef};

/// Recursion cap for pathological reference-free cycles.
const MAX_SERIALIZE_DEPTH: usize = 128;

/// Serialize an object to PDF syntax.
///
/// With `emit_ref` set and the object carrying a reference identity, the
/// output is the shorthand `N G R` and the value is not visited.
pub fn serialize_object(obj: &dyn CosObject, emit_ref: bool) -> String {
    let mut out = String::new();
    let mut visited = HashSet::new();
    write_object(obj, &mut out, emit_ref, &mut visited, 0);
    out
}

/// Serialize a dictionary body (`<< ... >>`).
pub fn serialize_dict(dict: &dyn CosDict) -> String {
    let mut out = String::new();
    let mut visited = HashSet::new();
    write_dict(dict, &mut out, &mut visited, 0);
    out
}

/// Serialize an array body (`[ ... ]`).
pub fn serialize_array(array: &dyn CosArray) -> String {
    let mut out = String::new();
    let mut visited = HashSet::new();
    write_array(array, &mut out, &mut visited, 0);
    out
}

fn write_object(
    obj: &dyn CosObject,
    out: &mut String,
    emit_ref: bool,
    visited: &mut HashSet<ObjectRef>,
    depth: usize,
) {
    if let Some(r) = obj.indirect_ref() {
        if emit_ref || visited.contains(&r) {
            let _ = write!(out, "{r}");
            return;
        }
        visited.insert(r);
    }
    if depth > MAX_SERIALIZE_DEPTH {
        log::warn!("serialization depth limit exceeded, truncating object graph");
        return;
    }

    match obj.kind() {
        ObjectKind::Null => out.push_str("null"),
        ObjectKind::Bool => out.push_str(if obj.as_bool() { "true" } else { "false" }),
        ObjectKind::Int => {
            let _ = write!(out, "{}", obj.as_int());
        }
        ObjectKind::Real => {
            out.push_str(&format_real(
                obj.as_real(),
                obj.precision(),
                obj.real_as_string(),
            ));
        }
        ObjectKind::String => out.push_str(&encode_pdf_string(&obj.as_string())),
        ObjectKind::Name => {
            out.push('/');
            out.push_str(&encode_pdf_name(&obj.as_name()));
        }
        ObjectKind::Array => {
            if let Some(array) = obj.array() {
                write_array(&*array, out, visited, depth + 1);
            }
        }
        ObjectKind::Dictionary => {
            if let Some(dict) = obj.dict() {
                write_dict(&*dict, out, visited, depth + 1);
            }
        }
        ObjectKind::Unknown => {
            log::warn!("serializing object of unknown type, emitting nothing");
        }
    }
}

fn write_dict(
    dict: &dyn CosDict,
    out: &mut String,
    visited: &mut HashSet<ObjectRef>,
    depth: usize,
) {
    out.push_str("<< ");
    for (key, value) in dict.entries() {
        out.push('/');
        out.push_str(&key);
        out.push(' ');
        write_object(&*value, out, true, visited, depth);
        out.push(' ');
    }
    out.push_str(">>");
}

fn write_array(
    array: &dyn CosArray,
    out: &mut String,
    visited: &mut HashSet<ObjectRef>,
    depth: usize,
) {
    out.push_str("[ ");
    for index in 0..array.len() {
        if let Some(element) = array.get(index) {
            write_object(&*element, out, true, visited, depth);
        }
        out.push(' ');
    }
    out.push(']');
}

/// Format a real value for serialization.
///
/// The value is first snapped through [`round_if_close`]. Values that are
/// integral and within `i64` range emit as plain integers. With `as_string`
/// set the value emits as a string of `precision` significant digits.
/// Otherwise it emits in fixed-point at `precision` fraction digits with
/// trailing zeros stripped; a bare trailing decimal point is stripped too,
/// so `2.0000` emits as `2` and an integral value beyond `i64` range emits
/// without a dangling dot.
pub fn format_real(value: f64, precision: usize, as_string: bool) -> String {
    let rounded = round_if_close(value);
    if rounded >= i64::MIN as f64
        && rounded < i64::MAX as f64
        && rounded == (rounded as i64) as f64
    {
        return format!("{}", rounded as i64);
    }

    if as_string {
        return format!("({})", format_significant(rounded, precision));
    }

    let mut fixed = format!("{rounded:.precision$}");
    if fixed.contains('.') {
        fixed.truncate(fixed.trim_end_matches('0').trim_end_matches('.').len());
    }
    fixed
}

/// Decimal rendering at `digits` significant digits, trailing zeros
/// stripped.
fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1) as i32;
    let exponent = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - exponent).max(0) as usize;
    let mut formatted = format!("{value:.decimals$}");
    if formatted.contains('.') {
        formatted.truncate(formatted.trim_end_matches('0').trim_end_matches('.').len());
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::round_to_likely_double;
    use crate::object::ObjectHandle;
    use crate::owned::{OwnedArray, OwnedDict, OwnedObject};
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    // --- scalar kinds ---

    #[test]
    fn null_bool_int() {
        assert_eq!(serialize_object(&OwnedObject::null(), true), "null");
        assert_eq!(serialize_object(&OwnedObject::boolean(true), true), "true");
        assert_eq!(
            serialize_object(&OwnedObject::boolean(false), true),
            "false"
        );
        assert_eq!(serialize_object(&OwnedObject::int(-17), true), "-17");
    }

    #[test]
    fn string_and_name() {
        assert_eq!(
            serialize_object(&OwnedObject::string("Hello"), true),
            "(Hello)"
        );
        assert_eq!(
            serialize_object(&OwnedObject::name("My Key!"), true),
            "/My_Key_"
        );
    }

    // --- real formatting ---

    #[test]
    fn near_integer_real_snaps_to_integer() {
        assert_eq!(serialize_object(&OwnedObject::real(1.9999999999), true), "2");
    }

    #[test]
    fn real_at_fixed_precision() {
        let value = round_to_likely_double(297.84f32);
        let obj = OwnedObject::real_with_precision(value, 2);
        assert_eq!(serialize_object(&obj, true), "297.84");
    }

    #[test]
    fn real_default_precision_strips_trailing_zeros() {
        assert_eq!(serialize_object(&OwnedObject::real(1.5), true), "1.5");
        assert_eq!(serialize_object(&OwnedObject::real(-0.125), true), "-0.125");
    }

    #[test]
    fn integral_real_beyond_i64_keeps_no_trailing_dot() {
        assert_eq!(
            serialize_object(&OwnedObject::real(1e19), true),
            "10000000000000000000"
        );
    }

    #[test]
    fn string_representable_real() {
        assert_eq!(
            serialize_object(&OwnedObject::real_as_string(297.84), true),
            "(297.84)"
        );
    }

    #[test]
    fn format_real_direct() {
        assert_eq!(format_real(2.0, 16, false), "2");
        assert_eq!(format_real(0.5, 16, false), "0.5");
        assert_eq!(format_real(-3.25, 4, false), "-3.25");
        assert_eq!(format_real(1.5, 6, true), "(1.5)");
    }

    #[test]
    fn format_significant_digit_counts() {
        assert_eq!(format_significant(297.84, 16), "297.84");
        assert_eq!(format_significant(0.05, 3), "0.05");
        assert_eq!(format_significant(0.0, 8), "0");
    }

    // --- composites ---

    #[test]
    fn array_with_spacing() {
        let mut array = OwnedArray::new();
        array
            .push(OwnedObject::int(1))
            .push(OwnedObject::int(2))
            .push(OwnedObject::name("X"));
        let obj = OwnedObject::array(array);
        assert_eq!(serialize_object(&obj, true), "[ 1 2 /X ]");
    }

    #[test]
    fn empty_array_and_dict() {
        assert_eq!(
            serialize_object(&OwnedObject::array(OwnedArray::new()), true),
            "[ ]"
        );
        assert_eq!(
            serialize_object(&OwnedObject::dictionary(OwnedDict::new()), true),
            "<< >>"
        );
    }

    #[test]
    fn dictionary_in_insertion_order() {
        let mut dict = OwnedDict::new();
        dict.insert("Type", OwnedObject::name("Catalog"))
            .insert("Count", OwnedObject::int(3));
        let obj = OwnedObject::dictionary(dict);
        assert_eq!(
            serialize_object(&obj, true),
            "<< /Type /Catalog /Count 3 >>"
        );
    }

    #[test]
    fn nested_composites() {
        let mut inner = OwnedArray::new();
        inner.push_reals(&[0.0, 842.0], false);
        let mut dict = OwnedDict::new();
        dict.insert("MediaBox", OwnedObject::array(inner));
        let obj = OwnedObject::dictionary(dict);
        assert_eq!(serialize_object(&obj, true), "<< /MediaBox [ 0 842 ] >>");
    }

    // --- indirect references ---

    #[test]
    fn reference_shorthand_regardless_of_value() {
        let obj = OwnedObject::indirect(12, 0);
        assert_eq!(serialize_object(&obj, true), "12 0 R");
    }

    #[test]
    fn referenced_child_inside_dict_emits_shorthand() {
        let mut dict = OwnedDict::new();
        dict.insert("Next", OwnedObject::indirect(3, 0));
        let obj = OwnedObject::dictionary(dict);
        assert_eq!(serialize_object(&obj, true), "<< /Next 3 0 R >>");
    }

    #[test]
    fn indirect_placeholder_without_ref_emission_is_empty() {
        // Asking for the body of a pure placeholder yields nothing (logged).
        let obj = OwnedObject::indirect(3, 0);
        assert_eq!(serialize_object(&obj, false), "");
    }

    // --- cycle safety ---

    struct CycleNode {
        weak_self: RefCell<Weak<CycleNode>>,
        ref_id: Option<ObjectRef>,
    }

    impl CosObject for CycleNode {
        fn kind(&self) -> ObjectKind {
            ObjectKind::Dictionary
        }

        fn indirect_ref(&self) -> Option<ObjectRef> {
            self.ref_id
        }

        fn dict(&self) -> Option<Rc<dyn CosDict>> {
            Some(Rc::new(CycleDict {
                node: self.weak_self.borrow().clone(),
            }))
        }
    }

    struct CycleDict {
        node: Weak<CycleNode>,
    }

    impl CosDict for CycleDict {
        fn get(&self, key: &str) -> Option<ObjectHandle> {
            if key == "Self" {
                self.node.upgrade().map(|n| n as ObjectHandle)
            } else {
                None
            }
        }

        fn entries(&self) -> Vec<(String, ObjectHandle)> {
            self.node
                .upgrade()
                .into_iter()
                .map(|n| ("Self".to_string(), n as ObjectHandle))
                .collect()
        }
    }

    #[test]
    fn self_referential_object_serializes_as_shorthand() {
        let node = Rc::new_cyclic(|weak| CycleNode {
            weak_self: RefCell::new(weak.clone()),
            ref_id: ObjectRef::from_parts(9, 0),
        });
        assert_eq!(serialize_object(&*node, false), "<< /Self 9 0 R >>");
    }

    #[test]
    fn reference_free_cycle_terminates() {
        let node = Rc::new_cyclic(|weak| CycleNode {
            weak_self: RefCell::new(weak.clone()),
            ref_id: None,
        });
        let out = serialize_object(&*node, false);
        // The depth cap truncates the graph instead of recursing forever.
        assert!(out.starts_with("<< /Self"));
        assert!(out.len() < 16 * (MAX_SERIALIZE_DEPTH + 2));
    }
}
