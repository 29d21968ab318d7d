//! Field type inference for a mapping.
//!
//! Priority order (first applicable wins):
//! 1. Target's declared type
//! 2. Source's declared type
//! 3. Keywords in the source field name
//! 4. Default (`Text`)

use fieldmap_model::{FieldType, SourceField, TargetField};

/// Name keywords per type, scanned in order.
const KEYWORD_TYPES: &[(&[&str], FieldType)] = &[
    (&["email", "e-mail"], FieldType::Email),
    (&["phone", "mobile", "tel"], FieldType::Phone),
    (&["date", "birth", "dob"], FieldType::Date),
    (&["name", "first", "last"], FieldType::Name),
    (&["address", "street", "city"], FieldType::Address),
    (&["amount", "price", "salary"], FieldType::Currency),
];

/// Infers the semantic type to attach to a source → target mapping.
pub fn infer_field_type(source: &SourceField, target: &TargetField) -> FieldType {
    if target.declared_type.is_known() {
        return target.declared_type;
    }
    if source.declared_type.is_known() {
        return source.declared_type;
    }
    infer_from_name(&source.name).unwrap_or(FieldType::Text)
}

/// Keyword scan of a field name; `None` when no keyword occurs.
pub fn infer_from_name(name: &str) -> Option<FieldType> {
    let lower = name.to_lowercase();
    KEYWORD_TYPES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lower.contains(*keyword)))
        .map(|(_, ty)| *ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_declared_type_wins() {
        let source = SourceField::new("user_email", FieldType::Email);
        let target = TargetField::new("contact", FieldType::Text);
        assert_eq!(infer_field_type(&source, &target), FieldType::Text);
    }

    #[test]
    fn source_declared_type_is_second() {
        let source = SourceField::new("user_email", FieldType::Phone);
        let target = TargetField::named("contact");
        assert_eq!(infer_field_type(&source, &target), FieldType::Phone);
    }

    #[test]
    fn keywords_apply_when_both_unknown() {
        let target = TargetField::named("contact_email");
        let cases = [
            ("user_email", FieldType::Email),
            ("E-Mail", FieldType::Email),
            ("mobileNo", FieldType::Phone),
            ("DOB", FieldType::Date),
            ("lastName", FieldType::Name),
            ("CityTown", FieldType::Address),
            ("totalAmount", FieldType::Currency),
            ("comments", FieldType::Text),
        ];
        for (name, expected) in cases {
            let source = SourceField::named(name);
            assert_eq!(infer_field_type(&source, &target), expected, "{name}");
        }
    }

    #[test]
    fn earlier_keyword_groups_take_precedence() {
        // "email" is checked before "address".
        assert_eq!(infer_from_name("email_address"), Some(FieldType::Email));
        // "date" is checked before "name".
        assert_eq!(infer_from_name("birth_date_name"), Some(FieldType::Date));
    }
}
