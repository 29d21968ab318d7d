use std::collections::BTreeSet;

use fieldmap_engine::{FieldMapper, MatcherConfig, resolve_conflicts};
use fieldmap_model::{FieldType, SourceField, TargetField};
use proptest::prelude::*;

const VOCABULARY: &[&str] = &[
    "firstName",
    "first_name",
    "lastName",
    "surname",
    "email",
    "email_address",
    "phone",
    "phone_number",
    "zip_code",
    "postalCode",
    "date_of_birth",
    "dob",
    "salary",
    "amount",
    "city",
];

fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(VOCABULARY).prop_map(str::to_string),
        1 => "[a-zA-Z_]{1,16}",
    ]
}

/// Vocabulary and random ASCII names with each letter's case flipped at
/// random.
fn mixed_case_name() -> impl Strategy<Value = String> {
    (field_name(), prop::collection::vec(any::<bool>(), 16)).prop_map(|(name, flips)| {
        name.chars()
            .zip(flips.into_iter().cycle())
            .map(|(ch, flip)| if flip { ch.to_ascii_uppercase() } else { ch })
            .collect()
    })
}

fn field_type() -> impl Strategy<Value = FieldType> {
    prop::sample::select(FieldType::ALL.to_vec())
}

fn sources() -> impl Strategy<Value = Vec<SourceField>> {
    prop::collection::vec(
        (field_name(), field_type()).prop_map(|(name, ty)| SourceField::new(name, ty)),
        0..6,
    )
}

fn targets() -> impl Strategy<Value = Vec<TargetField>> {
    prop::collection::vec(
        (field_name(), field_type()).prop_map(|(name, ty)| TargetField::new(name, ty)),
        0..6,
    )
}

proptest! {
    #[test]
    fn mapping_is_deterministic(sources in sources(), targets in targets()) {
        let mapper = FieldMapper::new(MatcherConfig::default()).unwrap();
        let first = mapper.map_with_report(&sources, &targets);
        let second = mapper.map_with_report(&sources, &targets);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn confidence_stays_in_unit_interval(source in field_name(), target in field_name(), ty in field_type()) {
        let mapper = FieldMapper::new(MatcherConfig::default()).unwrap();
        let mapping = mapper.score_pair(&SourceField::new(source, ty), &TargetField::new(target, ty));
        prop_assert!((0.0..=1.0).contains(&mapping.confidence));
    }

    #[test]
    fn case_never_lowers_confidence(source in mixed_case_name(), target in mixed_case_name(), ty in field_type()) {
        let mapper = FieldMapper::new(MatcherConfig::default()).unwrap();
        let mixed = mapper.score_pair(
            &SourceField::new(source.clone(), ty),
            &TargetField::new(target.clone(), ty),
        );
        let lowered = mapper.score_pair(
            &SourceField::new(source.to_lowercase(), ty),
            &TargetField::new(target.to_lowercase(), ty),
        );
        prop_assert!(
            mixed.confidence >= lowered.confidence,
            "{source} / {target}: {} < {}",
            mixed.confidence,
            lowered.confidence
        );
    }

    #[test]
    fn each_target_is_assigned_once(sources in sources(), targets in targets()) {
        let config = MatcherConfig::default().with_thresholds(0.3, 0.3);
        let mapper = FieldMapper::new(config).unwrap();
        let mappings = mapper.map_fields(&sources, &targets);

        let distinct: BTreeSet<&str> = mappings.iter().map(|m| m.target_field.as_str()).collect();
        prop_assert_eq!(distinct.len(), mappings.len());
        prop_assert!(mappings.iter().all(|m| m.confidence >= 0.3));
    }

    #[test]
    fn raising_the_confidence_floor_never_adds_mappings(
        sources in sources(),
        targets in targets(),
        low in 0.0f64..0.8,
        delta in 0.0f64..0.2,
    ) {
        let high = low + delta;
        let loose = FieldMapper::new(MatcherConfig::default().with_thresholds(0.0, low)).unwrap();
        let strict = FieldMapper::new(MatcherConfig::default().with_thresholds(0.0, high)).unwrap();

        let loose_mappings = loose.map_fields(&sources, &targets);
        let strict_mappings = strict.map_fields(&sources, &targets);
        prop_assert!(strict_mappings.len() <= loose_mappings.len());
        prop_assert!(strict_mappings.iter().all(|m| m.confidence >= high));
    }

    #[test]
    fn raising_the_similarity_floor_never_grows_the_pool(
        source in field_name(),
        targets in targets(),
        low in 0.0f64..0.8,
        delta in 0.0f64..0.2,
    ) {
        let source = SourceField::named(source);
        let loose = FieldMapper::new(MatcherConfig::default().with_similarity_threshold(low)).unwrap();
        let strict =
            FieldMapper::new(MatcherConfig::default().with_similarity_threshold(low + delta)).unwrap();

        prop_assert!(strict.suggest(&source, &targets).len() <= loose.suggest(&source, &targets).len());
    }

    #[test]
    fn resolved_mappings_are_stable(sources in sources(), targets in targets()) {
        let config = MatcherConfig::default().with_thresholds(0.2, 0.2);
        let mapper = FieldMapper::new(config).unwrap();
        let mappings = mapper.map_fields(&sources, &targets);

        let again = resolve_conflicts(mappings.clone());
        prop_assert_eq!(again.mappings, mappings);
        prop_assert!(again.conflicts.is_empty());
    }
}
