use fixture_api::prelude::*;
use fixture_api::{ContainerInfo, GenerateOptionsBuilder, DEFAULT_NULL_INJECT};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct NeverNullPlugin;

impl Plugin for NeverNullPlugin {
    fn accept(&self, builder: GenerateOptionsBuilder) -> GenerateOptionsBuilder {
        builder.insert_first_null_inject_generator(AnyMatcher, |_: &Property| NOT_NULL_INJECT)
    }
}

fn nullable_field() -> Property {
    Property::root(TypeDesc::object("Holder", vec![FieldDesc::of::<Option<String>>("inner")]))
        .child_properties()
        .remove(0)
}

#[test]
fn plugin_registrations_take_effect() {
    let plain = GenerateOptions::default().generate_arbitrary_property(&nullable_field(), None);
    assert!((plain.null_inject() - DEFAULT_NULL_INJECT).abs() < f64::EPSILON);

    let options = GenerateOptions::builder().plugin(&NeverNullPlugin).build();
    assert!(options.generate_arbitrary_property(&nullable_field(), None).is_not_null());
}

#[test]
fn json_config_feeds_builder() {
    let config = FixtureConfig::from_json_str(
        r#"{"default_null_inject": 1.0, "default_container_min_size": 1, "default_container_max_size": 4}"#,
    )
    .unwrap();
    let options = GenerateOptions::builder().config(&config).build();

    assert!(options.generate_arbitrary_property(&nullable_field(), None).is_forced_null());
    let list = options.generate_arbitrary_property(&Property::root(Vec::<u8>::describe()), None);
    assert_eq!(list.container_info().copied(), Some(ContainerInfo::new(1, 4).unwrap()));
}

proptest! {
    #[test]
    fn prop_last_insert_first_wins(values in proptest::collection::vec(any::<i32>(), 1..6)) {
        let property = Property::root(i32::describe());
        let options = values
            .iter()
            .fold(GenerateOptions::builder(), |builder, v| {
                builder.insert_first_arbitrary_generator(AssignableTypeMatcher::new("i32"), JustArbitraryGenerator::new(*v))
            })
            .build();

        let sampled = options
            .arbitrary_generator(&property)
            .generate(&property, &mut GenContext::new(0))
            .unwrap();
        prop_assert_eq!(sampled, Value::from(*values.last().unwrap()));
    }
}
