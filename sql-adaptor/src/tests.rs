use super::*;
use query_parser::{Comparator, Expression, Gate, Node, Operation};
use std::sync::Arc;

fn user_schema() -> Schema {
    Schema::new()
        .field("id", "u32")
        .field("name", "String")
        .field("email", "Option<String>")
        .field("age", "u8")
        .field("score", "f64")
        .field("memberNumber", "Option<String>")
        .field("created_at", "timestamp")
}

fn users() -> SqlAdaptor {
    SqlAdaptor::from_schema(&user_schema()).unwrap()
}

fn compile(query: &str) -> SqlFragment {
    users()
        .compile_query(query)
        .unwrap_or_else(|e| panic!("failed case {query}: {e}"))
}

#[test]
fn test_compile_success_cases() {
    let cases: &[(&str, &str, &[&str])] = &[
        (
            "(name=max AND email=bob-dylan@aol.com) OR age > 1",
            "((name=? AND email=?) OR age>?)",
            &["max", "bob-dylan@aol.com", "1"],
        ),
        (
            r#"(name="" AND email=bob-dylan@aol.com) OR age > 1"#,
            "((name=? AND email=?) OR age>?)",
            &["", "bob-dylan@aol.com", "1"],
        ),
        ("name=max", "name=?", &["max"]),
        (
            "a_g_e>=1 AND score<0.5",
            "(age>=? AND score<?)",
            &["1", "0.5"],
        ),
        (
            "id!=3 OR id<=1 OR id<10",
            "((id!=? OR id<=?) OR id<?)",
            &["3", "1", "10"],
        ),
        (
            "name=a AND (email=b OR (age=1 AND score=2))",
            "(name=? AND (email=? OR (age=? AND score=?)))",
            &["a", "b", "1", "2"],
        ),
    ];
    for (query, raw, values) in cases {
        let fragment = compile(query);
        assert_eq!(fragment.raw, *raw, "failed case: {query}");
        assert_eq!(fragment.values, *values, "failed case: {query}");
    }
}

#[test]
fn test_compile_empty_value() {
    let fragment = compile(r#"name="""#);
    assert_eq!(fragment.raw, "name=?");
    assert_eq!(fragment.values, vec![""]);
}

#[test]
fn test_compile_like() {
    let fragment = compile(r#"name%"abc""#);
    assert_eq!(fragment.raw, "name LIKE ?");
    assert_eq!(fragment.values, vec!["%abc%"]);
}

#[test]
fn test_compile_unknown_field() {
    let err = users().compile_query("ghostField=1").unwrap_err();
    assert!(matches!(&err, AdaptorError::UnknownField { field } if field == "ghostField"));
    assert_eq!(err.to_string(), "field 'ghostField' is not valid");
}

#[test]
fn test_adaptor_error_into_string() {
    let message: String = users().compile_query("ghost=1").unwrap_err().into();
    assert_eq!(message, "field 'ghost' is not valid");
}

#[test]
fn test_compile_unknown_field_inside_tree() {
    let err = users()
        .compile_query("name=a AND (age=1 OR ghost=2)")
        .unwrap_err();
    assert!(matches!(err, AdaptorError::UnknownField { field } if field == "ghost"));
}

#[test]
fn test_compile_invalid_values() {
    let cases = [
        ("age=wow", "age"),
        ("age=1.5", "age"),
        ("id=-", "id"),
        ("score=high", "score"),
        ("name=a OR score=NaN", "score"),
    ];
    for (query, expected) in cases {
        let err = users().compile_query(query).unwrap_err();
        assert!(
            matches!(&err, AdaptorError::InvalidValue { field, .. } if field == expected),
            "failed case {query}: {err}"
        );
    }
}

#[test]
fn test_invalid_value_message() {
    let err = users().compile_query("age=wow").unwrap_err();
    assert_eq!(
        err.to_string(),
        "value 'wow' is not valid for field 'age': value 'wow' is not an integer"
    );
}

#[test]
fn test_compile_forwards_syntax_errors() {
    for query in ["name=default AND", "", "name=", "(name=a", "a=1 AND OR b=2"] {
        let err = users().compile_query(query).unwrap_err();
        assert!(
            matches!(err, AdaptorError::Syntax(_)),
            "failed case {query}: {err}"
        );
    }
}

#[test]
fn test_field_names_are_canonicalized() {
    for query in [
        "memberNumber=7",
        "member_number=7",
        "Member-Number=7",
        "MEMBERNUMBER=7",
    ] {
        let fragment = compile(query);
        assert_eq!(fragment.raw, "memberNumber=?", "failed case: {query}");
    }
}

#[test]
fn test_column_mapping() {
    let mut schema = Schema::new().field("name", "String");
    schema.push(SchemaField::new("memberNumber", "String").with_column("users.member_number"));
    let adaptor = SqlAdaptor::from_schema(&schema).unwrap();
    let fragment = adaptor
        .compile_query("member_number=1 OR NAME=x")
        .unwrap();
    assert_eq!(fragment.raw, "(users.member_number=? OR name=?)");
}

#[test]
fn test_opaque_types_accept_anything() {
    let fragment = compile(r#"created_at="2024-01-01 10:00" AND email=1"#);
    assert_eq!(fragment.values, vec!["2024-01-01 10:00", "1"]);
}

#[test]
fn test_duplicate_canonical_fields_rejected() {
    let schema = Schema::new()
        .field("member_number", "String")
        .field("memberNumber", "String");
    let err = SqlAdaptor::from_schema(&schema).unwrap_err();
    assert!(matches!(err, AdaptorError::DuplicateField { field } if field == "memberNumber"));
}

#[test]
fn test_invalid_column_rejected() {
    let schema = Schema::new().field("name; DROP TABLE users", "String");
    let err = SqlAdaptor::from_schema(&schema).unwrap_err();
    assert!(matches!(err, AdaptorError::InvalidIdentifier { .. }));
}

#[test]
fn test_custom_validator() {
    fn lowercase_only(value: &str) -> Result<(), String> {
        if value.chars().all(|ch| ch.is_ascii_lowercase()) {
            Ok(())
        } else {
            Err("only lowercase letters are allowed".to_string())
        }
    }

    let adaptor = SqlAdaptor::new()
        .with_field("handle", "user_handle", lowercase_only)
        .unwrap();
    assert_eq!(
        adaptor.compile_query("handle=bob").unwrap().raw,
        "user_handle=?"
    );
    let err = adaptor.compile_query("handle=Bob").unwrap_err();
    assert!(err.to_string().contains("only lowercase letters"));
}

#[test]
fn test_default_field_lookup() {
    let adaptor = users();
    let field = adaptor.default_field("Member_Number").unwrap();
    assert_eq!(field.column, "memberNumber");
    assert!((field.validator)("anything").is_ok());
    assert!(adaptor.default_field("ghost").is_none());
}

#[test]
fn test_key_value_matcher() {
    let adaptor = users()
        .with_key_value(KeyValueConfig::new("tags", "model_id").soft_delete_column("deleted_at"))
        .unwrap();
    let fragment = adaptor
        .compile_query(r#"name=max AND tags[auto_created]="true""#)
        .unwrap();
    assert_eq!(
        fragment.raw,
        "(name=? AND id IN (SELECT model_id FROM tags WHERE key=? AND value=? AND deleted_at IS NULL))"
    );
    assert_eq!(fragment.values, vec!["max", "auto_created", "true"]);
}

#[test]
fn test_custom_matchers_take_precedence_in_order() {
    let adaptor = users()
        .with_matcher("^name$", |e: &Expression| -> Result<SqlFragment, AdaptorError> {
            Ok(SqlFragment::new("first(?)", vec![e.value.clone()]))
        })
        .unwrap()
        .with_matcher("^na", |e: &Expression| -> Result<SqlFragment, AdaptorError> {
            Ok(SqlFragment::new("second(?)", vec![e.value.clone()]))
        })
        .unwrap();

    assert_eq!(adaptor.compile_query("name=x").unwrap().raw, "first(?)");
    assert_eq!(adaptor.compile_query("nap=x").unwrap().raw, "second(?)");
    assert_eq!(adaptor.compile_query("age=1").unwrap().raw, "age=?");
}

#[test]
fn test_custom_matcher_errors_propagate() {
    let adaptor = users()
        .with_matcher(r"^meta\.", |e: &Expression| -> Result<SqlFragment, AdaptorError> {
            Err(AdaptorError::invalid_value(
                &e.field,
                &e.value,
                "meta fields are read-only",
            ))
        })
        .unwrap();
    let err = adaptor.compile_query("meta.owner=x").unwrap_err();
    assert!(matches!(err, AdaptorError::InvalidValue { .. }));
}

#[test]
fn test_invalid_matcher_pattern() {
    let err = users()
        .with_matcher("tags[", |_: &Expression| -> Result<SqlFragment, AdaptorError> {
            Ok(SqlFragment::default())
        })
        .unwrap_err();
    assert!(matches!(err, AdaptorError::InvalidPattern { pattern, .. } if pattern == "tags["));
}

#[test]
fn test_compile_hand_built_trees() {
    let adaptor = users();
    let name = Node::from(Expression::new("name", Comparator::Equal, "a"));
    let age = Node::from(Expression::new("age", Comparator::GreaterThan, "1"));

    let grouped = Node::from(Operation::group(name.clone()));
    let fragment = adaptor.compile(&grouped).unwrap();
    assert_eq!(fragment.raw, "(name=?)");
    assert_eq!(fragment.values, vec!["a"]);

    let nested = Node::from(Operation::new(
        Node::from(Operation::group(name.clone())),
        Gate::And,
        age.clone(),
    ));
    assert_eq!(adaptor.compile(&nested).unwrap().raw, "((name=?) AND age>?)");

    let dangling = Node::from(Operation {
        left: Box::new(name.clone()),
        gate: Some(Gate::Or),
        right: None,
    });
    assert!(matches!(
        adaptor.compile(&dangling),
        Err(AdaptorError::Syntax(_))
    ));

    let gateless = Node::from(Operation {
        left: Box::new(name),
        gate: None,
        right: Some(Box::new(age)),
    });
    assert!(matches!(
        adaptor.compile(&gateless),
        Err(AdaptorError::Syntax(_))
    ));
}

#[test]
fn test_compile_long_chains() {
    let chain = |len: usize| {
        (0..len)
            .map(|i| format!("age>{i}"))
            .collect::<Vec<_>>()
            .join(" AND ")
    };
    let fragment = compile(&chain(query_parser::MAX_EXPRESSIONS));
    assert_eq!(fragment.values.len(), query_parser::MAX_EXPRESSIONS);
    assert_eq!(fragment.placeholder_count(), fragment.values.len());

    let err = users().compile_query(&chain(100_000)).unwrap_err();
    assert!(matches!(err, AdaptorError::Syntax(_)), "{err}");
}

#[test]
fn test_numbered_placeholders() {
    let fragment = compile("(name=max AND email=x) OR age>1");
    assert_eq!(fragment.numbered(0), "((name=$1 AND email=$2) OR age>$3)");
    assert_eq!(fragment.numbered(2), "((name=$3 AND email=$4) OR age>$5)");
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
fields:
  - { name: name, type: String }
  - { name: age, type: u32 }
  - { name: memberNumber, type: String, column: member_number }
key_value:
  - collection: tags
    foreign_key: model_id
    soft_delete_column: deleted_at
"#;
    let config: AdaptorConfig = serde_yaml_ng::from_str(yaml).unwrap();
    assert_eq!(config.fields.len(), 3);
    assert_eq!(config.fields.fields[1].field_type(), FieldType::Integer);

    let adaptor = SqlAdaptor::from_config(&config).unwrap();
    let fragment = adaptor
        .compile_query(r#"member_number=1 OR tags[a]%"b""#)
        .unwrap();
    assert_eq!(
        fragment.raw,
        "(member_number=? OR id IN (SELECT model_id FROM tags WHERE key=? AND value LIKE ? AND deleted_at IS NULL))"
    );
    assert_eq!(fragment.values, vec!["1", "a", "%b%"]);
    assert!(adaptor.compile_query("age=old").is_err());
}

#[test]
fn test_config_json_round_trip() {
    let config = AdaptorConfig::new(Schema::new().field("name", "String"))
        .key_value(KeyValueConfig::new("tags", "model_id"));
    let json = serde_json::to_string(&config).unwrap();
    let back: AdaptorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);

    let empty: AdaptorConfig = serde_json::from_str("{}").unwrap();
    assert!(empty.fields.is_empty());
    assert!(empty.key_value.is_empty());
}

#[test]
fn test_adaptor_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SqlAdaptor>();
}

#[test]
fn test_concurrent_compiles_share_adaptor() {
    let adaptor = Arc::new(users());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let adaptor = Arc::clone(&adaptor);
            std::thread::spawn(move || {
                let fragment = adaptor
                    .compile_query(&format!("age>{i} AND name=user{i}"))
                    .unwrap();
                assert_eq!(fragment.raw, "(age>? AND name=?)");
                assert_eq!(fragment.values, vec![i.to_string(), format!("user{i}")]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_values_never_reach_template() {
    let queries = [
        r#"name="x' OR 1=1 --""#,
        r#"name="AND" OR email="(age>1)""#,
        r#"name="; DROP TABLE users;" AND email%"%_""#,
    ];
    for query in queries {
        let fragment = compile(query);
        assert_eq!(fragment.placeholder_count(), fragment.values.len());
        for value in &fragment.values {
            let bare = value.trim_matches('%');
            assert!(
                bare.is_empty() || !fragment.raw.contains(bare),
                "value {value:?} leaked into {}",
                fragment.raw
            );
        }
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_field() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["name", "email", "member_number", "created_at"])
    }

    fn arb_comparator() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["=", "!=", ">", ">=", "<", "<=", "%"])
    }

    // Printable values without quotes; prefixed so they can't collide with
    // identifiers or keywords in the template.
    fn arb_value() -> impl Strategy<Value = String> {
        "[ -!#-~]{0,12}".prop_map(|v| format!("Q{v}"))
    }

    fn arb_query() -> impl Strategy<Value = String> {
        prop::collection::vec((arb_field(), arb_comparator(), arb_value()), 1..6).prop_flat_map(
            |terms| {
                let gates = prop::collection::vec(
                    prop::sample::select(vec!["AND", "OR"]),
                    terms.len() - 1,
                );
                (Just(terms), gates)
            },
        )
        .prop_map(|(terms, gates)| {
            let mut query = String::new();
            for (idx, (field, comparator, value)) in terms.iter().enumerate() {
                if idx > 0 {
                    query.push_str(&format!(" {} ", gates[idx - 1]));
                }
                query.push_str(&format!("{field}{comparator}\"{value}\""));
            }
            query
        })
    }

    proptest! {
        #[test]
        fn placeholders_align_with_values(query in arb_query()) {
            let fragment = users().compile_query(&query).unwrap();
            prop_assert_eq!(fragment.placeholder_count(), fragment.values.len());
        }

        #[test]
        fn values_stay_out_of_template(query in arb_query()) {
            let fragment = users().compile_query(&query).unwrap();
            for value in &fragment.values {
                let bare = value.trim_matches('%');
                prop_assert!(!fragment.raw.contains(bare), "{:?} leaked into {}", value, fragment.raw);
            }
        }

        #[test]
        fn compile_never_panics(query in "\\PC{0,64}") {
            let _ = users().compile_query(&query);
        }
    }
}
