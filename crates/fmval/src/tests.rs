#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_value_display() {
        assert_eq!(format!("{}", Value::Int(42)), "42");
        assert_eq!(format!("{}", Value::String("hi".into())), "\"hi\"");
        assert_eq!(format!("{}", Value::Bool(true)), "true");
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(
            format!("{}", Value::List(vec![Value::Int(1), Value::Int(2)])),
            "[1, 2]"
        );
        assert_eq!(
            format!("{}", Value::object("Point").with_field("x", 1)),
            "Point {x: 1}"
        );
    }

    #[test]
    fn test_value_default_is_null() {
        assert!(Value::default().is_null());
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn test_nested_values_compare_deeply() {
        let a = Value::map([("one", 1), ("two", 2), ("three", 3)]);
        let b = Value::map([("three", 3), ("two", 2), ("one", 1)]);
        assert_eq!(a, b);

        let nested = Value::List(vec![a.clone(), Value::List(vec![])]);
        assert_eq!(nested, Value::List(vec![b, Value::List(vec![])]));
        assert_ne!(nested, Value::List(vec![a]));
    }

    #[test]
    fn test_empty_object_differs_by_class() {
        assert_eq!(Value::object("stdClass"), Value::object("stdClass"));
        assert_ne!(Value::object("stdClass"), Value::object("Other"));
        assert_ne!(Value::object("stdClass"), Value::Map(Default::default()));
    }

    #[test]
    fn test_with_field_ignores_non_objects() {
        assert_eq!(Value::Int(1).with_field("x", 2), Value::Int(1));
    }

    #[test]
    fn test_value_json() {
        let value = Value::object("Order")
            .with_field("id", 7)
            .with_field("lines", vec![Value::from("a"), Value::Null]);
        let json = value.to_json().unwrap();
        assert_eq!(Value::from_json(&json).unwrap(), value);
        assert!(Value::from_json("{not json").is_err());
    }

    #[test]
    fn test_argument_record_matching() {
        let record = ArgumentRecord::new(&[Value::Int(23), Value::Int(23)]);
        assert_eq!(record.len(), 2);
        assert!(record.matches(&[Value::Int(23), Value::Int(23)]));
        assert!(!record.matches(&[Value::Int(23)]));
        assert!(!record.matches(&[Value::Int(23), Value::Int(45)]));
        assert_eq!(format!("{record}"), "(23, 23)");

        let empty = ArgumentRecord::default();
        assert!(empty.is_empty());
        assert!(empty.matches(&[]));
        assert_eq!(format!("{empty}"), "()");
    }
}
