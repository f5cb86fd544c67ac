use function_mocker::*;

const TEST_CLASS: &str = "tests::fixtures::TestClass";

fn test_class() -> DispatchTable {
    let table = DispatchTable::new();
    table
        .define_method(TEST_CLASS, "methodOne", |_| Value::Null)
        .define_method(TEST_CLASS, "methodTwo", |_| Value::Null);
    table
}

fn target(method: &str) -> String {
    format!("{TEST_CLASS}::{method}")
}

fn mocker() -> FunctionMocker {
    let mut mocker = FunctionMocker::new(test_class());
    mocker.set_up().unwrap();
    mocker
}

fn return_values() -> Vec<Value> {
    vec![
        Value::Int(23),
        Value::from("foo"),
        Value::List(vec![]),
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        Value::map([("one", 1), ("two", 2), ("three", 3)]),
        Value::object("stdClass"),
        Value::Null,
        Value::Int(0),
        Value::object("Order").with_field(
            "lines",
            vec![Value::map([("sku", "A-1")]), Value::map([("sku", "B-2")])],
        ),
    ]
}

/// (times, calls, should_fail)
fn times_calls_and_failures() -> Vec<(&'static str, usize, bool)> {
    vec![
        ("2", 2, false),
        ("2", 1, true),
        ("2", 3, true),
        (">=2", 2, false),
        (">=2", 3, false),
        (">=2", 1, true),
        ("<=2", 2, false),
        ("<=2", 3, true),
        ("<=2", 1, false),
        ("<2", 2, true),
        ("<2", 1, false),
        ("<2", 4, true),
        (">2", 2, true),
        (">2", 1, true),
        (">2", 3, false),
        ("!=2", 2, true),
        ("!=2", 1, false),
        ("!=2", 3, false),
        ("==2", 3, true),
        ("==2", 2, false),
        ("==2", 1, true),
    ]
}

#[test]
fn test_unset_return_value_is_null() {
    let mut mocker = mocker();
    let replacement = mocker.replace(&target("methodOne")).unwrap();
    assert_eq!(replacement.call("methodOne", &[]).unwrap(), Value::Null);
}

#[test]
fn test_static_return_values_are_echoed() {
    for value in return_values() {
        let mut mocker = mocker();
        let replacement = mocker
            .replace_returning(&target("methodOne"), value.clone())
            .unwrap();
        assert_eq!(replacement.call("methodOne", &[]).unwrap(), value);
        assert_eq!(replacement.call("methodOne", &[]).unwrap(), value);
    }
}

#[test]
fn test_callback_return_value() {
    let mut mocker = mocker();
    let replacement = mocker
        .replace_returning(
            &target("methodOne"),
            ReturnPolicy::callback(|_| Value::from("some")),
        )
        .unwrap();
    assert_eq!(replacement.call("methodOne", &[]).unwrap(), Value::from("some"));
}

#[test]
fn test_callback_sees_call_arguments() {
    let mut mocker = mocker();
    let replacement = mocker
        .replace_returning(
            &target("methodTwo"),
            ReturnPolicy::callback(|args| Value::Int(args.iter().filter_map(Value::as_int).product())),
        )
        .unwrap();
    assert_eq!(
        replacement.call("methodTwo", &[Value::Int(6), Value::Int(7)]).unwrap(),
        Value::Int(42)
    );
    assert_eq!(
        replacement.call("methodTwo", &[Value::Int(2), Value::Int(5)]).unwrap(),
        Value::Int(10)
    );
}

#[test]
fn test_was_called_times_table() {
    for (times, calls, should_fail) in times_calls_and_failures() {
        let mut mocker = mocker();
        let spy = mocker.replace(&target("methodOne")).unwrap();
        for _ in 0..calls {
            spy.call("methodOne", &[]).unwrap();
        }

        let result = spy.was_called_times(times, None);
        assert_eq!(
            result.is_err(),
            should_fail,
            "times {times:?} with {calls} calls"
        );
        if let Err(err) = result {
            assert!(err.is_assertion_failure(), "{err}");
        }
    }
}

#[test]
fn test_was_called_times_accepts_integers() {
    for (expected, calls, should_fail) in [(2, 2, false), (2, 1, true), (2, 3, true)] {
        let mut mocker = mocker();
        let spy = mocker.replace(&target("methodOne")).unwrap();
        for _ in 0..calls {
            spy.call("methodOne", &[]).unwrap();
        }
        assert_eq!(spy.was_called_times(expected, None).is_err(), should_fail);
    }
}

#[test]
fn test_was_called_with_times_table() {
    let args = [Value::Int(23), Value::Int(23)];
    for (times, calls, should_fail) in times_calls_and_failures() {
        let mut mocker = mocker();
        let spy = mocker.replace(&target("methodTwo")).unwrap();
        for _ in 0..calls {
            spy.call("methodTwo", &args).unwrap();
        }
        // Calls with other arguments never count.
        spy.call("methodTwo", &[Value::Int(23), Value::Int(45)]).unwrap();

        let result = spy.was_called_with_times(&args, times, None);
        assert_eq!(
            result.is_err(),
            should_fail,
            "times {times:?} with {calls} matching calls"
        );
    }
}

#[test]
fn test_exact_count_boundary() {
    for n in 0..8 {
        let mut mocker = mocker();
        let spy = mocker.replace(&target("methodOne")).unwrap();
        for _ in 0..n {
            spy.call("methodOne", &[]).unwrap();
        }
        spy.was_called_times(n.to_string(), None).unwrap();
        assert!(spy.was_called_times((n + 1).to_string(), None).is_err());
    }
}

#[test]
fn test_same_substitute_for_two_methods() {
    let mut mocker = mocker();
    let object1 = mocker.replace(&target("methodOne")).unwrap();
    let object2 = mocker.replace(&target("methodTwo")).unwrap();
    assert_eq!(object1, object2);
}

#[test]
fn test_calls_on_different_methods_are_counted_apart() {
    let mut mocker = mocker();
    let replacement = mocker.replace(&target("methodOne")).unwrap();
    mocker.replace(&target("methodTwo")).unwrap();

    replacement.call("methodOne", &[]).unwrap();
    replacement.call("methodOne", &[]).unwrap();
    replacement.call("methodOne", &[]).unwrap();
    replacement
        .call("methodTwo", &[Value::Int(23), Value::Int(45)])
        .unwrap();

    replacement.was_called_times(3, Some("methodOne")).unwrap();
    replacement.was_called_times(1, Some("methodTwo")).unwrap();
}

#[test]
fn test_replacement_called_inside_closure() {
    let mut mocker = mocker();
    let method_one = mocker.replace(&target("methodOne")).unwrap();

    let caller = |instance: &Substitute| {
        instance.call("methodOne", &[]).unwrap();
    };
    caller(&method_one);

    method_one.was_called_times(1, None).unwrap();
}

#[test]
fn test_different_return_values_per_method() {
    let mut mocker = mocker();
    let test_class = mocker
        .replace_returning(&target("methodOne"), Value::from("foo"))
        .unwrap();
    mocker
        .replace_returning(&target("methodTwo"), Value::from("bar"))
        .unwrap();

    assert_eq!(test_class.call("methodOne", &[]).unwrap(), Value::from("foo"));
    assert_eq!(
        test_class
            .call("methodTwo", &[Value::Int(23), Value::Int(45)])
            .unwrap(),
        Value::from("bar")
    );
}
