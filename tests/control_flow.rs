use rill::interpreter::parse_and_run;

#[test]
fn test_if_takes_then_branch() {
    let source = r#"
        if (1 < 2) {
            print "then";
        } else {
            print "else";
        }
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["then"]);
}

#[test]
fn test_if_takes_else_branch() {
    let source = r#"
        if (nil) {
            print "then";
        } else {
            print "else";
        }
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["else"]);
}

#[test]
fn test_if_without_else_falls_through() {
    let source = r#"
        if (false) {
            print "skipped";
        }
        print "after";
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["after"]);
}

#[test]
fn test_while_loop_basic() {
    let source = r#"
        var x = 0;
        while (x < 5) {
            x = x + 1;
        }
        print x;
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["5"]);
}

#[test]
fn test_while_loop_condition_false_skips_body() {
    let source = r#"
        var x = 10;
        while (x < 5) {
            x = x + 1;
        }
        print x;
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["10"]);
}

#[test]
fn test_for_loop_counts_up() {
    let source = "for (var i = 0; i < 3; i = i + 1) { print i; }";
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["0", "1", "2"]);
}

#[test]
fn test_for_loop_variable_scoped_to_loop() {
    let source = "for (var i = 0; i < 1; i = i + 1) {} print i;";
    let err = parse_and_run(source).unwrap_err();
    assert_eq!(err, "Runtime error: Undefined variable 'i'.");
}

#[test]
fn test_for_with_existing_variable_initializer() {
    let source = r#"
        var i = 0;
        var sum = 0;
        for (i = 1; i <= 4; i = i + 1) {
            sum = sum + i;
        }
        print sum;
        print i;
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["10", "5"]);
}

#[test]
fn test_for_without_initializer() {
    let source = r#"
        var i = 0;
        for (; i < 2; i = i + 1) {
            print i;
        }
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["0", "1"]);
}

#[test]
fn test_nested_loops() {
    let source = r#"
        for (var i = 0; i < 2; i = i + 1) {
            for (var j = 0; j < 2; j = j + 1) {
                print i * 10 + j;
            }
        }
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["0", "1", "10", "11"]);
}

#[test]
fn test_loop_mutations_visible_after_loop() {
    let source = r#"
        var total = 0;
        for (var i = 1; i <= 3; i = i + 1) {
            total = total + i;
        }
        print total;
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["6"]);
}

#[test]
fn test_condition_reevaluated_each_iteration() {
    let source = r#"
        var limit = 3;
        var i = 0;
        while (i < limit) {
            i = i + 1;
            limit = limit - 1;
        }
        print i;
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["2"]);
}

#[test]
fn test_loop_body_var_redeclares_in_shared_scope() {
    // The loop scope is shared across iterations, so a `var` in the body
    // collides with itself on the second pass.
    let source = r#"
        for (var i = 0; i < 2; i = i + 1) {
            var next = i;
        }
    "#;
    let err = parse_and_run(source).unwrap_err();
    assert_eq!(err, "Runtime error: Variable 'next' already defined.");
}

#[test]
fn test_fibonacci_iterative() {
    let source = r#"
        var a = 0;
        var b = 1;
        var next = 0;
        for (var i = 0; i < 8; i = i + 1) {
            next = a + b;
            a = b;
            b = next;
        }
        print a;
    "#;
    let output = parse_and_run(source).unwrap();
    assert_eq!(output, vec!["21"]);
}
