//! Programs the semantic passes must turn away, one per failure class.

use std::{error::Error, path::Path};

use test_utils::check_failing_type_checking;

#[test]
fn reject_method_that_does_not_return() -> Result<(), Box<dyn Error>> {
    check_failing_type_checking(Path::new("./demos/missing_return.q"), "does not return")
}

#[test]
fn reject_non_boolean_condition() -> Result<(), Box<dyn Error>> {
    check_failing_type_checking(
        Path::new("./demos/bad_condition.q"),
        "While condition must be of type 'Boolean'",
    )
}

#[test]
fn reject_undefined_constructor_target() -> Result<(), Box<dyn Error>> {
    check_failing_type_checking(
        Path::new("./demos/undefined_constructor.q"),
        "constructor of undefined class 'Pt'",
    )
}

#[test]
fn reject_malformed_hierarchy() -> Result<(), Box<dyn Error>> {
    check_failing_type_checking(
        Path::new("./demos/bad_hierarchy.q"),
        "Class hierarchy is malformed",
    )
}
