use std::{error::Error, path::Path};

use test_utils::check_failing_type_checking;

const SRC_PATH: &str = "./demos/override.q";

#[test]
fn reject_override_with_unrelated_return() -> Result<(), Box<dyn Error>> {
    check_failing_type_checking(
        Path::new(SRC_PATH),
        "not the same type or a subtype of the overridden method",
    )
}
