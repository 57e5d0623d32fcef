use std::{error::Error, path::Path};

use test_utils::{check_compilation, Expected};

const SRC_PATH: &str = "./demos/classes.q";
const EXPECTED: Expected = Expected {
    stdout: "1",
    stderr: "",
};

#[test]
fn compile_and_run_classes() -> Result<(), Box<dyn Error>> {
    check_compilation(Path::new(SRC_PATH), EXPECTED)
}
