use std::{error::Error, path::Path};

use test_utils::{check_compilation, Expected};

const SRC_PATH: &str = "./demos/join.q";
const EXPECTED: Expected = Expected {
    stdout: "hi",
    stderr: "",
};

/// After the if/else join `x` is an `Obj`; `PRINT` resolves on `Obj` and
/// the runtime still prints the string the branch stored.
#[test]
fn compile_and_run_join() -> Result<(), Box<dyn Error>> {
    check_compilation(Path::new(SRC_PATH), EXPECTED)
}
