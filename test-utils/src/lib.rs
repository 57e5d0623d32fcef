use std::{
    error::Error,
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Output},
    str,
};

const QC_PATH: &str = "./target/debug/qc";
const SCRATCH_PATH: &str = "./target/q-scratch";

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

/// The compiler always writes `q.c` and `pgm` into its working
/// directory, so every program compiles in a scratch directory of its
/// own and parallel tests stay out of each other's way.
fn scratch_dir(src_path: &Path) -> Result<PathBuf, io::Error> {
    let dir = Path::new(SCRATCH_PATH).join(src_path.file_stem().unwrap());
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn run_compiler(src_path: &Path) -> Result<(PathBuf, Output), Box<dyn Error>> {
    let scratch = scratch_dir(src_path)?;
    let output = Command::new(fs::canonicalize(QC_PATH)?)
        .arg(fs::canonicalize(src_path)?)
        .current_dir(&scratch)
        .output()?;
    Ok((scratch, output))
}

/// Compile a program, run the produced executable and compare its
/// output.
pub fn check_compilation(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let (scratch, compile_output) = run_compiler(src_path)?;
    assert!(
        compile_output.status.success(),
        "qc exited with status {:?}:\n{}",
        compile_output.status.code(),
        str::from_utf8(&compile_output.stderr)?
    );

    let output = Command::new(scratch.join("pgm")).output()?;
    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "compiled program exited with status {:?}",
        output.status.code()
    );

    Ok(())
}

/// Run the compiler on a program that must be rejected and check the
/// diagnostic it prints.
pub fn check_failing_type_checking(
    src_path: &Path,
    expected_fragment: &str,
) -> Result<(), Box<dyn Error>> {
    let (_, output) = run_compiler(src_path)?;
    assert!(
        !output.status.success(),
        "qc should reject '{}'",
        src_path.display()
    );

    let stderr = str::from_utf8(&output.stderr)?;
    assert!(
        stderr.contains(expected_fragment),
        "stderr did not mention '{expected_fragment}':\n{stderr}"
    );

    Ok(())
}
