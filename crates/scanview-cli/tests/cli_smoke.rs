use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const TYPED: &str = "import type { Props } from \"./types\";\n\
interface State {\n  count: number;\n}\n\
export function add(a: number, b: number): number {\n  return a + b;\n}\n\
const label = value as string;\n";

fn strip_types() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("strip-types"))
}

#[test]
fn no_args_prints_usage() -> Result<(), Box<dyn std::error::Error>> {
    strip_types()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn help_works() -> Result<(), Box<dyn std::error::Error>> {
    strip_types().arg("--help").assert().success();
    Ok(())
}

#[test]
fn missing_input_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("nope.ts");

    strip_types()
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"))
        .stderr(predicate::str::contains("nope.ts"));
    assert!(!dir.path().join("nope.js").exists());
    Ok(())
}

#[test]
fn ts_input_writes_js_sibling() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let input = dir.path().join("math.ts");
    fs::write(&input, TYPED)?;

    strip_types()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("math.js"));

    let out = fs::read_to_string(dir.path().join("math.js"))?;
    assert!(!out.contains("import type"));
    assert!(!out.contains("interface State"));
    assert!(out.contains("export function add(a, b) {"));
    assert!(out.contains("const label = value;"));

    // The input is left alone
    assert_eq!(fs::read_to_string(&input)?, TYPED);
    Ok(())
}

#[test]
fn tsx_input_writes_jsx_sibling() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let input = dir.path().join("Panel.tsx");
    fs::write(
        &input,
        "export const Panel: React.FC<Props> = ({ title }) => <h1>{title}</h1>;\n",
    )?;

    strip_types().arg(&input).assert().success();

    let out = fs::read_to_string(dir.path().join("Panel.jsx"))?;
    assert_eq!(out, "export const Panel = ({ title }) => <h1>{title}</h1>;\n");
    Ok(())
}

#[test]
fn explicit_output_path() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let input = dir.path().join("a.ts");
    let output = dir.path().join("nested-name.mjs");
    fs::write(&input, "let n: number = 1;\n")?;

    strip_types().arg(&input).arg(&output).assert().success();

    assert_eq!(fs::read_to_string(&output)?, "let n = 1;\n");
    assert!(!dir.path().join("a.js").exists());
    Ok(())
}

#[test]
fn stdout_flag_skips_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let input = dir.path().join("a.ts");
    fs::write(&input, "let n: number = 1;\n")?;

    strip_types()
        .arg("--stdout")
        .arg(&input)
        .assert()
        .success()
        .stdout("let n = 1;\n");

    assert!(!dir.path().join("a.js").exists());
    Ok(())
}

#[test]
fn unreadable_input_reports_error() -> Result<(), Box<dyn std::error::Error>> {
    // A directory exists but cannot be read as a file
    let dir = TempDir::new()?;
    let input = dir.path().join("folder.ts");
    fs::create_dir(&input)?;

    strip_types()
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
    Ok(())
}
