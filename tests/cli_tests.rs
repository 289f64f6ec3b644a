use assert_cmd::Command;
use std::path::PathBuf;

fn cfdcase() -> Command {
    Command::cargo_bin("cfdcase").unwrap()
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cfdcase_cli_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_subcommand_options() {
    let output = cfdcase().output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: cfdcase [OPTIONS] <COMMAND>"));
    for command in ["write", "validate", "run", "supervise", "schema", "example"] {
        assert!(stderr.contains(&format!("  {} ", command)), "missing {} in:\n{}", command, stderr);
    }
}

#[test]
fn example_config_writes_a_case() {
    let dir = scratch("example");
    let output = cfdcase().arg("example").output().unwrap();
    assert!(output.status.success());
    std::fs::write(dir.join("duct.yaml"), &output.stdout).unwrap();

    cfdcase().arg("validate").arg(dir.join("duct.yaml")).assert().success();
    cfdcase().arg("--quiet").arg("write").arg(dir.join("duct.yaml")).assert().success().stdout("");
    for file in ["0/U", "0/p", "0/k", "0/omega", "0/nut", "constant/transportProperties", "system/controlDict", "Allrun"] {
        assert!(dir.join("duct").join(file).is_file(), "missing {}", file);
    }

    let output = cfdcase().args(["example", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    std::fs::write(dir.join("duct.json"), &output.stdout).unwrap();
    cfdcase().arg("write").arg(dir.join("duct.json")).arg("-o").arg(dir.join("from_json")).assert().success();
    assert!(dir.join("from_json").join("0").join("U").is_file());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invalid_analysis_exits_with_two() {
    let dir = scratch("invalid");
    let config = "\
version: 2
name: bad
boundaries:
- name: inlet
  faces: []
  category: inlet
  subtype: totalPressure
";
    std::fs::write(dir.join("bad.yaml"), config).unwrap();
    let output = cfdcase().arg("validate").arg(dir.join("bad.yaml")).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("boundary 'inlet': Pressure: required but not set"), "{}", stderr);
    assert!(!dir.join("bad").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn schema_lists_subtype_inputs() {
    let output = cfdcase().args(["schema", "inlet", "massFlowRateInlet"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mass flow rate (massFlowRateInlet)"));
    assert!(stdout.contains("MassFlowRate"));

    let output = cfdcase().args(["schema", "--turbulence", "kOmegaSST"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("IntensityAndLengthScale"));

    let output = cfdcase().args(["schema", "wall", "totalPressureInlet"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not part of category"));
}

#[cfg(unix)]
#[test]
fn supervise_returns_the_child_exit_code() {
    let output = cfdcase().args(["supervise", "--", "sh", "-c", "echo relayed; echo warned >&2; exit 7"]).output().unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "relayed\n");
    assert_eq!(String::from_utf8_lossy(&output.stderr), "warned\n");
}

#[test]
fn supervise_reports_missing_programs() {
    let output = cfdcase().args(["supervise", "--", "cfdcase-no-such-solver"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}
