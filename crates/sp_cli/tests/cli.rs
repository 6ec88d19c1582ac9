use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn sketch(dir: &TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).unwrap();
    path
}

#[test]
fn preprocess_writes_java_and_prints_class_name() {
    let dir = TempDir::new().unwrap();
    let input = sketch(&dir, "Blink.pde", "void draw() { background(#FF0000); }\n");

    let mut cmd = cargo_bin_cmd!("spp");
    cmd.arg("preprocess").arg(&input).arg("-o").arg(dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::eq("Blink\n"))
        .stderr(predicate::str::contains("active mode"));

    let java = std::fs::read_to_string(dir.path().join("Blink.java")).unwrap();
    assert!(java.contains("public class Blink extends PApplet {"));
    assert!(java.contains("public void draw() { background(0xffff0000); }"));
}

#[test]
fn preprocess_honours_flags_and_prefs() {
    let dir = TempDir::new().unwrap();
    let input = sketch(&dir, "s.pde", "float f = 0.5;\n");
    let prefs = sketch(&dir, "prefs.json", r#"{ "indent_width": 4 }"#);

    let mut cmd = cargo_bin_cmd!("spp");
    cmd.arg("preprocess")
        .arg(&input)
        .arg("-o")
        .arg(dir.path())
        .arg("--name")
        .arg("Flags")
        .arg("--prefs")
        .arg(&prefs)
        .arg("--no-float-suffix")
        .arg("--parse-tree");
    cmd.assert().success();

    let java = std::fs::read_to_string(dir.path().join("Flags.java")).unwrap();
    assert!(java.contains("float f = 0.5;"));
    assert!(java.contains("\n    public void setup() {\n"));
    assert!(dir.path().join("parseTree.xml").exists());
}

#[test]
fn check_reports_syntax_errors_with_position() {
    let dir = TempDir::new().unwrap();
    let input = sketch(&dir, "bad.pde", "void setup() {\n  int x = ;\n}\n");

    let mut cmd = cargo_bin_cmd!("spp");
    cmd.arg("check").arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 2, column 11"));
}

#[test]
fn check_and_preprocess_agree_on_error_columns() {
    let dir = TempDir::new().unwrap();
    let input = sketch(&dir, "uni.pde", "println(\"\u{e9}\"); int x = ;\n");

    let mut check = cargo_bin_cmd!("spp");
    check.arg("check").arg(&input);
    check
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1, column 28"));

    let mut preprocess = cargo_bin_cmd!("spp");
    preprocess.arg("preprocess").arg(&input).arg("-o").arg(dir.path());
    preprocess
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1, column 28"));
}

#[test]
fn check_accepts_imports() {
    let dir = TempDir::new().unwrap();
    let input = sketch(&dir, "ok.pde", "import java.util.*;\nsize(10, 10);\n");

    let mut cmd = cargo_bin_cmd!("spp");
    cmd.arg("check").arg(&input);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("static mode"));
}

#[test]
fn parse_dumps_json_tree() {
    let dir = TempDir::new().unwrap();
    let input = sketch(&dir, "p.pde", "int(3.0);\n");

    let mut cmd = cargo_bin_cmd!("spp");
    cmd.arg("parse").arg(&input).arg("--json");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"mode\": \"static\"").and(predicate::str::contains("CastCall")));
}
