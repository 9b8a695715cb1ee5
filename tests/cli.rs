use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;

/// Text dump of a scanner export. Content sniffing reads it as plain text
/// even under a `.pdf` name.
const EXPORT: &str = "\
# Anna Smirnova
Foot Snapshot Left Right
Foot Length (mm) 271.7 273.8
Foot Width (mm) 101.2 102.9
Ball Girth (mm) 245.1 247.6
Arch Index 0.27 0.31
Heel Angle (deg) 5 Inv 3 Eve
Hallux Angle (deg) 12.5 16.0
Shoe Width E
Toe type Greek
Gender Female
Scan date 2024/05/12 Scanner No 2301_0042
";

fn cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("footscan").unwrap();
    cmd.current_dir(cwd).env_remove("FOOTSCAN_DUMP_DIR").env_remove("FOOTSCAN_FONT");
    cmd
}

/// Pad past the default minimum input size with text the parser ignores.
fn write_export(path: &Path) {
    let mut body = EXPORT.to_string();
    while body.len() <= 1200 {
        body.push_str("Notes: posture assessed during the visit\n");
    }
    std::fs::write(path, body).unwrap();
}

fn report_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| n.starts_with("FootScan_Report_") && n.ends_with(".pdf"))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn missing_pdf_fails() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["--pdf", "does_not_exist.pdf", "--no-debug"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn unusable_pdf_fails_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blank.pdf");
    std::fs::write(&input, "nothing measurable in here\n").unwrap();

    cmd(dir.path())
        .arg("--pdf")
        .arg(&input)
        .args(["--output-dir", "out", "--no-debug"])
        .assert()
        .failure()
        .stderr(contains("No usable measurements"));
    assert!(report_files(&dir.path().join("out")).is_empty());
}

#[test]
fn single_export_produces_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("anna.pdf");
    write_export(&input);

    cmd(dir.path())
        .arg("--pdf")
        .arg(&input)
        .args(["--output-dir", "out"])
        .assert()
        .success()
        .stdout(contains("Report created"));

    let reports = report_files(&dir.path().join("out"));
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("FootScan_Report_Anna_Smirnova_"));
    assert!(dir.path().join("extracted_data_debug").join("anna_extracted.txt").is_file());
}

#[test]
fn empty_input_dir_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("in")).unwrap();

    cmd(dir.path())
        .args(["--input-dir", "in", "--output-dir", "out", "--no-debug"])
        .assert()
        .success()
        .stdout(contains("No scanner exports found"));
}

#[test]
fn batch_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    std::fs::create_dir(&input_dir).unwrap();
    write_export(&input_dir.join("anna.pdf"));
    // under the minimum size, never picked up
    std::fs::write(input_dir.join("stub.pdf"), "%PDF").unwrap();

    cmd(dir.path())
        .args(["--input-dir", "in", "--output-dir", "out", "--no-debug", "--json"])
        .assert()
        .success()
        .stdout(contains("\"processed\": 1"))
        .stdout(contains("\"total\": 1"))
        .stdout(contains("Anna Smirnova"));

    let out = dir.path().join("out");
    assert_eq!(report_files(&out).len(), 1);
    let has_summary = std::fs::read_dir(&out)
        .unwrap()
        .flatten()
        .any(|e| e.file_name().to_string_lossy().starts_with("processing_summary_"));
    assert!(has_summary);
    assert!(!dir.path().join("extracted_data_debug").exists());
}

#[test]
fn clean_removes_debug_dirs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("extracted_data_debug")).unwrap();
    std::fs::create_dir_all(dir.path().join("generated_reports_debug")).unwrap();
    std::fs::create_dir(dir.path().join("in")).unwrap();

    cmd(dir.path())
        .args(["--clean", "--input-dir", "in", "--no-debug"])
        .assert()
        .success()
        .stdout(contains("Removed"));

    assert!(!dir.path().join("extracted_data_debug").exists());
    assert!(!dir.path().join("generated_reports_debug").exists());
}
