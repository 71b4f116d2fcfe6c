use std::fs;
use std::path::{Path, PathBuf};

use rmlog::application::{CleanupUsecase, WriteMode};
use rmlog::infrastructure::{GoParser, GoPrinter, ProjectLoader};
use rmlog::{process_file, Error, MatchRule, RuleSet};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn removes_println_statements() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "test.noext",
        r#"package main
func main() {
    println("debug message")
    fmt.Println("another debug")
    log.Println("log message")
    // println("commented debug")
    /* fmt.Println("block comment") */
    actualCode()
}"#,
    );

    let report = process_file(&path).unwrap();
    assert!(report.changed && report.written);
    assert_eq!(report.removed_statements, 3);
    assert_eq!(report.removed_comments, 2);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "package main\n\nfunc main() {\n\n\tactualCode()\n}\n"
    );
}

#[test]
fn keeps_non_println_statements_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let content = "package main\n\nfunc main() {\n    print(\"keep this\")\n    fmt.Printf(\"keep this too\")\n    actualCode()\n}";
    let path = write(dir.path(), "keep.go", content);
    let before = fs::metadata(&path).unwrap().modified().unwrap();

    let report = process_file(&path).unwrap();
    assert!(!report.changed && !report.written);
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
}

#[test]
fn second_run_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "main.go",
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfor i := 0; i < 3; i++ {\n\t\tfmt.Println(i) // trace\n\t\tif i > 1 {\n\t\t\tprintln(\"big\")\n\t\t}\n\t}\n\tswitch {\n\tdefault:\n\t\tlog.Println(\"x\")\n\t}\n}\n",
    );

    let first = process_file(&path).unwrap();
    assert_eq!(first.removed_statements, 3);
    let once = fs::read_to_string(&path).unwrap();
    assert!(once.contains("// trace"));

    let second = process_file(&path).unwrap();
    assert!(!second.changed);
    assert_eq!(fs::read_to_string(&path).unwrap(), once);
}

#[test]
fn parse_error_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let content = "package main\n\nfunc main() {\n\tprintln(\"x\"\n}\n";
    let path = write(dir.path(), "broken.go", content);

    let err = process_file(&path).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "unexpected error: {err}");
    assert_eq!(err.path(), path.as_path());
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = process_file(&dir.path().join("absent.go")).unwrap_err();
    assert!(matches!(err, Error::Io { action: "read", .. }));
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let content = "package main\n\nfunc main() {\n\tprintln(\"x\")\n\twork()\n}\n";
    let path = write(dir.path(), "main.go", content);
    let rules = RuleSet::defaults();
    let usecase = CleanupUsecase {
        parser: &GoParser,
        printer: &GoPrinter,
        rules: &rules,
    };

    let report = usecase.process_file(&path, WriteMode::DryRun).unwrap();
    assert!(report.changed);
    assert!(!report.written);
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn batch_over_directory_with_custom_rule() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let a = write(
        root,
        "a.go",
        "package a\n\nfunc A() {\n\tspew.Dump(v)\n\tfmt.Println(v)\n\tdo(v)\n}\n",
    );
    let b = write(root, "sub/b.go", "package sub\n\nfunc B() {\n\tdo()\n}\n");
    let vendored = "package v\n\nfunc V() {\n\tprintln(\"vendored\")\n}\n";
    let v = write(root, "vendor/v/v.go", vendored);
    let broken = write(root, "sub/broken.go", "package sub\n\nfunc {\n");

    let mut rules = RuleSet::defaults();
    rules.push("spew.Dump".parse::<MatchRule>().unwrap());
    let usecase = CleanupUsecase {
        parser: &GoParser,
        printer: &GoPrinter,
        rules: &rules,
    };
    let files = ProjectLoader::new(["vendor".to_string()])
        .collect(&[root.to_path_buf()])
        .unwrap();
    assert_eq!(files.len(), 3);

    let results = usecase.process_all(&files, WriteMode::Write);
    let failed: Vec<&Error> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path(), broken.as_path());

    assert_eq!(
        fs::read_to_string(&a).unwrap(),
        "package a\n\nfunc A() {\n\n\tdo(v)\n}\n"
    );
    assert_eq!(
        fs::read_to_string(&b).unwrap(),
        "package sub\n\nfunc B() {\n\tdo()\n}\n"
    );
    assert_eq!(fs::read_to_string(&v).unwrap(), vendored);
}
