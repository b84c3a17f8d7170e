use assert_fs::TempDir;
use assert_fs::prelude::*;
use indoc::indoc;
use predicates::prelude::*;
use serde_json::Value;

use quarry_test_support::command::{CommandExt, Quarry};
use quarry_test_support::fsx::ChildPathEx;
use quarry_test_support::predicates::empty_dir;
use quarry_test_support::project_builder::{Dep, DepBuilder, ProjectBuilder};

/// `a` is fetched, `b` is a path dependency, `c` is no longer declared.
fn project(t: &TempDir) {
    ProjectBuilder::start()
        .name("hello")
        .dep("a", "1.0.0")
        .dep("b", Dep.path("vendor/b"))
        .built("dev", "a")
        .built("dev", "b")
        .built("dev", "c")
        .built("dev", "hello")
        .fetched("a")
        .fetched("b")
        .fetched("c")
        .build(t);
}

#[test]
fn requires_selection() {
    let t = TempDir::new().unwrap();
    project(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean"])
        .current_dir(&t)
        .assert()
        .code(2)
        .stdout_eq("")
        .stderr_matches(indoc! {r#"
            error: `quarry deps clean` expects dependencies as arguments or a flag indicating which dependencies to clean
            The --all option will clean all dependencies while the --unused option will clean unused dependencies
        "#});

    t.child("_build/dev/lib/a").assert(predicate::path::is_dir());
    t.child("deps/a").assert(predicate::path::is_dir());
    t.child("_build/.quarry-build.lock")
        .assert(predicate::path::missing());
}

#[test]
fn all_keeps_sources_of_path_dependencies() {
    let t = TempDir::new().unwrap();
    project(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "--all"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches(indoc! {r#"
            [..]Cleaning a
            [..]Cleaning b
            [..]Cleaning c
        "#})
        .stderr_eq("");

    assert_eq!(
        t.child("_build/dev/lib").files(),
        vec!["hello".to_string()]
    );
    assert_eq!(
        t.child("deps").files(),
        vec![".quarry-deps.lock".to_string(), "b".to_string()]
    );
}

#[test]
fn unused_removes_undeclared_only() {
    let t = TempDir::new().unwrap();
    project(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "--unused"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches("[..]Cleaning c\n");

    t.child("_build/dev/lib/a").assert(predicate::path::is_dir());
    t.child("_build/dev/lib/c").assert(predicate::path::missing());
    t.child("deps/a").assert(predicate::path::is_dir());
    t.child("deps/c").assert(predicate::path::missing());
}

#[test]
fn explicit_names_win_over_flags() {
    let t = TempDir::new().unwrap();
    project(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "a", "--all", "--unused"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches("[..]Cleaning a\n");

    t.child("deps/a").assert(predicate::path::missing());
    t.child("deps/c").assert(predicate::path::is_dir());
}

#[test]
fn build_flag_keeps_sources() {
    let t = TempDir::new().unwrap();
    project(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "--all", "--build"])
        .current_dir(&t)
        .assert()
        .success();

    t.child("_build/dev/lib/a").assert(predicate::path::missing());
    t.child("_build/dev/lib/c").assert(predicate::path::missing());
    t.child("deps/a").assert(predicate::path::is_dir());
    t.child("deps/c").assert(predicate::path::is_dir());
}

#[test]
fn missing_build_directory_is_warning() {
    let t = TempDir::new().unwrap();
    project(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "zzz", "a"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches(indoc! {r#"
            [..]Cleaning zzz
            [..]Cleaning a
        "#})
        .stderr_matches(indoc! {r#"
            warn: dependency `zzz` has no build directory, nothing to clean
        "#});

    t.child("deps/a").assert(predicate::path::missing());
}

#[test]
fn cleaning_twice_is_harmless() {
    let t = TempDir::new().unwrap();
    project(&t);

    for _ in 0..2 {
        Quarry::quick_snapbox()
            .args(["deps", "clean", "a", "c"])
            .current_dir(&t)
            .assert()
            .success();
    }

    Quarry::quick_snapbox()
        .args(["deps", "clean", "a"])
        .current_dir(&t)
        .assert()
        .success()
        .stderr_matches(indoc! {r#"
            warn: dependency `a` has no build directory, nothing to clean
        "#});
    t.child("_build/dev/lib/b").assert(predicate::path::is_dir());
}

#[test]
fn own_package_is_ignored() {
    let t = TempDir::new().unwrap();
    project(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "hello"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_eq("")
        .stderr_matches(indoc! {r#"
            warn: `hello` is the current project, not a dependency, ignoring
        "#});

    t.child("_build/dev/lib/hello").assert(predicate::path::is_dir());
}

#[test]
fn only_environment() {
    let t = TempDir::new().unwrap();
    ProjectBuilder::start()
        .dep("a", "1.0.0")
        .built("dev", "a")
        .built("test", "a")
        .built("wasm_test", "a")
        .fetched("a")
        .build(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "a", "--only", "test", "--build"])
        .current_dir(&t)
        .assert()
        .success();

    t.child("_build/dev/lib/a").assert(predicate::path::is_dir());
    t.child("_build/test/lib/a").assert(predicate::path::missing());
    t.child("_build/wasm_test/lib/a")
        .assert(predicate::path::missing());
    t.child("deps/a").assert(predicate::path::is_dir());
}

#[test]
fn unused_in_environment() {
    let t = TempDir::new().unwrap();
    ProjectBuilder::start()
        .dep("a", "1.0.0")
        .dep("tester", Dep.version("1.0.0").only(["test"]))
        .built("dev", "a")
        .built("dev", "tester")
        .built("test", "tester")
        .fetched("a")
        .fetched("tester")
        .build(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "--unused", "--only", "dev"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches("[..]Cleaning tester\n");

    t.child("_build/dev/lib/a").assert(predicate::path::is_dir());
    t.child("_build/dev/lib/tester")
        .assert(predicate::path::missing());
    t.child("_build/test/lib/tester")
        .assert(predicate::path::is_dir());
}

#[test]
fn unlock_after_clean() {
    let t = TempDir::new().unwrap();
    ProjectBuilder::start()
        .dep("a", "1.0.0")
        .dep("b", "2.0.0")
        .locked("a", "1.0.0")
        .locked("b", "2.0.0")
        .built("dev", "a")
        .fetched("a")
        .build(&t);

    Quarry::quick_snapbox()
        .args(["deps", "clean", "a", "--unlock"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches(indoc! {r#"
            [..]Cleaning a
            [..]Unlocking a
        "#});

    assert_eq!(
        t.child("Quarry.lock").read_to_string(),
        indoc! {r#"
            # Code generated by quarry; DO NOT EDIT.
            version = 1

            [[package]]
            name = "b"
            version = "2.0.0"
        "#}
    );
}

#[test]
fn invalid_dependency_name() {
    let t = TempDir::new().unwrap();
    project(&t);

    let output = Quarry::new()
        .std()
        .args(["deps", "clean", "../a"])
        .current_dir(&t)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid dependency name `../a`: name cannot contain path separators"),
        "{stderr}"
    );
    t.child("deps/a").assert(predicate::path::is_dir());
}

#[test]
fn requires_manifest() {
    let t = TempDir::new().unwrap();
    t.child("deps/a/file.txt").write_str("Lorem ipsum.").unwrap();

    Quarry::quick_snapbox()
        .args(["deps", "clean", "--all"])
        .current_dir(&t)
        .assert()
        .code(1)
        .stderr_matches(indoc! {r#"
            error: failed to read `[..]Quarry.toml`

            Caused by:
                [..]
        "#});

    t.child("deps/a/file.txt").assert(predicate::path::is_file());
}

#[test]
fn custom_directories() {
    let t = TempDir::new().unwrap();
    ProjectBuilder::start().dep("a", "1.0.0").build(&t);
    let build = TempDir::new().unwrap();
    build.child("dev/lib/a/a.app").write_str("").unwrap();
    let deps = TempDir::new().unwrap();
    deps.child("a/Quarry.toml").write_str("").unwrap();

    Quarry::quick_snapbox()
        .arg("--deps-path")
        .arg(deps.path())
        .args(["deps", "clean", "--all"])
        .env("QUARRY_BUILD_PATH", build.path())
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches("[..]Cleaning a\n");

    build.child("dev/lib").assert(empty_dir());
    deps.child("a").assert(predicate::path::missing());
}

#[test]
fn json_output() {
    let t = TempDir::new().unwrap();
    project(&t);

    let messages: Vec<Value> = Quarry::quick_snapbox()
        .args(["--json", "deps", "clean", "c"])
        .current_dir(&t)
        .stdout_json_lines();

    assert_eq!(
        messages,
        vec![serde_json::json!({"status": "cleaning", "message": "c"})]
    );
}

#[test]
fn verbose_lists_removed_paths() {
    let t = TempDir::new().unwrap();
    project(&t);

    Quarry::quick_snapbox()
        .args(["-v", "deps", "clean", "c"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches(indoc! {r#"
            [..]Cleaning c
            [..]Removed [..]lib[..]c
            [..]Removed [..]deps[..]c
        "#});
}

#[test]
fn hidden_names_are_rejected() {
    let t = TempDir::new().unwrap();
    project(&t);
    t.child("deps/.quarry-deps.lock").write_str("").unwrap();

    let output = Quarry::new()
        .std()
        .args(["deps", "clean", ".quarry-deps.lock"])
        .current_dir(&t)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(
            "invalid dependency name `.quarry-deps.lock`: name cannot start with a dot"
        ),
        "{stderr}"
    );
    t.child("deps/.quarry-deps.lock")
        .assert(predicate::path::is_file());
}

#[test]
fn unlock_unused_within_environment() {
    let t = TempDir::new().unwrap();
    ProjectBuilder::start()
        .dep("a", "1.0.0")
        .dep("tester", Dep.version("1.0.0").only(["test"]))
        .locked("a", "1.0.0")
        .locked("stale", "0.1.0")
        .locked("tester", "1.0.0")
        .built("dev", "a")
        .built("dev", "stale")
        .built("dev", "tester")
        .fetched("a")
        .fetched("stale")
        .fetched("tester")
        .build(&t);

    // `tester` is unused in `dev` and gets cleaned, but the project still uses it in `test`,
    // so its lock file entry stays.
    Quarry::quick_snapbox()
        .args(["deps", "clean", "--unused", "--only", "dev", "--unlock"])
        .current_dir(&t)
        .assert()
        .success()
        .stdout_matches(indoc! {r#"
            [..]Cleaning stale
            [..]Cleaning tester
            [..]Unlocking stale
        "#});

    assert_eq!(t.child("_build/dev/lib").files(), vec!["a".to_string()]);
    t.child("deps/tester").assert(predicate::path::missing());
    assert_eq!(
        t.child("Quarry.lock").read_to_string(),
        indoc! {r#"
            # Code generated by quarry; DO NOT EDIT.
            version = 1

            [[package]]
            name = "a"
            version = "1.0.0"

            [[package]]
            name = "tester"
            version = "1.0.0"
        "#}
    );
}
