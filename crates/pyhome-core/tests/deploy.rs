use std::{fs, path::Path};

use pyhome_core::{
    CORE_MARKER, DeployError, HomeResolver, LinkMethod, copy_shared_libraries, link_runtime,
    write_marker,
};
use tempfile::tempdir;

fn fake_runtime(root: &Path) {
    fs::create_dir_all(root.join("lib")).expect("create lib dir");
    fs::create_dir_all(root.join("Lib")).expect("create stdlib dir");
    fs::write(root.join("Lib").join("os.py"), "").expect("write stdlib file");
    fs::write(root.join("python311.dll"), "dll").expect("write dll");
    fs::write(root.join("python311.zip"), "zip").expect("write zip");
    fs::write(root.join("python.exe"), "exe").expect("write exe");
    fs::write(root.join("lib").join("libpython3.11.so.1.0"), "so").expect("write so");
    fs::write(root.join("lib").join("libpython3.11.dylib"), "dylib").expect("write dylib");
    fs::write(root.join("lib").join("libssl.so"), "ssl").expect("write ssl");
}

#[test]
fn copy_shared_libraries_copies_only_runtime_libraries() {
    let tmp = tempdir().expect("tempdir");
    let src = tmp.path().join("dist");
    let bin = tmp.path().join("bin");
    fake_runtime(&src);

    let mut copied = copy_shared_libraries(&src, &bin).expect("copy should succeed");
    copied.sort();

    let mut expected = vec![
        bin.join("libpython3.11.dylib"),
        bin.join("libpython3.11.so.1.0"),
        bin.join("python311.dll"),
        bin.join("python311.zip"),
    ];
    expected.sort();
    assert_eq!(copied, expected);
    assert!(!bin.join("python.exe").exists());
    assert!(!bin.join("libssl.so").exists());
}

#[test]
fn copy_shared_libraries_skips_missing_lib_dir() {
    let tmp = tempdir().expect("tempdir");
    let src = tmp.path().join("dist");
    fs::create_dir_all(&src).expect("create src");
    fs::write(src.join("python3.dll"), "dll").expect("write dll");

    let copied =
        copy_shared_libraries(&src, &tmp.path().join("bin")).expect("copy should succeed");
    assert_eq!(copied, vec![tmp.path().join("bin").join("python3.dll")]);
}

#[test]
fn link_runtime_rejects_missing_source() {
    let tmp = tempdir().expect("tempdir");
    let err = link_runtime(&tmp.path().join("missing"), &tmp.path().join("dst"))
        .expect_err("missing source must fail");

    assert!(matches!(err, DeployError::MissingSource { .. }));
}

#[cfg(unix)]
#[test]
fn link_runtime_replaces_existing_directory() {
    let tmp = tempdir().expect("tempdir");
    let src = tmp.path().join("dist");
    let dst = tmp.path().join("bin/python/interpreter");
    fake_runtime(&src);
    fs::create_dir_all(dst.join("stale")).expect("create stale dir");

    let method = link_runtime(&src, &dst).expect("link should succeed");

    assert_eq!(method, LinkMethod::Symlink);
    assert_eq!(
        fs::read_link(&dst).expect("read link"),
        fs::canonicalize(&src).expect("canonical src")
    );
    assert!(dst.join("Lib").join("os.py").exists());
}

#[cfg(unix)]
#[test]
fn link_runtime_replaces_broken_symlink() {
    let tmp = tempdir().expect("tempdir");
    let src = tmp.path().join("dist");
    let dst = tmp.path().join("bin/python");
    fake_runtime(&src);
    fs::create_dir_all(tmp.path().join("bin")).expect("create bin");
    std::os::unix::fs::symlink(tmp.path().join("gone"), &dst).expect("create broken link");

    let canonical_src = fs::canonicalize(&src).expect("canonical src");
    link_runtime(&src, &dst).expect("link should succeed");
    assert_eq!(fs::read_link(&dst).expect("read link"), canonical_src);

    link_runtime(&src, &dst).expect("relink should succeed");
    assert_eq!(fs::read_link(&dst).expect("read link"), canonical_src);
}

#[cfg(unix)]
#[test]
fn link_runtime_with_relative_paths_targets_absolute_source() {
    let cwd = std::env::current_dir().expect("current dir");
    let tmp = tempfile::Builder::new()
        .prefix(".pyhome-link-")
        .tempdir_in(&cwd)
        .expect("tempdir in current dir");
    let root = tmp.path().strip_prefix(&cwd).expect("tempdir under cwd");
    let src = root.join("dist");
    let dst = root.join("bin/python");
    fake_runtime(&src);

    link_runtime(&src, &dst).expect("link should succeed");

    let target = fs::read_link(&dst).expect("read link");
    assert!(target.is_absolute());
    assert_eq!(target, fs::canonicalize(tmp.path().join("dist")).expect("canonical src"));
    assert!(dst.join("Lib").join("os.py").exists());

    let home = HomeResolver::default()
        .resolve_in(&root.join("bin"))
        .expect("resolve should succeed");
    assert_eq!(home.path(), dst);
}

#[cfg(unix)]
#[test]
fn linked_runtime_is_found_as_colocated_home() {
    let tmp = tempdir().expect("tempdir");
    let src = tmp.path().join("dist");
    let bin = tmp.path().join("bin");
    fake_runtime(&src);

    link_runtime(&src, &bin.join("python")).expect("link should succeed");
    let home = HomeResolver::default()
        .resolve_in(&bin)
        .expect("resolve should succeed");

    assert_eq!(home.path(), bin.join("python"));
}

#[test]
fn written_marker_round_trips_through_resolver() {
    let tmp = tempdir().expect("tempdir");
    let bin = tmp.path().join("bin");

    let marker = write_marker(&bin, CORE_MARKER, "/opt/embedded").expect("write should succeed");
    assert_eq!(marker, bin.join(CORE_MARKER));

    let home = HomeResolver::default()
        .resolve_in(&bin)
        .expect("resolve should succeed");
    assert_eq!(home.path(), Path::new("/opt/embedded"));
}
