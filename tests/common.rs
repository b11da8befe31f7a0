use assert_cmd::cargo_bin_cmd;

/// Run retrofit with default settings and check that it succeeds
#[allow(dead_code)]
pub fn assert_retrofit_runs(args: &[&str]) {
    cargo_bin_cmd!("retrofit")
        .env("RETROFIT_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .success();
}

/// Run retrofit with default settings and check that it fails
#[allow(dead_code)]
pub fn assert_retrofit_fails(args: &[&str]) {
    cargo_bin_cmd!("retrofit")
        .env("RETROFIT_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .failure();
}

/// Run retrofit with default settings and return what it printed to stdout
#[allow(dead_code)]
pub fn get_retrofit_stdout(args: &[&str]) -> String {
    let output = cargo_bin_cmd!("retrofit")
        .env("RETROFIT_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());

    String::from_utf8(output.stdout).unwrap()
}
