use std::process::Command;

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rustc_version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=AUTHKEYS_RUSTC_VERSION={}", rustc_version);
    println!("cargo:rustc-env=AUTHKEYS_BUILD_TARGET={}", target);
    println!("cargo:rerun-if-changed=build.rs");
}
