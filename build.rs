fn main() {
    // git HEAD が変わったら再ビルド（--version に埋め込むため）
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let output = std::process::Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output();

    let describe = match output {
        Ok(o) if o.status.success() => String::from_utf8_lossy(&o.stdout).trim().to_string(),
        _ => String::new(),
    };

    let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let version = if describe.is_empty() {
        pkg
    } else {
        format!("{} ({})", pkg, describe)
    };

    println!("cargo:rustc-env=SKELETON_CHECK_VERSION={}", version);
}
