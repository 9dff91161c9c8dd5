//! Export failure hygiene, driven through the CLI binary.

#[cfg(unix)]
#[test]
fn encoder_death_mid_feed_fails_cleanly_without_leftovers() {
    use std::os::unix::fs::PermissionsExt as _;
    use std::path::PathBuf;

    let root = std::env::temp_dir().join(format!(
        "voxweave_export_guard_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let shim_dir = root.join("shim");
    std::fs::create_dir_all(&shim_dir).unwrap();

    // An ffmpeg stand-in that passes the availability check, then dies before
    // reading any PCM. The export must fail without a partial mix or staging
    // files left behind.
    let shim = shim_dir.join("ffmpeg");
    std::fs::write(
        &shim,
        "#!/bin/sh\ncase \"$1\" in\n  -version) exit 0 ;;\nesac\nexit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&shim, std::fs::Permissions::from_mode(0o755)).unwrap();

    // A blank fragment skips synthesis; the 2 s start delay makes the PCM feed
    // far larger than a pipe buffer, so the write path sees the encoder die.
    let plan_path = root.join("plan.json");
    std::fs::write(
        &plan_path,
        r#"{ "fragments": [" "], "config": { "start_delay_ms": 2000 } }"#,
    )
    .unwrap();

    let exe = std::env::var_os("CARGO_BIN_EXE_voxweave")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target").join("debug").join("voxweave"));

    let out = std::process::Command::new(exe)
        .env("PATH", &shim_dir)
        .args(["render", "--plan"])
        .arg(&plan_path)
        .arg("--root")
        .arg(&root)
        .args(["--out", "mix", "--tts-url", "http://localhost:1/speak"])
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("export error:"), "stderr was: {stderr}");

    assert!(!root.join("output").join("mix.mp3").exists());
    let leftovers: Vec<_> = std::fs::read_dir(root.join("output"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name())
        .collect();
    assert!(leftovers.is_empty(), "output dir not clean: {leftovers:?}");
}
