use std::env;
use std::path::Path;

// ffmpeg-sys-next does the actual library discovery; this only points
// Windows users at a likely FFmpeg install when FFMPEG_DIR is missing.
fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows")
        || env::var_os("FFMPEG_DIR").is_some()
    {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=clipgif needs FFmpeg. Set FFMPEG_DIR to an FFmpeg install (for example a vcpkg `installed/x64-windows` tree)."
        );
        return;
    };

    let candidate = Path::new(&vcpkg_root).join("installed").join("x64-windows");
    if candidate.exists() {
        println!(
            "cargo:warning=FFMPEG_DIR is not set; an FFmpeg install may be at {}",
            candidate.display()
        );
    }
}
