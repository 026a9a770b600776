// tests/common.rs

use std::sync::OnceLock;

/// Initializes logging once for the whole test binary, mirroring the
/// library's feature-gated `env_logger` setup.
pub fn tests_setup() {
    static LOGGER_INIT: OnceLock<()> = OnceLock::new();
    LOGGER_INIT.get_or_init(|| {
        if cfg!(feature = "logging") {
            env_logger::init();
        }
    });
}

pub fn temp_dir_for(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("imgdither-test-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("Failed to create {dir:?}: {e}"));
    dir
}

/// A small synthetic gradient, top-down RGBA, going from `from` to `to`
/// along x.
pub fn gradient_rgba(width: usize, height: usize, from: [u8; 4], to: [u8; 4]) -> Vec<u8> {
    let mut out = vec![0u8; width * height * 4];
    for x in 0..width {
        let t = if width > 1 { x as f32 / (width - 1) as f32 } else { 0.0 };
        let pixel = [
            (from[0] as f32 + (to[0] as f32 - from[0] as f32) * t).round() as u8,
            (from[1] as f32 + (to[1] as f32 - from[1] as f32) * t).round() as u8,
            (from[2] as f32 + (to[2] as f32 - from[2] as f32) * t).round() as u8,
            (from[3] as f32 + (to[3] as f32 - from[3] as f32) * t).round() as u8,
        ];
        for y in 0..height {
            let offset = (y * width + x) * 4;
            out[offset..offset + 4].copy_from_slice(&pixel);
        }
    }
    out
}
