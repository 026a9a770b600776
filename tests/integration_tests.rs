mod common;

use common::{gradient_rgba, temp_dir_for, tests_setup};
use imgdither::bmp;
use imgdither::colourspace::Colourspace;
use imgdither::dither::{dither, DitherConfig, DitherType};
use imgdither::palette::Palette;

fn bw_config(dither_type: DitherType) -> DitherConfig {
    DitherConfig {
        dither_type,
        dither_level: dither_type.default_level(),
        colourspace: Colourspace::YCbCrPsy,
        premultiplied_alpha: false,
    }
}

#[test]
fn gradient_image_dithers_to_in_bounds_indices_under_every_mode() {
    tests_setup();
    let (width, height) = (64, 16);
    let source = gradient_rgba(width, height, [0, 0, 0, 255], [255, 255, 255, 255]);
    let palette = Palette::grayscale(4).unwrap();

    for mode in [
        DitherType::None,
        DitherType::Checker,
        DitherType::Ordered(3),
        DitherType::FloydSteinberg,
        DitherType::Atkinson,
    ] {
        let mut out = vec![0u8; width * height];
        let report = dither(&mut out, &source, width, height, &palette, bw_config(mode)).unwrap();
        assert!(!report.diffusion_degraded);
        assert!(out.iter().all(|&i| (i as usize) < palette.len()), "mode {mode:?}");
    }
}

#[test]
fn bmp_round_trip_through_the_cli_pipeline() {
    tests_setup();
    let dir = temp_dir_for("bmp-pipeline");
    let (width, height) = (8, 6);
    let source = gradient_rgba(width, height, [10, 10, 10, 255], [240, 240, 240, 255]);

    let input_path = dir.join("input.bmp");
    bmp::save_rgba(&input_path, width, height, &source).unwrap();

    let loaded = bmp::load(&input_path).unwrap();
    assert_eq!(loaded.width, width);
    assert_eq!(loaded.height, height);
    assert_eq!(loaded.rgba, source);

    let palette = Palette::black_and_white();
    let mut out_indices = vec![0u8; width * height];
    dither(&mut out_indices, &loaded.rgba, width, height, &palette, bw_config(DitherType::FloydSteinberg)).unwrap();

    let output_path = dir.join("output.bmp");
    bmp::save_indexed(&output_path, width, height, &out_indices, palette.entries()).unwrap();

    let reloaded = bmp::load(&output_path).unwrap();
    assert_eq!(reloaded.width, width);
    assert_eq!(reloaded.height, height);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn palette_persistence_round_trips_through_json() {
    tests_setup();
    let dir = temp_dir_for("palette-json");
    let path = dir.join("palette.json");

    let palette = Palette::grayscale(12).unwrap();
    palette.save_to_json(&path).unwrap();
    let loaded = Palette::load_from_json(&path).unwrap();
    assert_eq!(palette, loaded);

    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(test)]
mod tests_cli {
    use super::*;
    use assert_cmd::Command;

    #[test]
    fn palette_bw_subcommand_writes_a_two_colour_palette() {
        tests_setup();
        let dir = temp_dir_for("cli-palette-bw");
        let output_path = dir.join("bw.json");

        let mut cmd = Command::cargo_bin("imgdither").unwrap();
        cmd.arg("palette").arg("bw").arg("-o").arg(&output_path);
        cmd.assert().success();

        let loaded = Palette::load_from_json(&output_path).unwrap();
        assert_eq!(loaded.len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn palette_grayscale_subcommand_respects_count() {
        tests_setup();
        let dir = temp_dir_for("cli-palette-grayscale");
        let output_path = dir.join("gray.json");

        let mut cmd = Command::cargo_bin("imgdither").unwrap();
        cmd.arg("palette").arg("grayscale").arg("-n").arg("9").arg("-o").arg(&output_path);
        cmd.assert().success();

        let loaded = Palette::load_from_json(&output_path).unwrap();
        assert_eq!(loaded.len(), 9);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn dither_subcommand_end_to_end() {
        tests_setup();
        let dir = temp_dir_for("cli-dither");
        let input_path = dir.join("in.bmp");
        let palette_path = dir.join("palette.json");
        let output_path = dir.join("out.bmp");

        let (width, height) = (8, 8);
        let source = gradient_rgba(width, height, [0, 0, 0, 255], [255, 255, 255, 255]);
        bmp::save_rgba(&input_path, width, height, &source).unwrap();
        Palette::black_and_white().save_to_json(&palette_path).unwrap();

        let mut cmd = Command::cargo_bin("imgdither").unwrap();
        cmd.arg("dither")
            .arg("-i").arg(&input_path)
            .arg("-p").arg(&palette_path)
            .arg("-o").arg(&output_path)
            .arg("-m").arg("floyd")
            .arg("-c").arg("srgb");
        cmd.assert().success();

        let reloaded = bmp::load(&output_path).unwrap();
        assert_eq!(reloaded.width, width);
        assert_eq!(reloaded.height, height);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn dither_subcommand_rejects_unknown_mode() {
        tests_setup();
        let dir = temp_dir_for("cli-dither-bad-mode");
        let input_path = dir.join("in.bmp");
        let palette_path = dir.join("palette.json");
        let output_path = dir.join("out.bmp");

        bmp::save_rgba(&input_path, 2, 2, &[0u8; 16]).unwrap();
        Palette::black_and_white().save_to_json(&palette_path).unwrap();

        let mut cmd = Command::cargo_bin("imgdither").unwrap();
        cmd.arg("dither")
            .arg("-i").arg(&input_path)
            .arg("-p").arg(&palette_path)
            .arg("-o").arg(&output_path)
            .arg("-m").arg("not-a-real-mode");
        cmd.assert().failure();

        let _ = std::fs::remove_dir_all(&dir);
    }
}
