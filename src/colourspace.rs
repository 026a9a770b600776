//! Perceptual colour-space transforms.
//!
//! Every space is a pure, allocation-free function from an sRGB-float pixel
//! (components in `[0, 1]`, alpha passed through unchanged) to a working-space
//! `Vec4`, plus its inverse. The dither driver only ever needs the forward
//! direction; the inverses exist so the round-trip laws in the test suite
//! can hold the forward direction accountable.

use crate::vec4::Vec4;

/// Selects which perceptual space distance comparisons are carried out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colourspace {
    Srgb,
    RgbLinear,
    YCbCr,
    YCoCg,
    CieLab,
    ICtCp,
    Oklab,
    RgbPsy,
    YCbCrPsy,
    YCoCgPsy,
}

impl Colourspace {
    pub const ALL: [Colourspace; 10] = [
        Colourspace::Srgb,
        Colourspace::RgbLinear,
        Colourspace::YCbCr,
        Colourspace::YCoCg,
        Colourspace::CieLab,
        Colourspace::ICtCp,
        Colourspace::Oklab,
        Colourspace::RgbPsy,
        Colourspace::YCbCrPsy,
        Colourspace::YCoCgPsy,
    ];

    /// Parses the CLI/config names listed in the configuration table.
    pub fn parse(name: &str) -> Option<Colourspace> {
        Some(match name {
            "srgb" => Colourspace::Srgb,
            "rgb-linear" => Colourspace::RgbLinear,
            "ycbcr" => Colourspace::YCbCr,
            "ycocg" => Colourspace::YCoCg,
            "cielab" => Colourspace::CieLab,
            "ictcp" => Colourspace::ICtCp,
            "oklab" => Colourspace::Oklab,
            "rgb-psy" => Colourspace::RgbPsy,
            "ycbcr-psy" => Colourspace::YCbCrPsy,
            "ycocg-psy" => Colourspace::YCoCgPsy,
            _ => return None,
        })
    }

    pub fn forward(self, srgb: Vec4) -> Vec4 {
        match self {
            Colourspace::Srgb => srgb,
            Colourspace::RgbLinear => linear_from_srgb(srgb),
            Colourspace::YCbCr => ycbcr_from_srgb(srgb),
            Colourspace::YCoCg => ycocg_from_srgb(srgb),
            Colourspace::CieLab => lab_from_xyz(xyz_from_linear(linear_from_srgb(srgb))),
            Colourspace::ICtCp => ictcp_from_lms(lms_nonlinear_sqrt(lms_from_linear(linear_from_srgb(srgb)))),
            Colourspace::Oklab => oklab_from_lms(lms_nonlinear_cbrt(lms_from_linear(linear_from_srgb(srgb)))),
            Colourspace::RgbPsy => rgb_psy_from_linear(linear_from_srgb(srgb)),
            Colourspace::YCbCrPsy => psy_visual_curve_y(ycbcr_from_srgb(srgb), 0.5),
            Colourspace::YCoCgPsy => psy_visual_curve_y(ycocg_from_srgb(srgb), 1.0),
        }
    }

    pub fn inverse(self, working: Vec4) -> Vec4 {
        match self {
            Colourspace::Srgb => working,
            Colourspace::RgbLinear => srgb_from_linear(working),
            Colourspace::YCbCr => srgb_from_ycbcr(working),
            Colourspace::YCoCg => srgb_from_ycocg(working),
            Colourspace::CieLab => srgb_from_linear(linear_from_xyz(xyz_from_lab(working))),
            Colourspace::ICtCp => srgb_from_linear(linear_from_lms(lms_nonlinear_sqrt_inverse(ictcp_to_lms(working)))),
            Colourspace::Oklab => srgb_from_linear(linear_from_lms(lms_nonlinear_cbrt_inverse(oklab_to_lms(working)))),
            Colourspace::RgbPsy => srgb_from_linear(rgb_psy_to_linear(working)),
            Colourspace::YCbCrPsy => srgb_from_ycbcr(psy_visual_curve_y_inverse(working, 0.5)),
            Colourspace::YCoCgPsy => srgb_from_ycocg(psy_visual_curve_y_inverse(working, 1.0)),
        }
    }
}

// --- sRGB EOTF ---------------------------------------------------------

fn eotf(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn oetf(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn linear_from_srgb(c: Vec4) -> Vec4 {
    Vec4::new(eotf(c.x), eotf(c.y), eotf(c.z), c.w)
}

fn srgb_from_linear(c: Vec4) -> Vec4 {
    Vec4::new(oetf(c.x), oetf(c.y), oetf(c.z), c.w)
}

// --- CIE XYZ (D65) ------------------------------------------------------

fn xyz_from_linear(c: Vec4) -> Vec4 {
    Vec4::new(
        0.4124564 * c.x + 0.3575761 * c.y + 0.1804375 * c.z,
        0.2126729 * c.x + 0.7151522 * c.y + 0.0721750 * c.z,
        0.0193339 * c.x + 0.1191920 * c.y + 0.9503041 * c.z,
        c.w,
    )
}

fn linear_from_xyz(c: Vec4) -> Vec4 {
    Vec4::new(
        3.2404542 * c.x - 1.5371385 * c.y - 0.4985314 * c.z,
        -0.9692660 * c.x + 1.8760108 * c.y + 0.0415560 * c.z,
        0.0556434 * c.x - 0.2040259 * c.y + 1.0572252 * c.z,
        c.w,
    )
}

// --- CIELAB --------------------------------------------------------------
// L is rescaled from the canonical [0, 100] range into [0, 1.16] by an affine
// map of f(Y/Yn)'s own range, rather than the conventional /100 scaling —
// this keeps L and a/b comparable in magnitude for squared-distance search.

const WHITE_XN: f32 = 0.95047;
const WHITE_YN: f32 = 1.0;
const WHITE_ZN: f32 = 1.08883;
const DELTA: f32 = 6.0 / 29.0;

fn lab_f(t: f32) -> f32 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

fn lab_f_inv(t: f32) -> f32 {
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

fn lab_from_xyz(c: Vec4) -> Vec4 {
    let fx = lab_f(c.x / WHITE_XN);
    let fy = lab_f(c.y / WHITE_YN);
    let fz = lab_f(c.z / WHITE_ZN);
    let l = 0.0464 * (29.0 * fy - 4.0);
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);
    Vec4::new(l, a, b, c.w)
}

fn xyz_from_lab(c: Vec4) -> Vec4 {
    let fy = (c.x / 1.16) * (25.0 / 29.0) + 4.0 / 29.0;
    let fx = fy + c.y / 500.0;
    let fz = fy - c.z / 200.0;
    Vec4::new(
        WHITE_XN * lab_f_inv(fx),
        WHITE_YN * lab_f_inv(fy),
        WHITE_ZN * lab_f_inv(fz),
        c.w,
    )
}

// --- LMS cone space ------------------------------------------------------
// Shared by ICtCp and Oklab; only the nonlinearity and the final mix matrix
// differ between the two.

fn lms_from_linear(c: Vec4) -> Vec4 {
    Vec4::new(
        0.4122214708 * c.x + 0.5363325363 * c.y + 0.0514459929 * c.z,
        0.2119034982 * c.x + 0.6806995451 * c.y + 0.1073969566 * c.z,
        0.0883024619 * c.x + 0.2817188376 * c.y + 0.6299787005 * c.z,
        c.w,
    )
}

fn linear_from_lms(c: Vec4) -> Vec4 {
    Vec4::new(
        4.0767416621 * c.x - 3.3077115913 * c.y + 0.2309699292 * c.z,
        -1.2684380046 * c.x + 2.6097574011 * c.y - 0.3413193965 * c.z,
        -0.0041960863 * c.x - 0.7034186147 * c.y + 1.7076147010 * c.z,
        c.w,
    )
}

fn lms_nonlinear_cbrt(c: Vec4) -> Vec4 {
    Vec4::new(c.x.max(0.0).cbrt(), c.y.max(0.0).cbrt(), c.z.max(0.0).cbrt(), c.w)
}

fn lms_nonlinear_cbrt_inverse(c: Vec4) -> Vec4 {
    Vec4::new(c.x * c.x * c.x, c.y * c.y * c.y, c.z * c.z * c.z, c.w)
}

fn lms_nonlinear_sqrt(c: Vec4) -> Vec4 {
    Vec4::new(c.x.max(0.0).sqrt(), c.y.max(0.0).sqrt(), c.z.max(0.0).sqrt(), c.w)
}

fn lms_nonlinear_sqrt_inverse(c: Vec4) -> Vec4 {
    Vec4::new(c.x * c.x, c.y * c.y, c.z * c.z, c.w)
}

// --- Oklab -----------------------------------------------------------------

fn oklab_from_lms(c: Vec4) -> Vec4 {
    Vec4::new(
        0.2104542553 * c.x + 0.7936177850 * c.y - 0.0040720468 * c.z,
        1.9779984951 * c.x - 2.4285922050 * c.y + 0.4505937099 * c.z,
        0.0259040371 * c.x + 0.7827717662 * c.y - 0.8086757660 * c.z,
        c.w,
    )
}

fn oklab_to_lms(c: Vec4) -> Vec4 {
    Vec4::new(
        c.x + 0.3963377774 * c.y + 0.2158037573 * c.z,
        c.x - 0.1055613458 * c.y - 0.0638541728 * c.z,
        c.x - 0.0894841775 * c.y - 1.2914855480 * c.z,
        c.w,
    )
}

// --- ICtCp -------------------------------------------------------------
// LMS -> ICtCp using the HLG transfer function (ARIB STD-B67), per the
// engine's own reference constants rather than the PQ-based ITU-R BT.2100
// mix most "ICtCp" writeups quote.

fn ictcp_from_lms(c: Vec4) -> Vec4 {
    let l = c.x.max(0.0).sqrt();
    let m = c.y.max(0.0).sqrt();
    let s = c.z.max(0.0).sqrt();
    let i = 0.500000 * l + 0.500000 * m;
    let ct = 0.885010 * l - 1.822510 * m + 0.937500 * s;
    let cp = 2.319336 * l - 2.249023 * m - 0.070313 * s;
    Vec4::new(i, ct, cp, c.w)
}

fn ictcp_to_lms(c: Vec4) -> Vec4 {
    let lp = c.x + 1.57186884e-2 * c.y + 2.09581024e-1 * c.z;
    let mp = c.x - 1.57186884e-2 * c.y - 2.09581024e-1 * c.z;
    let sp = c.x + 1.02127076e+0 * c.y - 6.05274471e-1 * c.z;
    Vec4::new(lp * lp, mp * mp, sp * sp, c.w)
}

// --- YCbCr (BT.709) ------------------------------------------------------
// Applied directly to gamma-encoded sRGB, not linear light — the engine
// never linearizes for this space.

fn ycbcr_from_srgb(c: Vec4) -> Vec4 {
    let y = 0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z;
    let cb = (c.z - y) / 1.8556;
    let cr = (c.x - y) / 1.5748;
    Vec4::new(y, cb, cr, c.w)
}

fn srgb_from_ycbcr(c: Vec4) -> Vec4 {
    let r = c.x + 1.5748 * c.z;
    let b = c.x + 1.8556 * c.y;
    let g = (c.x - 0.2126 * r - 0.0722 * b) / 0.7152;
    Vec4::new(r, g, b, c.w)
}

// --- YCoCg (exact, lossless) --------------------------------------------
// Same as above: the matrix runs on gamma-encoded sRGB directly.

fn ycocg_from_srgb(c: Vec4) -> Vec4 {
    let y = 0.25 * c.x + 0.5 * c.y + 0.25 * c.z;
    let co = 0.5 * c.x - 0.5 * c.z;
    let cg = -0.25 * c.x + 0.5 * c.y - 0.25 * c.z;
    Vec4::new(y, co, cg, c.w)
}

fn srgb_from_ycocg(c: Vec4) -> Vec4 {
    let tmp = c.x - c.z;
    let r = tmp + c.y;
    let g = c.x + c.z;
    let b = tmp - c.y;
    Vec4::new(r, g, b, c.w)
}

// --- "psy" variants ------------------------------------------------------
// Extra visual weighting layered on top of a base transform.

fn rgb_psy_from_linear(c: Vec4) -> Vec4 {
    Vec4::new(
        c.x.max(0.0).cbrt() * 0.8,
        c.y.max(0.0).cbrt() * 1.0,
        c.z.max(0.0).cbrt() * 0.5,
        c.w,
    )
}

fn rgb_psy_to_linear(c: Vec4) -> Vec4 {
    let r = c.x / 0.8;
    let g = c.y / 1.0;
    let b = c.z / 0.5;
    Vec4::new(r * r * r, g * g * g, b * b * b, c.w)
}

const VISUAL_CURVE_EXP: f32 = 2.2 / 3.0;

fn psy_visual_curve_y(c: Vec4, cb_scale: f32) -> Vec4 {
    let y = c.x.max(0.0).powf(VISUAL_CURVE_EXP);
    Vec4::new(y, c.y * cb_scale, c.z, c.w)
}

fn psy_visual_curve_y_inverse(c: Vec4, cb_scale: f32) -> Vec4 {
    let y = c.x.max(0.0).powf(1.0 / VISUAL_CURVE_EXP);
    Vec4::new(y, c.y / cb_scale, c.z, c.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Vec<(u8, u8, u8)> {
        let steps = [0u8, 1, 17, 64, 85, 128, 170, 200, 254, 255];
        let mut out = Vec::new();
        for &r in &steps {
            for &g in &steps {
                for &b in &[0u8, 64, 128, 255] {
                    out.push((r, g, b));
                }
            }
        }
        out
    }

    #[test]
    fn every_space_round_trips_within_tolerance() {
        for space in Colourspace::ALL {
            for (r, g, b) in sample_grid() {
                let srgb = Vec4::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0);
                let working = space.forward(srgb);
                let back = space.inverse(working);
                assert!(
                    (back.x - srgb.x).abs() <= 1e-3,
                    "{space:?} R round-trip {srgb:?} -> {working:?} -> {back:?}"
                );
                assert!((back.y - srgb.y).abs() <= 1e-3, "{space:?} G round-trip failed");
                assert!((back.z - srgb.z).abs() <= 1e-3, "{space:?} B round-trip failed");
            }
        }
    }

    #[test]
    fn alpha_preserved_exactly_by_every_transform() {
        for space in Colourspace::ALL {
            let srgb = Vec4::new(0.3, 0.6, 0.9, 0.417);
            let working = space.forward(srgb);
            assert_eq!(working.w, 0.417, "{space:?} forward touched alpha");
            let back = space.inverse(working);
            assert_eq!(back.w, 0.417, "{space:?} inverse touched alpha");
        }
    }

    #[test]
    fn parse_accepts_every_configuration_name() {
        for (name, expect) in [
            ("srgb", Colourspace::Srgb),
            ("rgb-linear", Colourspace::RgbLinear),
            ("ycbcr", Colourspace::YCbCr),
            ("ycocg", Colourspace::YCoCg),
            ("cielab", Colourspace::CieLab),
            ("ictcp", Colourspace::ICtCp),
            ("oklab", Colourspace::Oklab),
            ("rgb-psy", Colourspace::RgbPsy),
            ("ycbcr-psy", Colourspace::YCbCrPsy),
            ("ycocg-psy", Colourspace::YCoCgPsy),
        ] {
            assert_eq!(Colourspace::parse(name), Some(expect));
        }
        assert_eq!(Colourspace::parse("bogus"), None);
    }
}
