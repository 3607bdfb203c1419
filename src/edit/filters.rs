use std::fmt;

use crate::foundation::error::{GlowupError, GlowupResult};

/// One of the fixed style presets offered next to the adjustment sliders.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum NamedFilter {
    /// Identity; contributes nothing to the pipeline.
    #[default]
    Original,
    /// Faded sepia with a contrast lift.
    Vintage,
    /// Full grayscale.
    #[serde(rename = "B&W", alias = "BlackWhite")]
    BlackWhite,
    /// Light sepia with extra saturation.
    Warm,
    /// Hue rotated half a turn.
    Cool,
    /// Doubled saturation.
    Vivid,
    /// Slightly brighter, slightly flatter.
    Soft,
    /// Strong contrast, muted color.
    Drama,
}

impl NamedFilter {
    /// All presets in display order.
    pub const ALL: [Self; 8] = [
        Self::Original,
        Self::Vintage,
        Self::BlackWhite,
        Self::Warm,
        Self::Cool,
        Self::Vivid,
        Self::Soft,
        Self::Drama,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Vintage => "Vintage",
            Self::BlackWhite => "B&W",
            Self::Warm => "Warm",
            Self::Cool => "Cool",
            Self::Vivid => "Vivid",
            Self::Soft => "Soft",
            Self::Drama => "Drama",
        }
    }

    /// Literal filter-function expression; empty for [`NamedFilter::Original`].
    pub fn expression(self) -> &'static str {
        match self {
            Self::Original => "",
            Self::Vintage => "sepia(0.5) contrast(1.2)",
            Self::BlackWhite => "grayscale(1)",
            Self::Warm => "sepia(0.3) saturate(1.3)",
            Self::Cool => "hue-rotate(180deg) saturate(1.2)",
            Self::Vivid => "saturate(2) contrast(1.1)",
            Self::Soft => "brightness(1.1) contrast(0.9)",
            Self::Drama => "contrast(1.5) saturate(0.8)",
        }
    }

    /// Typed steps for this preset.
    pub fn steps(self) -> Vec<FilterFn> {
        // Preset expressions are literals above; a parse failure is a programming error that
        // tests catch, so fall back to identity rather than failing a render.
        parse_filter_expr(self.expression()).unwrap_or_default()
    }

    /// Look a preset up by display name (case-insensitive).
    pub fn from_name(name: &str) -> GlowupResult<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GlowupError::validation(format!("unknown filter '{name}'")))
    }
}

/// A single CSS-style filter function with its amount normalized.
///
/// Amounts are stored as multipliers (`1.0` = 100%), hue rotation in degrees and blur as a
/// standard deviation in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterFn {
    /// Linear RGB scale.
    Brightness(f32),
    /// Scale around mid-gray.
    Contrast(f32),
    /// Saturation matrix; 0 = gray, 1 = identity.
    Saturate(f32),
    /// Blend toward luminance; 0 = identity, 1 = gray.
    Grayscale(f32),
    /// Blend toward sepia; 0 = identity.
    Sepia(f32),
    /// Hue rotation matrix.
    HueRotate {
        /// Rotation angle in degrees.
        degrees: f32,
    },
    /// Gaussian blur.
    Blur {
        /// Standard deviation in pixels.
        sigma_px: f32,
    },
}

impl FilterFn {
    /// Whether applying this step leaves every pixel unchanged.
    pub fn is_identity(self) -> bool {
        match self {
            Self::Brightness(v) | Self::Contrast(v) | Self::Saturate(v) => v == 1.0,
            Self::Grayscale(v) | Self::Sepia(v) => v == 0.0,
            Self::HueRotate { degrees } => degrees.rem_euclid(360.0) == 0.0,
            Self::Blur { sigma_px } => sigma_px <= 0.0,
        }
    }
}

impl fmt::Display for FilterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Brightness(v) => write!(f, "brightness({})", fmt_num(v)),
            Self::Contrast(v) => write!(f, "contrast({})", fmt_num(v)),
            Self::Saturate(v) => write!(f, "saturate({})", fmt_num(v)),
            Self::Grayscale(v) => write!(f, "grayscale({})", fmt_num(v)),
            Self::Sepia(v) => write!(f, "sepia({})", fmt_num(v)),
            Self::HueRotate { degrees } => write!(f, "hue-rotate({}deg)", fmt_num(degrees)),
            Self::Blur { sigma_px } => write!(f, "blur({}px)", fmt_num(sigma_px)),
        }
    }
}

/// Shortest decimal form of `v` (`1`, `0.5`, `1.1`), matching how the preview expression prints
/// slider values.
pub fn fmt_num(v: f32) -> String {
    let v = f64::from(v);
    let rounded = (v * 1e4).round() / 1e4;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{rounded:.4}");
        s.trim_end_matches('0').to_string()
    }
}

/// Parse a space-separated filter expression such as `sepia(0.5) contrast(120%)`.
///
/// The empty string and `none` parse to an empty pipeline.
pub fn parse_filter_expr(expr: &str) -> GlowupResult<Vec<FilterFn>> {
    let mut rest = expr.trim();
    if rest.is_empty() || rest.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| {
            GlowupError::validation(format!("expected '(' in filter expression '{expr}'"))
        })?;
        let close = rest[open..].find(')').map(|i| open + i).ok_or_else(|| {
            GlowupError::validation(format!("unclosed '(' in filter expression '{expr}'"))
        })?;

        let name = rest[..open].trim().to_ascii_lowercase();
        let arg = rest[open + 1..close].trim();
        out.push(parse_function(&name, arg)?);
        rest = rest[close + 1..].trim_start();
    }
    Ok(out)
}

fn parse_function(name: &str, arg: &str) -> GlowupResult<FilterFn> {
    match name {
        "brightness" => Ok(FilterFn::Brightness(parse_amount(name, arg)?)),
        "contrast" => Ok(FilterFn::Contrast(parse_amount(name, arg)?)),
        "saturate" => Ok(FilterFn::Saturate(parse_amount(name, arg)?)),
        "grayscale" => Ok(FilterFn::Grayscale(parse_amount(name, arg)?.min(1.0))),
        "sepia" => Ok(FilterFn::Sepia(parse_amount(name, arg)?.min(1.0))),
        "hue-rotate" => Ok(FilterFn::HueRotate {
            degrees: parse_angle(arg)?,
        }),
        "blur" => Ok(FilterFn::Blur {
            sigma_px: parse_length(arg)?,
        }),
        "" => Err(GlowupError::validation("filter function name is empty")),
        other => Err(GlowupError::validation(format!(
            "unknown filter function '{other}'"
        ))),
    }
}

fn parse_number(s: &str) -> GlowupResult<f32> {
    let v: f32 = s
        .trim()
        .parse()
        .map_err(|_| GlowupError::validation(format!("invalid number '{s}'")))?;
    if !v.is_finite() {
        return Err(GlowupError::validation(format!("number '{s}' must be finite")));
    }
    Ok(v)
}

fn parse_amount(name: &str, arg: &str) -> GlowupResult<f32> {
    if arg.is_empty() {
        return Ok(1.0);
    }
    let v = match arg.strip_suffix('%') {
        Some(p) => parse_number(p)? / 100.0,
        None => parse_number(arg)?,
    };
    if v < 0.0 {
        return Err(GlowupError::validation(format!(
            "{name}() amount must be >= 0"
        )));
    }
    Ok(v)
}

fn parse_angle(arg: &str) -> GlowupResult<f32> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    if let Some(v) = arg.strip_suffix("deg") {
        return parse_number(v);
    }
    if let Some(v) = arg.strip_suffix("grad") {
        return Ok(parse_number(v)? * 0.9);
    }
    if let Some(v) = arg.strip_suffix("rad") {
        return Ok(parse_number(v)?.to_degrees());
    }
    if let Some(v) = arg.strip_suffix("turn") {
        return Ok(parse_number(v)? * 360.0);
    }
    let v = parse_number(arg)?;
    if v == 0.0 {
        return Ok(0.0);
    }
    Err(GlowupError::validation(format!(
        "hue-rotate() needs an angle unit, got '{arg}'"
    )))
}

fn parse_length(arg: &str) -> GlowupResult<f32> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    let v = match arg.strip_suffix("px") {
        Some(p) => parse_number(p)?,
        None => {
            let v = parse_number(arg)?;
            if v != 0.0 {
                return Err(GlowupError::validation(format!(
                    "blur() needs a px length, got '{arg}'"
                )));
            }
            v
        }
    };
    if v < 0.0 {
        return Err(GlowupError::validation("blur() radius must be >= 0"));
    }
    Ok(v)
}

/// Drop steps that cannot change any pixel.
pub fn normalize_steps(steps: &[FilterFn]) -> Vec<FilterFn> {
    steps.iter().copied().filter(|s| !s.is_identity()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/edit/filters.rs"]
mod tests;
