use crate::edit::filters::{FilterFn, NamedFilter, fmt_num, normalize_steps};

/// Upper bound for the brightness/contrast/saturation sliders, in percent.
pub const PERCENT_MAX: f32 = 200.0;
/// Upper bound for the beauty slider.
pub const BEAUTY_MAX: f32 = 100.0;
/// Blur radius in px contributed by one unit of beauty.
pub const BEAUTY_BLUR_PER_UNIT: f32 = 0.02;

/// Slider values. Percent sliders treat 100 as identity; beauty treats 0 as identity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Adjustment {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub beauty: f32,
}

impl Default for Adjustment {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            beauty: 0.0,
        }
    }
}

impl Adjustment {
    /// Copy with every field forced into its slider range.
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            brightness: clamp_or(self.brightness, PERCENT_MAX, d.brightness),
            contrast: clamp_or(self.contrast, PERCENT_MAX, d.contrast),
            saturation: clamp_or(self.saturation, PERCENT_MAX, d.saturation),
            beauty: clamp_or(self.beauty, BEAUTY_MAX, d.beauty),
        }
    }

    /// Gaussian standard deviation (px) for the beauty slider.
    pub fn beauty_blur_px(&self) -> f32 {
        self.beauty * BEAUTY_BLUR_PER_UNIT
    }
}

fn clamp_or(v: f32, max: f32, fallback: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, max) } else { fallback }
}

/// Partial slider update; `None` leaves a field untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjustmentPatch {
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
    pub beauty: Option<f32>,
}

/// Current sliders plus the single active named filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjustmentState {
    adjustment: Adjustment,
    filter: NamedFilter,
}

impl AdjustmentState {
    pub fn new(adjustment: Adjustment, filter: NamedFilter) -> Self {
        Self {
            adjustment: adjustment.clamped(),
            filter,
        }
    }

    pub fn get(&self) -> Adjustment {
        self.adjustment
    }

    pub fn filter(&self) -> NamedFilter {
        self.filter
    }

    /// Merge the fields present in `patch`, clamping each to its range.
    ///
    /// Non-finite inputs are ignored rather than stored.
    pub fn set(&mut self, patch: AdjustmentPatch) {
        let cur = self.adjustment;
        let pick = |new: Option<f32>, old: f32| match new {
            Some(v) if v.is_finite() => v,
            _ => old,
        };
        self.adjustment = Adjustment {
            brightness: pick(patch.brightness, cur.brightness),
            contrast: pick(patch.contrast, cur.contrast),
            saturation: pick(patch.saturation, cur.saturation),
            beauty: pick(patch.beauty, cur.beauty),
        }
        .clamped();
    }

    pub fn select_filter(&mut self, filter: NamedFilter) {
        self.filter = filter;
    }

    /// Restore default sliders and the `Original` filter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// CSS-style filter string used by the live preview.
    pub fn preview_expression(&self) -> String {
        let a = self.adjustment;
        let mut parts = vec![
            format!("brightness({}%)", fmt_num(a.brightness)),
            format!("contrast({}%)", fmt_num(a.contrast)),
            format!("saturate({}%)", fmt_num(a.saturation)),
        ];
        let named = self.filter.expression();
        if !named.is_empty() {
            parts.push(named.to_string());
        }
        if a.beauty > 0.0 {
            parts.push(format!("blur({}px)", fmt_num(a.beauty_blur_px())));
        }
        parts.join(" ")
    }

    /// Typed photo pipeline in compositor order, identity steps removed.
    ///
    /// Order: brightness, contrast, saturation, beauty blur, then the named filter's steps.
    pub fn photo_pipeline(&self) -> Vec<FilterFn> {
        let a = self.adjustment;
        let mut steps = vec![
            FilterFn::Brightness(a.brightness / 100.0),
            FilterFn::Contrast(a.contrast / 100.0),
            FilterFn::Saturate(a.saturation / 100.0),
            FilterFn::Blur {
                sigma_px: a.beauty_blur_px(),
            },
        ];
        steps.extend(self.filter.steps());
        normalize_steps(&steps)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/adjust.rs"]
mod tests;
