//! Form widgets: password strength meter and multi-row star rating.

use serde::Serialize;

const STRENGTH_WEAK: &str = "#dc3545";
const STRENGTH_FAIR: &str = "#ffc107";
const STRENGTH_STRONG: &str = "#198754";

/// Placeholder shown when no rating row has a value.
pub const NO_AVERAGE: &str = "—";

/// Highest star value in a rating row.
pub const MAX_STARS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// 0–4, one point per satisfied rule.
    pub score: u8,
    pub percent: u8,
    pub color: &'static str,
}

/// Score a password: length ≥ 8, an uppercase letter, a digit, a symbol.
pub fn password_strength(password: &str) -> PasswordStrength {
    let rules = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = rules.iter().filter(|&&ok| ok).count() as u8;

    let color = match score {
        0 | 1 => STRENGTH_WEAK,
        2 => STRENGTH_FAIR,
        _ => STRENGTH_STRONG,
    };

    PasswordStrength {
        score,
        percent: score * 25,
        color,
    }
}

/// Review form with several star rows (plot, acting, …) and a live average.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingForm {
    rows: Vec<Option<f32>>,
}

impl RatingForm {
    pub fn new(rows: usize) -> Self {
        Self {
            rows: vec![None; rows],
        }
    }

    /// Prefill from stored values, e.g. when editing a review. Values are
    /// kept as given; only the lit stars are rounded.
    pub fn with_values(values: Vec<Option<f32>>) -> Self {
        Self {
            rows: values
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()).map(|x| x.clamp(0.0, f32::from(MAX_STARS))))
                .collect(),
        }
    }

    /// Set a row from a star click. Out-of-range rows are ignored.
    pub fn set(&mut self, row: usize, stars: u8) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = Some(f32::from(stars.clamp(1, MAX_STARS)));
        }
    }

    /// Star count shown for a row.
    pub fn value(&self, row: usize) -> Option<u8> {
        self.rows
            .get(row)
            .copied()
            .flatten()
            .map(|v| v.round() as u8)
    }

    /// Which stars of a row are lit.
    pub fn active_stars(&self, row: usize) -> Vec<bool> {
        let value = self.value(row).unwrap_or(0);
        (1..=MAX_STARS).map(|star| star <= value).collect()
    }

    pub fn average(&self) -> Option<f32> {
        let filled: Vec<f32> = self.rows.iter().flatten().copied().collect();
        if filled.is_empty() {
            None
        } else {
            Some(filled.iter().sum::<f32>() / filled.len() as f32)
        }
    }

    pub fn average_label(&self) -> String {
        self.average()
            .map(|avg| format!("{avg:.1}"))
            .unwrap_or_else(|| NO_AVERAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength_levels() {
        assert_eq!(password_strength("").score, 0);
        assert_eq!(password_strength("").color, STRENGTH_WEAK);

        let fair = password_strength("abcdefgh1");
        assert_eq!(fair.score, 2);
        assert_eq!(fair.percent, 50);
        assert_eq!(fair.color, STRENGTH_FAIR);

        let strong = password_strength("Abcdefg1!");
        assert_eq!(strong.score, 4);
        assert_eq!(strong.percent, 100);
        assert_eq!(strong.color, STRENGTH_STRONG);
    }

    #[test]
    fn test_non_ascii_counts_as_symbol() {
        assert_eq!(password_strength("пароль").score, 1);
    }

    #[test]
    fn test_rating_average() {
        let mut form = RatingForm::new(5);
        assert_eq!(form.average_label(), NO_AVERAGE);

        form.set(0, 8);
        form.set(2, 9);
        assert_eq!(form.average_label(), "8.5");
        assert_eq!(form.value(1), None);
    }

    #[test]
    fn test_rating_clamps_and_ignores_bad_rows() {
        let mut form = RatingForm::new(2);
        form.set(0, 42);
        form.set(7, 3);
        assert_eq!(form.value(0), Some(MAX_STARS));
        assert_eq!(form.active_stars(0).iter().filter(|&&lit| lit).count(), 10);
    }

    #[test]
    fn test_prefill_rounds_values() {
        let form = RatingForm::with_values(vec![Some(6.6), None, Some(3.2)]);
        assert_eq!(form.value(0), Some(7));
        assert_eq!(form.value(2), Some(3));
        assert_eq!(form.active_stars(2), {
            let mut lit = vec![true; 3];
            lit.extend(vec![false; 7]);
            lit
        });
    }

    #[test]
    fn test_prefill_average_uses_stored_values() {
        let form = RatingForm::with_values(vec![Some(6.6), Some(3.2)]);
        assert_eq!(form.average_label(), "4.9");
        assert_eq!(form.active_stars(0).iter().filter(|&&lit| lit).count(), 7);
        assert_eq!(form.active_stars(1).iter().filter(|&&lit| lit).count(), 3);
    }
}
