//! Income tax
//!
//! The engine only needs "how much of this salary goes to tax"; the bracket
//! schedule behind it is swappable.

/// Pure salary-to-tax function.
pub trait TaxPolicy: Send + Sync {
    fn tax_for(&self, salary: i64) -> i64;
}

/// Marginal-rate brackets: each `(threshold, rate)` taxes the slice of salary
/// above `threshold` up to the next threshold.
#[derive(Debug, Clone)]
pub struct ProgressiveTax {
    brackets: Vec<(i64, f64)>,
}

impl ProgressiveTax {
    /// Thresholds must ascend and the first should be zero.
    pub fn new(brackets: Vec<(i64, f64)>) -> Self {
        Self { brackets }
    }
}

impl Default for ProgressiveTax {
    fn default() -> Self {
        Self::new(vec![
            (0, 0.10),
            (10_000, 0.12),
            (40_000, 0.22),
            (85_000, 0.24),
            (165_000, 0.32),
            (400_000, 0.37),
        ])
    }
}

impl TaxPolicy for ProgressiveTax {
    fn tax_for(&self, salary: i64) -> i64 {
        if salary <= 0 {
            return 0;
        }
        let mut tax = 0.0;
        for (i, &(threshold, rate)) in self.brackets.iter().enumerate() {
            if salary <= threshold {
                break;
            }
            let ceiling = self
                .brackets
                .get(i + 1)
                .map_or(salary, |&(next, _)| next.min(salary));
            tax += (ceiling - threshold) as f64 * rate;
        }
        tax.round() as i64
    }
}

/// No tax at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTax;

impl TaxPolicy for NoTax {
    fn tax_for(&self, _salary: i64) -> i64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progressive_brackets() {
        let tax = ProgressiveTax::default();
        assert_eq!(tax.tax_for(0), 0);
        assert_eq!(tax.tax_for(-5), 0);
        assert_eq!(tax.tax_for(10_000), 1_000);
        // 1 000 + 30 000 * 0.12 + 10 000 * 0.22
        assert_eq!(tax.tax_for(50_000), 6_800);
    }

    #[test]
    fn test_tax_never_exceeds_salary() {
        let tax = ProgressiveTax::default();
        for salary in [1, 999, 25_000, 90_000, 1_000_000, 50_000_000] {
            let owed = tax.tax_for(salary);
            assert!(owed >= 0 && owed < salary, "{salary}: {owed}");
        }
        assert_eq!(NoTax.tax_for(80_000), 0);
    }
}
