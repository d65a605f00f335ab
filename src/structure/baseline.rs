//! Body-text font size estimation.

use crate::model::Span;
use crate::parser::ExtractOptions;

/// Estimate the typical body-text font size of a document.
///
/// Takes the upper median of all span sizes inside the body band, so
/// that titles, running headers and the odd huge font do not skew it.
/// Falls back to the configured default when no span is in the band.
pub fn estimate_baseline<'a>(
    spans: impl IntoIterator<Item = &'a Span>,
    options: &ExtractOptions,
) -> f32 {
    let mut sizes: Vec<f32> = spans
        .into_iter()
        .map(Span::font_size)
        .filter(|size| (options.body_size_min..=options.body_size_max).contains(size))
        .collect();

    if sizes.is_empty() {
        return options.default_baseline;
    }

    sizes.sort_by(f32::total_cmp);
    sizes[sizes.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn spans(sizes: &[f32]) -> Vec<Span> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, size)| Span::new("text", *size, false, 1, i, BoundingBox::default()).unwrap())
            .collect()
    }

    #[test]
    fn test_median_ignores_out_of_band_sizes() {
        let spans = spans(&[10.0, 10.0, 10.0, 18.0, 24.0, 6.0]);
        assert_eq!(estimate_baseline(&spans, &ExtractOptions::default()), 10.0);
    }

    #[test]
    fn test_upper_median_on_even_count() {
        let spans = spans(&[9.0, 10.0, 11.0, 12.0]);
        assert_eq!(estimate_baseline(&spans, &ExtractOptions::default()), 11.0);
    }

    #[test]
    fn test_band_is_inclusive() {
        let spans = spans(&[8.0, 14.0, 14.0]);
        assert_eq!(estimate_baseline(&spans, &ExtractOptions::default()), 14.0);
    }

    #[test]
    fn test_default_when_nothing_in_band() {
        let spans = spans(&[20.0, 30.0]);
        assert_eq!(estimate_baseline(&spans, &ExtractOptions::default()), 12.0);
        assert_eq!(estimate_baseline(&[], &ExtractOptions::default()), 12.0);

        let options = ExtractOptions::default().with_default_baseline(11.0);
        assert_eq!(estimate_baseline(&spans, &options), 11.0);
    }
}
