use crate::stats::IndicatorRecord;

/// Fills `renter_pct`, `college_degree_pct` and `unemployment_rate` on every
/// record, preserving order.
pub fn derive_ratios(records: Vec<IndicatorRecord>) -> Vec<IndicatorRecord> {
    records.into_iter().map(IndicatorRecord::with_derived).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_ratios_keeps_order() {
        let records = vec![
            IndicatorRecord {
                year: 2010,
                unemployed: Some(1),
                in_labor_force: Some(8),
                ..Default::default()
            },
            IndicatorRecord {
                year: 2011,
                unemployed: Some(1),
                in_labor_force: None,
                ..Default::default()
            },
        ];

        let derived = derive_ratios(records);

        assert_eq!(derived[0].year, 2010);
        assert_eq!(derived[0].unemployment_rate, Some(12.5));
        assert_eq!(derived[1].unemployment_rate, None);
    }
}
