use tax_core::{InvalidProfile, ProfileRecord};

/// Merges the records extracted from several documents of one return.
///
/// - name and SSN: the first non-empty value wins
/// - filing status: the last non-empty value wins
/// - monetary amounts: summed
/// - dependent count: the largest reported
///
/// No records yields the default record. The merged record can still exceed
/// [`tax_core::MAX_AMOUNT`]; that is caught when it becomes a profile.
///
/// # Errors
///
/// Each record is checked with [`ProfileRecord::validate`] before merging,
/// so a negative value on one document is reported instead of being offset
/// against another.
pub fn combine_records(records: &[ProfileRecord]) -> Result<ProfileRecord, InvalidProfile> {
    let mut combined = ProfileRecord::default();

    for record in records {
        record.validate()?;

        if combined.taxpayer_name.is_empty() && !record.taxpayer_name.is_empty() {
            combined.taxpayer_name = record.taxpayer_name.clone();
        }
        if combined.taxpayer_ssn.is_empty() && !record.taxpayer_ssn.is_empty() {
            combined.taxpayer_ssn = record.taxpayer_ssn.clone();
        }
        if let Some(status) = record.filing_status.as_ref().filter(|s| !s.trim().is_empty()) {
            combined.filing_status = Some(status.clone());
        }

        combined.wages += record.wages;
        combined.federal_tax_withheld += record.federal_tax_withheld;
        combined.interest_income += record.interest_income;
        combined.dividends += record.dividends;
        combined.daycare_expenses += record.daycare_expenses;

        combined.dependent_count = combined.dependent_count.max(record.dependent_count);
    }

    Ok(combined)
}
